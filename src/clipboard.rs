//! Clipboard access for copying generated candidates.

use std::io::{ErrorKind, Write};
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::error::CopyError;

/// Destination of a copy action.
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError>;
}

/// Clipboard tools tried in order; the first one installed is used.
const CLIPBOARD_COMMANDS: &[(&str, &[&str])] = &[
    ("wl-copy", &[]),
    ("xclip", &["-selection", "clipboard"]),
    ("xsel", &["--clipboard", "--input"]),
    ("pbcopy", &[]),
    ("clip", &[]),
];

/// Platform clipboard reached through the usual command line tools.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl SystemClipboard {
    pub fn new() -> Self {
        Self
    }
}

impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
        for (program, args) in CLIPBOARD_COMMANDS {
            let spawned = Command::new(program)
                .args(*args)
                .stdin(Stdio::piped())
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .spawn();

            let mut child = match spawned {
                Ok(child) => child,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(CopyError::Io(e)),
            };

            let status = feed(&mut child, text)?;
            if status.success() {
                #[cfg(feature = "tracing")]
                tracing::debug!("Copied to clipboard with {}", program);
                return Ok(());
            }
            return Err(CopyError::CommandFailed(format!("{} exited with {}", program, status)));
        }

        #[cfg(feature = "tracing")]
        tracing::warn!("No clipboard tool found");
        Err(CopyError::Unavailable)
    }
}

/// Writes `text` to the tool's stdin and waits for it to exit.
///
/// The child is reaped on every path, including a failed write.
fn feed(child: &mut Child, text: &str) -> Result<ExitStatus, CopyError> {
    let written = match child.stdin.take() {
        Some(mut stdin) => stdin.write_all(text.as_bytes()),
        None => Ok(()),
    };
    // stdin is closed at this point, which ends the tool's input

    if let Err(e) = written {
        child.kill().ok();
        child.wait()?;
        return Err(CopyError::Io(e));
    }
    Ok(child.wait()?)
}

/// In-process clipboard, for headless shells and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), CopyError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}
