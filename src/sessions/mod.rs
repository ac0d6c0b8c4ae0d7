//! Workflow sessions
//!
//! Each session owns one workflow's request lifecycle and result state.
//! Sessions never share state with each other; each one enforces its own
//! at-most-one-in-flight rule.
//!
//! A session transition is split in two steps:
//! - `begin` validates the input and marks the session as loading,
//!   returning what must be sent (or `None` if a request is in flight)
//! - `complete` is the reducer applied to the service outcome

mod analysis;
mod generation;

pub use analysis::{AnalysisSession, ConsensusView, ModelFilter};
pub use generation::{GenerationSession, Generator, PassphraseSession, PasswordSession};
