//! Command line shell for the password analysis service.
//!
//! Probes the service once, runs a single workflow and prints the
//! resulting session state.

use std::io::{BufRead, IsTerminal, Write};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use pwd_strength_client::{
    AnalysisSession, ConfigError, Coordinator, CopyError, GeneratedCandidate, HttpClient, Intent,
    IntentError, ModelFilter, Separator, ServiceConfig, ServiceError, ServiceStatus, SessionError,
    SystemClipboard, Workflow,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pwd-client", version, about = "Analyze and generate passwords with a remote strength service")]
struct Cli {
    /// Service base URL (overrides PWD_SERVICE_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show service availability and loaded models
    Health,
    /// Analyze a password read from stdin
    Analyze {
        /// Show a single model's verdict instead of all of them
        #[arg(long, value_name = "NAME")]
        model: Option<String>,
    },
    /// Generate random passwords
    Generate(GenerateArgs),
    /// Generate random passphrases
    Passphrase(PassphraseArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    #[arg(long)]
    length: Option<u32>,
    #[arg(long)]
    count: Option<u32>,
    #[arg(long)]
    no_upper: bool,
    #[arg(long)]
    no_lower: bool,
    #[arg(long)]
    no_digits: bool,
    #[arg(long)]
    no_symbols: bool,
    #[arg(long)]
    exclude_ambiguous: bool,
    /// Copy the candidate at this index to the clipboard
    #[arg(long)]
    copy: Option<usize>,
}

#[derive(Args, Debug)]
struct PassphraseArgs {
    #[arg(long)]
    words: Option<u32>,
    /// One of "-", "_", " ", "."
    #[arg(long, value_parser = parse_separator)]
    separator: Option<Separator>,
    #[arg(long)]
    count: Option<u32>,
    /// Copy the candidate at this index to the clipboard
    #[arg(long)]
    copy: Option<usize>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Service(#[from] ServiceError),
    #[error(transparent)]
    Intent(#[from] IntentError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Copy(#[from] CopyError),
    #[error("Failed to read password: {0}")]
    Input(#[from] std::io::Error),
    #[error("Service is {0}")]
    NotHealthy(&'static str),
    #[error("Interrupted")]
    Cancelled,
}

fn parse_separator(raw: &str) -> Result<Separator, String> {
    Separator::from_symbol(raw).ok_or_else(|| format!("unsupported separator '{}'", raw))
}

/// Every model unless a name is given; the name is never interpreted.
fn model_filter(model: Option<String>) -> ModelFilter {
    model.map(ModelFilter::Model).unwrap_or_default()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let token = CancellationToken::new();
    let interrupt = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            interrupt.cancel();
        }
    });

    match run(cli, &token).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, token: &CancellationToken) -> Result<(), CliError> {
    let config = match &cli.url {
        Some(url) => ServiceConfig::new(url)?,
        None => ServiceConfig::from_env()?,
    };
    tracing::debug!("Using service at {}", config.base_url());
    let client = HttpClient::new(config)?;

    let mut coordinator = Coordinator::new();
    coordinator.probe(&client, token).await;
    if token.is_cancelled() {
        return Err(CliError::Cancelled);
    }

    match cli.command {
        Command::Health => {
            print_status(coordinator.status());
            if !coordinator.status().is_healthy() {
                return Err(CliError::NotHealthy(coordinator.status().label()));
            }
        }
        Command::Analyze { model } => {
            let password = read_password()?;
            coordinator.handle(Intent::SelectWorkflow(Workflow::Analyze))?;
            coordinator.handle(Intent::SelectModelFilter(model_filter(model)))?;
            coordinator
                .dispatch(&client, Intent::SubmitPassword(password), token)
                .await?;
            finish(token, coordinator.analysis().error())?;
            print_analysis(coordinator.analysis());
        }
        Command::Generate(args) => {
            coordinator.handle(Intent::SelectWorkflow(Workflow::GeneratePassword))?;
            let params = coordinator.password_params_mut();
            if let Some(length) = args.length {
                params.length = length;
            }
            if let Some(count) = args.count {
                params.count = count;
            }
            params.include_upper = !args.no_upper;
            params.include_lower = !args.no_lower;
            params.include_digits = !args.no_digits;
            params.include_symbols = !args.no_symbols;
            params.exclude_ambiguous = args.exclude_ambiguous;

            coordinator
                .dispatch(&client, Intent::GeneratePasswords, token)
                .await?;
            finish(token, coordinator.passwords().error())?;
            print_candidates(coordinator.passwords().candidates());

            if let Some(index) = args.copy {
                coordinator.passwords().copy(index, &mut SystemClipboard::new())?;
                println!("Copied candidate {} to clipboard", index);
            }
        }
        Command::Passphrase(args) => {
            coordinator.handle(Intent::SelectWorkflow(Workflow::GeneratePassphrase))?;
            let params = coordinator.passphrase_params_mut();
            if let Some(words) = args.words {
                params.num_words = words;
            }
            if let Some(separator) = args.separator {
                params.separator = separator;
            }
            if let Some(count) = args.count {
                params.count = count;
            }

            coordinator
                .dispatch(&client, Intent::GeneratePassphrases, token)
                .await?;
            finish(token, coordinator.passphrases().error())?;
            print_candidates(coordinator.passphrases().candidates());

            if let Some(index) = args.copy {
                coordinator.passphrases().copy(index, &mut SystemClipboard::new())?;
                println!("Copied candidate {} to clipboard", index);
            }
        }
    }

    Ok(())
}

fn finish(token: &CancellationToken, error: Option<&SessionError>) -> Result<(), CliError> {
    if token.is_cancelled() {
        return Err(CliError::Cancelled);
    }
    match error {
        Some(e) => Err(CliError::Session(e.clone())),
        None => Ok(()),
    }
}

fn read_password() -> Result<SecretString, CliError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        eprint!("Password: ");
        std::io::stderr().flush()?;
    }

    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    Ok(SecretString::new(password.into()))
}

fn print_status(status: &ServiceStatus) {
    println!("Service: {}", status.label());
    if let ServiceStatus::Healthy {
        available_models,
        breach_db_size,
    } = status
    {
        println!("Models: {}", available_models.join(", "));
        println!("Breach database: {} entries", breach_db_size);
    }
}

fn print_list(title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!("{}:", title);
    for item in items {
        println!("  - {}", item);
    }
}

fn print_analysis(session: &AnalysisSession) {
    let Some(result) = session.current_result() else {
        return;
    };

    println!("Length: {} ({} unique)", result.length, result.composition.unique);
    println!(
        "Entropy: {:.2} bits (Shannon), {:.1} bits (practical)",
        result.metrics.shannon_entropy, result.metrics.practical_entropy
    );

    println!("Models:");
    for (model, label) in session.filtered_predictions() {
        println!("  {:<16} {}", model, label);
    }
    if let Some(view) = session.consensus_view() {
        println!(
            "Consensus: {} ({:.1}% agreement)",
            view.consensus, view.agreement_percentage
        );
    }

    let c = &result.composition;
    println!(
        "Composition: {} lower, {} upper, {} digits, {} symbols, {} spaces",
        c.lowercase, c.uppercase, c.digits, c.symbols, c.spaces
    );

    let t = &result.crack_time;
    println!("Crack time:");
    println!("  online, throttled   {}", t.online_throttled);
    println!("  online, fast        {}", t.online_fast);
    println!("  offline, GPU        {}", t.offline_gpu);
    println!("  offline, cluster    {}", t.offline_super);

    if result.is_breached {
        println!("Breached: yes, seen {} times", result.breach_count);
    } else {
        println!("Breached: no");
    }

    print_list("Patterns", &result.patterns);
    print_list("Dictionary words", &result.dictionary_words);
    print_list("Suggestions", &result.suggestions);
}

fn print_candidates(candidates: &[GeneratedCandidate]) {
    for (index, candidate) in candidates.iter().enumerate() {
        println!(
            "{:>2}. {}  ({:.1} bits, GPU: {})",
            index,
            candidate.text.expose_secret(),
            candidate.entropy,
            candidate.crack_time_gpu
        );
    }
}
