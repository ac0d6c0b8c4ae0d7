//! Password strength service client
//!
//! This library orchestrates a remote password analysis service: it
//! tracks service availability, submits passwords for analysis, requests
//! generated passwords and passphrases, and keeps the results of each
//! workflow in its own session state.
//!
//! Scoring, entropy, breach lookup and random generation all happen in the
//! service; this crate only builds requests, decodes responses and
//! reconciles them into session state.
//!
//! # Features
//!
//! - `http` (default): `reqwest`-backed [`HttpClient`]
//! - `tracing`: Enables logging via tracing crate
//! - `cli`: Builds the `pwd-client` command line shell
//!
//! # Environment Variables
//!
//! - `PWD_SERVICE_URL`: Base URL of the service
//!   (default: `http://localhost:8000`)
//! - `PWD_SERVICE_TIMEOUT_SECS`: Optional transport timeout
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_strength_client::{Coordinator, HttpClient, Intent, ServiceConfig};
//! use secrecy::SecretString;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new(ServiceConfig::from_env()?)?;
//! let token = CancellationToken::new();
//! let mut coordinator = Coordinator::new();
//!
//! // One-shot availability probe
//! coordinator.probe(&client, &token).await;
//!
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//! coordinator
//!     .dispatch(&client, Intent::SubmitPassword(password), &token)
//!     .await?;
//!
//! if let Some(view) = coordinator.analysis().consensus_view() {
//!     println!("Consensus: {} ({:.0}%)", view.consensus, view.agreement_percentage);
//! }
//! # Ok(())
//! # }
//! ```

// Internal modules
mod client;
mod clipboard;
mod config;
mod coordinator;
mod error;
mod health;
mod inflight;
mod model;
mod params;
mod sessions;

// Public API
#[cfg(feature = "http")]
pub use client::HttpClient;
pub use client::{
    decode_analysis, decode_candidates, decode_health, AnalyzeBody, GenerateBody,
    LocalPasswordService, PassphraseBody, PasswordService, ANALYZE_PATH, GENERATE_PATH,
    HEALTH_PATH, PASSPHRASE_PATH,
};
pub use clipboard::{Clipboard, MemoryClipboard, SystemClipboard};
pub use config::{ConfigError, ServiceConfig, DEFAULT_SERVICE_URL};
pub use coordinator::{Completion, Coordinator, Intent, IntentError, Request, RequestKind, Workflow};
pub use error::{CopyError, ServiceError, ServiceErrorKind, SessionError, ValidationError};
pub use health::{HealthMonitor, ServiceStatus};
pub use inflight::RequestId;
pub use model::{
    AnalysisResult, Composition, CrackTimes, EntropyMetrics, GeneratedCandidate, HealthInfo,
    ModelName, StrengthLabel,
};
pub use params::{
    GenerationParameters, GenerationRequest, PassphraseParameters, Separator, MAX_COUNT,
    MAX_PASSWORD_LENGTH, MAX_WORDS, MIN_COUNT, MIN_PASSWORD_LENGTH, MIN_WORDS,
};
pub use sessions::{
    AnalysisSession, ConsensusView, GenerationSession, Generator, ModelFilter, PassphraseSession,
    PasswordSession,
};
