//! Service client
//!
//! The four operations of the analysis service, behind a trait so that
//! sessions and the coordinator can be driven by any implementation.

#[cfg(feature = "http")]
mod http;
mod wire;

use secrecy::SecretString;

use crate::error::ServiceError;
use crate::model::{AnalysisResult, GeneratedCandidate, HealthInfo};
use crate::params::{GenerationParameters, PassphraseParameters};

#[cfg(feature = "http")]
pub use http::HttpClient;
pub use wire::{
    decode_analysis, decode_candidates, decode_health, AnalyzeBody, GenerateBody, PassphraseBody,
};

/// Endpoint paths, relative to the configured base URL.
pub const HEALTH_PATH: &str = "health";
pub const ANALYZE_PATH: &str = "analyze";
pub const GENERATE_PATH: &str = "generate";
pub const PASSPHRASE_PATH: &str = "generate/passphrase";

/// Operations offered by the password analysis service.
///
/// Only `probe_health` is idempotent. Implementations must never retry
/// the other three on their own.
#[trait_variant::make(PasswordService: Send)]
pub trait LocalPasswordService {
    async fn probe_health(&self) -> Result<HealthInfo, ServiceError>;

    /// Analyzes a non-empty password.
    async fn analyze(&self, password: &SecretString) -> Result<AnalysisResult, ServiceError>;

    async fn generate_passwords(
        &self,
        params: &GenerationParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError>;

    async fn generate_passphrases(
        &self,
        params: &PassphraseParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError>;
}
