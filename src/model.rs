//! Client-side model of the service results.
//!
//! Values here are produced only by the wire decoding in
//! [`crate::client`]; downstream code never sees raw label strings.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier of one of the service's strength-prediction models.
pub type ModelName = String;

/// Canonical strength verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrengthLabel {
    Strong,
    Medium,
    Weak,
    Unknown,
}

impl StrengthLabel {
    /// Canonicalizes a label reported by the service (case-insensitive).
    ///
    /// Anything that is not `strong`, `medium` or `weak` maps to `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strong" => StrengthLabel::Strong,
            "medium" => StrengthLabel::Medium,
            "weak" => StrengthLabel::Weak,
            _ => StrengthLabel::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StrengthLabel::Strong => "Strong",
            StrengthLabel::Medium => "Medium",
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StrengthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Information returned by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthInfo {
    pub status: String,
    pub models_loaded: bool,
    pub available_models: Vec<ModelName>,
    pub breach_database_size: u64,
}

/// Entropy estimates, in bits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntropyMetrics {
    pub shannon_entropy: f64,
    pub practical_entropy: f64,
}

/// Character class counts. Categories are not required to sum to the
/// password length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Composition {
    pub lowercase: u32,
    pub uppercase: u32,
    pub digits: u32,
    pub symbols: u32,
    pub spaces: u32,
    pub unique: u32,
}

/// Human-readable crack time estimates for the four attack scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrackTimes {
    pub online_throttled: String,
    pub online_fast: String,
    pub offline_gpu: String,
    pub offline_super: String,
}

/// Result of one analyze call.
///
/// The echoed password is kept secret; `Debug` redacts it.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub password: SecretString,
    pub length: u32,
    pub predictions: BTreeMap<ModelName, StrengthLabel>,
    pub consensus: StrengthLabel,
    pub agreement_percentage: f64,
    pub metrics: EntropyMetrics,
    pub composition: Composition,
    pub crack_time: CrackTimes,
    pub patterns: Vec<String>,
    pub dictionary_words: Vec<String>,
    pub suggestions: Vec<String>,
    pub is_breached: bool,
    /// Meaningful only when `is_breached` is set.
    pub breach_count: u64,
}

impl PartialEq for AnalysisResult {
    fn eq(&self, other: &Self) -> bool {
        self.password.expose_secret() == other.password.expose_secret()
            && self.length == other.length
            && self.predictions == other.predictions
            && self.consensus == other.consensus
            && self.agreement_percentage == other.agreement_percentage
            && self.metrics == other.metrics
            && self.composition == other.composition
            && self.crack_time == other.crack_time
            && self.patterns == other.patterns
            && self.dictionary_words == other.dictionary_words
            && self.suggestions == other.suggestions
            && self.is_breached == other.is_breached
            && self.breach_count == other.breach_count
    }
}

/// One generated password or passphrase.
#[derive(Debug, Clone)]
pub struct GeneratedCandidate {
    pub text: SecretString,
    pub entropy: f64,
    pub crack_time_gpu: String,
}

impl GeneratedCandidate {
    pub fn new(text: impl Into<String>, entropy: f64, crack_time_gpu: impl Into<String>) -> Self {
        Self {
            text: SecretString::new(text.into().into_boxed_str()),
            entropy,
            crack_time_gpu: crack_time_gpu.into(),
        }
    }
}

impl PartialEq for GeneratedCandidate {
    fn eq(&self, other: &Self) -> bool {
        self.text.expose_secret() == other.text.expose_secret()
            && self.entropy == other.entropy
            && self.crack_time_gpu == other.crack_time_gpu
    }
}
