//! Wire contract of the analysis service.
//!
//! Request bodies are serialized from the client-side parameter records;
//! response bodies are decoded in two steps so that a body that is not
//! JSON at all ([`ServiceError::InvalidJson`]) is told apart from valid
//! JSON that misses required fields ([`ServiceError::Malformed`]).

use secrecy::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::ServiceError;
use crate::model::{
    AnalysisResult, Composition, CrackTimes, EntropyMetrics, GeneratedCandidate, HealthInfo,
    StrengthLabel,
};
use crate::params::{GenerationParameters, PassphraseParameters, Separator};

/// Body of `POST /analyze`.
#[derive(Debug, Serialize)]
pub struct AnalyzeBody<'a> {
    pub password: &'a str,
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerateBody {
    pub length: u32,
    pub count: u32,
    pub include_uppercase: bool,
    pub include_lowercase: bool,
    pub include_digits: bool,
    pub include_symbols: bool,
    pub exclude_ambiguous: bool,
}

impl From<&GenerationParameters> for GenerateBody {
    fn from(params: &GenerationParameters) -> Self {
        Self {
            length: params.length,
            count: params.count,
            include_uppercase: params.include_upper,
            include_lowercase: params.include_lower,
            include_digits: params.include_digits,
            include_symbols: params.include_symbols,
            exclude_ambiguous: params.exclude_ambiguous,
        }
    }
}

/// Body of `POST /generate/passphrase`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PassphraseBody {
    pub num_words: u32,
    pub separator: Separator,
    pub count: u32,
}

impl From<&PassphraseParameters> for PassphraseBody {
    fn from(params: &PassphraseParameters) -> Self {
        Self {
            num_words: params.num_words,
            separator: params.separator,
            count: params.count,
        }
    }
}

#[derive(Deserialize)]
struct HealthWire {
    #[serde(default)]
    status: String,
    models_loaded: bool,
    available_models: Vec<String>,
    breach_database_size: u64,
}

#[derive(Deserialize)]
struct MetricsWire {
    shannon_entropy: f64,
    practical_entropy: f64,
}

#[derive(Deserialize)]
struct CompositionWire {
    lowercase: u32,
    uppercase: u32,
    digits: u32,
    symbols: u32,
    spaces: u32,
    unique: u32,
}

#[derive(Deserialize)]
struct CrackTimeWire {
    online_throttled: String,
    online_fast: String,
    offline_gpu: String,
    offline_super: String,
}

#[derive(Deserialize)]
struct AnalysisWire {
    password: String,
    length: u32,
    predictions: BTreeMap<String, String>,
    consensus: String,
    agreement_percentage: f64,
    metrics: MetricsWire,
    composition: CompositionWire,
    crack_time: CrackTimeWire,
    #[serde(default)]
    patterns: Vec<String>,
    #[serde(default)]
    dictionary_words: Vec<String>,
    #[serde(default)]
    suggestions: Vec<String>,
    is_breached: bool,
    #[serde(default)]
    breach_count: Option<u64>,
}

#[derive(Deserialize)]
struct CandidateMetaWire {
    entropy: f64,
    crack_time_gpu: String,
}

#[derive(Deserialize)]
struct GenerationWire {
    passwords: Vec<String>,
    metadata: Vec<CandidateMetaWire>,
}

fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ServiceError> {
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| ServiceError::InvalidJson(e.to_string()))?;
    serde_json::from_value(value).map_err(|e| ServiceError::malformed(e.to_string()))
}

fn check_bits(name: &str, value: f64) -> Result<f64, ServiceError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ServiceError::malformed(format!("{} must be a non-negative number, got {}", name, value)))
    }
}

/// Decodes the body of `GET /health`.
pub fn decode_health(body: &[u8]) -> Result<HealthInfo, ServiceError> {
    let wire: HealthWire = decode(body)?;
    Ok(HealthInfo {
        status: wire.status,
        models_loaded: wire.models_loaded,
        available_models: wire.available_models,
        breach_database_size: wire.breach_database_size,
    })
}

/// Decodes the body of `POST /analyze`, canonicalizing every label.
pub fn decode_analysis(body: &[u8]) -> Result<AnalysisResult, ServiceError> {
    let wire: AnalysisWire = decode(body)?;

    let agreement = wire.agreement_percentage;
    if !(0.0..=100.0).contains(&agreement) {
        return Err(ServiceError::malformed(format!(
            "agreement_percentage out of range: {}",
            agreement
        )));
    }

    let predictions = wire
        .predictions
        .iter()
        .map(|(model, label)| (model.clone(), StrengthLabel::parse(label)))
        .collect();

    Ok(AnalysisResult {
        password: SecretString::new(wire.password.into_boxed_str()),
        length: wire.length,
        predictions,
        consensus: StrengthLabel::parse(&wire.consensus),
        agreement_percentage: agreement,
        metrics: EntropyMetrics {
            shannon_entropy: check_bits("shannon_entropy", wire.metrics.shannon_entropy)?,
            practical_entropy: check_bits("practical_entropy", wire.metrics.practical_entropy)?,
        },
        composition: Composition {
            lowercase: wire.composition.lowercase,
            uppercase: wire.composition.uppercase,
            digits: wire.composition.digits,
            symbols: wire.composition.symbols,
            spaces: wire.composition.spaces,
            unique: wire.composition.unique,
        },
        crack_time: CrackTimes {
            online_throttled: wire.crack_time.online_throttled,
            online_fast: wire.crack_time.online_fast,
            offline_gpu: wire.crack_time.offline_gpu,
            offline_super: wire.crack_time.offline_super,
        },
        patterns: wire.patterns,
        dictionary_words: wire.dictionary_words,
        suggestions: wire.suggestions,
        is_breached: wire.is_breached,
        breach_count: wire.breach_count.unwrap_or(0),
    })
}

/// Decodes the body of either generation endpoint.
///
/// `passwords[i]` is paired with `metadata[i]`; the service order is kept.
pub fn decode_candidates(body: &[u8]) -> Result<Vec<GeneratedCandidate>, ServiceError> {
    let wire: GenerationWire = decode(body)?;

    if wire.passwords.len() != wire.metadata.len() {
        return Err(ServiceError::malformed(format!(
            "{} passwords but {} metadata entries",
            wire.passwords.len(),
            wire.metadata.len()
        )));
    }

    wire.passwords
        .into_iter()
        .zip(wire.metadata)
        .map(|(text, meta)| {
            let entropy = check_bits("entropy", meta.entropy)?;
            Ok(GeneratedCandidate::new(text, entropy, meta.crack_time_gpu))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use serde_json::json;

    fn analysis_json() -> serde_json::Value {
        json!({
            "password": "Tr0ub4dor&3",
            "length": 11,
            "predictions": {"lstm": "STRONG", "xgboost": "medium", "rf": "weird"},
            "consensus": "Medium",
            "agreement_percentage": 66.7,
            "metrics": {"shannon_entropy": 3.28, "practical_entropy": 28.0},
            "composition": {
                "lowercase": 6, "uppercase": 1, "digits": 2,
                "symbols": 1, "spaces": 0, "unique": 10
            },
            "crack_time": {
                "online_throttled": "centuries",
                "online_fast": "3 years",
                "offline_gpu": "2 hours",
                "offline_super": "instant"
            },
            "patterns": ["l33t substitution"],
            "dictionary_words": ["troubador"],
            "suggestions": [],
            "is_breached": true,
            "breach_count": 3645
        })
    }

    #[test]
    fn test_decode_analysis_canonicalizes_labels() {
        let body = analysis_json().to_string();
        let result = decode_analysis(body.as_bytes()).unwrap();

        assert_eq!(result.password.expose_secret(), "Tr0ub4dor&3");
        assert_eq!(result.predictions["lstm"], StrengthLabel::Strong);
        assert_eq!(result.predictions["xgboost"], StrengthLabel::Medium);
        assert_eq!(result.predictions["rf"], StrengthLabel::Unknown);
        assert_eq!(result.consensus, StrengthLabel::Medium);
        assert_eq!(result.crack_time.offline_gpu, "2 hours");
        assert_eq!(result.composition.unique, 10);
        assert!(result.is_breached);
        assert_eq!(result.breach_count, 3645);
    }

    #[test]
    fn test_decode_analysis_optional_lists_default_empty() {
        let mut value = analysis_json();
        let obj = value.as_object_mut().unwrap();
        obj.remove("patterns");
        obj.remove("dictionary_words");
        obj.remove("suggestions");
        obj.remove("breach_count");
        obj.insert("is_breached".to_string(), json!(false));

        let result = decode_analysis(value.to_string().as_bytes()).unwrap();
        assert!(result.patterns.is_empty());
        assert!(result.dictionary_words.is_empty());
        assert!(result.suggestions.is_empty());
        assert_eq!(result.breach_count, 0);
    }

    #[test]
    fn test_decode_analysis_missing_breach_flag() {
        let mut value = analysis_json();
        value.as_object_mut().unwrap().remove("is_breached");

        let result = decode_analysis(value.to_string().as_bytes());
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_decode_analysis_missing_crack_time_key() {
        let mut value = analysis_json();
        value["crack_time"].as_object_mut().unwrap().remove("offline_super");

        let result = decode_analysis(value.to_string().as_bytes());
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_decode_analysis_agreement_out_of_range() {
        let mut value = analysis_json();
        value["agreement_percentage"] = json!(140.0);

        let result = decode_analysis(value.to_string().as_bytes());
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_decode_not_json() {
        let result = decode_analysis(b"<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(ServiceError::InvalidJson(_))));
    }

    #[test]
    fn test_decode_candidates_preserves_order() {
        let body = json!({
            "passwords": ["a1!X", "b2@Y"],
            "metadata": [
                {"length": 4, "entropy": 40.1, "crack_time_gpu": "1 second"},
                {"length": 4, "entropy": 55.3, "crack_time_gpu": "2 minutes"}
            ]
        })
        .to_string();

        let candidates = decode_candidates(body.as_bytes()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].text.expose_secret(), "a1!X");
        assert_eq!(candidates[0].entropy, 40.1);
        assert_eq!(candidates[1].text.expose_secret(), "b2@Y");
        assert_eq!(candidates[1].entropy, 55.3);
        assert_eq!(candidates[1].crack_time_gpu, "2 minutes");
    }

    #[test]
    fn test_decode_candidates_length_mismatch() {
        let body = json!({
            "passwords": ["a1!X", "b2@Y"],
            "metadata": [{"entropy": 40.1, "crack_time_gpu": "1 second"}]
        })
        .to_string();

        let result = decode_candidates(body.as_bytes());
        assert!(matches!(result, Err(ServiceError::Malformed(_))));
    }

    #[test]
    fn test_decode_candidates_negative_entropy() {
        let body = json!({
            "passwords": ["x"],
            "metadata": [{"entropy": -1.0, "crack_time_gpu": "instant"}]
        })
        .to_string();

        assert!(matches!(
            decode_candidates(body.as_bytes()),
            Err(ServiceError::Malformed(_))
        ));
    }

    #[test]
    fn test_decode_health() {
        let body = json!({
            "status": "healthy",
            "models_loaded": true,
            "available_models": ["m1", "m2"],
            "breach_database_size": 1000000
        })
        .to_string();

        let info = decode_health(body.as_bytes()).unwrap();
        assert!(info.models_loaded);
        assert_eq!(info.available_models, vec!["m1".to_string(), "m2".to_string()]);
        assert_eq!(info.breach_database_size, 1_000_000);
    }

    #[test]
    fn test_decode_health_missing_required_fields() {
        for field in ["models_loaded", "available_models", "breach_database_size"] {
            let mut value = json!({
                "status": "healthy",
                "models_loaded": true,
                "available_models": ["m1"],
                "breach_database_size": 10
            });
            value.as_object_mut().unwrap().remove(field);

            let result = decode_health(value.to_string().as_bytes());
            assert!(
                matches!(result, Err(ServiceError::Malformed(_))),
                "missing {} should be malformed",
                field
            );
        }
    }

    #[test]
    fn test_generate_body_wire_names() {
        let body = GenerateBody::from(&GenerationParameters::default());
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "length": 16,
                "count": 5,
                "include_uppercase": true,
                "include_lowercase": true,
                "include_digits": true,
                "include_symbols": true,
                "exclude_ambiguous": false
            })
        );
    }

    #[test]
    fn test_passphrase_body_wire_names() {
        let params = PassphraseParameters {
            num_words: 5,
            separator: Separator::Space,
            count: 2,
        };
        let value = serde_json::to_value(PassphraseBody::from(&params)).unwrap();
        assert_eq!(value, json!({"num_words": 5, "separator": " ", "count": 2}));
    }
}
