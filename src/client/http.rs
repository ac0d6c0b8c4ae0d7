//! HTTP implementation of [`PasswordService`] backed by `reqwest`.

use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};

use super::wire::{self, AnalyzeBody, GenerateBody, PassphraseBody};
use super::{PasswordService, ANALYZE_PATH, GENERATE_PATH, HEALTH_PATH, PASSPHRASE_PATH};
use crate::config::ServiceConfig;
use crate::error::ServiceError;
use crate::model::{AnalysisResult, GeneratedCandidate, HealthInfo};
use crate::params::{GenerationParameters, PassphraseParameters};

/// Client for the analysis service over HTTP/JSON.
#[derive(Debug, Clone)]
pub struct HttpClient {
    config: ServiceConfig,
    http: Client,
}

impl HttpClient {
    /// Creates a client for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Unreachable`] if the underlying HTTP client
    /// cannot be built (e.g. TLS backend initialization failure).
    pub fn new(config: ServiceConfig) -> Result<Self, ServiceError> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| ServiceError::Unreachable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Sends the request and returns the raw body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            #[cfg(feature = "tracing")]
            tracing::warn!("Service returned HTTP {} for {}", status, response.url().path());
            return Err(ServiceError::Status {
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ServiceError::Unreachable(e.to_string()))?;
        Ok(body.to_vec())
    }
}

impl PasswordService for HttpClient {
    async fn probe_health(&self) -> Result<HealthInfo, ServiceError> {
        let url = self.config.endpoint(HEALTH_PATH);

        #[cfg(feature = "tracing")]
        tracing::debug!("Probing service health at {}", url);

        let body = self.send(self.http.get(url)).await?;
        wire::decode_health(&body)
    }

    async fn analyze(&self, password: &SecretString) -> Result<AnalysisResult, ServiceError> {
        let url = self.config.endpoint(ANALYZE_PATH);
        let payload = AnalyzeBody {
            password: password.expose_secret(),
        };
        let body = self.send(self.http.post(url).json(&payload)).await?;
        wire::decode_analysis(&body)
    }

    async fn generate_passwords(
        &self,
        params: &GenerationParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError> {
        let url = self.config.endpoint(GENERATE_PATH);
        let payload = GenerateBody::from(params);
        let body = self.send(self.http.post(url).json(&payload)).await?;
        wire::decode_candidates(&body)
    }

    async fn generate_passphrases(
        &self,
        params: &PassphraseParameters,
    ) -> Result<Vec<GeneratedCandidate>, ServiceError> {
        let url = self.config.endpoint(PASSPHRASE_PATH);
        let payload = PassphraseBody::from(params);
        let body = self.send(self.http.post(url).json(&payload)).await?;
        wire::decode_candidates(&body)
    }
}
