//! Analysis session - single in-flight password analysis and its views.

use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::client::PasswordService;
use crate::error::{ServiceError, SessionError, ValidationError};
use crate::inflight::{InFlight, RequestId};
use crate::model::{AnalysisResult, ModelName, StrengthLabel};

/// Which predictions the analysis view shows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelFilter {
    #[default]
    All,
    Model(ModelName),
}

impl ModelFilter {
    /// `"all"` (any case) selects every model, anything else a single one.
    ///
    /// A model literally named `all` can only be selected by building
    /// [`ModelFilter::Model`] directly, as [`Coordinator::model_filter_options`]
    /// does.
    ///
    /// [`Coordinator::model_filter_options`]: crate::Coordinator::model_filter_options
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("all") {
            ModelFilter::All
        } else {
            ModelFilter::Model(raw.trim().to_string())
        }
    }
}

impl fmt::Display for ModelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelFilter::All => f.write_str("all"),
            ModelFilter::Model(name) => f.write_str(name),
        }
    }
}

/// Aggregate verdict across all models.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsensusView {
    pub consensus: StrengthLabel,
    pub agreement_percentage: f64,
}

#[derive(Debug, Default)]
pub struct AnalysisSession {
    current: Option<Arc<AnalysisResult>>,
    request: InFlight,
    error: Option<SessionError>,
    filter: ModelFilter,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    /// Last successful result. Stays until the next success replaces it.
    pub fn current_result(&self) -> Option<&Arc<AnalysisResult>> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Accepts a password for analysis.
    ///
    /// # Returns
    /// - `Err(EmptyPassword)` for an empty password; the session is untouched
    /// - `Ok(None)` if a request is already in flight; the call is dropped
    /// - `Ok(Some((id, password)))` when the request must be sent
    pub fn begin(
        &mut self,
        password: &SecretString,
    ) -> Result<Option<(RequestId, SecretString)>, ValidationError> {
        if password.expose_secret().is_empty() {
            return Err(ValidationError::EmptyPassword);
        }
        if self.request.is_pending() {
            #[cfg(feature = "tracing")]
            tracing::debug!("Analysis already in flight, submit ignored");
            return Ok(None);
        }

        self.error = None;
        Ok(Some((self.request.issue(), password.clone())))
    }

    /// Applies the outcome of request `id`.
    ///
    /// Success replaces the current result wholesale; failure keeps it and
    /// records a `FetchFailed` notice. Outcomes of cancelled or earlier
    /// requests are ignored.
    pub fn complete(&mut self, id: RequestId, outcome: Result<AnalysisResult, ServiceError>) {
        if !self.request.settle(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Stale analysis completion {} ignored", id);
            return;
        }

        match outcome {
            Ok(result) => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    "Analysis completed: {} models, consensus {}",
                    result.predictions.len(),
                    result.consensus
                );
                self.current = Some(Arc::new(result));
                self.error = None;
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("Analysis request failed: {}", e);
                self.error = Some(SessionError::FetchFailed(e));
            }
        }
    }

    /// Drops the in-flight request without touching the result.
    pub fn cancel(&mut self) {
        self.request.abandon();
    }

    /// Runs a full analysis cycle against `service`.
    ///
    /// Returns without any state change besides clearing `loading` if
    /// `token` is cancelled before the service answers.
    pub async fn submit<S: PasswordService>(
        &mut self,
        service: &S,
        password: &SecretString,
        token: &CancellationToken,
    ) -> Result<(), ValidationError> {
        let Some((id, password)) = self.begin(password)? else {
            return Ok(());
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => self.cancel(),
            outcome = service.analyze(&password) => self.complete(id, outcome),
        }
        Ok(())
    }

    pub fn model_filter(&self) -> &ModelFilter {
        &self.filter
    }

    pub fn select_model_filter(&mut self, filter: ModelFilter) {
        self.filter = filter;
    }

    /// Predictions visible under the current filter.
    ///
    /// Empty without a result, or when the selected model is not part of
    /// the current result.
    pub fn filtered_predictions(&self) -> BTreeMap<ModelName, StrengthLabel> {
        let Some(result) = &self.current else {
            return BTreeMap::new();
        };

        match &self.filter {
            ModelFilter::All => result.predictions.clone(),
            ModelFilter::Model(name) => result
                .predictions
                .get(name)
                .map(|label| BTreeMap::from([(name.clone(), *label)]))
                .unwrap_or_default(),
        }
    }

    /// Consensus to display: only with the `All` filter and a result.
    pub fn consensus_view(&self) -> Option<ConsensusView> {
        match (&self.filter, &self.current) {
            (ModelFilter::All, Some(result)) => Some(ConsensusView {
                consensus: result.consensus,
                agreement_percentage: result.agreement_percentage,
            }),
            _ => None,
        }
    }
}
