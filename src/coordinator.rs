//! Top-level coordinator
//!
//! Composes the health monitor and the three sessions, owns the active
//! workflow and the parameter records, and gates every request on the
//! service status.
//!
//! User intents go through [`Coordinator::handle`], which returns the
//! [`Request`] to run (if any). The shell runs it with
//! [`Request::execute`] and feeds the [`Completion`] back through
//! [`Coordinator::apply`].

use secrecy::SecretString;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::client::PasswordService;
use crate::error::{ServiceError, ValidationError};
use crate::health::{HealthMonitor, ServiceStatus};
use crate::inflight::RequestId;
use crate::model::{AnalysisResult, GeneratedCandidate, HealthInfo};
use crate::params::{GenerationParameters, PassphraseParameters};
use crate::sessions::{AnalysisSession, ModelFilter, PassphraseSession, PasswordSession};

/// Workflow shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Workflow {
    #[default]
    Analyze,
    GeneratePassword,
    GeneratePassphrase,
}

/// Input emitted by the presentation layer.
#[derive(Debug)]
pub enum Intent {
    SelectWorkflow(Workflow),
    SubmitPassword(SecretString),
    SelectModelFilter(ModelFilter),
    GeneratePasswords,
    GeneratePassphrases,
    RetryHealthProbe,
}

/// Network operation to run on behalf of a session, tagged with the id
/// its session issued.
#[derive(Debug)]
pub enum Request {
    ProbeHealth(RequestId),
    Analyze(RequestId, SecretString),
    GeneratePasswords(RequestId, GenerationParameters),
    GeneratePassphrases(RequestId, PassphraseParameters),
}

/// Which component a [`Request`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    ProbeHealth,
    Analyze,
    GeneratePasswords,
    GeneratePassphrases,
}

/// Outcome of a [`Request`], routed back to the session that issued it.
///
/// A session ignores a completion whose id is not its current request.
#[derive(Debug)]
pub enum Completion {
    HealthProbed(RequestId, Result<HealthInfo, ServiceError>),
    Analyzed(RequestId, Result<AnalysisResult, ServiceError>),
    PasswordsGenerated(RequestId, Result<Vec<GeneratedCandidate>, ServiceError>),
    PassphrasesGenerated(RequestId, Result<Vec<GeneratedCandidate>, ServiceError>),
}

impl Completion {
    pub fn id(&self) -> RequestId {
        match self {
            Completion::HealthProbed(id, _)
            | Completion::Analyzed(id, _)
            | Completion::PasswordsGenerated(id, _)
            | Completion::PassphrasesGenerated(id, _) => *id,
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntentError {
    #[error("Service is not available (status: {})", .0.label())]
    ServiceUnavailable(ServiceStatus),
    #[error("{0}")]
    Validation(#[from] ValidationError),
}

impl Request {
    pub fn kind(&self) -> RequestKind {
        match self {
            Request::ProbeHealth(_) => RequestKind::ProbeHealth,
            Request::Analyze(..) => RequestKind::Analyze,
            Request::GeneratePasswords(..) => RequestKind::GeneratePasswords,
            Request::GeneratePassphrases(..) => RequestKind::GeneratePassphrases,
        }
    }

    pub fn id(&self) -> RequestId {
        match self {
            Request::ProbeHealth(id)
            | Request::Analyze(id, _)
            | Request::GeneratePasswords(id, _)
            | Request::GeneratePassphrases(id, _) => *id,
        }
    }

    /// Runs the request against `service`.
    ///
    /// Returns `None` if `token` is cancelled first; the completion is then
    /// dropped and no state must be updated.
    pub async fn execute<S: PasswordService>(
        self,
        service: &S,
        token: &CancellationToken,
    ) -> Option<Completion> {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                #[cfg(feature = "tracing")]
                tracing::debug!("Request cancelled before completion");
                None
            }
            completion = self.run(service) => Some(completion),
        }
    }

    /// Runs the request and sends its completion on `tx`.
    pub async fn execute_tx<S: PasswordService>(
        self,
        service: &S,
        token: CancellationToken,
        tx: mpsc::Sender<Completion>,
    ) {
        let Some(completion) = self.execute(service, &token).await else {
            return;
        };

        if let Err(_e) = tx.send(completion).await {
            #[cfg(feature = "tracing")]
            tracing::error!("Failed to deliver request completion: {}", _e);
        }
    }

    async fn run<S: PasswordService>(self, service: &S) -> Completion {
        match self {
            Request::ProbeHealth(id) => Completion::HealthProbed(id, service.probe_health().await),
            Request::Analyze(id, password) => {
                Completion::Analyzed(id, service.analyze(&password).await)
            }
            Request::GeneratePasswords(id, params) => {
                Completion::PasswordsGenerated(id, service.generate_passwords(&params).await)
            }
            Request::GeneratePassphrases(id, params) => {
                Completion::PassphrasesGenerated(id, service.generate_passphrases(&params).await)
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct Coordinator {
    health: HealthMonitor,
    workflow: Workflow,
    analysis: AnalysisSession,
    passwords: PasswordSession,
    passphrases: PassphraseSession,
    password_params: GenerationParameters,
    passphrase_params: PassphraseParameters,
}

impl Coordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Startup probe. Returns `None` after the first call.
    pub fn start(&mut self) -> Option<Request> {
        self.health.start().map(Request::ProbeHealth)
    }

    /// Handles one user intent.
    ///
    /// # Errors
    ///
    /// - [`IntentError::ServiceUnavailable`] for analyze/generate intents
    ///   while the status is not healthy
    /// - [`IntentError::Validation`] for an empty password or invalid
    ///   generation parameters
    pub fn handle(&mut self, intent: Intent) -> Result<Option<Request>, IntentError> {
        match intent {
            Intent::SelectWorkflow(workflow) => {
                self.workflow = workflow;
                Ok(None)
            }
            Intent::SelectModelFilter(filter) => {
                self.analysis.select_model_filter(filter);
                Ok(None)
            }
            Intent::RetryHealthProbe => Ok(self.health.reprobe().map(Request::ProbeHealth)),
            Intent::SubmitPassword(password) => {
                self.check_gate()?;
                Ok(self
                    .analysis
                    .begin(&password)?
                    .map(|(id, password)| Request::Analyze(id, password)))
            }
            Intent::GeneratePasswords => {
                self.check_gate()?;
                Ok(self
                    .passwords
                    .begin(&self.password_params)?
                    .map(|(id, params)| Request::GeneratePasswords(id, params)))
            }
            Intent::GeneratePassphrases => {
                self.check_gate()?;
                Ok(self
                    .passphrases
                    .begin(&self.passphrase_params)?
                    .map(|(id, params)| Request::GeneratePassphrases(id, params)))
            }
        }
    }

    /// Routes a completion to its session reducer.
    pub fn apply(&mut self, completion: Completion) {
        match completion {
            Completion::HealthProbed(id, outcome) => self.health.complete(id, outcome),
            Completion::Analyzed(id, outcome) => self.analysis.complete(id, outcome),
            Completion::PasswordsGenerated(id, outcome) => self.passwords.complete(id, outcome),
            Completion::PassphrasesGenerated(id, outcome) => {
                self.passphrases.complete(id, outcome)
            }
        }
    }

    /// Handles an intent and drives the resulting request to completion.
    pub async fn dispatch<S: PasswordService>(
        &mut self,
        service: &S,
        intent: Intent,
        token: &CancellationToken,
    ) -> Result<(), IntentError> {
        if let Some(request) = self.handle(intent)? {
            self.run(service, request, token).await;
        }
        Ok(())
    }

    /// Runs the startup probe to completion.
    pub async fn probe<S: PasswordService>(&mut self, service: &S, token: &CancellationToken) {
        if let Some(request) = self.start() {
            self.run(service, request, token).await;
        }
    }

    async fn run<S: PasswordService>(
        &mut self,
        service: &S,
        request: Request,
        token: &CancellationToken,
    ) {
        let kind = request.kind();
        match request.execute(service, token).await {
            Some(completion) => self.apply(completion),
            None => self.abandon(kind),
        }
    }

    /// Clears the in-flight state of the component that issued a cancelled
    /// request. Results and candidates are left as they are, and a
    /// completion of the abandoned request that still arrives is ignored.
    pub fn abandon(&mut self, kind: RequestKind) {
        match kind {
            RequestKind::ProbeHealth => self.health.cancel(),
            RequestKind::Analyze => self.analysis.cancel(),
            RequestKind::GeneratePasswords => self.passwords.cancel(),
            RequestKind::GeneratePassphrases => self.passphrases.cancel(),
        }
    }

    fn check_gate(&self) -> Result<(), IntentError> {
        if self.health.status().is_healthy() {
            Ok(())
        } else {
            Err(IntentError::ServiceUnavailable(self.health.status().clone()))
        }
    }

    pub fn status(&self) -> &ServiceStatus {
        self.health.status()
    }

    pub fn workflow(&self) -> Workflow {
        self.workflow
    }

    pub fn analysis(&self) -> &AnalysisSession {
        &self.analysis
    }

    pub fn analysis_mut(&mut self) -> &mut AnalysisSession {
        &mut self.analysis
    }

    pub fn passwords(&self) -> &PasswordSession {
        &self.passwords
    }

    pub fn passphrases(&self) -> &PassphraseSession {
        &self.passphrases
    }

    pub fn password_params(&self) -> &GenerationParameters {
        &self.password_params
    }

    pub fn password_params_mut(&mut self) -> &mut GenerationParameters {
        &mut self.password_params
    }

    pub fn passphrase_params(&self) -> &PassphraseParameters {
        &self.passphrase_params
    }

    pub fn passphrase_params_mut(&mut self) -> &mut PassphraseParameters {
        &mut self.passphrase_params
    }

    /// `"all"` followed by the models reported by a healthy service.
    pub fn model_filter_options(&self) -> Vec<ModelFilter> {
        std::iter::once(ModelFilter::All)
            .chain(
                self.health
                    .status()
                    .available_models()
                    .iter()
                    .map(|name| ModelFilter::Model(name.clone())),
            )
            .collect()
    }
}
