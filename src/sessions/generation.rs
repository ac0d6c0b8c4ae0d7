//! Generation session - parameterized password and passphrase generation.

use secrecy::ExposeSecret;
use std::future::Future;
use std::marker::PhantomData;
use tokio_util::sync::CancellationToken;

use crate::client::PasswordService;
use crate::clipboard::Clipboard;
use crate::error::{CopyError, ServiceError, SessionError, ValidationError};
use crate::inflight::{InFlight, RequestId};
use crate::model::GeneratedCandidate;
use crate::params::{GenerationParameters, GenerationRequest, PassphraseParameters};

/// Parameters that map to one of the service's generation endpoints.
pub trait Generator: GenerationRequest + Send + Sync {
    /// Short name used in log lines.
    const KIND: &'static str;

    fn request<'a, S: PasswordService>(
        &'a self,
        service: &'a S,
    ) -> impl Future<Output = Result<Vec<GeneratedCandidate>, ServiceError>> + Send + 'a;
}

impl Generator for GenerationParameters {
    const KIND: &'static str = "password";

    fn request<'a, S: PasswordService>(
        &'a self,
        service: &'a S,
    ) -> impl Future<Output = Result<Vec<GeneratedCandidate>, ServiceError>> + Send + 'a {
        service.generate_passwords(self)
    }
}

impl Generator for PassphraseParameters {
    const KIND: &'static str = "passphrase";

    fn request<'a, S: PasswordService>(
        &'a self,
        service: &'a S,
    ) -> impl Future<Output = Result<Vec<GeneratedCandidate>, ServiceError>> + Send + 'a {
        service.generate_passphrases(self)
    }
}

/// Lifecycle and candidates of one generation workflow.
#[derive(Debug)]
pub struct GenerationSession<P> {
    candidates: Vec<GeneratedCandidate>,
    request: InFlight,
    error: Option<SessionError>,
    _params: PhantomData<fn(&P)>,
}

pub type PasswordSession = GenerationSession<GenerationParameters>;
pub type PassphraseSession = GenerationSession<PassphraseParameters>;

impl<P> Default for GenerationSession<P> {
    fn default() -> Self {
        Self {
            candidates: Vec::new(),
            request: InFlight::default(),
            error: None,
            _params: PhantomData,
        }
    }
}

impl<P: Generator> GenerationSession<P> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.request.is_pending()
    }

    /// Candidates of the last successful call, in service order.
    pub fn candidates(&self) -> &[GeneratedCandidate] {
        &self.candidates
    }

    pub fn error(&self) -> Option<&SessionError> {
        self.error.as_ref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Accepts a generation request.
    ///
    /// # Returns
    /// - `Ok(None)` if a request is already in flight; nothing changes
    /// - `Err(e)` if the parameters are invalid; `e` is also kept as the
    ///   session notice and nothing is sent
    /// - `Ok(Some((id, params)))` when the request must be sent
    pub fn begin(&mut self, params: &P) -> Result<Option<(RequestId, P)>, ValidationError> {
        if self.request.is_pending() {
            #[cfg(feature = "tracing")]
            tracing::debug!("{} generation already in flight, request ignored", P::KIND);
            return Ok(None);
        }

        if let Err(e) = params.validate() {
            #[cfg(feature = "tracing")]
            tracing::warn!("{} generation rejected: {}", P::KIND, e);
            self.error = Some(SessionError::Validation(e.clone()));
            return Err(e);
        }

        self.error = None;
        Ok(Some((self.request.issue(), params.clone())))
    }

    /// Applies the outcome of request `id`; any other outcome is stale.
    pub fn complete(&mut self, id: RequestId, outcome: Result<Vec<GeneratedCandidate>, ServiceError>) {
        if !self.request.settle(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Stale {} generation {} ignored", P::KIND, id);
            return;
        }

        match outcome {
            Ok(candidates) => {
                #[cfg(feature = "tracing")]
                tracing::info!("{} generation returned {} candidates", P::KIND, candidates.len());
                self.candidates = candidates;
                self.error = None;
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::error!("{} generation failed: {}", P::KIND, e);
                self.error = Some(SessionError::FetchFailed(e));
            }
        }
    }

    /// Drops the in-flight request without touching the candidates.
    pub fn cancel(&mut self) {
        self.request.abandon();
    }

    /// Runs a full generation cycle against `service`.
    pub async fn generate<S: PasswordService>(
        &mut self,
        service: &S,
        params: &P,
        token: &CancellationToken,
    ) -> Result<(), ValidationError> {
        let Some((id, params)) = self.begin(params)? else {
            return Ok(());
        };

        tokio::select! {
            biased;
            _ = token.cancelled() => self.cancel(),
            outcome = params.request(service) => self.complete(id, outcome),
        }
        Ok(())
    }

    /// Copies the text of the candidate at `index` to `clipboard`.
    pub fn copy<C: Clipboard + ?Sized>(&self, index: usize, clipboard: &mut C) -> Result<(), CopyError> {
        let candidate = self.candidates.get(index).ok_or(CopyError::NoSuchCandidate {
            index,
            len: self.candidates.len(),
        })?;
        clipboard.set_text(candidate.text.expose_secret())
    }
}
