//! Health monitor
//!
//! Tracks service availability from a single startup probe.

use crate::error::ServiceError;
use crate::inflight::{InFlight, RequestId};
use crate::model::{HealthInfo, ModelName};

/// Availability of the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceStatus {
    /// Probe not completed yet.
    #[default]
    Checking,
    /// Service reachable with its models loaded.
    Healthy {
        available_models: Vec<ModelName>,
        breach_db_size: u64,
    },
    /// Service reachable but no models loaded.
    Degraded,
    /// Probe failed.
    Unreachable,
}

impl ServiceStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, ServiceStatus::Healthy { .. })
    }

    /// Models the service reported, empty unless healthy.
    pub fn available_models(&self) -> &[ModelName] {
        match self {
            ServiceStatus::Healthy {
                available_models, ..
            } => available_models,
            _ => &[],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceStatus::Checking => "checking",
            ServiceStatus::Healthy { .. } => "healthy",
            ServiceStatus::Degraded => "degraded",
            ServiceStatus::Unreachable => "unreachable",
        }
    }
}

/// Owns the [`ServiceStatus`] and the probe lifecycle.
///
/// The status starts as `Checking` and moves once per probe. There is no
/// polling: a new probe happens only through [`HealthMonitor::reprobe`].
#[derive(Debug, Default)]
pub struct HealthMonitor {
    status: ServiceStatus,
    probe: InFlight,
    started: bool,
}

impl HealthMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> &ServiceStatus {
        &self.status
    }

    pub fn is_probing(&self) -> bool {
        self.probe.is_pending()
    }

    /// Starts the startup probe. Returns its id only the first time.
    pub fn start(&mut self) -> Option<RequestId> {
        if self.started {
            return None;
        }
        self.started = true;
        Some(self.probe.issue())
    }

    /// Explicit, user-initiated re-probe. Returns `None` while a probe is
    /// already in flight.
    pub fn reprobe(&mut self) -> Option<RequestId> {
        if self.probe.is_pending() {
            return None;
        }
        self.started = true;
        self.status = ServiceStatus::Checking;
        Some(self.probe.issue())
    }

    /// Drops the in-flight probe; the status stays as it is.
    pub fn cancel(&mut self) {
        self.probe.abandon();
    }

    /// Applies the outcome of probe `id`. Outcomes of any other probe are
    /// ignored.
    pub fn complete(&mut self, id: RequestId, outcome: Result<HealthInfo, ServiceError>) {
        if !self.probe.settle(id) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Stale health probe {} ignored", id);
            return;
        }

        self.status = match outcome {
            Ok(info) if info.models_loaded => ServiceStatus::Healthy {
                available_models: info.available_models,
                breach_db_size: info.breach_database_size,
            },
            Ok(_) => ServiceStatus::Degraded,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("Health probe failed: {}", _e);
                ServiceStatus::Unreachable
            }
        };

        #[cfg(feature = "tracing")]
        tracing::info!("Service status: {}", self.status.label());
    }
}
