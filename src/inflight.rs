//! Request identity for single in-flight components.

use std::fmt;

/// Identifies one request issued by a session or the health monitor.
///
/// Completions carry the id of the request they answer; a component only
/// accepts the completion of its current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// At most one pending request, with monotonically increasing ids.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    last: u64,
    pending: Option<RequestId>,
}

impl InFlight {
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Marks a new request as pending and returns its id.
    pub(crate) fn issue(&mut self) -> RequestId {
        self.last += 1;
        let id = RequestId(self.last);
        self.pending = Some(id);
        id
    }

    /// Clears the pending request if `id` is the current one.
    ///
    /// Returns `false` for a stale or unsolicited completion.
    pub(crate) fn settle(&mut self, id: RequestId) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Forgets the pending request; its completion will be rejected.
    pub(crate) fn abandon(&mut self) {
        self.pending = None;
    }
}
