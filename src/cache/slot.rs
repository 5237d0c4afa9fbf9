use std::any::Any;
use std::sync::Arc;

use futures::future::{AbortHandle, BoxFuture, Shared};

use crate::error::Error;

pub(crate) type Value = Arc<dyn Any + Send + Sync>;

/// resolves to `None` when the fetch was aborted by an invalidation
pub(crate) type Pending = Shared<BoxFuture<'static, Option<Result<Value, Error>>>>;

/// state kept for a single cache key.
///
/// `fresh` is what reads are served from, `last` survives invalidation so
/// a consumer can keep showing something while a refetch runs. `ticket`
/// identifies the fetch currently allowed to settle into the slot and
/// `abort` cancels it.
#[derive(Default)]
pub(crate) struct Slot {
    pub fresh: Option<Value>,
    pub last: Option<Value>,
    pub pending: Option<Pending>,
    pub ticket: Option<u64>,
    pub abort: Option<AbortHandle>,
}

impl Slot {
    pub fn start(&mut self, ticket: u64, pending: Pending, abort: AbortHandle) {
        self.pending = Some(pending);
        self.ticket = Some(ticket);
        self.abort = Some(abort);
    }

    /// marks the value stale and cancels the fetch in flight
    pub fn invalidate(&mut self) {
        self.fresh = None;
        self.pending = None;
        self.ticket = None;

        if let Some(abort) = self.abort.take() {
            abort.abort();
        }
    }

    /// stores the outcome of a fetch if it is still the current one.
    /// returns false when the fetch was detached by an invalidation.
    pub fn settle(&mut self, ticket: u64, result: &Result<Value, Error>) -> bool {
        if self.ticket != Some(ticket) {
            return false;
        }

        self.pending = None;
        self.ticket = None;
        self.abort = None;

        if let Ok(value) = result {
            self.fresh = Some(value.clone());
            self.last = Some(value.clone());
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        self.fresh.is_none() && self.last.is_none() && self.pending.is_none()
    }
}
