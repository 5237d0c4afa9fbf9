use std::any::Any;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use futures::FutureExt;
use futures::future::{AbortHandle, Abortable};

use crate::error::Error;

mod keys;
mod slot;

pub use keys::{CacheKey, Collection, Qualifier, Dirty, Mutation};
use slot::{Slot, Value};

/// keyed store of server data with in-flight request sharing.
///
/// concurrent reads of the same key share a single fetch. invalidation
/// aborts any fetch in flight for the key so an older response can never
/// overwrite a newer state and a key never has two fetches running. the map lock is only held for synchronous
/// bookkeeping, never across an await.
#[derive(Clone, Default)]
pub struct Cache {
    slots: Arc<DashMap<CacheKey, Slot>>,
    tickets: Arc<AtomicU64>,
}

impl Cache {
    pub fn new() -> Self {
        Cache::default()
    }

    /// returns the fresh value for the key or joins/starts a fetch for it.
    ///
    /// a fetch aborted by an invalidation is retried, joining whatever fetch
    /// is in flight for the key at that point or starting a new one.
    pub async fn fetch<V, F, Fut>(&self, key: CacheKey, fetcher: F) -> Result<Arc<V>, Error>
    where
        V: Any + Send + Sync,
        F: Fn() -> Fut,
        Fut: Future<Output = Result<V, Error>> + Send + 'static,
    {
        loop {
            let pending = {
                let mut slot = self.slots.entry(key.clone()).or_default();

                if let Some(value) = slot.fresh.clone() {
                    if let Ok(found) = value.downcast::<V>() {
                        tracing::trace!(%key, "cache hit");

                        return Ok(found);
                    }
                }

                if let Some(pending) = &slot.pending {
                    tracing::trace!(%key, "joining fetch");

                    pending.clone()
                } else {
                    let ticket = self.tickets.fetch_add(1, Ordering::Relaxed);
                    let (abort, registration) = AbortHandle::new_pair();
                    let slots = self.slots.clone();
                    let settle_key = key.clone();
                    let fut = Abortable::new(fetcher(), registration);

                    tracing::debug!(%key, ticket, "cache miss");

                    let shared = async move {
                        let result = match fut.await {
                            Ok(result) => result.map(|v| Arc::new(v) as Value),
                            Err(_) => return None,
                        };

                        if let Some(mut slot) = slots.get_mut(&settle_key) {
                            if !slot.settle(ticket, &result) {
                                tracing::debug!(key = %settle_key, ticket, "dropping detached fetch");
                            }
                        }

                        Some(result)
                    }.boxed().shared();

                    slot.start(ticket, shared.clone(), abort);

                    shared
                }
            };

            let Some(result) = pending.await else {
                tracing::debug!(%key, "fetch aborted, retrying");

                continue;
            };

            return result?.downcast::<V>()
                .map_err(|_| Error::Config(format!("cache key {} holds a different type", key)));
        }
    }

    /// last known value, fresh or not. never triggers a fetch.
    pub fn peek<V>(&self, key: &CacheKey) -> Option<Arc<V>>
    where
        V: Any + Send + Sync,
    {
        let slot = self.slots.get(key)?;
        let value = slot.fresh.clone().or_else(|| slot.last.clone())?;

        value.downcast::<V>().ok()
    }

    pub fn is_fresh(&self, key: &CacheKey) -> bool {
        self.slots.get(key)
            .map(|slot| slot.fresh.is_some())
            .unwrap_or(false)
    }

    pub fn is_fetching(&self, key: &CacheKey) -> bool {
        self.slots.get(key)
            .map(|slot| slot.pending.is_some())
            .unwrap_or(false)
    }

    pub fn invalidate(&self, dirty: &Dirty) {
        let mut count = 0usize;

        for mut slot in self.slots.iter_mut() {
            if dirty.matches(slot.key()) {
                slot.value_mut().invalidate();
                count += 1;
            }
        }

        tracing::debug!(?dirty, count, "invalidated cache keys");
    }

    pub fn apply(&self, mutation: Mutation) {
        for dirty in mutation.dirties() {
            self.invalidate(&dirty);
        }
    }

    /// runs a mutation and invalidates its keys only when it succeeds
    pub async fn mutate<T, Fut>(&self, mutation: Mutation, fut: Fut) -> Result<T, Error>
    where
        Fut: Future<Output = Result<T, Error>>,
    {
        let result = fut.await?;

        self.apply(mutation);

        Ok(result)
    }

    /// forgets everything including last known values
    pub fn clear(&self) {
        self.apply(Mutation::Logout);
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.iter()
            .filter(|slot| !slot.value().is_empty())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
