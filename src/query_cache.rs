//! Request cache keyed by structural query keys.
//!
//! Each key owns a slot with its own async fetch lock, so concurrent
//! `get_or_fetch` calls for one key share a single fetch. Invalidation marks
//! entries stale instead of dropping them; the next read refetches. The cache
//! holds at most `max_entries` keys and evicts the least recently written one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::notes::model::NoteListParams;

pub const NOTES_SCOPE: &str = "notes";
pub const DEFAULT_MAX_ENTRIES: usize = 64;

/// `(scope, params)`, serialized as `["notes", {...}]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QueryKey(String, NoteListParams);

impl QueryKey {
    pub fn notes(params: NoteListParams) -> Self {
        Self(NOTES_SCOPE.to_string(), params)
    }

    pub fn scope(&self) -> &str {
        &self.0
    }

    pub fn params(&self) -> &NoteListParams {
        &self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryState<V> {
    pub data: V,
    pub data_updated_at: i64,
    pub is_invalidated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DehydratedQuery<V> {
    pub query_key: QueryKey,
    pub state: QueryState<V>,
}

/// Serializable snapshot of every successful query in a cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DehydratedState<V> {
    pub queries: Vec<DehydratedQuery<V>>,
}

struct Entry<V> {
    data: V,
    updated_at_ms: i64,
    invalidated: bool,
}

struct Slot<V> {
    fetch_lock: tokio::sync::Mutex<()>,
    entry: Mutex<Option<Entry<V>>>,
    generation: AtomicU64,
}

impl<V: Clone> Slot<V> {
    fn new() -> Self {
        Self {
            fetch_lock: tokio::sync::Mutex::new(()),
            entry: Mutex::new(None),
            generation: AtomicU64::new(0),
        }
    }

    fn fresh(&self) -> Option<V> {
        self.entry
            .lock()
            .as_ref()
            .filter(|entry| !entry.invalidated)
            .map(|entry| entry.data.clone())
    }

    fn store(&self, data: V, updated_at_ms: i64, invalidated: bool) {
        *self.entry.lock() = Some(Entry {
            data,
            updated_at_ms,
            invalidated,
        });
    }
}

pub struct QueryCache<V> {
    slots: DashMap<QueryKey, Arc<Slot<V>>>,
    max_entries: usize,
}

impl<V: Clone> Default for QueryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> QueryCache<V> {
    pub fn new() -> Self {
        Self::with_max_entries(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            slots: DashMap::new(),
            max_entries: max_entries.max(1),
        }
    }

    fn slot(&self, key: &QueryKey) -> Arc<Slot<V>> {
        if let Some(slot) = self.slots.get(key) {
            return slot.value().clone();
        }
        while self.slots.len() >= self.max_entries {
            if !self.evict_oldest() {
                break;
            }
        }
        self.slots
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Slot::new()))
            .value()
            .clone()
    }

    /// Drops the slot written longest ago; empty slots go first.
    fn evict_oldest(&self) -> bool {
        let victim = self
            .slots
            .iter()
            .min_by_key(|item| {
                item.value()
                    .entry
                    .lock()
                    .as_ref()
                    .map_or(i64::MIN, |entry| entry.updated_at_ms)
            })
            .map(|item| item.key().clone());
        match victim {
            Some(key) => {
                tracing::debug!(?key, "query cache evicted");
                self.slots.remove(&key).is_some()
            }
            None => false,
        }
    }

    /// Removes `slot` if it never got data and nobody else is waiting on it.
    fn release_empty(&self, key: &QueryKey, slot: &Arc<Slot<V>>) {
        self.slots.remove_if(key, |_, current| {
            Arc::ptr_eq(current, slot)
                && Arc::strong_count(current) == 2
                && current.entry.lock().is_none()
        });
    }

    /// Cached data for `key`, stale or not.
    pub fn get(&self, key: &QueryKey) -> Option<V> {
        let slot = self.slots.get(key)?.value().clone();
        let entry = slot.entry.lock();
        entry.as_ref().map(|entry| entry.data.clone())
    }

    pub fn is_invalidated(&self, key: &QueryKey) -> bool {
        self.slots
            .get(key)
            .map(|slot| {
                slot.entry
                    .lock()
                    .as_ref()
                    .is_some_and(|entry| entry.invalidated)
            })
            .unwrap_or(false)
    }

    pub fn set(&self, key: &QueryKey, data: V) {
        let slot = self.slot(key);
        slot.generation.fetch_add(1, Ordering::AcqRel);
        slot.store(data, now_ms(), false);
    }

    /// Returns fresh cached data, or runs `fetch` and caches its result.
    ///
    /// Callers racing on the same key wait for the first fetch and reuse its
    /// result. Failed fetches are not cached.
    pub async fn get_or_fetch<F, Fut, E>(&self, key: &QueryKey, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key);
        if let Some(data) = slot.fresh() {
            tracing::debug!(?key, "query cache hit");
            return Ok(data);
        }

        let fetching = slot.fetch_lock.lock().await;
        if let Some(data) = slot.fresh() {
            tracing::debug!(?key, "query cache hit after in-flight fetch");
            return Ok(data);
        }

        tracing::debug!(?key, "query cache miss");
        let generation = slot.generation.load(Ordering::Acquire);
        let data = match fetch().await {
            Ok(data) => data,
            Err(e) => {
                drop(fetching);
                self.release_empty(key, &slot);
                return Err(e);
            }
        };

        let mut entry = slot.entry.lock();
        let superseded = slot.generation.load(Ordering::Acquire) != generation;
        // a fresh write landed mid-fetch and is newer than this result
        if superseded && entry.as_ref().is_some_and(|current| !current.invalidated) {
            return Ok(data);
        }
        *entry = Some(Entry {
            data: data.clone(),
            updated_at_ms: now_ms(),
            invalidated: superseded,
        });
        Ok(data)
    }

    /// Marks every entry whose key matches `predicate` as stale.
    pub fn invalidate<P>(&self, predicate: P) -> usize
    where
        P: Fn(&QueryKey) -> bool,
    {
        let mut invalidated = 0;
        for item in self.slots.iter() {
            if !predicate(item.key()) {
                continue;
            }
            let slot = item.value();
            slot.generation.fetch_add(1, Ordering::AcqRel);
            if let Some(entry) = slot.entry.lock().as_mut() {
                entry.invalidated = true;
            }
            invalidated += 1;
        }
        tracing::debug!(invalidated, "query cache invalidated");
        invalidated
    }

    pub fn invalidate_scope(&self, scope: &str) -> usize {
        self.invalidate(|key| key.scope() == scope)
    }

    pub fn dehydrate(&self) -> DehydratedState<V> {
        let queries = self
            .slots
            .iter()
            .filter_map(|item| {
                let entry = item.value().entry.lock();
                entry.as_ref().map(|entry| DehydratedQuery {
                    query_key: item.key().clone(),
                    state: QueryState {
                        data: entry.data.clone(),
                        data_updated_at: entry.updated_at_ms,
                        is_invalidated: entry.invalidated,
                    },
                })
            })
            .collect();
        DehydratedState { queries }
    }

    /// Loads a dehydrated snapshot. Fresh local entries newer than the
    /// incoming ones are kept.
    pub fn hydrate(&self, state: DehydratedState<V>) {
        for query in state.queries {
            let slot = self.slot(&query.query_key);
            let mut entry = slot.entry.lock();
            let keep_local = entry.as_ref().is_some_and(|local| {
                !local.invalidated && local.updated_at_ms > query.state.data_updated_at
            });
            if keep_local {
                continue;
            }
            slot.generation.fetch_add(1, Ordering::AcqRel);
            *entry = Some(Entry {
                data: query.state.data,
                updated_at_ms: query.state.data_updated_at,
                invalidated: query.state.is_invalidated,
            });
        }
    }

    pub fn len(&self) -> usize {
        self.slots
            .iter()
            .filter(|item| item.value().entry.lock().is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn now_ms() -> i64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64
}
