//! Process-local cache tier
//!
//! A bounded map of tenant-qualified keys to serialized envelopes. The map
//! sits behind a `std::sync::Mutex` that is never held across an `.await`.
//! When a new key arrives at capacity, the least recently accessed tenth of
//! the entries (at least one) is evicted.

use crate::constants::CACHE_EVICTION_DIVISOR;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tgov_domain::value_objects::{TenantCacheUsage, TenantId};
use tokio::time::Instant;

/// A value held by the local tier
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Tenant-qualified key
    pub key: String,
    /// Serialized envelope
    pub value: String,
    /// Owning tenant
    pub tenant_id: TenantId,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Expiry deadline, `None` for entries without TTL
    pub expires_at: Option<Instant>,
    /// Number of reads served
    pub access_count: u64,
    /// Last read or write
    pub last_accessed: Instant,
    /// Approximate footprint of key and value
    pub size_bytes: usize,
    /// Access order, breaks ties between equal `last_accessed`
    sequence: u64,
}

impl CacheEntry {
    /// Build an entry created at `now`
    ///
    /// A TTL reaching past the clock's range means no expiry.
    pub fn new(
        key: String,
        value: String,
        tenant_id: TenantId,
        ttl: Option<Duration>,
        now: Instant,
    ) -> Self {
        let size_bytes = key.len() + value.len();
        Self {
            key,
            value,
            tenant_id,
            created_at: Utc::now(),
            expires_at: ttl.and_then(|ttl| now.checked_add(ttl)),
            access_count: 0,
            last_accessed: now,
            size_bytes,
            sequence: 0,
        }
    }

    /// Whether the entry has expired at `now`
    pub fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|deadline| now >= deadline)
    }
}

/// Result of a local lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalLookup {
    /// Live entry, carrying its payload
    Hit(String),
    /// Entry was present but expired; it has been removed
    Expired,
    /// No entry
    Miss,
}

/// Result of a local insert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Entry stored after evicting `evicted` others
    Stored {
        /// Entries evicted to make room
        evicted: u64,
    },
    /// At capacity and eviction was not allowed
    Full,
    /// The local tier has zero capacity
    Disabled,
}

impl InsertOutcome {
    /// Whether the entry was stored
    pub fn stored(&self) -> bool {
        matches!(self, Self::Stored { .. })
    }
}

/// Aggregate view of the local tier
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalStats {
    /// Resident entries
    pub item_count: usize,
    /// Bytes held
    pub memory_bytes: u64,
    /// Resident entries per tenant
    pub tenant_distribution: BTreeMap<String, u64>,
}

#[derive(Debug, Default)]
struct LocalState {
    entries: HashMap<String, CacheEntry>,
    clock: u64,
}

impl LocalState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recent(&mut self) -> u64 {
        let len = self.entries.len();
        if len == 0 {
            return 0;
        }
        let batch = len.div_ceil(CACHE_EVICTION_DIVISOR).max(1);

        let mut ranked: Vec<(Instant, u64, &String)> = self
            .entries
            .values()
            .map(|entry| (entry.last_accessed, entry.sequence, &entry.key))
            .collect();
        ranked.sort_unstable_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));
        let victims: Vec<String> = ranked
            .into_iter()
            .take(batch)
            .map(|(_, _, key)| key.clone())
            .collect();

        for key in &victims {
            self.entries.remove(key);
        }
        victims.len() as u64
    }
}

/// Bounded process-local tier
#[derive(Debug)]
pub struct LocalTier {
    capacity: usize,
    state: Mutex<LocalState>,
}

impl LocalTier {
    /// Create a tier holding at most `capacity` entries
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(LocalState::default()),
        }
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the tier can hold anything
    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    fn lock(&self) -> MutexGuard<'_, LocalState> {
        // Entries stay structurally valid if a holder panicked
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up `key`, recording the access on a hit and dropping expired entries
    pub fn get(&self, key: &str, now: Instant) -> LocalLookup {
        let mut state = self.lock();
        let expired = match state.entries.get(key) {
            None => return LocalLookup::Miss,
            Some(entry) => entry.is_expired(now),
        };
        if expired {
            state.entries.remove(key);
            return LocalLookup::Expired;
        }

        let sequence = state.tick();
        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.access_count += 1;
                entry.last_accessed = now;
                entry.sequence = sequence;
                LocalLookup::Hit(entry.value.clone())
            }
            None => LocalLookup::Miss,
        }
    }

    /// Whether a live entry exists, without recording an access
    pub fn contains(&self, key: &str, now: Instant) -> bool {
        self.lock()
            .entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Insert or replace an entry
    ///
    /// Replacing an existing key never evicts. A new key at capacity evicts
    /// when `evict` is set and is refused otherwise.
    pub fn insert(&self, mut entry: CacheEntry, evict: bool) -> InsertOutcome {
        if self.capacity == 0 {
            return InsertOutcome::Disabled;
        }
        let mut state = self.lock();
        let mut evicted = 0;
        if !state.entries.contains_key(&entry.key) && state.entries.len() >= self.capacity {
            if !evict {
                return InsertOutcome::Full;
            }
            evicted = state.evict_least_recent();
        }
        entry.sequence = state.tick();
        state.entries.insert(entry.key.clone(), entry);
        InsertOutcome::Stored { evicted }
    }

    /// Remove `key`
    pub fn remove(&self, key: &str) -> bool {
        self.lock().entries.remove(key).is_some()
    }

    /// Remove every entry of `tenant`
    pub fn remove_tenant(&self, tenant: &TenantId) -> u64 {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| &entry.tenant_id != tenant);
        (before - state.entries.len()) as u64
    }

    /// Remove every expired entry
    pub fn purge_expired(&self, now: Instant) -> u64 {
        let mut state = self.lock();
        let before = state.entries.len();
        state.entries.retain(|_, entry| !entry.is_expired(now));
        (before - state.entries.len()) as u64
    }

    /// Remove everything
    pub fn clear(&self) -> u64 {
        let mut state = self.lock();
        let removed = state.entries.len() as u64;
        state.entries.clear();
        removed
    }

    /// Number of resident entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Whether no entry is resident
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item count, bytes and per-tenant distribution
    pub fn stats(&self) -> LocalStats {
        let state = self.lock();
        let mut stats = LocalStats {
            item_count: state.entries.len(),
            ..Default::default()
        };
        for entry in state.entries.values() {
            stats.memory_bytes += entry.size_bytes as u64;
            *stats
                .tenant_distribution
                .entry(entry.tenant_id.to_string())
                .or_insert(0) += 1;
        }
        stats
    }

    /// Footprint of one tenant
    pub fn tenant_usage(&self, tenant: &TenantId) -> TenantCacheUsage {
        let state = self.lock();
        state
            .entries
            .values()
            .filter(|entry| &entry.tenant_id == tenant)
            .fold(TenantCacheUsage::default(), |mut usage, entry| {
                usage.item_count += 1;
                usage.size_bytes += entry.size_bytes as u64;
                usage
            })
    }

    /// Copy of the entry stored under `key`
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.lock().entries.get(key).cloned()
    }
}
