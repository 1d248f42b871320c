//! Optional session cache for signed payloads.
//!
//! Caching a signed payload lets the authenticator reuse an unexpired
//! assertion instead of re-prompting the signer (e.g. a hardware wallet) on
//! every request. The cache key is the signer address alone, so a cached
//! assertion is reused header-identical across request URIs within its
//! validity window; callers who need per-URI scoping must skip the cache.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::message::SiwxPayload;

/// Storage collaborator for signed payloads, keyed by signer address.
///
/// Treated as potentially asynchronous so implementations may be backed by
/// persistent storage.
#[async_trait]
pub trait SessionCache: Send + Sync {
    /// Returns the stored payload for `address`, if any. Expiry is checked by
    /// the caller, not here.
    async fn get(&self, address: &str) -> Option<SiwxPayload>;

    /// Stores `payload` under `address`, returning whether the write was
    /// accepted.
    async fn set(&self, address: &str, payload: SiwxPayload) -> bool;
}

/// Process-local [`SessionCache`] backed by a concurrent map.
#[derive(Default)]
pub struct MemorySessionCache {
    entries: DashMap<String, SiwxPayload>,
}

impl MemorySessionCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionCache for MemorySessionCache {
    async fn get(&self, address: &str) -> Option<SiwxPayload> {
        self.entries.get(address).map(|entry| entry.value().clone())
    }

    async fn set(&self, address: &str, payload: SiwxPayload) -> bool {
        self.entries.insert(address.to_string(), payload);
        true
    }
}
