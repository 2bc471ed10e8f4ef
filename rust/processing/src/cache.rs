// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Single-entry cache of the last resolved upload.

use sha2::{Digest, Sha256};
use std::sync::Arc;

/// Identity of an uploaded stock snapshot: its name and content hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UploadIdentity {
    pub file_name: String,
    pub size: usize,
    /// SHA-256 of the bytes, hex encoded.
    pub digest: String,
}

impl UploadIdentity {
    pub fn of(file_name: &str, bytes: &[u8]) -> Self {
        Self {
            file_name: file_name.to_string(),
            size: bytes.len(),
            digest: content_digest(bytes),
        }
    }
}

/// Generate a cache key from file content (SHA256 hash).
pub fn content_digest(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Holds the value computed for the most recent upload identity.
///
/// A lookup with a different identity recomputes and replaces the entry.
#[derive(Debug)]
pub struct ResolveCache<V> {
    entry: Option<(UploadIdentity, Arc<V>)>,
    stats: CacheStats,
}

impl<V> ResolveCache<V> {
    pub fn new() -> Self {
        Self {
            entry: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached value for `identity`, computing it on a miss.
    ///
    /// A failed computation leaves the previous entry in place.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        identity: &UploadIdentity,
        compute: F,
    ) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some((cached, value)) = &self.entry {
            if cached == identity {
                self.stats.hits += 1;
                return Ok(Arc::clone(value));
            }
        }

        self.stats.misses += 1;
        let value = Arc::new(compute()?);
        self.entry = Some((identity.clone(), Arc::clone(&value)));
        Ok(value)
    }

    pub fn current(&self) -> Option<&UploadIdentity> {
        self.entry.as_ref().map(|(identity, _)| identity)
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<V> Default for ResolveCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
