//! Build-scoped memoization.
//!
//! [`Memo`] wraps a computation so that each distinct key is computed at
//! most once for the lifetime of the cache instance. Keys are canonical
//! strings derived by serializing the call arguments; values are cloned
//! out on every hit. There is no eviction and no expiry: one instance
//! lives for exactly one static-generation pass, and [`Memo::clear`]
//! exists for test isolation rather than invalidation.
//!
//! Computation happens under the cache lock, so concurrent first accesses
//! for the same key cannot duplicate work.

use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct Memo<T: Clone> {
    entries: Mutex<HashMap<String, T>>,
}

impl<T: Clone> Memo<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Canonical cache key for a set of call arguments.
    ///
    /// Structurally distinct argument values that serialize identically
    /// collapse to one entry; an accepted approximation, not exact
    /// equality.
    pub fn key<A: Serialize>(args: &A) -> String {
        serde_json::to_string(args).unwrap_or_default()
    }

    /// Return the cached value for `key`, computing it on first access.
    ///
    /// Only successful computations are cached; an error propagates to the
    /// caller and leaves the entry absent.
    pub fn get_or_try_compute<E>(
        &self,
        key: &str,
        compute: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let mut entries = self.entries.lock();
        if let Some(value) = entries.get(key) {
            return Ok(value.clone());
        }

        let value = compute()?;
        entries.insert(key.to_owned(), value.clone());
        Ok(value)
    }

    /// Drop every cached entry.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
