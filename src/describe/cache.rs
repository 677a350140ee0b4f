//! Memoization of description calls.
//!
//! Every element is reduced to a [`CacheKey`]; a key that has been described
//! once is never sent to the backend again. Failed calls leave no entry, so
//! an identical element later in the run retries.

use std::num::NonZeroUsize;

use lru::LruCache;

use super::DescriptionBackend;
use crate::element::{CacheKey, CodeElement};
use crate::error::DescriptionError;

/// Label placed in front of every module description.
pub const MODULE_LABEL: &str = "Module Purpose: ";

/// Memoizing front for a [`DescriptionBackend`].
///
/// Unbounded by default. A bounded cache evicts the least recently used
/// description once full.
pub struct DescriptionCache {
    entries: LruCache<CacheKey, String>,
    hits: u64,
    misses: u64,
}

impl Default for DescriptionCache {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl DescriptionCache {
    /// Cache with no eviction, for one bounded CLI run.
    #[must_use]
    pub fn unbounded() -> Self {
        Self { entries: LruCache::unbounded(), hits: 0, misses: 0 }
    }

    /// Cache holding at most `capacity` descriptions.
    #[must_use]
    pub fn bounded(capacity: NonZeroUsize) -> Self {
        Self { entries: LruCache::new(capacity), hits: 0, misses: 0 }
    }

    /// Bounded when `capacity` is given and non-zero, unbounded otherwise.
    #[must_use]
    pub fn with_capacity(capacity: Option<usize>) -> Self {
        capacity.and_then(NonZeroUsize::new).map_or_else(Self::unbounded, Self::bounded)
    }

    /// Description of a class or method, computed at most once per key.
    ///
    /// Backend failures are rendered as an inline placeholder.
    pub fn describe_element(
        &mut self,
        backend: &dyn DescriptionBackend,
        element: &CodeElement,
    ) -> String {
        let key = element.cache_key();
        self.get_or_describe(key, &element.name, || backend.describe_code(element))
            .unwrap_or_else(|e| placeholder(&e))
    }

    /// Labelled module description, computed at most once per docstring.
    ///
    /// Backend failures keep the label and carry an inline placeholder.
    pub fn describe_module(&mut self, backend: &dyn DescriptionBackend, docstring: &str) -> String {
        let key = CacheKey::module(docstring);
        self.get_or_describe(key, "<module>", || {
            backend.describe_module(docstring).map(|text| labelled(&text))
        })
        .unwrap_or_else(|e| labelled(&placeholder(&e)))
    }

    /// Number of descriptions currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(hits, misses)` since creation.
    #[must_use]
    pub fn stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }

    fn get_or_describe(
        &mut self,
        key: CacheKey,
        name: &str,
        describe: impl FnOnce() -> Result<String, DescriptionError>,
    ) -> Result<String, DescriptionError> {
        if let Some(hit) = self.entries.get(&key) {
            self.hits += 1;
            tracing::debug!(element = name, "description cache hit");
            return Ok(hit.clone());
        }
        self.misses += 1;
        match describe() {
            Ok(text) => {
                self.entries.put(key, text.clone());
                Ok(text)
            }
            Err(e) => {
                tracing::warn!(element = name, error = %e, "description failed");
                Err(e)
            }
        }
    }
}

fn labelled(text: &str) -> String {
    format!("{MODULE_LABEL}{text}\n")
}

/// Inline text standing in for a description that could not be produced.
#[must_use]
pub fn placeholder(error: &DescriptionError) -> String {
    let DescriptionError::Unavailable(cause) = error;
    format!("[error generating description: {cause}]")
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Counts backend calls; fails while `broken` is set.
    #[derive(Default)]
    struct CountingBackend {
        calls: Cell<usize>,
        broken: Cell<bool>,
    }

    impl DescriptionBackend for CountingBackend {
        fn describe_code(&self, element: &CodeElement) -> Result<String, DescriptionError> {
            self.calls.set(self.calls.get() + 1);
            if self.broken.get() {
                return Err(DescriptionError::Unavailable("connection refused".into()));
            }
            Ok(format!("Describes {} (call {})", element.name, self.calls.get()))
        }

        fn describe_module(&self, docstring: &str) -> Result<String, DescriptionError> {
            self.calls.set(self.calls.get() + 1);
            if self.broken.get() {
                return Err(DescriptionError::Unavailable("quota exceeded".into()));
            }
            Ok(format!("About {docstring}"))
        }
    }

    fn add() -> CodeElement {
        CodeElement::method(
            "add",
            "def add(self, a, b):\n    return a + b",
            Some("Adds two numbers.".into()),
            vec!["a".into(), "b".into()],
        )
    }

    #[test]
    fn identical_elements_reach_the_backend_once() {
        let backend = CountingBackend::default();
        let mut cache = DescriptionCache::unbounded();

        let first = cache.describe_element(&backend, &add());
        let second = cache.describe_element(&backend, &add());

        assert_eq!(first, second);
        assert_eq!(backend.calls.get(), 1);
        assert_eq!(cache.stats(), (1, 1));
    }

    #[test]
    fn different_elements_are_described_separately() {
        let backend = CountingBackend::default();
        let mut cache = DescriptionCache::unbounded();
        let mut sub = add();
        sub.name = "sub".into();

        cache.describe_element(&backend, &add());
        cache.describe_element(&backend, &sub);
        assert_eq!(backend.calls.get(), 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn module_description_is_labelled_and_memoized() {
        let backend = CountingBackend::default();
        let mut cache = DescriptionCache::default();

        let text = cache.describe_module(&backend, "Utility module.");
        assert_eq!(text, "Module Purpose: About Utility module.\n");
        assert_eq!(cache.describe_module(&backend, "Utility module."), text);
        assert_eq!(backend.calls.get(), 1);
    }

    #[test]
    fn failures_become_placeholders_and_are_retried() {
        let backend = CountingBackend::default();
        backend.broken.set(true);
        let mut cache = DescriptionCache::unbounded();

        let text = cache.describe_element(&backend, &add());
        assert_eq!(text, "[error generating description: connection refused]");
        assert!(cache.is_empty());

        backend.broken.set(false);
        assert!(cache.describe_element(&backend, &add()).starts_with("Describes add"));
        assert_eq!(backend.calls.get(), 2);
    }

    #[test]
    fn module_failure_keeps_label() {
        let backend = CountingBackend::default();
        backend.broken.set(true);
        let mut cache = DescriptionCache::unbounded();
        assert_eq!(
            cache.describe_module(&backend, "doc"),
            "Module Purpose: [error generating description: quota exceeded]\n"
        );
    }

    #[test]
    fn bounded_cache_evicts_least_recently_used() {
        let backend = CountingBackend::default();
        let mut cache = DescriptionCache::with_capacity(Some(1));
        let mut sub = add();
        sub.name = "sub".into();

        cache.describe_element(&backend, &add());
        cache.describe_element(&backend, &sub);
        cache.describe_element(&backend, &add());
        assert_eq!(backend.calls.get(), 3);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_means_unbounded() {
        let backend = CountingBackend::default();
        let mut cache = DescriptionCache::with_capacity(Some(0));
        let mut sub = add();
        sub.name = "sub".into();
        cache.describe_element(&backend, &add());
        cache.describe_element(&backend, &sub);
        assert_eq!(cache.len(), 2);
    }
}
