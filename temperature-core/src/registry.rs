use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::source::Source;

/// Registry construction failure: two adapters tried to register under the
/// same `SOURCE_NAME`.
#[derive(Debug, Error)]
#[error("source name collision: {0} is already registered")]
pub struct RegistryError(pub String);

/// Read-only-after-construction map from `SOURCE_NAME` to adapter (§4.2).
///
/// Per §9's redesign guidance, discovery is not a directory scan: each
/// adapter's own constructor is called by the binary wiring the pipeline
/// together, and registered with [`SourceRegistry::register`]. The "is this a
/// conforming source module" check from the dynamic original has no runtime
/// counterpart — the `Source` trait bound itself is the compile-time check.
#[derive(Debug, Default)]
pub struct SourceRegistry {
    sources: BTreeMap<&'static str, Arc<dyn Source>>,
}

impl SourceRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one adapter. Fails if `source.name()` collides with an
    /// already-registered adapter.
    pub fn register(&mut self, source: Arc<dyn Source>) -> Result<(), RegistryError> {
        let name = source.name();
        if self.sources.contains_key(name) {
            return Err(RegistryError(name.to_string()));
        }
        self.sources.insert(name, source);
        Ok(())
    }

    /// Iterate all registered adapters, in `SOURCE_NAME` ascending order —
    /// this is also the deterministic submission order the executor uses so
    /// sparkline tie-breaks are reproducible (§5, §9).
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Source>> {
        self.sources.values()
    }

    /// Number of registered adapters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// `true` iff no adapters are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Names of all registered adapters, `SOURCE_NAME` ascending.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.sources.keys().copied().collect()
    }

    fn log_discovered(&self) {
        #[cfg(feature = "tracing")]
        tracing::info!(sources = ?self.names(), count = self.len(), "discovered sources");
        #[cfg(not(feature = "tracing"))]
        let _ = self.names();
    }

    /// Call once after all `register` calls complete, to emit the one-line
    /// "discovered N sources" log the original registry prints at import
    /// time (§4.2).
    pub fn finish(self) -> Self {
        self.log_discovered();
        self
    }
}
