//! temperature-sources
//!
//! First-party provider adapters implementing `temperature_core::Source`:
//! five Tier 1 adapters (§4.7) plus two illustrative Tier 2/3 adapters that
//! exercise the selector's key-gating paths end to end.
//!
//! - `wikipedia`: search_interest, via MediaWiki search + pageviews.
//! - `gdelt`: media + sentiment, the only multi-signal Tier 1 adapter.
//! - `npm`, `pypi`: dev_ecosystem, package registry downloads.
//! - `semantic_scholar`: academic, yearly paper counts.
//! - `alpha_vantage`: financial, Tier 2, single-credential gate.
//! - `dataforseo`: search_interest, Tier 3, dual-credential gate.
#![warn(missing_docs)]

pub mod alpha_vantage;
pub mod dataforseo;
pub mod gdelt;
pub mod npm;
pub mod pypi;
pub mod semantic_scholar;
pub mod wikipedia;

pub use alpha_vantage::AlphaVantage;
pub use dataforseo::DataForSeo;
pub use gdelt::Gdelt;
pub use npm::Npm;
pub use pypi::Pypi;
pub use semantic_scholar::SemanticScholar;
pub use wikipedia::Wikipedia;

use std::sync::Arc;

use temperature_core::{RegistryError, Source, SourceRegistry};
use temperature_types::TemperatureError;

/// Build a registry populated with every adapter in this crate: the five
/// Tier 1 sources plus the two illustrative Tier 2/3 sources (§4.2, §9).
/// Each adapter's own constructor is called here, matching the
/// per-adapter-initializer pattern the registry's module docs describe;
/// a constructor failure (TLS init) is the only way population can fail.
///
/// # Errors
/// Returns [`TemperatureError`] if any adapter's HTTP client fails to build,
/// or [`RegistryError`] surfaced as [`TemperatureError::Other`] on a name
/// collision (unreachable given the fixed adapter set here).
pub fn default_registry() -> Result<SourceRegistry, TemperatureError> {
    let mut registry = SourceRegistry::new();
    let adapters: Vec<Arc<dyn Source>> = vec![
        Arc::new(Wikipedia::new()?),
        Arc::new(Gdelt::new()?),
        Arc::new(Npm::new()?),
        Arc::new(Pypi::new()?),
        Arc::new(SemanticScholar::new()?),
        Arc::new(AlphaVantage::new()?),
        Arc::new(DataForSeo::new()?),
    ];
    for adapter in adapters {
        register_or_log(&mut registry, adapter);
    }
    Ok(registry.finish())
}

fn register_or_log(registry: &mut SourceRegistry, adapter: Arc<dyn Source>) {
    if let Err(RegistryError(name)) = registry.register(adapter) {
        #[cfg(feature = "tracing")]
        tracing::warn!(name, "source registration skipped: name collision");
        #[cfg(not(feature = "tracing"))]
        let _ = name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_contains_all_seven_adapters() {
        let registry = default_registry().expect("adapters build");
        assert_eq!(registry.len(), 7);
        assert_eq!(
            registry.names(),
            vec!["alpha_vantage", "dataforseo", "gdelt", "npm", "pypi", "semantic_scholar", "wikipedia"]
        );
    }
}
