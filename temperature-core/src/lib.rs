//! temperature-core
//!
//! The fan-out/scoring pipeline's engine: the `Source` protocol adapters
//! implement, the environment/registry/selector that decide which adapters
//! run, the executor that runs them in parallel, and the pure scoring
//! functions that turn their signals into a [`temperature_types::Report`].
//!
//! - `source`: the `Source` trait and its call context.
//! - `environment`: credential loading and Tier 2/3 availability.
//! - `registry`: the `SOURCE_NAME -> Source` map.
//! - `selector`: tier/key/availability/relevance gating.
//! - `executor`: parallel fan-out with dual timeout budgets.
//! - `dates`, `sparkline`, `http`: shared adapter utilities.
//! - `config`: dimension/source weight tables.
//! - `normalize`, `velocity`, `dimension`, `score`: the scoring engine.
#![warn(missing_docs)]

pub mod config;
pub mod dates;
pub mod dimension;
pub mod environment;
pub mod executor;
pub mod http;
pub mod normalize;
pub mod registry;
pub mod score;
pub mod selector;
pub mod source;
pub mod sparkline;
pub mod velocity;

pub use config::ScoringConfig;
pub use environment::Environment;
pub use executor::{execute, ExecutionOutcome, ExecutorConfig, SourceResult};
pub use registry::{RegistryError, SourceRegistry};
pub use score::build_report;
pub use selector::{select, Selection};
pub use source::{topic_variants, SearchContext, Source, Tier};
