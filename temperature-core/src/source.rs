use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use temperature_types::{Signal, TemperatureError};

use crate::environment::Environment;

/// Tier 1 is always available; Tier 2 needs one credential; Tier 3 needs a
/// credential AND an explicit opt-in flag (`premium`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Always available, no configuration required.
    One,
    /// Requires one configured credential.
    Two,
    /// Requires a configured credential AND the `premium` flag.
    Three,
}

impl Tier {
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

/// Per-call context handed to [`Source::search`]: the per-source timeout
/// budget (so an adapter's HTTP client can forward it to socket-level waits)
/// and a read-only view of loaded credentials.
#[derive(Debug, Clone)]
pub struct SearchContext {
    /// Per-source timeout, also enforced around the call by the executor.
    pub per_source_timeout: Duration,
    /// Loaded credential map, keyed by the well-known names in
    /// [`crate::environment::Environment`].
    pub credentials: HashMap<String, String>,
}

impl SearchContext {
    /// Look up a credential by its well-known name.
    #[must_use]
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.credentials.get(key).map(String::as_str)
    }
}

/// The fixed contract every provider adapter implements (§4.1).
///
/// Per §9's redesign note, adapters always return `Vec<Signal>` — never the
/// Python original's "signal, list of signals, or none" union — so an empty
/// vec means "no data for this topic" and the executor's result recorder has
/// exactly two shapes to handle (§4.5) instead of three.
#[async_trait]
pub trait Source: Send + Sync {
    /// Unique identifier, lowercase snake_case (e.g. `"wikipedia"`).
    fn name(&self) -> &'static str;

    /// Human-readable label for status/skip reporting.
    fn display_name(&self) -> &'static str;

    /// Cost/availability tier.
    fn tier(&self) -> Tier;

    /// The dimension this adapter's primary signal belongs to.
    fn dimension(&self) -> temperature_types::Dimension;

    /// Pure, cheap: does this adapter have what it needs to run at all
    /// (credentials, required dependencies)?
    fn is_available(&self, env: &Environment) -> bool;

    /// Pure: is this topic relevant to this adapter? (e.g. a financial
    /// adapter restricting itself to ticker-like topics.)
    fn should_search(&self, topic: &str) -> bool;

    /// Perform the adapter's I/O. `Ok(vec![])` means "no data for this
    /// topic"; `Err(TemperatureError::Source)` means "this provider is
    /// broken for this request" and is never retried by the executor.
    async fn search(
        &self,
        topic: &str,
        window_days: u32,
        ctx: &SearchContext,
    ) -> Result<Vec<Signal>, TemperatureError>;
}

/// Split a `variantA|||variantB|||...` topic string into trimmed, non-empty
/// variants, in left-to-right order. Shared by every adapter that resolves a
/// topic to a named entity (article, package) by trying variants in order.
#[must_use]
pub fn topic_variants(topic: &str) -> Vec<String> {
    topic
        .split("|||")
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
