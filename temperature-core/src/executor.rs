use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;

use temperature_types::{ErrorKind, Signal, TemperatureError};

use crate::environment::Environment;
use crate::selector::Selection;
use crate::source::SearchContext;

/// Default per-source timeout (§4.5).
pub const DEFAULT_PER_SOURCE_TIMEOUT: Duration = Duration::from_secs(12);
/// Default global executor budget (§4.5).
pub const DEFAULT_GLOBAL_BUDGET: Duration = Duration::from_secs(45);
/// Max adapter calls in flight concurrently, regardless of how many were
/// selected — modeled as a semaphore permit count rather than a literal OS
/// thread-pool size, since adapter calls are async I/O, not threads (§4.5).
pub const MAX_CONCURRENCY: usize = 10;

/// The two timeout budgets the executor enforces simultaneously.
#[derive(Debug, Clone, Copy)]
pub struct ExecutorConfig {
    /// Bounds the duration of a single adapter's `search()` call.
    pub per_source_timeout: Duration,
    /// Bounds the total wall time the executor waits for completions.
    pub global_budget: Duration,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            per_source_timeout: DEFAULT_PER_SOURCE_TIMEOUT,
            global_budget: DEFAULT_GLOBAL_BUDGET,
        }
    }
}

/// Outcome of a single source/metric slot.
///
/// Single-signal adapters record one slot keyed by `SOURCE_NAME`;
/// multi-signal adapters (GDELT) record one slot per signal, keyed
/// `"<source>_<metric_name>"` (§4.5).
#[derive(Debug, Clone)]
pub struct SourceResult {
    /// The slot key (source name, or `"<source>_<metric_name>"`).
    pub name: String,
    /// `Some` iff this slot produced a signal.
    pub signal: Option<Signal>,
    /// Human-readable failure message, if this slot failed.
    pub error: Option<String>,
    /// Classification of `error`, per the executor's classification table.
    pub error_type: Option<ErrorKind>,
    /// Wall time the adapter call took. `0` for slots abandoned at the
    /// global deadline (§4.5).
    pub elapsed_ms: u64,
}

impl SourceResult {
    const fn ok(name: String, signal: Option<Signal>, elapsed_ms: u64) -> Self {
        Self {
            name,
            signal,
            error: None,
            error_type: None,
            elapsed_ms,
        }
    }

    fn err(name: String, err: &TemperatureError, elapsed_ms: u64) -> Self {
        Self {
            name,
            signal: None,
            error: Some(err.to_string()),
            error_type: Some(err.classify()),
            elapsed_ms,
        }
    }
}

/// Output of [`execute`]: signals keyed the way the scoring engine expects
/// to group them, plus a complete per-slot result map for status reporting.
#[derive(Debug, Default)]
pub struct ExecutionOutcome {
    /// Slot key -> signal, for every slot that produced one.
    pub signals: BTreeMap<String, Signal>,
    /// Slot key -> result, for every slot attempted (success, empty, or error).
    pub all_results: BTreeMap<String, SourceResult>,
}

/// Run every selected adapter in parallel with dual timeout budgets (§4.5).
///
/// Completions are consumed in completion order via a single `FuturesUnordered`
/// drain loop — that loop is the only writer into the accumulator, so no
/// cross-task mutex is required (§5). When the global budget elapses first,
/// already-completed slots are preserved and every outstanding slot is
/// recorded with `error_type = Timeout`, `elapsed_ms = 0`.
pub async fn execute(
    selection: &Selection,
    topic: &str,
    window_days: u32,
    env: &Environment,
    config: ExecutorConfig,
) -> ExecutionOutcome {
    if selection.selected.is_empty() {
        return ExecutionOutcome::default();
    }

    #[cfg(feature = "tracing")]
    tracing::info!(count = selection.selected.len(), topic, "executor: fan-out starting");

    let semaphore = Arc::new(Semaphore::new(MAX_CONCURRENCY.min(selection.selected.len())));
    let credentials = env.credentials();

    let mut futs = FuturesUnordered::new();
    let mut pending: BTreeSet<String> = BTreeSet::new();

    for (name, source) in &selection.selected {
        let name_owned = (*name).to_string();
        pending.insert(name_owned.clone());

        let source = Arc::clone(source);
        let topic = topic.to_string();
        let semaphore = Arc::clone(&semaphore);
        let ctx = SearchContext {
            per_source_timeout: config.per_source_timeout,
            credentials: credentials.clone(),
        };
        let per_source_timeout = config.per_source_timeout;

        futs.push(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .expect("executor semaphore is never closed");
            let start = Instant::now();
            let outcome =
                tokio::time::timeout(per_source_timeout, source.search(&topic, window_days, &ctx)).await;
            let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            let result = match outcome {
                Ok(result) => result,
                Err(_) => Err(TemperatureError::Timeout(
                    "per-source timeout exceeded".to_string(),
                )),
            };
            (name_owned, result, elapsed_ms)
        });
    }

    let mut outcome = ExecutionOutcome::default();

    let drain = async {
        while let Some((name, result, elapsed_ms)) = futs.next().await {
            pending.remove(&name);
            record_result(&mut outcome, name, result, elapsed_ms);
        }
    };

    if tokio::time::timeout(config.global_budget, drain).await.is_err() {
        #[cfg(feature = "tracing")]
        tracing::warn!(remaining = pending.len(), "executor: global budget exceeded");
        for name in pending {
            outcome.all_results.insert(
                name.clone(),
                SourceResult {
                    name,
                    signal: None,
                    error: Some("global timeout exceeded".to_string()),
                    error_type: Some(ErrorKind::Timeout),
                    elapsed_ms: 0,
                },
            );
        }
    }

    outcome
}

fn record_result(
    outcome: &mut ExecutionOutcome,
    name: String,
    result: Result<Vec<Signal>, TemperatureError>,
    elapsed_ms: u64,
) {
    match result {
        Ok(mut signals) if signals.is_empty() => {
            outcome
                .all_results
                .insert(name.clone(), SourceResult::ok(name, None, elapsed_ms));
        }
        Ok(mut signals) if signals.len() == 1 => {
            let signal = signals.pop().expect("len checked above");
            outcome.signals.insert(name.clone(), signal.clone());
            outcome
                .all_results
                .insert(name.clone(), SourceResult::ok(name, Some(signal), elapsed_ms));
        }
        Ok(signals) => {
            for signal in signals {
                let key = format!("{name}_{}", signal.metric_name);
                outcome.signals.insert(key.clone(), signal.clone());
                outcome
                    .all_results
                    .insert(key.clone(), SourceResult::ok(key, Some(signal), elapsed_ms));
            }
        }
        Err(e) => {
            outcome
                .all_results
                .insert(name.clone(), SourceResult::err(name, &e, elapsed_ms));
        }
    }
}
