use std::collections::BTreeMap;
use std::sync::Arc;

use crate::environment::Environment;
use crate::registry::SourceRegistry;
use crate::source::{Source, Tier};

/// Result of [`select`]: which adapters will run, and why the rest were
/// skipped. Both maps are keyed by `SOURCE_NAME`.
#[derive(Debug, Default)]
pub struct Selection {
    /// Adapters that passed every gate, in `SOURCE_NAME` order.
    pub selected: BTreeMap<&'static str, Arc<dyn Source>>,
    /// Adapters rejected, with the reason the first failing gate produced.
    pub skipped: BTreeMap<&'static str, &'static str>,
}

/// Tier/flag/key/availability/relevance gating (§4.4). Gates apply in order;
/// the first failing gate wins and no later gate is evaluated for that
/// adapter.
#[must_use]
pub fn select(registry: &SourceRegistry, topic: &str, env: &Environment, quick: bool, premium: bool) -> Selection {
    let mut allowed_tiers = vec![Tier::One];
    if !quick {
        allowed_tiers.push(Tier::Two);
    }
    if premium {
        allowed_tiers.push(Tier::Three);
    }

    let mut selection = Selection::default();

    for source in registry.iter() {
        let name = source.name();
        let tier = source.tier();

        if !allowed_tiers.contains(&tier) {
            selection.skipped.insert(
                name,
                match tier {
                    Tier::One => "tier 1 not enabled",
                    Tier::Two => "tier 2 not enabled",
                    Tier::Three => "tier 3 not enabled",
                },
            );
            continue;
        }

        if tier != Tier::One {
            let key_available = match tier {
                Tier::Two => env.tier2_available(name),
                Tier::Three => env.tier3_available(name),
                Tier::One => unreachable!(),
            };
            if !key_available {
                selection.skipped.insert(name, "API key not configured");
                continue;
            }
        }

        if !source.is_available(env) {
            selection.skipped.insert(name, "not available");
            continue;
        }

        if !source.should_search(topic) {
            selection.skipped.insert(name, "not relevant for topic");
            continue;
        }

        selection.selected.insert(name, Arc::clone(source));
    }

    selection
}
