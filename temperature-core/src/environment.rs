use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

/// Env var that overrides the default config directory. An empty value
/// disables file loading entirely (§4.3, §6).
pub const CONFIG_DIR_VAR: &str = "TEMPERATURE_CONFIG_DIR";

/// Truthy values recognized for `TEMPERATURE_DEBUG` (§6).
pub const DEBUG_TRUTHY: [&str; 3] = ["1", "true", "yes"];

const RECOGNIZED_KEYS: [&str; 9] = [
    "ALPHA_VANTAGE_KEY",
    "COINGECKO_DEMO_KEY",
    "CLOUDFLARE_API_TOKEN",
    "SEMANTIC_SCHOLAR_KEY",
    "SERPAPI_KEY",
    "DATAFORSEO_LOGIN",
    "DATAFORSEO_PASSWORD",
    "GLIMPSE_API_KEY",
    "GITHUB_TOKEN",
];

/// Tier 1 sources are always available; listed here only for
/// `get_available_tiers`'s `"tier1"` bucket.
const TIER1_SOURCES: [&str; 5] = ["wikipedia", "gdelt", "npm", "pypi", "semantic_scholar"];

/// (source name, required credential) for Tier 2 — one credential each.
const TIER2_KEYS: [(&str, &str); 4] = [
    ("alpha_vantage", "ALPHA_VANTAGE_KEY"),
    ("coingecko", "COINGECKO_DEMO_KEY"),
    ("cloudflare_radar", "CLOUDFLARE_API_TOKEN"),
    ("semantic_scholar_keyed", "SEMANTIC_SCHOLAR_KEY"),
];

/// Tier 3 sources; `dataforseo` is handled separately since it needs both
/// `DATAFORSEO_LOGIN` and `DATAFORSEO_PASSWORD`.
const TIER3_SINGLE_KEY: [(&str, &str); 2] =
    [("serpapi", "SERPAPI_KEY"), ("glimpse", "GLIMPSE_API_KEY")];

/// Credentials plus the derived tier-availability sets the selector's key
/// gate consults (§4.3). Constructed once per run via [`Environment::load`].
#[derive(Debug, Clone)]
pub struct Environment {
    credentials: HashMap<String, String>,
    tier2_available: HashSet<String>,
    tier3_available: HashSet<String>,
}

fn load_env_file(path: &std::path::Path) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let Ok(contents) = std::fs::read_to_string(path) else {
        return out;
    };
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let mut value = value.trim();
        if value.len() >= 2 {
            let first = value.as_bytes()[0];
            let last = value.as_bytes()[value.len() - 1];
            if (first == b'"' || first == b'\'') && first == last {
                value = &value[1..value.len() - 1];
            }
        }
        if !key.is_empty() && !value.is_empty() {
            out.insert(key.to_string(), value.to_string());
        }
    }
    out
}

fn config_file_path() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_VAR) {
        Ok(ref dir) if dir.is_empty() => None,
        Ok(dir) => Some(PathBuf::from(dir).join(".env")),
        Err(_) => dirs_config_path(),
    }
}

/// `~/.config/temperature/.env`, the conventional default (no `dirs` crate
/// dependency needed for a single well-known path).
fn dirs_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .map(|home| home.join(".config").join("temperature").join(".env"))
}

impl Environment {
    /// Load credentials from the config file (if any) and the process
    /// environment, with environment variables taking precedence, then
    /// derive the Tier 2/3 availability sets (§4.3).
    #[must_use]
    pub fn load() -> Self {
        let file_env = config_file_path()
            .map(|p| load_env_file(&p))
            .unwrap_or_default();

        let mut credentials = HashMap::new();
        for key in RECOGNIZED_KEYS {
            let value = std::env::var(key)
                .ok()
                .filter(|v| !v.is_empty())
                .or_else(|| file_env.get(key).cloned());
            if let Some(value) = value {
                credentials.insert(key.to_string(), value);
            }
        }

        Self::from_credentials(credentials)
    }

    /// Build an `Environment` directly from a credential map, bypassing file
    /// and process-environment lookup entirely. Used by tests that need
    /// deterministic key presence without touching the filesystem or env.
    #[must_use]
    pub fn from_credentials(credentials: HashMap<String, String>) -> Self {
        let tier2_available = TIER2_KEYS
            .into_iter()
            .filter(|(_, key)| credentials.contains_key(*key))
            .map(|(name, _)| name.to_string())
            .collect();

        let mut tier3_available: HashSet<String> = TIER3_SINGLE_KEY
            .into_iter()
            .filter(|(_, key)| credentials.contains_key(*key))
            .map(|(name, _)| name.to_string())
            .collect();
        if credentials.contains_key("DATAFORSEO_LOGIN") && credentials.contains_key("DATAFORSEO_PASSWORD") {
            tier3_available.insert("dataforseo".to_string());
        }

        Self {
            credentials,
            tier2_available,
            tier3_available,
        }
    }

    /// Look up a loaded credential by its well-known name.
    #[must_use]
    pub fn credential(&self, key: &str) -> Option<&str> {
        self.credentials.get(key).map(String::as_str)
    }

    /// Names of Tier 1 sources (always available; informational only).
    #[must_use]
    pub fn tier1_sources(&self) -> &'static [&'static str] {
        &TIER1_SOURCES
    }

    /// `true` iff `source_name` has its required Tier 2 credential(s) configured.
    #[must_use]
    pub fn tier2_available(&self, source_name: &str) -> bool {
        self.tier2_available.contains(source_name)
    }

    /// `true` iff `source_name` has its required Tier 3 credential(s) configured.
    #[must_use]
    pub fn tier3_available(&self, source_name: &str) -> bool {
        self.tier3_available.contains(source_name)
    }

    /// Snapshot of all credentials, for handing to [`crate::source::SearchContext`].
    #[must_use]
    pub fn credentials(&self) -> HashMap<String, String> {
        self.credentials.clone()
    }
}

/// `true` iff `TEMPERATURE_DEBUG` is set to a recognized truthy value (§6).
#[must_use]
pub fn debug_enabled() -> bool {
    std::env::var("TEMPERATURE_DEBUG")
        .map(|v| DEBUG_TRUTHY.contains(&v.to_lowercase().as_str()))
        .unwrap_or(false)
}
