//! npm Downloads — daily download counts for npm packages (dev_ecosystem).
//!
//! Probes package existence via the point-downloads endpoint (404 means "no
//! such package", so the caller tries the next topic variant; any other
//! HTTP error propagates) before fetching the ranged downloads endpoint.

use async_trait::async_trait;
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{dates, http, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "npm";
const DISPLAY_NAME: &str = "npm Downloads";

/// Dev-ecosystem adapter backed by the npm registry downloads API.
pub struct Npm {
    client: reqwest::Client,
}

impl Npm {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    /// `Ok(true)` if the package exists, `Ok(false)` on a 404, `Err` for any
    /// other HTTP failure (propagated rather than treated as "try next").
    async fn package_exists(&self, package: &str) -> Result<bool, TemperatureError> {
        let url = encoded_url("https://api.npmjs.org/downloads/point/last-week", package)?;
        match http::get(&self.client, &url, &[]).await {
            Ok(_) => Ok(true),
            Err(TemperatureError::Http { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn fetch_downloads(&self, package: &str, start: &str, end: &str) -> Result<Vec<DataPoint>, TemperatureError> {
        let base = format!("https://api.npmjs.org/downloads/range/{start}:{end}");
        let url = encoded_url(&base, package)?;
        let data = http::get(&self.client, &url, &[]).await?;

        let downloads = data
            .get("downloads")
            .and_then(Value::as_array)
            .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "response missing 'downloads' field"))?;

        let mut datapoints = Vec::with_capacity(downloads.len());
        for entry in downloads {
            let day = entry
                .get("day")
                .and_then(Value::as_str)
                .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "download entry missing 'day'"))?;
            let count = entry.get("downloads").and_then(Value::as_f64).unwrap_or(0.0);
            datapoints.push(DataPoint::new(day, count));
        }
        Ok(datapoints)
    }
}

/// Append `package` as one percent-encoded path segment of `base`, so scoped
/// names like `@scope/name` become a single `%40scope%2Fname` segment the
/// way npm's registry expects, rather than two path parts.
fn encoded_url(base: &str, package: &str) -> Result<String, TemperatureError> {
    let mut url = url::Url::parse(base).map_err(|e| TemperatureError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| TemperatureError::Parse("invalid npm base url".to_string()))?
        .pop_if_empty()
        .push(package);
    Ok(url.into())
}

#[async_trait]
impl Source for Npm {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn tier(&self) -> Tier {
        Tier::One
    }

    fn dimension(&self) -> Dimension {
        Dimension::DevEcosystem
    }

    fn is_available(&self, _env: &Environment) -> bool {
        true
    }

    fn should_search(&self, _topic: &str) -> bool {
        true
    }

    async fn search(&self, topic: &str, window_days: u32, _ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let variants = topic_variants(topic);

        let mut package = None;
        for variant in &variants {
            let candidate = variant.to_lowercase();
            match self.package_exists(&candidate).await {
                Ok(true) => {
                    package = Some(candidate);
                    break;
                }
                Ok(false) => continue,
                Err(e) => return Err(e),
            }
        }
        let Some(package) = package else {
            return Ok(vec![]);
        };

        let (start_date, end_date) = dates::get_date_range(window_days);
        let start = dates::to_api_format(start_date);
        let end = dates::to_api_format(end_date);

        let datapoints = self.fetch_downloads(&package, &start, &end).await?;
        if datapoints.is_empty() {
            return Ok(vec![]);
        }

        let signal = Signal::from_datapoints(SOURCE_NAME, "downloads", "downloads/day", Dimension::DevEcosystem, datapoints)
            .with_metadata("package", package);
        Ok(vec![signal])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scoped_packages_encode_as_one_segment() {
        let url = encoded_url("https://api.npmjs.org/downloads/point/last-week", "@scope/name").unwrap();
        assert!(url.ends_with("/downloads/point/last-week/%40scope%2Fname"));
    }

    #[test]
    fn plain_packages_round_trip_unescaped() {
        let url = encoded_url("https://api.npmjs.org/downloads/point/last-week", "react").unwrap();
        assert!(url.ends_with("/downloads/point/last-week/react"));
    }
}
