//! PyPI Downloads — daily download counts for PyPI packages (dev_ecosystem).
//!
//! Probes existence via the PyPI JSON API, fetches from pypistats.org
//! filtered to the `without_mirrors` category, then filters datapoints to
//! the requested window — pypistats.org returns a fixed wider window
//! (up to 180 days) regardless of what's asked for.

use async_trait::async_trait;
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{dates, http, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "pypi";
const DISPLAY_NAME: &str = "PyPI Downloads";

/// Dev-ecosystem adapter backed by the PyPI JSON API and pypistats.org.
pub struct Pypi {
    client: reqwest::Client,
}

impl Pypi {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn package_exists(&self, package: &str) -> Result<bool, TemperatureError> {
        let url = encoded_url("https://pypi.org/pypi", package, "json")?;
        match http::get(&self.client, &url, &[]).await {
            Ok(_) => Ok(true),
            Err(TemperatureError::Http { status: 404, .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn fetch_downloads(&self, package: &str) -> Result<Vec<DataPoint>, TemperatureError> {
        let url = encoded_url("https://pypistats.org/api/packages", package, "overall")? + "?mirrors=false";
        let data = http::get(&self.client, &url, &[]).await?;

        let items = data
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "response missing 'data' field"))?;

        let mut datapoints = Vec::new();
        for entry in items {
            if entry.get("category").and_then(Value::as_str) != Some("without_mirrors") {
                continue;
            }
            let date = entry
                .get("date")
                .and_then(Value::as_str)
                .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "download entry missing 'date'"))?;
            let count = entry.get("downloads").and_then(Value::as_f64).unwrap_or(0.0);
            datapoints.push(DataPoint::new(date, count));
        }
        datapoints.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(datapoints)
    }
}

fn encoded_url(base: &str, package: &str, tail: &str) -> Result<String, TemperatureError> {
    let mut url = url::Url::parse(base).map_err(|e| TemperatureError::Parse(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|()| TemperatureError::Parse("invalid pypi base url".to_string()))?
        .pop_if_empty()
        .push(package)
        .push(tail);
    Ok(url.into())
}

#[async_trait]
impl Source for Pypi {
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

        let mut datapoints = self.fetch_downloads(&package).await?;
        if datapoints.is_empty() {
            return Ok(vec![]);
        }

        let (start_date, _) = dates::get_date_range(window_days);
        let cutoff = dates::to_api_format(start_date);
        datapoints.retain(|dp| dp.timestamp >= cutoff);
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
    fn package_url_appends_json_segment() {
        let url = encoded_url("https://pypi.org/pypi", "requests", "json").unwrap();
        assert_eq!(url, "https://pypi.org/pypi/requests/json");
    }

    #[test]
    fn downloads_url_encodes_package_name() {
        let url = encoded_url("https://pypistats.org/api/packages", "scikit-learn", "overall").unwrap();
        assert_eq!(url, "https://pypistats.org/api/packages/scikit-learn/overall");
    }
}
