//! Shared HTTP transport for every adapter (§4.6).
//!
//! One `reqwest::Client` is built per adapter (or shared across adapters
//! that construct their own), with gzip and a fixed `User-Agent` baked in.
//! `request`/`get`/`post` apply the one retry-on-5xx/429 policy documented
//! for this pipeline; 4xx responses other than 429 fail immediately.

use std::time::Duration;

use serde_json::Value;
use temperature_types::TemperatureError;

/// Default whole-request timeout, absent an explicit override (§6).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Total attempts for a request that keeps hitting 5xx/429: one try, one retry.
const MAX_ATTEMPTS: u32 = 2;

/// Backoff before the retry attempt.
const RETRY_DELAY: Duration = Duration::from_secs(1);

const USER_AGENT: &str = "temperature-skill/1.0 (Claude Code Skill)";

/// Build the one `reqwest::Client` an adapter needs: gzip response
/// decoding, a fixed user agent, and `timeout` as the whole-request budget.
///
/// # Errors
/// Returns [`TemperatureError::Transport`] if the underlying TLS backend
/// fails to initialize.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, TemperatureError> {
    reqwest::Client::builder()
        .gzip(true)
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(|e| TemperatureError::Transport(e.to_string()))
}

/// Produce a `Basic <base64>` header value for DataForSEO-style dual-credential auth.
#[must_use]
pub fn basic_auth_header(login: &str, password: &str) -> String {
    use base64::Engine as _;
    let raw = format!("{login}:{password}");
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(raw)
    )
}

fn log_request(method: &str, url: &str) {
    #[cfg(feature = "tracing")]
    tracing::debug!(method, url, "http request");
    #[cfg(not(feature = "tracing"))]
    let _ = (method, url);
}

fn log_response(status: u16, bytes: usize) {
    #[cfg(feature = "tracing")]
    tracing::debug!(status, bytes, "http response");
    #[cfg(not(feature = "tracing"))]
    let _ = (status, bytes);
}

/// Issue a GET request and parse the response body as JSON.
///
/// # Errors
/// See [`request`].
pub async fn get(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
) -> Result<Value, TemperatureError> {
    request(client, reqwest::Method::GET, url, headers, None).await
}

/// Issue a POST request with a JSON body and parse the response as JSON.
///
/// # Errors
/// See [`request`].
pub async fn post(
    client: &reqwest::Client,
    url: &str,
    headers: &[(&str, &str)],
    body: &Value,
) -> Result<Value, TemperatureError> {
    request(client, reqwest::Method::POST, url, headers, Some(body)).await
}

/// Issue a request, retrying once on a 5xx or 429 response (§4.6).
///
/// Any other 4xx fails immediately without retrying. Transport-level errors
/// (DNS, connect, socket timeout) also get the one retry. A non-JSON or
/// empty body is not an error: an empty body parses to `Value::Null`.
///
/// # Errors
/// Returns [`TemperatureError::Http`] for a non-retryable or exhausted HTTP
/// status, or [`TemperatureError::Transport`]/[`TemperatureError::Parse`]
/// for connection and decode failures.
pub async fn request(
    client: &reqwest::Client,
    method: reqwest::Method,
    url: &str,
    headers: &[(&str, &str)],
    body: Option<&Value>,
) -> Result<Value, TemperatureError> {
    log_request(method.as_str(), url);

    let mut last_error: Option<TemperatureError> = None;

    for attempt in 0..MAX_ATTEMPTS {
        let mut builder = client.request(method.clone(), url);
        for (key, value) in headers {
            builder = builder.header(*key, *value);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }

        match builder.send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    let text = response
                        .text()
                        .await
                        .map_err(|e| TemperatureError::Transport(e.to_string()))?;
                    log_response(status.as_u16(), text.len());
                    if text.is_empty() {
                        return Ok(Value::Null);
                    }
                    return serde_json::from_str(&text)
                        .map_err(|e| TemperatureError::Parse(format!("invalid JSON response: {e}")));
                }

                let code = status.as_u16();
                let retryable = status.is_server_error() || code == 429;
                let message = format!("HTTP {code}");
                last_error = Some(TemperatureError::Http {
                    status: code,
                    message,
                });

                if !retryable {
                    return Err(last_error.expect("just set"));
                }
            }
            Err(e) => {
                last_error = Some(TemperatureError::Transport(e.to_string()));
            }
        }

        if attempt + 1 < MAX_ATTEMPTS {
            tokio::time::sleep(RETRY_DELAY * (attempt + 1)).await;
        }
    }

    Err(last_error.unwrap_or_else(|| TemperatureError::Transport("request failed with no error details".to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_auth_header_matches_known_vector() {
        assert_eq!(
            basic_auth_header("Aladdin", "open sesame"),
            "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ=="
        );
    }

    #[test]
    fn client_builds_with_default_timeout() {
        assert!(build_client(DEFAULT_TIMEOUT).is_ok());
    }
}
