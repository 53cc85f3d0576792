//! HTTP client for remote option sources.

use std::time::Duration;

use reqwest::{header, Client};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::error::{Result, SourceError};
use crate::form::SelectOption;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client that fetches option lists from a `dataSource` URL.
#[derive(Debug, Clone)]
pub struct OptionClient {
    client: Client,
}

impl OptionClient {
    /// Create a client with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(SourceError::Network)?;
        Ok(Self { client })
    }

    /// Fetch and decode the option list at `url`.
    ///
    /// Issues a single GET; no retry.
    #[instrument(skip(self))]
    pub async fn fetch_options(&self, url: &str) -> Result<Vec<SelectOption>> {
        let parsed = reqwest::Url::parse(url).map_err(|e| SourceError::InvalidUrl(e.to_string()))?;

        debug!("Fetching options");
        let response = self
            .client
            .get(parsed)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Data source returned an error status");
            return Err(SourceError::from_status(status, url));
        }

        let body = response.text().await?;
        let options = parse_options_payload(&body)?;
        debug!(count = options.len(), "Fetched options");
        Ok(options)
    }
}

/// Decode a data source response body into an option list.
///
/// The body must be JSON. A payload that is not an array decodes to no
/// options, and array elements that are not `{ value, label }` objects are
/// skipped.
pub fn parse_options_payload(body: &str) -> Result<Vec<SelectOption>> {
    let payload: Value = serde_json::from_str(body)?;

    let Value::Array(items) = payload else {
        warn!("Data source payload is not an array");
        return Ok(Vec::new());
    };

    let total = items.len();
    let options: Vec<SelectOption> = items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if options.len() < total {
        debug!(skipped = total - options.len(), "Skipped malformed option entries");
    }

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the URL to request.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 1024];
            let _ = socket.read(&mut buf).await;
            let response = format!(
                "{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\
                 Connection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        });

        format!("http://{}/options", addr)
    }

    #[test]
    fn test_parse_options_payload() {
        let options =
            parse_options_payload(r#"[{"value":"x","label":"X"},{"value":"y"}]"#).unwrap();
        assert_eq!(
            options,
            vec![SelectOption::new("x", "X"), SelectOption::unlabelled("y")]
        );
    }

    #[test]
    fn test_parse_non_array_payload_is_empty() {
        let options = parse_options_payload(r#"{"value":"x","label":"X"}"#).unwrap();
        assert!(options.is_empty());
    }

    #[test]
    fn test_parse_skips_malformed_entries() {
        let payload = r#"[1, "two", {"label":"no value"}, {"value":"ok","label":"Ok"}]"#;
        let options = parse_options_payload(payload).unwrap();
        assert_eq!(options, vec![SelectOption::new("ok", "Ok")]);
    }

    #[test]
    fn test_parse_malformed_json() {
        let result = parse_options_payload("<html>oops</html>");
        assert!(matches!(result, Err(SourceError::MalformedJson(_))));
    }

    #[tokio::test]
    async fn test_fetch_options() {
        let url = serve_once("HTTP/1.1 200 OK", r#"[{"value":"x","label":"X"}]"#).await;
        let client = OptionClient::new().unwrap();

        let options = client.fetch_options(&url).await.unwrap();
        assert_eq!(options, vec![SelectOption::new("x", "X")]);
    }

    #[tokio::test]
    async fn test_fetch_options_not_found() {
        let url = serve_once("HTTP/1.1 404 Not Found", "[]").await;
        let client = OptionClient::new().unwrap();

        let result = client.fetch_options(&url).await;
        assert!(matches!(result, Err(SourceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_fetch_options_invalid_url() {
        let client = OptionClient::new().unwrap();
        let result = client.fetch_options("not a url").await;
        assert!(matches!(result, Err(SourceError::InvalidUrl(_))));
    }
}
