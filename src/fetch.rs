//! Upstream profile API client
//!
//! Fetches the raw "show user" response for a profile and extracts the
//! follower-count samples embedded in it. Network faults never escape this
//! module: a failed request, a non-2xx status, or an empty body all collapse
//! to "zero samples found" so a refresh cycle can degrade instead of crash.

use std::sync::OnceLock;
use std::time::Duration;

use chrono::NaiveDate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

/// Base URL of the upstream profile API
const DEFAULT_BASE_URL: &str = "https://twitter.com";

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Connect timeout in seconds
const CONNECT_TIMEOUT_SECS: u64 = 5;

/// Everything except unreserved characters gets percent-encoded.
const ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Errors that can occur while talking to the upstream API.
///
/// These stay internal to the fetch cycle; callers of [`CountClient::fetch_samples`]
/// only ever see an empty sample list.
#[derive(Debug, Error)]
pub enum FetchError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned a non-success status
    #[error("upstream returned status {0}")]
    Status(StatusCode),

    /// Upstream returned an empty body
    #[error("upstream returned an empty body")]
    EmptyBody,
}

/// Client for the upstream profile API.
#[derive(Debug, Clone)]
pub struct CountClient {
    http: Client,
    base_url: String,
}

impl CountClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with a mock server).
    pub fn with_base_url(base_url: &str) -> Result<Self, FetchError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(concat!("fancount/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the "show user" request URL for a profile.
    ///
    /// When an average window is configured, a `dates` parameter spanning
    /// from `today - window` to `today` is appended so the upstream returns
    /// one sample per day in the range.
    ///
    /// # Arguments
    /// * `profile` - the profile identifier, URL-encoded into the path
    /// * `average_window_secs` - optional window width in seconds
    /// * `today` - the date the range ends on
    pub fn build_request_url(
        &self,
        profile: &str,
        average_window_secs: Option<i64>,
        today: NaiveDate,
    ) -> String {
        let mut url = format!(
            "{}/users/show/{}",
            self.base_url,
            utf8_percent_encode(profile, ENCODE_SET)
        );

        let window_start = average_window_secs
            .filter(|secs| *secs > 0)
            .and_then(chrono::Duration::try_seconds)
            .and_then(|window| today.checked_sub_signed(window));
        if let Some(from) = window_start {
            let range = format!("{},{}", from.format("%Y-%m-%d"), today.format("%Y-%m-%d"));
            url.push_str("?dates=");
            url.push_str(&utf8_percent_encode(&range, ENCODE_SET).to_string());
        }

        url
    }

    /// Fetches the follower-count samples for a profile.
    ///
    /// Best-effort: any failure is logged and reported as an empty sample
    /// list, indistinguishable from a response containing no counts.
    pub async fn fetch_samples(
        &self,
        profile: &str,
        average_window_secs: Option<i64>,
    ) -> Vec<String> {
        let url = self.build_request_url(profile, average_window_secs, today());

        match self.request_body(&url).await {
            Ok(body) => {
                let samples = extract_samples(&body);
                debug!(%url, count = samples.len(), "extracted follower-count samples");
                samples
            }
            Err(err) => {
                warn!(%url, error = %err, "upstream fetch failed, treating as no data");
                Vec::new()
            }
        }
    }

    async fn request_body(&self, url: &str) -> Result<String, FetchError> {
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Err(FetchError::EmptyBody);
        }
        Ok(body)
    }
}

/// Scans a raw response body for `<followers_count>` tags and collects the
/// enclosed text, in document order.
pub fn extract_samples(body: &str) -> Vec<String> {
    followers_pattern()
        .captures_iter(body)
        .map(|captures| captures[1].to_string())
        .collect()
}

fn followers_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"<followers_count>(.*?)</followers_count>").expect("pattern is valid")
    })
}

fn today() -> NaiveDate {
    chrono::Utc::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> CountClient {
        CountClient::with_base_url("https://example.com").expect("client should build")
    }

    #[test]
    fn test_build_url_plain_profile() {
        let client = test_client();
        let url = client.build_request_url("rustlang", None, date(2024, 7, 15));
        assert_eq!(url, "https://example.com/users/show/rustlang");
    }

    #[test]
    fn test_build_url_encodes_profile() {
        let client = test_client();
        let url = client.build_request_url("some user", None, date(2024, 7, 15));
        assert_eq!(url, "https://example.com/users/show/some%20user");
    }

    #[test]
    fn test_build_url_with_average_window() {
        let client = test_client();
        // 15 days ending 2024-07-15 starts at 2024-06-30; the comma in the
        // range is percent-encoded.
        let url = client.build_request_url("rustlang", Some(15 * 86_400), date(2024, 7, 15));
        assert_eq!(
            url,
            "https://example.com/users/show/rustlang?dates=2024-06-30%2C2024-07-15"
        );
    }

    #[test]
    fn test_build_url_ignores_non_positive_window() {
        let client = test_client();
        let url = client.build_request_url("rustlang", Some(0), date(2024, 7, 15));
        assert_eq!(url, "https://example.com/users/show/rustlang");
    }

    #[test]
    fn test_trailing_slash_in_base_url_is_normalized() {
        let client = CountClient::with_base_url("https://example.com/").expect("client");
        let url = client.build_request_url("a", None, date(2024, 1, 1));
        assert_eq!(url, "https://example.com/users/show/a");
    }

    #[test]
    fn test_extract_single_sample() {
        let body = "<user><followers_count>1234</followers_count></user>";
        assert_eq!(extract_samples(body), vec!["1234"]);
    }

    #[test]
    fn test_extract_multiple_samples_in_order() {
        let body = "\
            <day><followers_count>10</followers_count></day>\
            <day><followers_count>20</followers_count></day>\
            <day><followers_count>30</followers_count></day>";
        assert_eq!(extract_samples(body), vec!["10", "20", "30"]);
    }

    #[test]
    fn test_extract_is_non_greedy() {
        let body = "<followers_count>1</followers_count>junk<followers_count>2</followers_count>";
        assert_eq!(extract_samples(body), vec!["1", "2"]);
    }

    #[test]
    fn test_extract_no_samples() {
        assert!(extract_samples("<user><name>x</name></user>").is_empty());
        assert!(extract_samples("").is_empty());
    }

    #[test]
    fn test_extract_keeps_non_numeric_text() {
        // Extraction collects candidates verbatim; the aggregator decides
        // what to do with non-numeric ones.
        let body = "<followers_count>n/a</followers_count>";
        assert_eq!(extract_samples(body), vec!["n/a"]);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }
}
