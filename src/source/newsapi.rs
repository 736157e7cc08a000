//! NewsAPI `top-headlines` source.
//!
//! Requests are built against the upstream endpoint and then, unless the
//! relay is disabled, wrapped in a pass-through relay URL of the form
//! `{relay}?quest=<url-encoded upstream URL>`.  The relay forwards the call
//! and returns the upstream body unchanged.
//!
//! Decoding is split out into [`NewsApiSource::parse_body`], a pure function
//! with no I/O, so tests can exercise it without the network.

use std::time::Duration;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use log::warn;
use reqwest::Url;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{Article, HeadlineSource, HeadlinesPage, PageQuery};
use crate::config::Config;

/// Upstream headlines endpoint.
pub const DEFAULT_API_BASE: &str = "https://newsapi.org/v2/top-headlines";

/// Public CORS relay; takes the upstream URL in its `quest` parameter.
pub const DEFAULT_RELAY: &str = "https://api.codetabs.com/v1/proxy/";

const RELAY_PARAM: &str = "quest";

/// A NewsAPI headlines source, optionally reached through a relay.
pub struct NewsApiSource {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    relay: Option<String>,
}

/// Wire shape of a `top-headlines` response, success or error.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HeadlinesResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient_count")]
    total_results: Option<u64>,
    /// Decoded entry by entry in [`decode_articles`].
    articles: Option<Vec<Value>>,
}

/// Accept any non-negative number (or numeric string); anything else is
/// treated as absent rather than failing the page.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }))
}

/// Decode each entry on its own, dropping the ones that do not fit the
/// [`Article`] shape so one bad record does not cost the whole page.
fn decode_articles(entries: Vec<Value>) -> Vec<Article> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(i, entry)| match serde_json::from_value(entry) {
            Ok(article) => Some(article),
            Err(e) => {
                warn!("skipping malformed article #{i}: {e}");
                None
            }
        })
        .collect()
}

impl NewsApiSource {
    /// Create a new source.
    ///
    /// # Arguments
    ///
    /// * `api_base` — upstream endpoint, normally [`DEFAULT_API_BASE`].
    /// * `api_key` — NewsAPI key, sent as the `apiKey` query parameter.
    /// * `relay` — relay endpoint, or `None` to call the upstream directly.
    /// * `timeout` — per-request timeout covering connect, headers and body.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        relay: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            relay,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base.clone(),
            config.api_key.clone(),
            config.relay.clone(),
            config.timeout,
        )
    }

    /// The upstream URL for `query`, before relay wrapping.
    pub fn upstream_url(&self, query: &PageQuery) -> Result<Url> {
        let page = query.page.to_string();
        let page_size = query.page_size.to_string();

        Url::parse_with_params(
            &self.api_base,
            &[
                ("country", query.country.as_str()),
                ("category", query.category.as_str()),
                ("apiKey", self.api_key.as_str()),
                ("page", page.as_str()),
                ("pageSize", page_size.as_str()),
            ],
        )
        .with_context(|| format!("invalid API base URL {:?}", self.api_base))
    }

    /// The URL actually requested: the upstream URL, relay-wrapped if a relay
    /// is configured.
    pub fn request_url(&self, query: &PageQuery) -> Result<Url> {
        let upstream = self.upstream_url(query)?;

        match &self.relay {
            Some(relay) => Url::parse_with_params(relay, &[(RELAY_PARAM, upstream.as_str())])
                .with_context(|| format!("invalid relay URL {relay:?}")),
            None => Ok(upstream),
        }
    }

    /// Decode a response body into a [`HeadlinesPage`].
    ///
    /// An API error body (`"status": "error"`) becomes an `Err` carrying the
    /// provider's code and message.  Missing or null `articles` decode to an
    /// empty page.
    pub fn parse_body(body: &str) -> Result<HeadlinesPage> {
        let response: HeadlinesResponse =
            serde_json::from_str(body).context("decoding headlines response")?;

        if response.status.as_deref() == Some("error") {
            bail!(
                "headlines API error {}: {}",
                response.code.as_deref().unwrap_or("unknown"),
                response.message.as_deref().unwrap_or("no message"),
            );
        }

        Ok(HeadlinesPage {
            articles: decode_articles(response.articles.unwrap_or_default()),
            total_results: response.total_results,
        })
    }
}

#[async_trait]
impl HeadlineSource for NewsApiSource {
    fn name(&self) -> &str {
        if self.relay.is_some() {
            "NewsAPI (relay)"
        } else {
            "NewsAPI"
        }
    }

    async fn fetch_page(&self, query: &PageQuery) -> Result<HeadlinesPage> {
        let url = self.request_url(query)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("sending headlines request")?;

        let status = response.status();
        let body = response.text().await.context("reading headlines body")?;

        if !status.is_success() {
            // Prefer the provider's own error message when the body has one.
            return Err(match Self::parse_body(&body) {
                Err(e) => e.context(format!("HTTP {status}")),
                Ok(_) => anyhow!("HTTP {status}"),
            });
        }

        Self::parse_body(&body)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
