// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::SearchError;
use crate::models::engine::{EngineResponse, SearchBody};
use anyhow::{anyhow, Context};
use async_trait::async_trait;
use std::env;
use std::time::Duration;
use url::Url;

/// Configuration for the Elasticsearch connection and query shape
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Base URL of the cluster, always ending in `/`
    pub url: Url,
    pub index: String,
    /// Upper bound for one `_search` round trip
    pub timeout: Duration,
    /// Buckets returned per terms aggregation
    pub aggregation_size: u32,
    pub max_page_size: u32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://127.0.0.1:9200/").expect("static URL is valid"),
            index: "news".to_string(),
            timeout: Duration::from_millis(5000),
            aggregation_size: 10,
            max_page_size: 100,
        }
    }
}

impl SearchConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let url = match lookup("ELASTICSEARCH_URL") {
            Some(host) => parse_base_url(&host)?,
            None => defaults.url,
        };
        let index = lookup("ELASTICSEARCH_INDEX").unwrap_or(defaults.index);
        if index.is_empty() || index.contains('/') {
            return Err(anyhow!("ELASTICSEARCH_INDEX is not a valid index name: {:?}", index));
        }

        let timeout_ms = parse_var(&lookup, "ELASTICSEARCH_TIMEOUT_MS", 5000u64)?;
        let aggregation_size = parse_var(&lookup, "AGGREGATION_SIZE", defaults.aggregation_size)?;
        let max_page_size = parse_var(&lookup, "MAX_PAGE_SIZE", defaults.max_page_size)?;
        if timeout_ms == 0 || aggregation_size == 0 || max_page_size == 0 {
            return Err(anyhow!(
                "ELASTICSEARCH_TIMEOUT_MS, AGGREGATION_SIZE and MAX_PAGE_SIZE must be positive"
            ));
        }

        Ok(Self {
            url,
            index,
            timeout: Duration::from_millis(timeout_ms),
            aggregation_size,
            max_page_size,
        })
    }

    /// `{url}/{index}/_search`
    pub fn search_url(&self) -> anyhow::Result<Url> {
        self.url
            .join(&format!("{}/_search", self.index))
            .context("Failed to build search URL")
    }
}

fn parse_var<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("{} must be a valid number, got {:?}", key, raw)),
        None => Ok(default),
    }
}

/// Accepts `host:port` as well as a full URL, and normalizes the trailing slash
/// so relative joins keep any path prefix.
fn parse_base_url(host: &str) -> anyhow::Result<Url> {
    let full = if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("http://{}", host)
    };
    let mut url = Url::parse(&full).with_context(|| format!("Invalid ELASTICSEARCH_URL: {}", host))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The only operation the search endpoint needs from the engine
#[async_trait]
pub trait SearchEngine: Send + Sync {
    async fn submit(&self, body: &SearchBody) -> Result<EngineResponse, SearchError>;
}

/// Elasticsearch client over a pooled HTTP connection set, shared by all requests
pub struct SearchClient {
    http: reqwest::Client,
    search_url: Url,
    base_url: Url,
    timeout: Duration,
}

impl SearchClient {
    pub fn new(config: &SearchConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            search_url: config.search_url()?,
            base_url: config.url.clone(),
            timeout: config.timeout,
        })
    }

    /// Check that the cluster answers at all
    pub async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .http
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SearchError::UpstreamUnavailable(format!(
                "status {}",
                response.status()
            )))
        }
    }

    fn classify(&self, e: reqwest::Error) -> SearchError {
        if e.is_timeout() {
            SearchError::UpstreamTimeout(self.timeout)
        } else {
            SearchError::UpstreamUnavailable(e.to_string())
        }
    }
}

#[async_trait]
impl SearchEngine for SearchClient {
    async fn submit(&self, body: &SearchBody) -> Result<EngineResponse, SearchError> {
        tracing::debug!(url = %self.search_url, from = body.from, size = body.size, "Submitting search");

        let response = self
            .http
            .post(self.search_url.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(|e| self.classify(e))?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&bytes);
            let detail: String = detail.chars().take(300).collect();
            return Err(SearchError::UpstreamUnavailable(format!(
                "status {}: {}",
                status, detail
            )));
        }

        Ok(serde_json::from_slice(&bytes)?)
    }
}
