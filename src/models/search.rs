// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use crate::error::SearchError;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub const DEFAULT_NEWS_SOURCE: &str = "新浪新闻";
pub const DEFAULT_NEWS_TYPE: &str = "军事";

/// Elasticsearch rejects pages with `from + size` beyond its default
/// `index.max_result_window`
pub const MAX_RESULT_WINDOW: u64 = 10_000;

fn default_news_source() -> String {
    DEFAULT_NEWS_SOURCE.to_string()
}

fn default_news_type() -> String {
    DEFAULT_NEWS_TYPE.to_string()
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    10
}

/// Raw query string of `GET /search/get`, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchParams {
    /// Search keyword; empty matches every document
    #[serde(default)]
    pub q: String,
    #[serde(rename = "newsSource", default = "default_news_source")]
    pub news_source: String,
    #[serde(rename = "newsType", default = "default_news_type")]
    pub news_type: String,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(rename = "pagesize", default = "default_page_size")]
    pub page_size: i64,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            q: String::new(),
            news_source: default_news_source(),
            news_type: default_news_type(),
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl SearchParams {
    /// Validate pagination and normalize empty filters to `None`.
    pub fn validate(self, max_page_size: u32) -> Result<SearchRequest, SearchError> {
        if self.page < 1 {
            return Err(SearchError::InvalidParameter(format!(
                "page must be >= 1, got {}",
                self.page
            )));
        }
        if self.page_size < 1 {
            return Err(SearchError::InvalidParameter(format!(
                "pagesize must be >= 1, got {}",
                self.page_size
            )));
        }
        if self.page_size > i64::from(max_page_size) {
            return Err(SearchError::InvalidParameter(format!(
                "pagesize must be <= {}, got {}",
                max_page_size, self.page_size
            )));
        }
        let page = u32::try_from(self.page).map_err(|_| {
            SearchError::InvalidParameter(format!("page is too large: {}", self.page))
        })?;

        let request = SearchRequest {
            keyword: self.q,
            source_filter: non_empty(self.news_source),
            category_filter: non_empty(self.news_type),
            page,
            // bounded by max_page_size above
            page_size: self.page_size as u32,
        };

        let window_end = request.offset() + u64::from(request.page_size);
        if window_end > MAX_RESULT_WINDOW {
            return Err(SearchError::InvalidParameter(format!(
                "page {} with pagesize {} reaches past result {}, the deepest page available",
                request.page, request.page_size, MAX_RESULT_WINDOW
            )));
        }

        Ok(request)
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Validated search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keyword: String,
    pub source_filter: Option<String>,
    pub category_filter: Option<String>,
    /// 1-based page number
    pub page: u32,
    pub page_size: u32,
}

impl SearchRequest {
    /// Zero-based offset of the first hit on this page
    pub fn offset(&self) -> u64 {
        u64::from(self.page_size) * u64::from(self.page.saturating_sub(1))
    }
}

/// One news article as returned to the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    /// Highlighted title fragments, or the stored title
    pub title: String,
    /// Highlighted content fragments, or the stored content
    pub content: String,
    pub scraped_time: String,
    #[serde(rename = "sourceURL")]
    pub source_url: String,
    pub category: String,
    pub source: String,
}

/// Bucket label to document count, kept in engine order.
///
/// Serialized as a JSON object whose key order follows the buckets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationCount(Vec<(String, u64)>);

impl AggregationCount {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: impl Into<String>, count: u64) {
        self.0.push((label.into(), count));
    }

    pub fn get(&self, label: &str) -> Option<u64> {
        self.0
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, count)| *count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(key, count)| (key.as_str(), *count))
    }
}

impl FromIterator<(String, u64)> for AggregationCount {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Serialize for AggregationCount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (label, count) in &self.0 {
            map.serialize_entry(label, count)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for AggregationCount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountsVisitor;

        impl<'de> Visitor<'de> for CountsVisitor {
            type Value = AggregationCount;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of bucket label to document count")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut counts = AggregationCount::new();
                while let Some((label, count)) = access.next_entry::<String, u64>()? {
                    counts.push(label, count);
                }
                Ok(counts)
            }
        }

        deserializer.deserialize_map(CountsVisitor)
    }
}

/// A hit left out of the page because a stored field was missing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedHit {
    pub id: String,
    pub field: String,
}

/// Response body of `GET /search/get`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub page: u32,
    pub page_size: u32,
    pub total_hits: u64,
    /// Engine-reported query time, e.g. `"12ms"`
    pub elapsed_time: String,
    pub items: Vec<NewsItem>,
    pub source_counts: AggregationCount,
    pub category_counts: AggregationCount,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_hits: Vec<SkippedHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(page: i64, page_size: i64) -> SearchParams {
        SearchParams {
            page,
            page_size,
            ..SearchParams::default()
        }
    }

    #[test]
    fn test_offset_first_page() {
        let request = params(1, 10).validate(100).unwrap();
        assert_eq!(request.offset(), 0);
    }

    #[test]
    fn test_offset_third_page() {
        let request = params(3, 20).validate(100).unwrap();
        assert_eq!(request.offset(), 40);
    }

    #[test]
    fn test_defaults_apply_source_and_type_filters() {
        let request = SearchParams::default().validate(100).unwrap();
        assert_eq!(request.keyword, "");
        assert_eq!(request.source_filter.as_deref(), Some("新浪新闻"));
        assert_eq!(request.category_filter.as_deref(), Some("军事"));
        assert_eq!(request.page, 1);
        assert_eq!(request.page_size, 10);
    }

    #[test]
    fn test_empty_filters_become_none() {
        let request = SearchParams {
            news_source: String::new(),
            news_type: String::new(),
            ..SearchParams::default()
        }
        .validate(100)
        .unwrap();
        assert!(request.source_filter.is_none());
        assert!(request.category_filter.is_none());
    }

    #[test]
    fn test_non_positive_page_rejected() {
        assert!(matches!(
            params(0, 10).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
        assert!(matches!(
            params(-2, 10).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_non_positive_page_size_rejected() {
        assert!(matches!(
            params(1, 0).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_page_size_above_cap_rejected() {
        assert!(matches!(
            params(1, 101).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
        assert!(params(1, 100).validate(100).is_ok());
    }

    #[test]
    fn test_page_beyond_result_window_rejected() {
        assert!(params(100, 100).validate(100).is_ok());
        assert!(matches!(
            params(101, 100).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
        assert!(matches!(
            params(1_000_000, 10).validate(100),
            Err(SearchError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_aggregation_count_serializes_in_bucket_order() {
        let mut counts = AggregationCount::new();
        counts.push("网易新闻", 80);
        counts.push("新浪新闻", 120);

        let json = serde_json::to_string(&counts).unwrap();
        assert_eq!(json, r#"{"网易新闻":80,"新浪新闻":120}"#);

        let back: AggregationCount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, counts);
    }

    #[test]
    fn test_news_item_field_names() {
        let item = NewsItem {
            title: "t".to_string(),
            content: "c".to_string(),
            scraped_time: "2017-05-01".to_string(),
            source_url: "http://news.sina.com.cn/a".to_string(),
            category: "军事".to_string(),
            source: "新浪新闻".to_string(),
        };
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["scrapedTime"], "2017-05-01");
        assert_eq!(value["sourceURL"], "http://news.sina.com.cn/a");
        assert_eq!(value["category"], "军事");
    }
}
