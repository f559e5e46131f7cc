// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Wire types of the Elasticsearch `_search` API, limited to what the news
//! search endpoint sends and reads back.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

/// A leaf query clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause {
    MatchAll,
    Match { field: String, text: String },
    MatchPhrase { field: String, text: String },
}

impl Serialize for Clause {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut outer = serializer.serialize_map(Some(1))?;
        match self {
            Clause::MatchAll => {
                outer.serialize_entry("match_all", &BTreeMap::<String, String>::new())?
            }
            Clause::Match { field, text } => {
                outer.serialize_entry("match", &BTreeMap::from([(field, text)]))?
            }
            Clause::MatchPhrase { field, text } => {
                outer.serialize_entry("match_phrase", &BTreeMap::from([(field, text)]))?
            }
        }
        outer.end()
    }
}

/// Boolean query where every clause is required
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoolQuery {
    pub must: Vec<Clause>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Query {
    #[serde(rename = "bool")]
    pub bool_query: BoolQuery,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermsAggregation {
    pub field: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregation {
    pub terms: TermsAggregation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightField {
    pub fragment_size: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Highlight {
    pub pre_tags: Vec<String>,
    pub post_tags: Vec<String>,
    pub fields: BTreeMap<String, HighlightField>,
}

/// Body of a `POST /{index}/_search` request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchBody {
    pub query: Query,
    pub aggs: BTreeMap<String, Aggregation>,
    pub highlight: Highlight,
    pub from: u64,
    pub size: u32,
    /// ES 7+ stops counting at 10,000 hits unless asked for an exact total
    pub track_total_hits: bool,
}

/// ES 6 reports a bare count, ES 7+ an object with a relation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    pub fn value(self) -> u64 {
        match self {
            TotalHits::Count(n) | TotalHits::Object { value: n } => n,
        }
    }
}

impl Default for TotalHits {
    fn default() -> Self {
        TotalHits::Count(0)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hit {
    #[serde(rename = "_id", default)]
    pub id: String,
    #[serde(rename = "_source", default)]
    pub source: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub highlight: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Hits {
    #[serde(default)]
    pub total: TotalHits,
    #[serde(default)]
    pub hits: Vec<Hit>,
}

/// Bucket keys are strings for keyword fields and numbers for numeric ones
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BucketKey {
    Text(String),
    Number(serde_json::Number),
}

impl BucketKey {
    pub fn into_label(self) -> String {
        match self {
            BucketKey::Text(s) => s,
            BucketKey::Number(n) => n.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bucket {
    pub key: BucketKey,
    pub doc_count: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TermsBuckets {
    #[serde(default)]
    pub buckets: Vec<Bucket>,
}

/// Decoded `_search` response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineResponse {
    /// Query time in milliseconds
    #[serde(default)]
    pub took: u64,
    #[serde(default)]
    pub hits: Hits,
    #[serde(default)]
    pub aggregations: HashMap<String, TermsBuckets>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clause_wire_format() {
        assert_eq!(
            serde_json::to_value(Clause::MatchAll).unwrap(),
            json!({"match_all": {}})
        );
        assert_eq!(
            serde_json::to_value(Clause::MatchPhrase {
                field: "newsSource".to_string(),
                text: "新浪新闻".to_string(),
            })
            .unwrap(),
            json!({"match_phrase": {"newsSource": "新浪新闻"}})
        );
    }

    #[test]
    fn test_decode_es7_response() {
        let body = json!({
            "took": 7,
            "timed_out": false,
            "hits": {
                "total": {"value": 2, "relation": "eq"},
                "hits": [{
                    "_index": "news",
                    "_id": "a1",
                    "_score": 1.3,
                    "_source": {"newsTitle": "t"},
                    "highlight": {"newsTitle": ["<em>t</em>"]}
                }]
            },
            "aggregations": {
                "newsSource": {
                    "doc_count_error_upper_bound": 0,
                    "buckets": [{"key": "新浪新闻", "doc_count": 2}]
                },
                "newsType": {"buckets": [{"key": 2017, "doc_count": 1}]}
            }
        });

        let response: EngineResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.took, 7);
        assert_eq!(response.hits.total.value(), 2);
        assert_eq!(response.hits.hits[0].id, "a1");
        assert_eq!(response.hits.hits[0].highlight["newsTitle"], vec!["<em>t</em>"]);

        let type_key = response.aggregations["newsType"].buckets[0].key.clone();
        assert_eq!(type_key.into_label(), "2017");
    }

    #[test]
    fn test_decode_es6_total() {
        let body = json!({"took": 1, "hits": {"total": 42, "hits": []}});
        let response: EngineResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.hits.total.value(), 42);
        assert!(response.aggregations.is_empty());
    }
}
