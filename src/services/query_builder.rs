// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Translates a validated [`SearchRequest`] into an Elasticsearch search body.

use crate::models::engine::{
    Aggregation, BoolQuery, Clause, Highlight, HighlightField, Query, SearchBody,
    TermsAggregation,
};
use crate::models::search::SearchRequest;
use std::collections::BTreeMap;

/// Stored field names of the `news` index
pub mod fields {
    pub const TITLE: &str = "newsTitle";
    pub const CONTENT: &str = "newsContent";
    pub const SCRAPED_TIME: &str = "newsScratchTime";
    pub const URL: &str = "newsURL";
    pub const CATEGORY: &str = "newsType";
    pub const SOURCE: &str = "newsSource";
}

pub const HIGHLIGHT_PRE_TAG: &str = "<em>";
pub const HIGHLIGHT_POST_TAG: &str = "</em>";
pub const TITLE_FRAGMENT_SIZE: u32 = 50;
pub const CONTENT_FRAGMENT_SIZE: u32 = 150;

/// Build the boolean query.
///
/// A keyword must match both title and content. Filters are exact phrase
/// matches on category and source.
pub fn build_query(request: &SearchRequest) -> Query {
    let mut must = Vec::new();

    if request.keyword.is_empty() {
        must.push(Clause::MatchAll);
    } else {
        for field in [fields::TITLE, fields::CONTENT] {
            must.push(Clause::Match {
                field: field.to_string(),
                text: request.keyword.clone(),
            });
        }
    }

    if let Some(category) = &request.category_filter {
        must.push(Clause::MatchPhrase {
            field: fields::CATEGORY.to_string(),
            text: category.clone(),
        });
    }
    if let Some(source) = &request.source_filter {
        must.push(Clause::MatchPhrase {
            field: fields::SOURCE.to_string(),
            text: source.clone(),
        });
    }

    Query {
        bool_query: BoolQuery { must },
    }
}

/// Terms aggregations over source and category, named after their field
pub fn build_aggregations(bucket_size: u32) -> BTreeMap<String, Aggregation> {
    [fields::SOURCE, fields::CATEGORY]
        .into_iter()
        .map(|field| {
            (
                field.to_string(),
                Aggregation {
                    terms: TermsAggregation {
                        field: field.to_string(),
                        size: bucket_size,
                    },
                },
            )
        })
        .collect()
}

pub fn build_highlight() -> Highlight {
    Highlight {
        pre_tags: vec![HIGHLIGHT_PRE_TAG.to_string()],
        post_tags: vec![HIGHLIGHT_POST_TAG.to_string()],
        fields: BTreeMap::from([
            (
                fields::TITLE.to_string(),
                HighlightField {
                    fragment_size: TITLE_FRAGMENT_SIZE,
                },
            ),
            (
                fields::CONTENT.to_string(),
                HighlightField {
                    fragment_size: CONTENT_FRAGMENT_SIZE,
                },
            ),
        ]),
    }
}

/// Full `_search` body for one page of results
pub fn build_search_body(request: &SearchRequest, bucket_size: u32) -> SearchBody {
    SearchBody {
        query: build_query(request),
        aggs: build_aggregations(bucket_size),
        highlight: build_highlight(),
        from: request.offset(),
        size: request.page_size,
        track_total_hits: true,
    }
}
