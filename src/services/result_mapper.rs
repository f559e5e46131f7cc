// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Reshapes an engine response into the [`SearchResult`] returned to callers.

use crate::error::MissingField;
use crate::models::engine::{EngineResponse, Hit, TermsBuckets};
use crate::models::search::{AggregationCount, NewsItem, SearchRequest, SearchResult, SkippedHit};
use crate::services::query_builder::fields;

/// Stored string value of `field`, or a data-integrity fault if absent
pub fn raw_field(hit: &Hit, field: &str) -> Result<String, MissingField> {
    hit.source
        .get(field)
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| MissingField {
            id: hit.id.clone(),
            field: field.to_string(),
        })
}

/// Highlighted fragments of `field` joined without separator, falling back
/// to the stored value when the field has no highlight
pub fn resolve_field(hit: &Hit, field: &str) -> Result<String, MissingField> {
    match hit.highlight.get(field) {
        Some(fragments) if !fragments.is_empty() => Ok(fragments.concat()),
        _ => raw_field(hit, field),
    }
}

pub fn map_hit(hit: &Hit) -> Result<NewsItem, MissingField> {
    Ok(NewsItem {
        title: resolve_field(hit, fields::TITLE)?,
        content: resolve_field(hit, fields::CONTENT)?,
        scraped_time: raw_field(hit, fields::SCRAPED_TIME)?,
        source_url: raw_field(hit, fields::URL)?,
        category: raw_field(hit, fields::CATEGORY)?,
        source: raw_field(hit, fields::SOURCE)?,
    })
}

/// Bucket label to count in engine order; a missing aggregation is empty
pub fn map_buckets(buckets: Option<&TermsBuckets>) -> AggregationCount {
    buckets
        .map(|terms| {
            terms
                .buckets
                .iter()
                .map(|bucket| (bucket.key.clone().into_label(), bucket.doc_count))
                .collect()
        })
        .unwrap_or_default()
}

/// Map one page of engine results.
///
/// Hits with a missing stored field are left out of `items` and listed in
/// `skipped_hits` so one bad document does not fail the page.
pub fn map_response(request: &SearchRequest, response: EngineResponse) -> SearchResult {
    let mut items = Vec::with_capacity(response.hits.hits.len());
    let mut skipped_hits = Vec::new();

    for hit in &response.hits.hits {
        match map_hit(hit) {
            Ok(item) => items.push(item),
            Err(MissingField { id, field }) => {
                tracing::warn!(hit_id = %id, field = %field, "Skipping hit with missing field");
                skipped_hits.push(SkippedHit { id, field });
            }
        }
    }

    let source_counts = map_buckets(response.aggregations.get(fields::SOURCE));
    let category_counts = map_buckets(response.aggregations.get(fields::CATEGORY));

    for (label, count) in source_counts.iter().chain(category_counts.iter()) {
        tracing::debug!("{}-{}", label, count);
    }

    SearchResult {
        page: request.page,
        page_size: request.page_size,
        total_hits: response.hits.total.value(),
        elapsed_time: format!("{}ms", response.took),
        items,
        source_counts,
        category_counts,
        skipped_hits,
    }
}
