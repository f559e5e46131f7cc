// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! Application state, route handlers, and router construction.
//!
//! This module is `pub` so that integration tests can build a test router directly
//! without starting the full binary.

use crate::error::SearchError;
use crate::models::search::{SearchParams, SearchResult};
use crate::models::version::VersionResponse;
use crate::services::logging;
use crate::services::query_builder::build_search_body;
use crate::services::result_mapper::map_response;
use crate::services::search::{SearchConfig, SearchEngine};
use axum::{
    body::Body,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, HeaderValue, Request},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

/// Application version extracted from `Cargo.toml` at compile time.
/// The patch segment can be overridden via `NEWS_SEARCH_PATCH_VERSION` (see `build.rs`).
pub const VERSION: &str = env!("NEWS_SEARCH_VERSION");

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Shared application state injected into every route handler via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    /// Pooled engine client, built once at startup
    pub engine: Arc<dyn SearchEngine>,
    pub config: Arc<SearchConfig>,
}

impl AppState {
    pub fn new(engine: Arc<dyn SearchEngine>, config: SearchConfig) -> Self {
        Self {
            engine,
            config: Arc::new(config),
        }
    }
}

// ---------------------------------------------------------------------------
// Route handlers
// ---------------------------------------------------------------------------

pub async fn version_handler() -> Json<VersionResponse> {
    Json(VersionResponse {
        service: "news-search".to_string(),
        version: VERSION.to_string(),
    })
}

/// `GET /search/get`
pub async fn search_handler(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<([(header::HeaderName, HeaderValue); 1], Json<SearchResult>), SearchError> {
    let Query(params) = params.map_err(|e| SearchError::InvalidParameter(e.body_text()))?;
    let request = params.validate(state.config.max_page_size)?;

    tracing::info!(
        keyword = %request.keyword,
        source = ?request.source_filter,
        category = ?request.category_filter,
        page = request.page,
        page_size = request.page_size,
        "Search request"
    );

    let body = build_search_body(&request, state.config.aggregation_size);
    let response = state.engine.submit(&body).await?;

    tracing::info!(
        total_hits = response.hits.total.value(),
        took_ms = response.took,
        "Search completed"
    );

    let result = map_response(&request, response);
    if !result.skipped_hits.is_empty() {
        tracing::warn!(
            skipped = result.skipped_hits.len(),
            "Some hits were dropped for missing fields"
        );
    }

    Ok((
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json;charset=UTF-8"),
        )],
        Json(result),
    ))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the Axum application router.
///
/// Every request gets an `x-request-id` (generated when absent), a tracing span
/// carrying it, and the same id echoed on the response.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/version", get(version_handler))
        .route("/search/get", get(search_handler))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(|request: &Request<Body>| logging::request_span(request)),
                )
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
}
