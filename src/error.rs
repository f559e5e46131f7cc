// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A hit whose stored document lacks a field the result needs
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Hit {id} is missing stored field '{field}'")]
pub struct MissingField {
    pub id: String,
    pub field: String,
}

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Search engine unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Search engine did not answer within {}ms", .0.as_millis())]
    UpstreamTimeout(Duration),

    /// Not returned by the search endpoint: the mapper skips such hits and
    /// reports them in `skippedHits`. Kept so callers of the mapper helpers
    /// can lift a `MissingField` into this error type with `?`.
    #[error(transparent)]
    DataIntegrityFault(#[from] MissingField),

    #[error("Serialization error: {0}")]
    SerializationFault(String),
}

impl SearchError {
    /// Short machine-readable name used in the error body
    pub fn kind(&self) -> &'static str {
        match self {
            SearchError::InvalidParameter(_) => "invalid_parameter",
            SearchError::UpstreamUnavailable(_) => "upstream_unavailable",
            SearchError::UpstreamTimeout(_) => "upstream_timeout",
            SearchError::DataIntegrityFault(_) => "data_integrity_fault",
            SearchError::SerializationFault(_) => "serialization_fault",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            SearchError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            SearchError::UpstreamUnavailable(_) | SearchError::SerializationFault(_) => {
                StatusCode::BAD_GATEWAY
            }
            SearchError::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            SearchError::DataIntegrityFault(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(e: serde_json::Error) -> Self {
        SearchError::SerializationFault(e.to_string())
    }
}

/// JSON body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), "{}", self);
        } else {
            tracing::info!(kind = self.kind(), "{}", self);
        }

        let body = ErrorBody {
            error: self.kind().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
