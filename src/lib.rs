// SPDX-License-Identifier: BSD-3-Clause
// Copyright (c) 2026 Aleksandr Ptakhin

//! News search API: forwards keyword and filter queries to Elasticsearch and
//! reshapes hits and aggregations into a JSON result page.

pub mod app;
pub mod error;
pub mod models;
pub mod services;
