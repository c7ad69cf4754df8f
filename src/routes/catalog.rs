// ABOUTME: Catalog route handlers for the grocery item reference data
// ABOUTME: Read-only listing with optional category filter
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Arogya Health

//! Catalog routes

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::context::ServerResources;
use crate::errors::AppError;
use crate::models::GroceryItem;

/// Query parameters for listing grocery items
#[derive(Debug, Deserialize, Default)]
pub struct ListGroceryItemsQuery {
    /// Restrict to one category
    #[serde(default)]
    pub category: Option<String>,
}

/// Response for the grocery item listing
#[derive(Debug, Serialize)]
pub struct GroceryItemListResponse {
    /// Matching items
    pub items: Vec<GroceryItem>,
    /// Total count
    pub total: usize,
}

/// Catalog routes handler
pub struct CatalogRoutes;

impl CatalogRoutes {
    /// Create all catalog routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/api/catalog/grocery-items", get(Self::list_grocery_items))
            .with_state(resources)
    }

    /// List grocery items, optionally filtered by category
    async fn list_grocery_items(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Query(query): Query<ListGroceryItemsQuery>,
    ) -> Result<Response, AppError> {
        resources.auth_manager.authenticate(&headers)?;

        let items = resources
            .database
            .catalog()
            .list_grocery_items(query.category.as_deref())
            .await?;

        let response = GroceryItemListResponse {
            total: items.len(),
            items,
        };

        Ok(Json(response).into_response())
    }
}
