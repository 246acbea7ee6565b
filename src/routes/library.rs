// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise library routes (read-only catalog).

use crate::error::{AppError, Result};
use crate::models::library::{ExerciseLibraryItem, LibraryFilter};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// The catalog only changes on deploy.
const CATALOG_CACHE_CONTROL: &str = "private, max-age=3600";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/library", get(search_library))
        .route("/api/library/{id}", get(get_library_item))
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LibraryResponse {
    pub exercises: Vec<ExerciseLibraryItem>,
    pub total: u32,
}

/// Search the library; every provided filter must match.
async fn search_library(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<LibraryFilter>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let Query(filter) = query?;
    let exercises = state.catalog.search(&filter);

    Ok((
        [(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)],
        Json(LibraryResponse {
            total: exercises.len() as u32,
            exercises,
        }),
    ))
}

async fn get_library_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let item = state
        .catalog
        .library_item(&id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Library exercise {} not found", id)))?;

    Ok(([(header::CACHE_CONTROL, CATALOG_CACHE_CONTROL)], Json(item)))
}
