// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout Tracker: log exercises, follow progress and reuse templates.
//!
//! This crate provides the backend API: exercise logging with personal
//! record detection, streak and progress statistics, an exercise library,
//! workout templates and subscription-gated features.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{CatalogService, ExerciseLog, UserDirectory};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: CatalogService,
    pub users: UserDirectory,
    pub exercises: ExerciseLog,
}

impl AppState {
    /// Wire the services around one database handle.
    pub fn new(config: Config, db: FirestoreDb, catalog: CatalogService) -> Self {
        Self {
            users: UserDirectory::new(db.clone()),
            exercises: ExerciseLog::new(db.clone()),
            config,
            db,
            catalog,
        }
    }
}
