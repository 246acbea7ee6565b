// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile and subscription state)
//! - Exercises (logged entries, normalized on read)
//! - Workout templates (user-created only; pre-built ones ship as data files)

use crate::db::collections;
use crate::error::AppError;
use crate::models::exercise::{
    entries_named, ExerciseCategory, ExerciseDocument, ExerciseEntry,
};
use crate::models::{User, WorkoutTemplate};
use chrono::{DateTime, Utc};
use firestore::{FirestoreQueryDirection, FirestoreTimestamp};

// Firestore limits batch/transaction writes to 500 operations.
// We use a safe limit of 400 to allow headroom.
const BATCH_SIZE: usize = 400;

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by identity subject.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.user_id)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Exercise Operations ─────────────────────────────────────

    /// Get an exercise entry by document ID.
    pub async fn get_exercise(&self, entry_id: &str) -> Result<Option<ExerciseEntry>, AppError> {
        let doc: Option<ExerciseDocument> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::EXERCISES)
            .obj()
            .one(entry_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(doc.map(ExerciseEntry::from))
    }

    /// Create or replace an exercise entry (always written in the per-set shape).
    pub async fn set_exercise(&self, entry: &ExerciseEntry) -> Result<(), AppError> {
        let doc = entry.to_document();
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::EXERCISES)
            .document_id(&doc.id)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_exercise(&self, entry_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::EXERCISES)
            .document_id(entry_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Get a page of a user's exercises, newest first.
    pub async fn get_exercises_for_user(
        &self,
        user_id: &str,
        category: Option<ExerciseCategory>,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<ExerciseEntry>, AppError> {
        let docs: Vec<ExerciseDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    category.and_then(|c| q.field("category").eq(c)),
                ])
            })
            .order_by([("performed_at", FirestoreQueryDirection::Descending)])
            .limit(limit)
            .offset(offset)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(ExerciseEntry::from).collect())
    }

    /// Get every exercise a user has logged (for overview statistics).
    pub async fn get_all_exercises_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<ExerciseEntry>, AppError> {
        let docs: Vec<ExerciseDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(docs.into_iter().map(ExerciseEntry::from).collect())
    }

    /// Get a user's entries for one exercise name, oldest first.
    ///
    /// `from` is inclusive and `until` exclusive. Names are compared
    /// case- and whitespace-insensitively after loading.
    pub async fn get_exercises_by_name(
        &self,
        user_id: &str,
        name: &str,
        from: Option<DateTime<Utc>>,
        until: Option<DateTime<Utc>>,
    ) -> Result<Vec<ExerciseEntry>, AppError> {
        let docs: Vec<ExerciseDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(|q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    from.and_then(|t| {
                        q.field("performed_at")
                            .greater_than_or_equal(FirestoreTimestamp(t))
                    }),
                    until.and_then(|t| q.field("performed_at").less_than(FirestoreTimestamp(t))),
                ])
            })
            .order_by([("performed_at", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(entries_named(docs, name))
    }

    // ─── Template Operations ─────────────────────────────────────

    pub async fn get_template(&self, template_id: &str) -> Result<Option<WorkoutTemplate>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::WORKOUT_TEMPLATES)
            .obj()
            .one(template_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or replace a user template.
    pub async fn set_template(&self, template: &WorkoutTemplate) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::WORKOUT_TEMPLATES)
            .document_id(&template.id)
            .object(template)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn delete_template(&self, template_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::WORKOUT_TEMPLATES)
            .document_id(template_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Templates created by a user, most recently updated first.
    pub async fn get_templates_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<WorkoutTemplate>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_TEMPLATES)
            .filter(|q| q.for_all([q.field("owner_id").eq(user_id)]))
            .order_by([("updated_at", FirestoreQueryDirection::Descending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Number of templates a user has created (for quota checks).
    pub async fn count_templates_for_user(&self, user_id: &str) -> Result<usize, AppError> {
        let templates: Vec<WorkoutTemplate> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::WORKOUT_TEMPLATES)
            .filter(|q| q.for_all([q.field("owner_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(templates.len())
    }

    // ─── Helper Methods ────────────────────────────────────────────

    /// Helper to batch delete documents using transactions.
    async fn batch_delete<T, F>(
        &self,
        items: &[T],
        collection: &str,
        id_extractor: F,
    ) -> Result<(), AppError>
    where
        F: Fn(&T) -> String,
    {
        let client = self.get_client()?;

        for chunk in items.chunks(BATCH_SIZE) {
            let mut transaction = client
                .begin_transaction()
                .await
                .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))?;

            for item in chunk {
                let doc_id = id_extractor(item);
                client
                    .fluent()
                    .delete()
                    .from(collection)
                    .document_id(&doc_id)
                    .add_to_transaction(&mut transaction)
                    .map_err(|e| {
                        AppError::Database(format!(
                            "Failed to add deletion to transaction for {}: {}",
                            collection, e
                        ))
                    })?;
            }

            transaction.commit().await.map_err(|e| {
                AppError::Database(format!("Failed to commit batch deletion: {}", e))
            })?;
        }

        Ok(())
    }

    // ─── Account Deletion ──────────────────────────────────────────

    /// Delete ALL data for a user.
    ///
    /// Removes the user's exercises, their templates and the user document.
    /// Returns the number of documents deleted.
    pub async fn delete_user_data(&self, user_id: &str) -> Result<usize, AppError> {
        let mut deleted_count = 0;

        // 1. Exercises
        let exercises: Vec<ExerciseDocument> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::EXERCISES)
            .filter(|q| q.for_all([q.field("user_id").eq(user_id)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let count = exercises.len();
        self.batch_delete(&exercises, collections::EXERCISES, |doc: &ExerciseDocument| {
            doc.id.clone()
        })
        .await?;

        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted exercises");

        // 2. Templates
        let templates = self.get_templates_for_user(user_id).await?;

        let count = templates.len();
        self.batch_delete(
            &templates,
            collections::WORKOUT_TEMPLATES,
            |template: &WorkoutTemplate| template.id.clone(),
        )
        .await?;

        deleted_count += count;
        tracing::debug!(user_id, count, "Deleted templates");

        // 3. User profile
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::USERS)
            .document_id(user_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        deleted_count += 1;
        tracing::debug!(user_id, "Deleted user profile");

        tracing::info!(user_id, deleted_count, "User data deletion complete");

        Ok(deleted_count)
    }
}
