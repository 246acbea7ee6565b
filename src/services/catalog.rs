// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exercise library and pre-built template catalog.
//!
//! Both are read-only reference data shipped as JSON files and loaded once
//! at startup.

use crate::models::library::{ExerciseLibraryItem, LibraryFilter};
use crate::models::template::WorkoutTemplate;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// In-memory catalog shared across requests.
#[derive(Default, Clone)]
pub struct CatalogService {
    library: Arc<Vec<ExerciseLibraryItem>>,
    templates: Arc<Vec<WorkoutTemplate>>,
}

impl CatalogService {
    /// Load the library and pre-built templates from JSON files.
    pub fn load_from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        library_path: P,
        templates_path: Q,
    ) -> Result<Self, CatalogError> {
        let library = fs::read_to_string(library_path.as_ref())
            .map_err(|e| CatalogError::IoError(e.to_string()))?;
        let templates = fs::read_to_string(templates_path.as_ref())
            .map_err(|e| CatalogError::IoError(e.to_string()))?;
        Self::load_from_json(&library, &templates)
    }

    /// Load the catalog from JSON strings (arrays of items / templates).
    pub fn load_from_json(library_json: &str, templates_json: &str) -> Result<Self, CatalogError> {
        let mut library: Vec<ExerciseLibraryItem> = serde_json::from_str(library_json)
            .map_err(|e| CatalogError::ParseError(format!("exercise library: {}", e)))?;
        let mut templates: Vec<WorkoutTemplate> = serde_json::from_str(templates_json)
            .map_err(|e| CatalogError::ParseError(format!("pre-built templates: {}", e)))?;

        ensure_unique_ids(library.iter().map(|i| i.id.as_str()))?;
        ensure_unique_ids(templates.iter().map(|t| t.id.as_str()))?;

        library.sort_by(|a, b| a.name.cmp(&b.name));
        for template in &mut templates {
            template.is_prebuilt = true;
            template.owner_id = None;
        }

        tracing::info!(
            exercises = library.len(),
            templates = templates.len(),
            "Loaded catalog"
        );

        Ok(Self {
            library: Arc::new(library),
            templates: Arc::new(templates),
        })
    }

    /// All library exercises, sorted by name.
    pub fn library(&self) -> &[ExerciseLibraryItem] {
        &self.library
    }

    /// Library exercises matching every set filter.
    pub fn search(&self, filter: &LibraryFilter) -> Vec<ExerciseLibraryItem> {
        self.library
            .iter()
            .filter(|item| filter.matches(item))
            .cloned()
            .collect()
    }

    pub fn library_item(&self, id: &str) -> Option<&ExerciseLibraryItem> {
        self.library.iter().find(|item| item.id == id)
    }

    pub fn prebuilt_templates(&self) -> &[WorkoutTemplate] {
        &self.templates
    }

    pub fn prebuilt_template(&self, id: &str) -> Option<&WorkoutTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }
}

fn ensure_unique_ids<'a>(ids: impl Iterator<Item = &'a str>) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId(id.to_string()));
        }
    }
    Ok(())
}

/// Errors from catalog loading.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("Failed to read file: {0}")]
    IoError(String),

    #[error("Failed to parse catalog: {0}")]
    ParseError(String),

    #[error("Duplicate catalog id: {0}")]
    DuplicateId(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::exercise::ExerciseCategory;
    use crate::models::library::Difficulty;

    const LIBRARY: &str = r#"[
        {"id": "squat", "name": "Barbell Back Squat", "category": "strength", "muscle": "quadriceps",
         "difficulty": "intermediate", "equipment": "barbell", "description": "Squat with a bar on the upper back."},
        {"id": "push-up", "name": "Push-Up", "category": "strength", "muscle": "chest",
         "difficulty": "beginner", "equipment": "none", "description": "Bodyweight press."},
        {"id": "run", "name": "Easy Run", "category": "cardio", "muscle": "legs",
         "difficulty": "beginner", "equipment": "none", "description": "Conversational pace run."}
    ]"#;

    const TEMPLATES: &str = r#"[
        {"id": "prebuilt-full-body", "name": "Full Body", "owner_id": "someone",
         "exercises": [{"name": "Push-Up", "category": "strength", "target_sets": 3, "target_reps": 10}]}
    ]"#;

    #[test]
    fn test_load_marks_templates_prebuilt() {
        let catalog = CatalogService::load_from_json(LIBRARY, TEMPLATES).unwrap();

        let template = catalog.prebuilt_template("prebuilt-full-body").unwrap();
        assert!(template.is_prebuilt);
        assert_eq!(template.owner_id, None);
        assert_eq!(catalog.library()[0].name, "Barbell Back Squat");
    }

    #[test]
    fn test_search_filters() {
        let catalog = CatalogService::load_from_json(LIBRARY, TEMPLATES).unwrap();

        let bodyweight = catalog.search(&LibraryFilter {
            equipment: Some("None".to_string()),
            ..Default::default()
        });
        assert_eq!(bodyweight.len(), 2);

        let beginner_strength = catalog.search(&LibraryFilter {
            category: Some(ExerciseCategory::Strength),
            difficulty: Some(Difficulty::Beginner),
            ..Default::default()
        });
        assert_eq!(beginner_strength.len(), 1);
        assert_eq!(beginner_strength[0].id, "push-up");

        let text = catalog.search(&LibraryFilter {
            q: Some("upper back".to_string()),
            ..Default::default()
        });
        assert_eq!(text.len(), 1);
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let dup = r#"[
            {"id": "a", "name": "A", "category": "strength", "muscle": "x", "difficulty": "beginner", "equipment": "none", "description": ""},
            {"id": "a", "name": "B", "category": "strength", "muscle": "x", "difficulty": "beginner", "equipment": "none", "description": ""}
        ]"#;
        assert!(matches!(
            CatalogService::load_from_json(dup, "[]"),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_default_is_empty() {
        let catalog = CatalogService::default();
        assert!(catalog.library().is_empty());
        assert!(catalog.prebuilt_template("anything").is_none());
    }

    #[test]
    fn test_bundled_catalog_parses() {
        let library = include_str!("../../data/exercise_library.json");
        let templates = include_str!("../../data/prebuilt_templates.json");

        let catalog = CatalogService::load_from_json(library, templates).unwrap();
        assert!(!catalog.library().is_empty());
        assert!(!catalog.prebuilt_templates().is_empty());
    }
}
