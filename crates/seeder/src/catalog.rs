use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use storage::repository::exercise::ExerciseRepository;
use tracing::{debug, info, warn};

use crate::{Result, SeederError};

pub const CATALOG_FORMAT_VERSION: &str = "1.0.0";

const MAX_NAME_LEN: usize = 100;
const MAX_MUSCLE_GROUPS: usize = 10;
const MAX_EQUIPMENT_LEN: usize = 50;

/// On-disk shape of the global exercise catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    pub format_version: String,
    pub exercises: Vec<CatalogExercise>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogExercise {
    pub name: String,
    pub muscle_groups: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<String>,
}

impl CatalogExercise {
    /// Lowercased, trimmed, deduplicated muscle groups in file order
    pub fn normalized_muscle_groups(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.muscle_groups
            .iter()
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty() && seen.insert(g.clone()))
            .collect()
    }
}

pub struct CatalogValidator;

impl CatalogValidator {
    pub fn validate(catalog: &CatalogFile) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if catalog.format_version != CATALOG_FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                catalog.format_version, CATALOG_FORMAT_VERSION
            ));
        }

        if catalog.exercises.is_empty() {
            report
                .errors
                .push("At least one exercise is required".to_string());
        }

        let mut names = HashSet::new();
        for (idx, exercise) in catalog.exercises.iter().enumerate() {
            let name = exercise.name.trim();
            let label = format!("{}. {}", idx + 1, name);

            if name.is_empty() {
                report
                    .errors
                    .push(format!("Exercise #{} has an empty name", idx + 1));
            } else if name.chars().count() > MAX_NAME_LEN {
                report.errors.push(format!(
                    "Exercise '{}' name exceeds {} characters",
                    label, MAX_NAME_LEN
                ));
            }

            if !name.is_empty() && !names.insert(name.to_lowercase()) {
                report
                    .errors
                    .push(format!("Duplicate exercise name: '{}'", name));
            }

            let groups = exercise.normalized_muscle_groups();
            if groups.is_empty() {
                report
                    .errors
                    .push(format!("Exercise '{}' has no muscle groups", label));
            } else if groups.len() > MAX_MUSCLE_GROUPS {
                report.errors.push(format!(
                    "Exercise '{}' has {} muscle groups, at most {} allowed",
                    label,
                    groups.len(),
                    MAX_MUSCLE_GROUPS
                ));
            }
            if groups.len() < exercise.muscle_groups.len() {
                report.warnings.push(format!(
                    "Exercise '{}' lists blank or duplicate muscle groups",
                    label
                ));
            }

            match exercise.equipment.as_deref().map(str::trim) {
                None | Some("") => report
                    .warnings
                    .push(format!("Exercise '{}' has no equipment", label)),
                Some(equipment) if equipment.chars().count() > MAX_EQUIPMENT_LEN => {
                    report.errors.push(format!(
                        "Exercise '{}' equipment exceeds {} characters",
                        label, MAX_EQUIPMENT_LEN
                    ))
                }
                Some(_) => {}
            }
        }

        if !report.errors.is_empty() {
            Err(SeederError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("{}", warning);
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub updated: usize,
}

/// Loads catalog exercises, inserting new names and refreshing existing ones.
pub struct CatalogSeeder<'a> {
    pool: &'a PgPool,
}

impl<'a> CatalogSeeder<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn seed(&self, catalog: &CatalogFile) -> Result<SeedSummary> {
        let repo = ExerciseRepository::new(self.pool);
        let mut summary = SeedSummary::default();

        for exercise in &catalog.exercises {
            let name = exercise.name.trim();
            let equipment = exercise
                .equipment
                .as_deref()
                .map(str::trim)
                .filter(|e| !e.is_empty());

            let inserted = repo
                .upsert_catalog(name, &exercise.normalized_muscle_groups(), equipment)
                .await?;

            if inserted {
                debug!("Inserted exercise: {}", name);
                summary.inserted += 1;
            } else {
                debug!("Updated exercise: {}", name);
                summary.updated += 1;
            }
        }

        info!(
            "Catalog seeded: {} inserted, {} updated",
            summary.inserted, summary.updated
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exercise(name: &str, groups: &[&str], equipment: Option<&str>) -> CatalogExercise {
        CatalogExercise {
            name: name.to_string(),
            muscle_groups: groups.iter().map(|g| g.to_string()).collect(),
            equipment: equipment.map(String::from),
        }
    }

    fn catalog(exercises: Vec<CatalogExercise>) -> CatalogFile {
        CatalogFile {
            format_version: CATALOG_FORMAT_VERSION.to_string(),
            exercises,
        }
    }

    #[test]
    fn test_valid_catalog() {
        let file = catalog(vec![
            exercise("Bench Press", &["chest", "triceps"], Some("barbell")),
            exercise("Pull Up", &["back", "biceps"], Some("bodyweight")),
        ]);

        let report = CatalogValidator::validate(&file).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_duplicate_names_ignore_case() {
        let file = catalog(vec![
            exercise("Squat", &["quads"], Some("barbell")),
            exercise("squat ", &["glutes"], Some("barbell")),
        ]);

        let err = CatalogValidator::validate(&file).unwrap_err();
        assert!(err.to_string().contains("Duplicate exercise name"));
    }

    #[test]
    fn test_wrong_version_and_empty_list() {
        let file = CatalogFile {
            format_version: "0.9.0".to_string(),
            exercises: vec![],
        };

        let err = CatalogValidator::validate(&file).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 error(s)"));
    }

    #[test]
    fn test_muscle_group_rules() {
        let none = catalog(vec![exercise("Plank", &["  "], None)]);
        assert!(CatalogValidator::validate(&none).is_err());

        let groups: Vec<String> = (0..11).map(|i| format!("group-{i}")).collect();
        let refs: Vec<&str> = groups.iter().map(String::as_str).collect();
        let too_many = catalog(vec![exercise("Burpee", &refs, None)]);
        assert!(CatalogValidator::validate(&too_many).is_err());
    }

    #[test]
    fn test_missing_equipment_and_duplicate_groups_warn() {
        let file = catalog(vec![exercise("Plank", &["Core", "core"], None)]);

        let report = CatalogValidator::validate(&file).unwrap();
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_normalized_muscle_groups() {
        let ex = exercise("Deadlift", &[" Back", "hamstrings", "back", ""], None);
        assert_eq!(ex.normalized_muscle_groups(), vec!["back", "hamstrings"]);
    }

    #[test]
    fn test_parse_catalog_file() {
        let json = r#"{
            "format_version": "1.0.0",
            "exercises": [
                { "name": "Overhead Press", "muscle_groups": ["shoulders"], "equipment": "barbell" },
                { "name": "Push Up", "muscle_groups": ["chest"] }
            ]
        }"#;

        let file: CatalogFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.exercises.len(), 2);
        assert_eq!(file.exercises[1].equipment, None);
    }

    #[test]
    fn test_bundled_catalog_is_valid() {
        let file: CatalogFile =
            serde_json::from_str(include_str!("../data/exercises.json")).unwrap();
        assert!(CatalogValidator::validate(&file).is_ok());
    }
}
