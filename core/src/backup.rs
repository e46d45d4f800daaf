use serde::{Deserialize, Serialize};

use crate::db::{APP_NAME, Batch, DATABASE_VERSION, Database, OrderBy};
use crate::error::{Result, ValidationError};
use crate::models::{
    Exercise, ExerciseResult, Log, Measurement, Plan, Record, Setting, Timestamp, Workout,
    WorkoutResult, now_ms,
};

/// Point-in-time snapshot of every table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub app_name: String,
    pub database_version: String,
    pub created_at: Timestamp,
    #[serde(default)]
    pub settings: Vec<Setting>,
    #[serde(default)]
    pub logs: Vec<Log>,
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(default)]
    pub measurements: Vec<Measurement>,
    #[serde(default)]
    pub workouts: Vec<Workout>,
    #[serde(default)]
    pub workout_results: Vec<WorkoutResult>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub exercise_results: Vec<ExerciseResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub settings_imported: usize,
    pub logs_imported: usize,
    pub plans_imported: usize,
    pub measurements_imported: usize,
    pub workouts_imported: usize,
    pub workout_results_imported: usize,
    pub exercises_imported: usize,
    pub exercise_results_imported: usize,
}

impl ImportSummary {
    #[must_use]
    pub fn total(&self) -> usize {
        self.settings_imported
            + self.logs_imported
            + self.plans_imported
            + self.measurements_imported
            + self.workouts_imported
            + self.workout_results_imported
            + self.exercises_imported
            + self.exercise_results_imported
    }
}

pub fn export_backup(db: &Database) -> Result<Backup> {
    let backup = Backup {
        app_name: APP_NAME.to_string(),
        database_version: DATABASE_VERSION.to_string(),
        created_at: now_ms(),
        settings: db.all(OrderBy::Insertion)?,
        logs: db.all(OrderBy::CreatedAt)?,
        plans: db.all(OrderBy::Insertion)?,
        measurements: db.all(OrderBy::CreatedAt)?,
        workouts: db.all(OrderBy::Insertion)?,
        workout_results: db.all(OrderBy::CreatedAt)?,
        exercises: db.all(OrderBy::Insertion)?,
        exercise_results: db.all(OrderBy::CreatedAt)?,
    };
    tracing::info!(created_at = backup.created_at, "exported backup");
    Ok(backup)
}

/// Issues are reported as `<table>[<id>].<field>`.
fn collect<R: Record>(records: &[R], errors: &mut ValidationError) {
    for record in records {
        record.collect_issues(&format!("{}[{}]", R::TABLE, record.id()), errors);
    }
}

fn validate_backup(backup: &Backup) -> Result<(), ValidationError> {
    let mut errors = ValidationError::default();
    collect(&backup.settings, &mut errors);
    collect(&backup.logs, &mut errors);
    collect(&backup.plans, &mut errors);
    collect(&backup.measurements, &mut errors);
    collect(&backup.workouts, &mut errors);
    collect(&backup.workout_results, &mut errors);
    collect(&backup.exercises, &mut errors);
    collect(&backup.exercise_results, &mut errors);
    errors.into_result()
}

/// Validate every record, then upsert them all in one transaction. Nothing
/// is written if any record is invalid.
pub fn import_backup(db: &Database, backup: &Backup) -> Result<ImportSummary> {
    validate_backup(backup)?;
    if backup.database_version.parse::<i64>().ok() != Some(DATABASE_VERSION) {
        tracing::warn!(
            backup_version = %backup.database_version,
            current = DATABASE_VERSION,
            "importing backup from a different database version"
        );
    }

    let summary = db.batch(|batch| {
        Ok(ImportSummary {
            settings_imported: put_all(batch, &backup.settings)?,
            logs_imported: put_all(batch, &backup.logs)?,
            plans_imported: put_all(batch, &backup.plans)?,
            measurements_imported: put_all(batch, &backup.measurements)?,
            workouts_imported: put_all(batch, &backup.workouts)?,
            workout_results_imported: put_all(batch, &backup.workout_results)?,
            exercises_imported: put_all(batch, &backup.exercises)?,
            exercise_results_imported: put_all(batch, &backup.exercise_results)?,
        })
    })?;
    tracing::info!(records = summary.total(), "imported backup");
    Ok(summary)
}

fn put_all<R: Record>(batch: &mut Batch<'_>, records: &[R]) -> Result<usize> {
    for record in records {
        batch.put(record)?;
    }
    Ok(records.len())
}
