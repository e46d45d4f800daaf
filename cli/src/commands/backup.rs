use std::path::Path;

use anyhow::{Context, Result};

use liftbook_core::backup::{Backup, export_backup, import_backup};
use liftbook_core::service::LiftbookService;

/// Writes to `path`, or to stdout when `path` is `-`.
pub(crate) fn cmd_backup_export(svc: &LiftbookService, path: &Path, json: bool) -> Result<()> {
    let backup = export_backup(svc.db())?;
    let contents = serde_json::to_string_pretty(&backup)?;

    if path == Path::new("-") {
        println!("{contents}");
        return Ok(());
    }

    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write backup: {}", path.display()))?;
    svc.logger().info(svc.db(), "Exported backup");

    let records = backup.settings.len()
        + backup.logs.len()
        + backup.plans.len()
        + backup.measurements.len()
        + backup.workouts.len()
        + backup.workout_results.len()
        + backup.exercises.len()
        + backup.exercise_results.len();
    if json {
        println!(
            "{}",
            serde_json::json!({ "path": path.display().to_string(), "records": records })
        );
    } else {
        println!("Exported {records} record(s) to {}", path.display());
    }
    Ok(())
}

pub(crate) fn cmd_backup_import(svc: &LiftbookService, path: &Path, json: bool) -> Result<()> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup: {}", path.display()))?;
    let backup: Backup = serde_json::from_str(&contents)
        .with_context(|| format!("Not a valid backup file: {}", path.display()))?;

    let summary = match import_backup(svc.db(), &backup) {
        Ok(summary) => summary,
        Err(e) => {
            svc.logger().error(svc.db(), "Backup import failed", &e);
            return Err(e.into());
        }
    };
    svc.logger().info(svc.db(), "Imported backup");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("Imported {} record(s):", summary.total());
        println!("  Settings:          {}", summary.settings_imported);
        println!("  Logs:              {}", summary.logs_imported);
        println!("  Plans:             {}", summary.plans_imported);
        println!("  Measurements:      {}", summary.measurements_imported);
        println!("  Workouts:          {}", summary.workouts_imported);
        println!("  Workout results:   {}", summary.workout_results_imported);
        println!("  Exercises:         {}", summary.exercises_imported);
        println!("  Exercise results:  {}", summary.exercise_results_imported);
    }
    Ok(())
}
