use anyhow::{Result, bail};
use tabled::{Table, Tabled, settings::Style};

use liftbook_core::db::{Database, OrderBy};
use liftbook_core::live::LiveQuery;
use liftbook_core::models::{Exercise, ExerciseGroup, NewWorkout, Workout, WorkoutResult, now_ms};
use liftbook_core::service::{
    LiftbookService, delete_workout, delete_workout_result, finish_workout, get_record,
    live_dashboard, live_table, save_workout, save_workout_result, set_parent_status,
    start_workout,
};

use super::helpers::{format_status, format_timestamp, parse_groups, parse_status, truncate};

#[derive(Tabled)]
struct WorkoutRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Exercises")]
    exercises: usize,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last")]
    last: String,
}

#[derive(Tabled)]
struct SessionRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Finished")]
    finished: String,
    #[tabled(rename = "Note")]
    note: String,
}

fn session_row(r: &WorkoutResult) -> SessionRow {
    SessionRow {
        id: r.id.clone(),
        started: format_timestamp(r.created_at),
        finished: r
            .finished_at
            .map_or_else(|| "in progress".to_string(), format_timestamp),
        note: truncate(&r.note, 40),
    }
}

/// Every referenced exercise must exist.
fn check_exercises(db: &Database, groups: &[&[ExerciseGroup]]) -> Result<()> {
    for id in groups
        .iter()
        .flat_map(|g| g.iter())
        .flat_map(|g| &g.exercise_ids)
    {
        if db.get::<Exercise>(id)?.is_none() {
            bail!("No exercise with ID {id}");
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_workout_add(
    svc: &LiftbookService,
    name: String,
    desc: Option<String>,
    warmup: &[String],
    exercises: &[String],
    cooldown: &[String],
    next: Vec<String>,
    json: bool,
) -> Result<()> {
    let workout = Workout::new(NewWorkout {
        name: Some(name),
        desc,
        warmup_groups: parse_groups(warmup),
        exercise_groups: parse_groups(exercises),
        cooldown_groups: parse_groups(cooldown),
        next_workout_ids: next,
        ..Default::default()
    });
    check_exercises(
        svc.db(),
        &[
            workout.warmup_groups.as_slice(),
            workout.exercise_groups.as_slice(),
            workout.cooldown_groups.as_slice(),
        ],
    )?;
    save_workout(svc.db(), &workout)?;
    svc.logger().info(svc.db(), format!("Created workout {}", workout.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&workout)?);
    } else {
        println!("Created workout '{}' ({})", workout.name, workout.id);
        println!("  {} exercise(s)", workout.exercise_ids().len());
    }
    Ok(())
}

async fn load_workouts(db: &Database, all: bool) -> Result<Vec<Workout>> {
    let mut query: LiveQuery<Workout> = if all {
        live_table(db, OrderBy::Name)
    } else {
        live_dashboard(db)
    };
    let workouts = query.next(db).await.transpose()?.unwrap_or_default();
    query.unsubscribe();
    Ok(workouts)
}

pub(crate) async fn cmd_workout_list(db: &Database, all: bool, json: bool) -> Result<()> {
    let workouts = load_workouts(db, all).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workouts)?);
    } else if workouts.is_empty() {
        eprintln!("No workouts found. Use `liftbook workout add` to create one.");
    } else {
        let rows: Vec<WorkoutRow> = workouts
            .iter()
            .map(|w| WorkoutRow {
                id: w.id.clone(),
                name: truncate(&w.name, 32),
                exercises: w.exercise_ids().len(),
                status: format_status(&w.status),
                last: w
                    .last_child
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |r| format_timestamp(r.created_at)),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

fn print_groups(db: &Database, label: &str, groups: &[ExerciseGroup]) -> Result<()> {
    if groups.is_empty() {
        return Ok(());
    }
    println!("  {label}:");
    for group in groups {
        let mut names = Vec::with_capacity(group.exercise_ids.len());
        for id in &group.exercise_ids {
            let name = db
                .get::<Exercise>(id)?
                .map_or_else(|| format!("<missing {id}>"), |e| e.name);
            names.push(name);
        }
        let marker = if group.is_superset() { "superset: " } else { "" };
        println!("    - {marker}{}", names.join(" + "));
    }
    Ok(())
}

pub(crate) fn cmd_workout_show(db: &Database, id: &str, json: bool) -> Result<()> {
    let workout: Workout = get_record(db, id)?;
    let sessions: Vec<WorkoutResult> = db.children(id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "workout": workout,
                "results": sessions,
            }))?
        );
        return Ok(());
    }

    println!("{} ({})", workout.name, workout.id);
    if !workout.desc.is_empty() {
        println!("  {}", workout.desc);
    }
    if !workout.status.is_empty() {
        println!("  Status: {}", format_status(&workout.status));
    }
    print_groups(db, "Warmup", &workout.warmup_groups)?;
    print_groups(db, "Exercises", &workout.exercise_groups)?;
    print_groups(db, "Cooldown", &workout.cooldown_groups)?;

    if sessions.is_empty() {
        eprintln!("No sessions yet. Use `liftbook workout start {id}`.");
    } else {
        let rows: Vec<SessionRow> = sessions.iter().map(session_row).collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

pub(crate) fn cmd_workout_status(
    db: &Database,
    id: &str,
    flag: &str,
    off: bool,
    json: bool,
) -> Result<()> {
    let flag = parse_status(flag)?;
    let workout: Workout = set_parent_status(db, id, flag, !off)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workout)?);
    } else {
        let status = format_status(&workout.status);
        println!(
            "{}: {}",
            workout.name,
            if status.is_empty() { "no status" } else { &status }
        );
    }
    Ok(())
}

pub(crate) fn cmd_workout_delete(svc: &LiftbookService, id: &str, json: bool) -> Result<()> {
    let workout: Workout = get_record(svc.db(), id)?;
    let removed = delete_workout(svc.db(), id)?;
    svc.logger().info(svc.db(), format!("Deleted workout {}", workout.name));

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": id, "resultsDeleted": removed })
        );
    } else {
        println!("Deleted workout '{}' and {removed} session(s)", workout.name);
    }
    Ok(())
}

pub(crate) fn cmd_workout_start(db: &Database, id: &str, json: bool) -> Result<()> {
    let session = start_workout(db, id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        println!("Started session {}", session.id);
        println!("  Finish with `liftbook workout finish {}`", session.id);
    }
    Ok(())
}

pub(crate) fn cmd_workout_finish(
    svc: &LiftbookService,
    result_id: &str,
    note: Option<String>,
    json: bool,
) -> Result<()> {
    let current: WorkoutResult = get_record(svc.db(), result_id)?;
    if current.is_finished() {
        bail!("Session {result_id} is already finished");
    }
    let mut session = finish_workout(svc.db(), result_id, now_ms())?;
    if let Some(note) = note {
        session.note = note;
        save_workout_result(svc.db(), &session)?;
    }
    svc.logger().info(svc.db(), "Finished workout");

    if json {
        println!("{}", serde_json::to_string_pretty(&session)?);
    } else {
        let minutes = (session.finished_at.unwrap_or(session.created_at) - session.created_at)
            / 60_000;
        println!("Finished session {} after {minutes} min", session.id);
    }
    Ok(())
}

pub(crate) fn cmd_workout_result_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    delete_workout_result(db, id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted workout session {id}");
    }
    Ok(())
}
