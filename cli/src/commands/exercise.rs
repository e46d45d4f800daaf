use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use liftbook_core::db::{Database, OrderBy};
use liftbook_core::live::LiveQuery;
use liftbook_core::models::{
    Exercise, ExerciseResult, NewExercise, NewExerciseResult, RestTimer,
};
use liftbook_core::schema::Status;
use liftbook_core::service::{
    LiftbookService, delete_exercise, delete_exercise_result, get_record, live_dashboard,
    live_table, save_exercise, save_exercise_result, set_child_status, set_parent_status,
};

use super::helpers::{
    format_sets, format_status, format_timestamp, parse_input, parse_sets, parse_status, truncate,
};

#[derive(Tabled)]
struct ExerciseRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Last")]
    last: String,
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Sets")]
    set_count: usize,
    #[tabled(rename = "Detail")]
    detail: String,
    #[tabled(rename = "Status")]
    status: String,
}

fn result_row(r: &ExerciseResult) -> ResultRow {
    ResultRow {
        id: r.id.clone(),
        date: format_timestamp(r.created_at),
        set_count: r.set_count(),
        detail: truncate(&r.sets().map(|s| format_sets(&s)).unwrap_or_default(), 48),
        status: format_status(&r.status),
    }
}

pub(crate) fn cmd_exercise_add(
    svc: &LiftbookService,
    name: String,
    desc: Option<String>,
    input: &str,
    sets: Option<u32>,
    rest: Option<u32>,
    json: bool,
) -> Result<()> {
    let exercise = Exercise::new(NewExercise {
        name: Some(name),
        desc,
        inputs: Some(parse_input(input)?),
        initial_set_count: sets,
        rest_timer: rest.map(|s| RestTimer {
            default_duration_seconds: s,
        }),
        ..Default::default()
    });
    save_exercise(svc.db(), &exercise)?;
    svc.logger().info(svc.db(), format!("Created exercise {}", exercise.name));

    if json {
        println!("{}", serde_json::to_string_pretty(&exercise)?);
    } else {
        println!("Created exercise '{}' ({})", exercise.name, exercise.id);
        println!("  Input: {}, {} set(s)", exercise.inputs, exercise.initial_set_count);
    }
    Ok(())
}

/// Dashboard order without hidden exercises, or every exercise by name.
async fn load_exercises(db: &Database, all: bool) -> Result<Vec<Exercise>> {
    let mut query: LiveQuery<Exercise> = if all {
        live_table(db, OrderBy::Name)
    } else {
        live_dashboard(db)
    };
    let exercises = query.next(db).await.transpose()?.unwrap_or_default();
    query.unsubscribe();
    Ok(exercises)
}

pub(crate) async fn cmd_exercise_list(db: &Database, all: bool, json: bool) -> Result<()> {
    let exercises = load_exercises(db, all).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exercises)?);
    } else if exercises.is_empty() {
        eprintln!("No exercises found. Use `liftbook exercise add` to create one.");
    } else {
        let rows: Vec<ExerciseRow> = exercises
            .iter()
            .map(|e| ExerciseRow {
                id: e.id.clone(),
                name: truncate(&e.name, 32),
                input: e.inputs.to_string(),
                status: format_status(&e.status),
                last: e
                    .last_child
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |r| format_timestamp(r.created_at)),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

pub(crate) fn cmd_exercise_show(db: &Database, id: &str, json: bool) -> Result<()> {
    let exercise: Exercise = get_record(db, id)?;
    let results: Vec<ExerciseResult> = db.children(id)?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "exercise": exercise,
                "results": results,
            }))?
        );
        return Ok(());
    }

    println!("{} ({})", exercise.name, exercise.id);
    if !exercise.desc.is_empty() {
        println!("  {}", exercise.desc);
    }
    println!("  Input: {}", exercise.inputs);
    println!("  Initial sets: {}", exercise.initial_set_count);
    if let Some(timer) = &exercise.rest_timer {
        println!("  Rest timer: {}s", timer.default_duration_seconds);
    }
    if !exercise.status.is_empty() {
        println!("  Status: {}", format_status(&exercise.status));
    }
    println!("  Created: {}", format_timestamp(exercise.created_at));

    if results.is_empty() {
        eprintln!("No results logged yet. Use `liftbook exercise log {id}`.");
    } else {
        let rows: Vec<ResultRow> = results.iter().map(result_row).collect();
        let table = Table::new(&rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(2..3)).with(Alignment::right()))
            .to_string();
        println!("{table}");
    }
    Ok(())
}

pub(crate) fn cmd_exercise_status(
    db: &Database,
    id: &str,
    flag: &str,
    off: bool,
    json: bool,
) -> Result<()> {
    let flag: Status = parse_status(flag)?;
    let exercise: Exercise = set_parent_status(db, id, flag, !off)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&exercise)?);
    } else {
        let status = format_status(&exercise.status);
        println!(
            "{}: {}",
            exercise.name,
            if status.is_empty() { "no status" } else { &status }
        );
    }
    Ok(())
}

pub(crate) fn cmd_exercise_delete(svc: &LiftbookService, id: &str, json: bool) -> Result<()> {
    let exercise: Exercise = get_record(svc.db(), id)?;
    let removed = delete_exercise(svc.db(), id)?;
    svc.logger().info(svc.db(), format!("Deleted exercise {}", exercise.name));

    if json {
        println!(
            "{}",
            serde_json::json!({ "deleted": id, "resultsDeleted": removed })
        );
    } else {
        println!("Deleted exercise '{}' and {removed} result(s)", exercise.name);
    }
    Ok(())
}

pub(crate) fn cmd_exercise_log(
    db: &Database,
    id: &str,
    sets: &[String],
    note: Option<String>,
    json: bool,
) -> Result<()> {
    let exercise: Exercise = get_record(db, id)?;
    let sets = parse_sets(exercise.inputs, sets)?;
    let result = ExerciseResult::new(NewExerciseResult {
        note,
        ..NewExerciseResult::new(exercise.id.clone(), sets)
    });
    save_exercise_result(db, &result)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "Logged {} set(s) for '{}' ({})",
            result.set_count(),
            exercise.name,
            result.id
        );
        if let Some(sets) = result.sets() {
            println!("  {}", format_sets(&sets));
        }
    }
    Ok(())
}

pub(crate) fn cmd_exercise_result_status(
    db: &Database,
    id: &str,
    flag: &str,
    off: bool,
    json: bool,
) -> Result<()> {
    let flag = parse_status(flag)?;
    let result = set_child_status::<Exercise>(db, id, flag, !off)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let table = Table::new([result_row(&result)]).with(Style::rounded()).to_string();
        println!("{table}");
    }
    Ok(())
}

pub(crate) fn cmd_exercise_result_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    delete_exercise_result(db, id)?;

    if json {
        println!("{}", serde_json::json!({ "deleted": id }));
    } else {
        println!("Deleted exercise result {id}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weight_exercise(svc: &LiftbookService) -> Exercise {
        cmd_exercise_add(svc, "Squat".to_string(), None, "weight", Some(3), Some(120), true)
            .unwrap();
        let exercises: Vec<Exercise> = svc.db().all(OrderBy::Insertion).unwrap();
        exercises.into_iter().next().unwrap()
    }

    #[test]
    fn test_add_and_log_exercise() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let exercise = weight_exercise(&svc);
        assert_eq!(exercise.name, "Squat");
        assert_eq!(exercise.initial_set_count, 3);

        let sets = vec!["100x5@8".to_string(), "105x3".to_string()];
        cmd_exercise_log(svc.db(), &exercise.id, &sets, Some("felt good".into()), true).unwrap();

        let stored: Exercise = get_record(svc.db(), &exercise.id).unwrap();
        let last = stored.last_child.unwrap();
        assert_eq!(last.set_count(), 2);
        assert_eq!(last.note, "felt good");
    }

    #[test]
    fn test_log_rejects_wrong_notation() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let exercise = weight_exercise(&svc);
        let sets = vec!["Stretch".to_string()];
        assert!(cmd_exercise_log(svc.db(), &exercise.id, &sets, None, true).is_err());
        assert_eq!(svc.db().count::<ExerciseResult>().unwrap(), 0);
    }

    #[test]
    fn test_status_and_delete() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let exercise = weight_exercise(&svc);
        cmd_exercise_status(svc.db(), &exercise.id, "favorited", false, true).unwrap();
        let stored: Exercise = get_record(svc.db(), &exercise.id).unwrap();
        assert_eq!(stored.status, vec![Status::Favorited]);

        cmd_exercise_log(svc.db(), &exercise.id, &["60x10".to_string()], None, true).unwrap();
        cmd_exercise_delete(&svc, &exercise.id, true).unwrap();
        assert_eq!(svc.db().count::<Exercise>().unwrap(), 0);
        assert_eq!(svc.db().count::<ExerciseResult>().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_list_hides_hidden_unless_all() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let exercise = weight_exercise(&svc);
        cmd_exercise_add(&svc, "bench".to_string(), None, "weight", None, None, true).unwrap();
        cmd_exercise_status(svc.db(), &exercise.id, "hidden", false, true).unwrap();

        let visible = load_exercises(svc.db(), false).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "bench");

        let all = load_exercises(svc.db(), true).await.unwrap();
        let names: Vec<&str> = all.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["bench", "Squat"]);
    }

    #[test]
    fn test_unknown_exercise_is_an_error() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let err = cmd_exercise_show(svc.db(), "exs-missing", true).unwrap_err();
        assert!(err.to_string().contains("exs-missing"));
    }
}
