use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;

pub use crate::collation::compare_names;
use crate::db::{Database, OrderBy};
use crate::error::{Error, Result, ValidationError};
use crate::live::LiveQuery;
use crate::logger::AppLogger;
use crate::models::{
    Exercise, ExerciseResult, ExerciseResultGroup, Flagged, Log, Measurement, NewExercise,
    NewWorkout, NewWorkoutResult, Parent, Plan, Record, Setting, Table, Timestamp, Workout,
    WorkoutResult,
};
use crate::schema::{SettingId, Status, Validate, decode};
use crate::settings::SettingsStore;

// --- Lookup ---

/// Fetch by id; a missing row is an error, not `None`.
pub fn get_record<R: Record>(db: &Database, id: &str) -> Result<R> {
    db.get(id)?.ok_or_else(|| Error::not_found(R::TABLE, id))
}

// --- Schema registry ---

/// Validator and default constructor for one table, operating on untyped
/// JSON candidates.
#[derive(Debug, Clone, Copy)]
pub struct ModelSchema {
    pub table: Table,
    pub validate: fn(&Value) -> Result<(), ValidationError>,
    /// Only tables whose records need no caller-supplied fields have one.
    pub create_default: Option<fn() -> serde_json::Result<Value>>,
}

impl ModelSchema {
    fn of<R: Record>(create_default: Option<fn() -> serde_json::Result<Value>>) -> Self {
        Self {
            table: R::TABLE,
            validate: validate_as::<R>,
            create_default,
        }
    }

    pub fn check(&self, candidate: &Value) -> Result<(), ValidationError> {
        (self.validate)(candidate)
    }
}

fn validate_as<R: Record>(candidate: &Value) -> Result<(), ValidationError> {
    decode::<R>(candidate).map(|_| ())
}

fn default_exercise() -> serde_json::Result<Value> {
    serde_json::to_value(Exercise::new(NewExercise::default()))
}

fn default_workout() -> serde_json::Result<Value> {
    serde_json::to_value(Workout::new(NewWorkout::default()))
}

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<Table, ModelSchema>,
}

impl SchemaRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every table wired to its record type.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(ModelSchema::of::<Setting>(None));
        registry.register(ModelSchema::of::<Log>(None));
        registry.register(ModelSchema::of::<Plan>(None));
        registry.register(ModelSchema::of::<Measurement>(None));
        registry.register(ModelSchema::of::<Exercise>(Some(default_exercise)));
        registry.register(ModelSchema::of::<ExerciseResult>(None));
        registry.register(ModelSchema::of::<Workout>(Some(default_workout)));
        registry.register(ModelSchema::of::<WorkoutResult>(None));
        registry
    }

    pub fn register(&mut self, schema: ModelSchema) {
        self.schemas.insert(schema.table, schema);
    }

    pub fn get(&self, table: Table) -> Result<ModelSchema> {
        self.schemas
            .get(&table)
            .copied()
            .ok_or(Error::UnknownTable(table))
    }
}

pub fn get_model_schema(table: Table) -> Result<ModelSchema> {
    SchemaRegistry::standard().get(table)
}

// --- Live queries ---

/// Locked, then favorited, then name ascending, then newest first.
pub fn dashboard_order<R: Flagged>(a: &R, b: &R) -> Ordering {
    b.has_status(Status::Locked)
        .cmp(&a.has_status(Status::Locked))
        .then_with(|| {
            b.has_status(Status::Favorited)
                .cmp(&a.has_status(Status::Favorited))
        })
        .then_with(|| compare_names(a.name().unwrap_or_default(), b.name().unwrap_or_default()))
        .then_with(|| b.created_at().cmp(&a.created_at()))
}

/// Every non-hidden record of `R`'s table in dashboard order.
pub fn dashboard<R: Flagged>(db: &Database) -> Result<Vec<R>> {
    let mut records: Vec<R> = db
        .all::<R>(OrderBy::Insertion)?
        .into_iter()
        .filter(|r| !r.has_status(Status::Hidden))
        .collect();
    records.sort_by(dashboard_order);
    Ok(records)
}

#[must_use]
pub fn live_dashboard<R: Flagged + 'static>(db: &Database) -> LiveQuery<R> {
    LiveQuery::new(db, [R::TABLE], dashboard::<R>)
}

#[must_use]
pub fn live_table<R: Record + 'static>(db: &Database, order: OrderBy) -> LiveQuery<R> {
    LiveQuery::new(db, [R::TABLE], move |db: &Database| db.all::<R>(order))
}

// --- Settings ---

/// Read every setting, default the missing ones, and write them all back.
/// Existing values are never changed.
pub fn initialize_settings(db: &Database) -> Result<Vec<Setting>> {
    let mut settings = Vec::with_capacity(SettingId::ALL.len());
    for id in SettingId::ALL {
        let setting = db
            .get::<Setting>(id.as_str())?
            .unwrap_or_else(|| Setting::with_default(*id));
        settings.push(setting);
    }
    db.batch(|batch| {
        for setting in &settings {
            batch.put(setting)?;
        }
        Ok(())
    })?;
    Ok(settings)
}

// --- Parents and children ---

/// Recompute `parent_id`'s cached last child: the newest child that is not
/// locked, or none.
pub fn update_last_child<P: Parent>(db: &Database, parent_id: &str) -> Result<Option<P::Child>> {
    let mut parent: P = get_record(db, parent_id)?;
    let last = db
        .children::<P::Child>(parent_id)?
        .into_iter()
        .filter(|child| !child.has_status(Status::Locked))
        .max_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
    parent.set_last_child(last.clone());
    db.put(&parent)?;
    tracing::debug!(
        table = %P::TABLE,
        parent_id,
        last_child = last.as_ref().map(Record::id),
        "updated last child"
    );
    Ok(last)
}

fn save_parent<P: Parent>(db: &Database, parent: &P) -> Result<()> {
    parent.validate()?;
    db.put(parent)?;
    update_last_child::<P>(db, parent.id())?;
    Ok(())
}

fn save_child<P: Parent>(db: &Database, child: &P::Child) -> Result<()> {
    child.validate()?;
    let parent_id = child.parent_id().unwrap_or_default();
    get_record::<P>(db, parent_id)?;

    let previous_parent = db
        .get::<P::Child>(child.id())?
        .and_then(|prev| prev.parent_id().map(str::to_string))
        .filter(|prev| prev != parent_id);

    db.put(child)?;
    update_last_child::<P>(db, parent_id)?;
    if let Some(previous) = previous_parent {
        refresh_parent::<P>(db, &previous)?;
    }
    Ok(())
}

/// Like [`update_last_child`], but a parent that no longer exists is skipped.
fn refresh_parent<P: Parent>(db: &Database, parent_id: &str) -> Result<()> {
    match update_last_child::<P>(db, parent_id) {
        Ok(_) | Err(Error::NotFound { .. }) => Ok(()),
        Err(e) => Err(e),
    }
}

fn delete_child<P: Parent>(db: &Database, id: &str) -> Result<()> {
    let child: P::Child = get_record(db, id)?;
    db.delete::<P::Child>(id)?;
    if let Some(parent_id) = child.parent_id() {
        refresh_parent::<P>(db, parent_id)?;
    }
    Ok(())
}

/// Delete a parent and every child pointing at it. Returns the number of
/// children removed.
fn delete_parent<P: Parent>(db: &Database, id: &str) -> Result<usize> {
    get_record::<P>(db, id)?;
    let removed = db.batch(|batch| {
        let removed = batch.delete_children::<P::Child>(id)?;
        batch.delete::<P>(id)?;
        Ok(removed)
    })?;
    tracing::info!(table = %P::TABLE, id, children = removed, "deleted with children");
    Ok(removed)
}

pub fn save_exercise(db: &Database, exercise: &Exercise) -> Result<()> {
    save_parent(db, exercise)
}

pub fn save_workout(db: &Database, workout: &Workout) -> Result<()> {
    save_parent(db, workout)
}

/// The result's set list must match its exercise's `inputs`.
pub fn save_exercise_result(db: &Database, result: &ExerciseResult) -> Result<()> {
    result.validate()?;
    let exercise: Exercise = get_record(db, &result.parent_id)?;
    if result.input_kind() != Some(exercise.inputs) {
        return Err(ValidationError::single(
            "sets",
            format!("sets must match the exercise input '{}'", exercise.inputs),
        )
        .into());
    }
    save_child::<Exercise>(db, result)
}

pub fn save_workout_result(db: &Database, result: &WorkoutResult) -> Result<()> {
    save_child::<Workout>(db, result)
}

pub fn delete_exercise_result(db: &Database, id: &str) -> Result<()> {
    delete_child::<Exercise>(db, id)
}

pub fn delete_workout_result(db: &Database, id: &str) -> Result<()> {
    delete_child::<Workout>(db, id)
}

pub fn delete_exercise(db: &Database, id: &str) -> Result<usize> {
    delete_parent::<Exercise>(db, id)
}

pub fn delete_workout(db: &Database, id: &str) -> Result<usize> {
    delete_parent::<Workout>(db, id)
}

/// Validate and persist a record with no parent/child bookkeeping.
pub fn save_record<R: Record>(db: &Database, record: &R) -> Result<()> {
    record.validate()?;
    db.put(record)
}

pub fn save_measurement(db: &Database, measurement: &Measurement) -> Result<()> {
    save_record(db, measurement)
}

pub fn save_plan(db: &Database, plan: &Plan) -> Result<()> {
    save_record(db, plan)
}

/// Add or clear a status flag on a parent record.
pub fn set_parent_status<P: Parent>(db: &Database, id: &str, flag: Status, on: bool) -> Result<P> {
    let mut parent: P = get_record(db, id)?;
    parent.set_status(flag, on);
    save_parent(db, &parent)?;
    Ok(parent)
}

/// Add or clear a status flag on a child; locking a child changes which one
/// its parent caches.
pub fn set_child_status<P: Parent>(
    db: &Database,
    id: &str,
    flag: Status,
    on: bool,
) -> Result<P::Child> {
    let mut child: P::Child = get_record(db, id)?;
    child.set_status(flag, on);
    save_child::<P>(db, &child)?;
    Ok(child)
}

// --- Workout sessions ---

fn empty_result_groups(groups: &[crate::models::ExerciseGroup]) -> Vec<ExerciseResultGroup> {
    groups
        .iter()
        .map(|g| ExerciseResultGroup {
            exercise_result_ids: vec![None; g.exercise_ids.len()],
        })
        .collect()
}

/// Start an in-progress result for `workout_id` with one empty slot per
/// planned exercise.
pub fn start_workout(db: &Database, workout_id: &str) -> Result<WorkoutResult> {
    let workout: Workout = get_record(db, workout_id)?;
    let result = WorkoutResult::new(
        workout_id,
        NewWorkoutResult {
            warmup_result_groups: empty_result_groups(&workout.warmup_groups),
            cooldown_result_groups: empty_result_groups(&workout.cooldown_groups),
            exercise_result_groups: empty_result_groups(&workout.exercise_groups),
            ..Default::default()
        },
    );
    save_workout_result(db, &result)?;
    Ok(result)
}

pub fn finish_workout(db: &Database, result_id: &str, finished_at: Timestamp) -> Result<WorkoutResult> {
    let mut result: WorkoutResult = get_record(db, result_id)?;
    result.finished_at = Some(finished_at);
    save_workout_result(db, &result)?;
    Ok(result)
}

// --- Facade ---

/// An opened database with settings loaded and the app logger configured
/// from them.
pub struct LiftbookService {
    db: Database,
    settings: SettingsStore,
    logger: AppLogger,
}

impl LiftbookService {
    pub fn new(db_path: &Path) -> Result<Self> {
        Self::with_database(Database::open(db_path)?)
    }

    pub fn new_in_memory() -> Result<Self> {
        Self::with_database(Database::open_in_memory()?)
    }

    fn with_database(db: Database) -> Result<Self> {
        let settings = SettingsStore::load(&db)?;
        let logger = AppLogger::from_settings(&settings);
        Ok(Self {
            db,
            settings,
            logger,
        })
    }

    #[must_use]
    pub fn db(&self) -> &Database {
        &self.db
    }

    #[must_use]
    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    #[must_use]
    pub fn logger(&self) -> &AppLogger {
        &self.logger
    }

    /// Persist a setting and keep the logger in step with Console Logs.
    pub fn set_setting(&mut self, id: SettingId, value: crate::models::SettingValue) -> Result<()> {
        self.settings.set(&self.db, id, value)?;
        self.logger = AppLogger::from_settings(&self.settings);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        NewExerciseResult, SetList, SettingValue, WeightSet, create_id, now_ms,
    };
    use crate::schema::{Duration, ExerciseInput};
    use serde_json::json;

    fn exercise(db: &Database, name: &str, status: Vec<Status>, created_at: i64) -> Exercise {
        let ex = Exercise::new(NewExercise {
            name: Some(name.to_string()),
            status,
            created_at: Some(created_at),
            inputs: Some(ExerciseInput::Weight),
            ..Default::default()
        });
        save_exercise(db, &ex).unwrap();
        ex
    }

    fn result_for(db: &Database, parent: &Exercise, created_at: i64, status: Vec<Status>) -> ExerciseResult {
        let mut params = NewExerciseResult::new(
            parent.id.clone(),
            SetList::Weight(vec![WeightSet {
                weight: 60.0,
                reps: 8,
                rpe: 7,
            }]),
        );
        params.created_at = Some(created_at);
        params.status = status;
        let result = ExerciseResult::new(params);
        save_exercise_result(db, &result).unwrap();
        result
    }

    #[test]
    fn test_get_record_not_found() {
        let db = Database::open_in_memory().unwrap();
        let err = get_record::<Workout>(&db, "wko-missing").unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound { table: Table::Workouts, ref id } if id == "wko-missing"
        ));
    }

    #[test]
    fn test_registry_lookup() {
        let schema = get_model_schema(Table::Settings).unwrap();
        assert!(schema.check(&json!({"id": "Advanced Mode", "value": false})).is_ok());
        assert!(schema.check(&json!({"id": "Advanced Mode", "value": "maybe"})).is_err());

        let logs = get_model_schema(Table::Logs).unwrap();
        assert!(
            logs.check(&json!({
                "id": create_id(Table::Logs),
                "createdAt": 1,
                "logLevel": "WARN",
                "label": "odd details",
                "details": [1, 2, 3],
            }))
            .is_ok()
        );

        let empty = SchemaRegistry::new();
        assert!(matches!(
            empty.get(Table::Workouts),
            Err(Error::UnknownTable(Table::Workouts))
        ));
    }

    #[test]
    fn test_registry_defaults_validate() {
        let registry = SchemaRegistry::standard();
        for table in Table::ALL {
            let schema = registry.get(*table).unwrap();
            if let Some(create) = schema.create_default {
                let value = create().unwrap();
                assert!(schema.check(&value).is_ok(), "{table}");
            }
        }
        assert!(registry.get(Table::Exercises).unwrap().create_default.is_some());
        assert!(registry.get(Table::Logs).unwrap().create_default.is_none());
    }

    #[test]
    fn test_dashboard_order() {
        let db = Database::open_in_memory().unwrap();
        let a = exercise(&db, "B", vec![Status::Locked], 5);
        let b = exercise(&db, "A", vec![Status::Favorited], 5);
        let c = exercise(&db, "Z", vec![], 1);
        let d = exercise(&db, "Z", vec![], 2);
        let _e = exercise(&db, "Hidden", vec![Status::Hidden], 3);

        let ids: Vec<String> = dashboard::<Exercise>(&db)
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![a.id, b.id, d.id, c.id]);
    }

    #[test]
    fn test_dashboard_name_compare_ignores_case_lowercase_first() {
        let db = Database::open_in_memory().unwrap();
        exercise(&db, "curl", vec![], 1);
        exercise(&db, "Bench", vec![], 1);
        exercise(&db, "apple", vec![], 1);
        exercise(&db, "Apple", vec![], 1);
        let names: Vec<String> = dashboard::<Exercise>(&db)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["apple", "Apple", "Bench", "curl"]);
    }

    #[test]
    fn test_dashboard_sorts_accented_names_by_base_letter() {
        let db = Database::open_in_memory().unwrap();
        exercise(&db, "Zottman Curl", vec![], 1);
        exercise(&db, "\u{c9}cart\u{e9} Press", vec![], 1);
        exercise(&db, "Bench", vec![], 1);
        let names: Vec<String> = dashboard::<Exercise>(&db)
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, vec!["Bench", "\u{c9}cart\u{e9} Press", "Zottman Curl"]);
    }

    #[tokio::test]
    async fn test_live_dashboard_recomputes_on_write() {
        let db = Database::open_in_memory().unwrap();
        let first = exercise(&db, "Squat", vec![], 1);
        let mut live = live_dashboard::<Exercise>(&db);
        assert_eq!(live.next(&db).await.unwrap().unwrap().len(), 1);

        set_parent_status::<Exercise>(&db, &first.id, Status::Hidden, true).unwrap();
        let emitted = live.next(&db).await.unwrap().unwrap();
        assert!(emitted.is_empty());
    }

    #[test]
    fn test_live_table_orders() {
        let db = Database::open_in_memory().unwrap();
        exercise(&db, "b", vec![Status::Hidden], 1);
        exercise(&db, "a", vec![], 2);
        let mut by_name = live_table::<Exercise>(&db, OrderBy::Name);
        let names: Vec<String> = by_name
            .try_next(&db)
            .unwrap()
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        // Unfiltered: hidden records are included.
        assert_eq!(names, vec!["a", "b"]);

        let mut by_date = live_table::<Exercise>(&db, OrderBy::CreatedAt);
        let first = by_date.try_next(&db).unwrap().unwrap();
        assert_eq!(first[0].name, "a");
    }

    #[test]
    fn test_initialize_settings_defaults() {
        let db = Database::open_in_memory().unwrap();
        let settings = initialize_settings(&db).unwrap();
        assert_eq!(settings.len(), SettingId::ALL.len());
        let value = |id: SettingId| get_record::<Setting>(&db, id.as_str()).unwrap().value;
        assert_eq!(value(SettingId::AdvancedMode), SettingValue::Bool(false));
        assert_eq!(value(SettingId::InstructionsOverlay), SettingValue::Bool(true));
        assert_eq!(value(SettingId::ConsoleLogs), SettingValue::Bool(false));
        assert_eq!(value(SettingId::InfoMessages), SettingValue::Bool(true));
        assert_eq!(
            value(SettingId::LogRetentionDuration),
            SettingValue::Duration(Duration::SixMonths)
        );
    }

    #[test]
    fn test_initialize_settings_is_idempotent_and_keeps_overrides() {
        let db = Database::open_in_memory().unwrap();
        let first = initialize_settings(&db).unwrap();
        let second = initialize_settings(&db).unwrap();
        assert_eq!(first, second);

        db.put(&Setting::new(
            SettingId::LogRetentionDuration,
            SettingValue::Duration(Duration::OneWeek),
        ))
        .unwrap();
        initialize_settings(&db).unwrap();
        let kept: Setting = get_record(&db, "Log Rentention Duration").unwrap();
        assert_eq!(kept.value, SettingValue::Duration(Duration::OneWeek));
    }

    #[test]
    fn test_update_last_child_skips_locked() {
        let db = Database::open_in_memory().unwrap();
        let parent = exercise(&db, "Bench", vec![], 1);
        result_for(&db, &parent, 10, vec![]);
        let at_20 = result_for(&db, &parent, 20, vec![]);
        result_for(&db, &parent, 30, vec![Status::Locked]);

        let last = update_last_child::<Exercise>(&db, &parent.id).unwrap();
        assert_eq!(last.as_ref().map(|r| r.id.as_str()), Some(at_20.id.as_str()));
        let stored: Exercise = get_record(&db, &parent.id).unwrap();
        assert_eq!(stored.last_child, Some(at_20));
    }

    #[test]
    fn test_update_last_child_none_when_all_locked() {
        let db = Database::open_in_memory().unwrap();
        let parent = exercise(&db, "Bench", vec![], 1);
        result_for(&db, &parent, 10, vec![Status::Locked]);
        assert!(update_last_child::<Exercise>(&db, &parent.id).unwrap().is_none());
        let stored: Exercise = get_record(&db, &parent.id).unwrap();
        assert!(stored.last_child.is_none());
    }

    #[test]
    fn test_update_last_child_missing_parent() {
        let db = Database::open_in_memory().unwrap();
        let err = update_last_child::<Workout>(&db, "wko-gone").unwrap_err();
        assert!(matches!(err, Error::NotFound { table: Table::Workouts, .. }));
    }

    #[test]
    fn test_child_writes_keep_last_child_current() {
        let db = Database::open_in_memory().unwrap();
        let parent = exercise(&db, "Press", vec![], 1);
        let older = result_for(&db, &parent, 10, vec![]);
        let newer = result_for(&db, &parent, 20, vec![]);
        let cached = |db: &Database| get_record::<Exercise>(db, &parent.id).unwrap().last_child;
        assert_eq!(cached(&db), Some(newer.clone()));

        let locked = set_child_status::<Exercise>(&db, &newer.id, Status::Locked, true).unwrap();
        assert!(locked.has_status(Status::Locked));
        assert_eq!(cached(&db), Some(older.clone()));

        delete_exercise_result(&db, &older.id).unwrap();
        assert!(cached(&db).is_none());
    }

    #[test]
    fn test_moving_child_refreshes_both_parents() {
        let db = Database::open_in_memory().unwrap();
        let first = exercise(&db, "One", vec![], 1);
        let second = exercise(&db, "Two", vec![], 2);
        let mut result = result_for(&db, &first, 10, vec![]);

        result.parent_id.clone_from(&second.id);
        save_exercise_result(&db, &result).unwrap();

        let first: Exercise = get_record(&db, &first.id).unwrap();
        let second: Exercise = get_record(&db, &second.id).unwrap();
        assert!(first.last_child.is_none());
        assert_eq!(second.last_child, Some(result));
    }

    #[test]
    fn test_exercise_result_must_match_inputs() {
        let db = Database::open_in_memory().unwrap();
        let parent = exercise(&db, "Bench", vec![], 1);
        let wrong = ExerciseResult::new(NewExerciseResult::new(
            parent.id.clone(),
            SetList::empty(ExerciseInput::Cardio),
        ));
        let err = save_exercise_result(&db, &wrong).unwrap_err();
        match err {
            Error::Validation(v) => assert!(v.has_issue_at("sets")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(db.count::<ExerciseResult>().unwrap(), 0);
    }

    #[test]
    fn test_child_requires_existing_parent() {
        let db = Database::open_in_memory().unwrap();
        let orphan = WorkoutResult::new(create_id(Table::Workouts), NewWorkoutResult::default());
        assert!(matches!(
            save_workout_result(&db, &orphan),
            Err(Error::NotFound { table: Table::Workouts, .. })
        ));
    }

    #[test]
    fn test_delete_parent_cascades() {
        let db = Database::open_in_memory().unwrap();
        let keep = exercise(&db, "Keep", vec![], 1);
        let drop_me = exercise(&db, "Drop", vec![], 2);
        result_for(&db, &keep, 10, vec![]);
        result_for(&db, &drop_me, 11, vec![]);
        result_for(&db, &drop_me, 12, vec![]);

        assert_eq!(delete_exercise(&db, &drop_me.id).unwrap(), 2);
        assert!(db.get::<Exercise>(&drop_me.id).unwrap().is_none());
        assert_eq!(db.count::<ExerciseResult>().unwrap(), 1);
        assert!(matches!(
            delete_exercise(&db, &drop_me.id),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_save_rejects_invalid_records() {
        let db = Database::open_in_memory().unwrap();
        let mut workout = Workout::new(NewWorkout::default());
        workout.name = "   ".to_string();
        assert!(matches!(save_workout(&db, &workout), Err(Error::Validation(_))));
        assert_eq!(db.count::<Workout>().unwrap(), 0);
    }

    #[test]
    fn test_start_and_finish_workout() {
        let db = Database::open_in_memory().unwrap();
        let squat = exercise(&db, "Squat", vec![], 1);
        let bench = exercise(&db, "Bench", vec![], 1);
        let workout = Workout::new(NewWorkout {
            exercise_groups: vec![crate::models::ExerciseGroup {
                exercise_ids: vec![squat.id.clone(), bench.id.clone()],
            }],
            ..Default::default()
        });
        save_workout(&db, &workout).unwrap();

        let started = start_workout(&db, &workout.id).unwrap();
        assert!(!started.is_finished());
        assert_eq!(started.exercise_result_groups[0].exercise_result_ids, vec![None, None]);

        let finished = finish_workout(&db, &started.id, now_ms()).unwrap();
        assert!(finished.is_finished());
        let stored: Workout = get_record(&db, &workout.id).unwrap();
        assert_eq!(stored.last_child, Some(finished));
    }

    #[test]
    fn test_service_loads_settings() {
        let mut service = LiftbookService::new_in_memory().unwrap();
        assert!(!service.settings().console_logs());
        service
            .set_setting(SettingId::ConsoleLogs, SettingValue::Bool(true))
            .unwrap();
        assert!(service.settings().console_logs());
        assert!(service.logger().console_enabled());
        assert_eq!(service.db().count::<Setting>().unwrap(), 5);
    }
}
