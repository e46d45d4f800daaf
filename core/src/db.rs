use std::collections::BTreeSet;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension, params};
use tokio::sync::broadcast;

use crate::collation::compare_names;
use crate::error::Result;
use crate::models::{Record, Table, Timestamp};

/// Current `user_version`. Bump whenever a table's columns or indexes change.
pub const DATABASE_VERSION: i64 = 1;

/// Application name recorded in backups and used to derive the database file name.
pub const APP_NAME: &str = "Liftbook";

/// Buffered change notifications before a slow live query lags.
pub const CHANGE_CHANNEL_CAPACITY: usize = 256;

/// Row order for [`Database::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderBy {
    /// Ascending by name, per [`compare_names`].
    Name,
    /// Newest first.
    CreatedAt,
    #[default]
    Insertion,
}

impl OrderBy {
    fn sql(self) -> &'static str {
        match self {
            OrderBy::Name | OrderBy::Insertion => "ORDER BY rowid ASC",
            OrderBy::CreatedAt => "ORDER BY created_at DESC",
        }
    }
}

pub struct Database {
    conn: Connection,
    changes: broadcast::Sender<Table>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        tracing::debug!(path = %path.display(), "opened database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        let db = Database { conn, changes };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let version = self.version()?;

        if version < 1 {
            // Every table shares one layout: the record as JSON plus the
            // projected columns its indexes need.
            let mut ddl = String::new();
            for table in Table::ALL {
                ddl.push_str(&format!(
                    "CREATE TABLE IF NOT EXISTS {} (
                        id TEXT PRIMARY KEY NOT NULL,
                        created_at INTEGER,
                        name TEXT,
                        parent_id TEXT,
                        data TEXT NOT NULL
                    );\n",
                    table.sql_name()
                ));
            }
            ddl.push_str(
                "CREATE INDEX IF NOT EXISTS idx_logs_created_at ON logs(created_at);
                 CREATE INDEX IF NOT EXISTS idx_plans_created_at ON plans(created_at);
                 CREATE INDEX IF NOT EXISTS idx_measurements_created_at ON measurements(created_at);
                 CREATE INDEX IF NOT EXISTS idx_exercises_created_at ON exercises(created_at);
                 CREATE INDEX IF NOT EXISTS idx_exercises_name ON exercises(name);
                 CREATE INDEX IF NOT EXISTS idx_exercise_results_created_at ON exercise_results(created_at);
                 CREATE INDEX IF NOT EXISTS idx_exercise_results_parent ON exercise_results(parent_id);
                 CREATE INDEX IF NOT EXISTS idx_workouts_created_at ON workouts(created_at);
                 CREATE INDEX IF NOT EXISTS idx_workouts_name ON workouts(name);
                 CREATE INDEX IF NOT EXISTS idx_workout_results_created_at ON workout_results(created_at);
                 CREATE INDEX IF NOT EXISTS idx_workout_results_parent ON workout_results(parent_id);

                 PRAGMA user_version = 1;",
            );
            self.conn.execute_batch(&ddl)?;
            tracing::info!(version = 1, "migrated database");
        }

        Ok(())
    }

    pub fn version(&self) -> Result<i64> {
        Ok(self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?)
    }

    // --- Change notification ---

    /// A receiver for every table touched by a successful write from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<Table> {
        self.changes.subscribe()
    }

    fn publish(&self, table: Table) {
        // No live subscribers is not an error.
        let _ = self.changes.send(table);
    }

    // --- Records ---

    pub fn get<R: Record>(&self, id: &str) -> Result<Option<R>> {
        let data: Option<String> = self
            .conn
            .query_row(
                &format!("SELECT data FROM {} WHERE id = ?1", R::TABLE.sql_name()),
                params![id],
                |row| row.get(0),
            )
            .optional()?;
        match data {
            Some(data) => Ok(Some(serde_json::from_str(&data)?)),
            None => Ok(None),
        }
    }

    pub fn all<R: Record>(&self, order: OrderBy) -> Result<Vec<R>> {
        let sql = format!("SELECT data FROM {} {}", R::TABLE.sql_name(), order.sql());
        let mut records: Vec<R> = self.query_records(&sql, [])?;
        // SQLite collations know nothing of accents; sort names here.
        if order == OrderBy::Name {
            records.sort_by(|a, b| {
                compare_names(a.name().unwrap_or_default(), b.name().unwrap_or_default())
            });
        }
        Ok(records)
    }

    /// Children whose `parent_id` is `parent_id`, newest first.
    pub fn children<R: Record>(&self, parent_id: &str) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT data FROM {} WHERE parent_id = ?1 ORDER BY created_at DESC",
            R::TABLE.sql_name()
        );
        self.query_records(&sql, params![parent_id])
    }

    pub fn count<R: Record>(&self) -> Result<i64> {
        Ok(self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", R::TABLE.sql_name()),
            [],
            |row| row.get(0),
        )?)
    }

    fn query_records<R: Record>(&self, sql: &str, args: impl rusqlite::Params) -> Result<Vec<R>> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt.query_map(args, |row| row.get::<_, String>(0))?;
        let mut records = Vec::new();
        for row in rows {
            records.push(serde_json::from_str(&row?)?);
        }
        Ok(records)
    }

    /// Insert or replace `record` by id. Callers validate first.
    pub fn put<R: Record>(&self, record: &R) -> Result<()> {
        upsert(&self.conn, record)?;
        self.publish(R::TABLE);
        Ok(())
    }

    pub fn delete<R: Record>(&self, id: &str) -> Result<bool> {
        let deleted = delete_by_id(&self.conn, R::TABLE, id)?;
        if deleted {
            self.publish(R::TABLE);
        }
        Ok(deleted)
    }

    /// Delete logs created strictly before `cutoff`.
    pub fn delete_logs_before(&self, cutoff: Timestamp) -> Result<usize> {
        let deleted = self
            .conn
            .execute("DELETE FROM logs WHERE created_at < ?1", params![cutoff])?;
        if deleted > 0 {
            self.publish(Table::Logs);
        }
        Ok(deleted)
    }

    /// Run `f` in one transaction. Touched tables are published once each,
    /// after commit; nothing is published if `f` fails.
    pub fn batch<T>(&self, f: impl FnOnce(&mut Batch<'_>) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let mut batch = Batch {
            conn: &tx,
            touched: BTreeSet::new(),
        };
        let out = f(&mut batch)?;
        let Batch { touched, .. } = batch;
        tx.commit()?;
        for table in touched {
            self.publish(table);
        }
        Ok(out)
    }
}

/// Write handle passed to [`Database::batch`].
pub struct Batch<'a> {
    conn: &'a Connection,
    touched: BTreeSet<Table>,
}

impl Batch<'_> {
    pub fn put<R: Record>(&mut self, record: &R) -> Result<()> {
        upsert(self.conn, record)?;
        self.touched.insert(R::TABLE);
        Ok(())
    }

    pub fn delete<R: Record>(&mut self, id: &str) -> Result<bool> {
        let deleted = delete_by_id(self.conn, R::TABLE, id)?;
        if deleted {
            self.touched.insert(R::TABLE);
        }
        Ok(deleted)
    }

    pub fn delete_children<R: Record>(&mut self, parent_id: &str) -> Result<usize> {
        let deleted = self.conn.execute(
            &format!("DELETE FROM {} WHERE parent_id = ?1", R::TABLE.sql_name()),
            params![parent_id],
        )?;
        if deleted > 0 {
            self.touched.insert(R::TABLE);
        }
        Ok(deleted)
    }
}

fn upsert<R: Record>(conn: &Connection, record: &R) -> Result<()> {
    let data = serde_json::to_string(record)?;
    conn.execute(
        &format!(
            "INSERT INTO {} (id, created_at, name, parent_id, data)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(id) DO UPDATE SET
                created_at = excluded.created_at,
                name = excluded.name,
                parent_id = excluded.parent_id,
                data = excluded.data",
            R::TABLE.sql_name()
        ),
        params![
            record.id(),
            record.created_at(),
            record.name(),
            record.parent_id(),
            data
        ],
    )?;
    tracing::trace!(table = %R::TABLE, id = record.id(), "wrote record");
    Ok(())
}

fn delete_by_id(conn: &Connection, table: Table, id: &str) -> Result<bool> {
    let rows = conn.execute(
        &format!("DELETE FROM {} WHERE id = ?1", table.sql_name()),
        params![id],
    )?;
    Ok(rows > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Exercise, ExerciseResult, Log, LogDetails, NewExercise, NewExerciseResult, NewLog,
        NewWorkout, SetList, Setting, SettingValue, Workout,
    };
    use crate::schema::{LogLevel, SettingId};

    fn exercise(name: &str, created_at: i64) -> Exercise {
        Exercise::new(NewExercise {
            name: Some(name.to_string()),
            created_at: Some(created_at),
            ..Default::default()
        })
    }

    fn log_at(created_at: i64) -> Log {
        let mut log = Log::new(NewLog {
            log_level: LogLevel::Info,
            label: format!("at {created_at}"),
            details: LogDetails::None,
        });
        log.created_at = created_at;
        log
    }

    #[test]
    fn test_open_sets_version() {
        let db = Database::open_in_memory().unwrap();
        assert_eq!(db.version().unwrap(), DATABASE_VERSION);
    }

    #[test]
    fn test_open_file_twice_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liftbook.db");
        let ex = exercise("Squat", 1);
        {
            let db = Database::open(&path).unwrap();
            db.put(&ex).unwrap();
        }
        let db = Database::open(&path).unwrap();
        assert_eq!(db.version().unwrap(), DATABASE_VERSION);
        assert_eq!(db.get::<Exercise>(&ex.id).unwrap(), Some(ex));
    }

    #[test]
    fn test_put_and_get() {
        let db = Database::open_in_memory().unwrap();
        let ex = exercise("Bench Press", 100);
        db.put(&ex).unwrap();
        let fetched: Exercise = db.get(&ex.id).unwrap().unwrap();
        assert_eq!(fetched, ex);
        assert!(db.get::<Exercise>("exs-missing").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_by_id() {
        let db = Database::open_in_memory().unwrap();
        let mut ex = exercise("Row", 1);
        db.put(&ex).unwrap();
        ex.name = "Barbell Row".to_string();
        db.put(&ex).unwrap();
        assert_eq!(db.count::<Exercise>().unwrap(), 1);
        let fetched: Exercise = db.get(&ex.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Barbell Row");
    }

    #[test]
    fn test_settings_keyed_by_setting_id() {
        let db = Database::open_in_memory().unwrap();
        db.put(&Setting::new(SettingId::ConsoleLogs, SettingValue::Bool(true)))
            .unwrap();
        let setting: Setting = db.get("Console Logs").unwrap().unwrap();
        assert_eq!(setting.value, SettingValue::Bool(true));
    }

    #[test]
    fn test_all_orderings() {
        let db = Database::open_in_memory().unwrap();
        let b = exercise("bench", 20);
        let a = exercise("Arnold Press", 10);
        let c = exercise("curl", 30);
        for ex in [&b, &a, &c] {
            db.put(ex).unwrap();
        }

        let names = |order: OrderBy| -> Vec<String> {
            db.all::<Exercise>(order)
                .unwrap()
                .into_iter()
                .map(|e| e.name)
                .collect()
        };
        assert_eq!(names(OrderBy::Name), vec!["Arnold Press", "bench", "curl"]);
        assert_eq!(names(OrderBy::CreatedAt), vec!["curl", "bench", "Arnold Press"]);
        assert_eq!(names(OrderBy::Insertion), vec!["bench", "Arnold Press", "curl"]);
    }

    #[test]
    fn test_name_order_folds_accents() {
        let db = Database::open_in_memory().unwrap();
        for (name, at) in [("Zercher Squat", 1), ("\u{c9}tienne Row", 2), ("deadlift", 3)] {
            db.put(&exercise(name, at)).unwrap();
        }
        let names: Vec<String> = db
            .all::<Exercise>(OrderBy::Name)
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["deadlift", "\u{c9}tienne Row", "Zercher Squat"]);
    }

    #[test]
    fn test_children_filters_by_parent() {
        let db = Database::open_in_memory().unwrap();
        let parent = exercise("Deadlift", 1);
        let other = exercise("Squat", 2);
        for (parent_id, created_at) in [(&parent.id, 10), (&parent.id, 30), (&other.id, 20)] {
            let mut params = NewExerciseResult::new(parent_id.clone(), SetList::Checklist(vec![]));
            params.created_at = Some(created_at);
            db.put(&ExerciseResult::new(params)).unwrap();
        }
        let children: Vec<ExerciseResult> = db.children(&parent.id).unwrap();
        let times: Vec<i64> = children.iter().map(|c| c.created_at).collect();
        assert_eq!(times, vec![30, 10]);
    }

    #[test]
    fn test_delete() {
        let db = Database::open_in_memory().unwrap();
        let ex = exercise("Dip", 1);
        db.put(&ex).unwrap();
        assert!(db.delete::<Exercise>(&ex.id).unwrap());
        assert!(!db.delete::<Exercise>(&ex.id).unwrap());
        assert!(db.get::<Exercise>(&ex.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_logs_before() {
        let db = Database::open_in_memory().unwrap();
        for ts in [100, 200, 300] {
            db.put(&log_at(ts)).unwrap();
        }
        assert_eq!(db.delete_logs_before(200).unwrap(), 1);
        let remaining: Vec<i64> = db
            .all::<Log>(OrderBy::CreatedAt)
            .unwrap()
            .iter()
            .map(|l| l.created_at)
            .collect();
        assert_eq!(remaining, vec![300, 200]);
    }

    #[test]
    fn test_writes_publish_table() {
        let db = Database::open_in_memory().unwrap();
        let mut rx = db.subscribe();
        let ex = exercise("Lunge", 1);
        db.put(&ex).unwrap();
        db.put(&Workout::new(NewWorkout::default())).unwrap();
        db.delete::<Exercise>(&ex.id).unwrap();
        // A miss publishes nothing.
        db.delete::<Exercise>(&ex.id).unwrap();

        assert_eq!(rx.try_recv().unwrap(), Table::Exercises);
        assert_eq!(rx.try_recv().unwrap(), Table::Workouts);
        assert_eq!(rx.try_recv().unwrap(), Table::Exercises);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_batch_publishes_once_after_commit() {
        let db = Database::open_in_memory().unwrap();
        let mut rx = db.subscribe();
        db.batch(|b| {
            b.put(&exercise("A", 1))?;
            b.put(&exercise("B", 2))?;
            b.put(&Workout::new(NewWorkout::default()))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(db.count::<Exercise>().unwrap(), 2);
        assert_eq!(rx.try_recv().unwrap(), Table::Exercises);
        assert_eq!(rx.try_recv().unwrap(), Table::Workouts);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_batch_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();
        let mut rx = db.subscribe();
        let result: Result<()> = db.batch(|b| {
            b.put(&exercise("A", 1))?;
            Err(crate::error::Error::not_found(Table::Workouts, "wko-x"))
        });
        assert!(result.is_err());
        assert_eq!(db.count::<Exercise>().unwrap(), 0);
        assert!(rx.try_recv().is_err());
    }
}
