use crate::db::Database;
use crate::error::Result;
use crate::models::{CapturedError, Log, LogDetails, NewLog, Timestamp};
use crate::schema::LogLevel;
use crate::settings::SettingsStore;

/// Writes app log records. Logging never fails: a record that cannot be
/// persisted is reported through `tracing` and dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct AppLogger {
    console: bool,
}

impl AppLogger {
    /// `console` mirrors every record to `tracing` as well.
    #[must_use]
    pub fn new(console: bool) -> Self {
        Self { console }
    }

    #[must_use]
    pub fn from_settings(settings: &SettingsStore) -> Self {
        Self::new(settings.console_logs())
    }

    #[must_use]
    pub fn console_enabled(&self) -> bool {
        self.console
    }

    /// Returns the stored record, or `None` if it could not be written.
    pub fn log(
        &self,
        db: &Database,
        log_level: LogLevel,
        label: impl Into<String>,
        details: impl Into<LogDetails>,
    ) -> Option<Log> {
        let log = Log::new(NewLog {
            log_level,
            label: label.into(),
            details: details.into(),
        });
        if self.console {
            mirror(&log);
        }
        match db.put(&log) {
            Ok(()) => Some(log),
            Err(e) => {
                tracing::warn!(error = %e, label = %log.label, "failed to write app log");
                None
            }
        }
    }

    pub fn debug(&self, db: &Database, label: impl Into<String>) -> Option<Log> {
        self.log(db, LogLevel::Debug, label, LogDetails::None)
    }

    pub fn info(&self, db: &Database, label: impl Into<String>) -> Option<Log> {
        self.log(db, LogLevel::Info, label, LogDetails::None)
    }

    pub fn warn(&self, db: &Database, label: impl Into<String>) -> Option<Log> {
        self.log(db, LogLevel::Warn, label, LogDetails::None)
    }

    /// Log `err` at ERROR level with its captured name, message and cause chain.
    pub fn error<E: std::error::Error + ?Sized>(
        &self,
        db: &Database,
        label: impl Into<String>,
        err: &E,
    ) -> Option<Log> {
        self.log(db, LogLevel::Error, label, CapturedError::from_error(err))
    }
}

fn mirror(log: &Log) {
    let details = &log.details;
    match log.log_level {
        LogLevel::Debug => tracing::debug!(details = ?details, "{}", log.label),
        LogLevel::Info => tracing::info!(details = ?details, "{}", log.label),
        LogLevel::Warn => tracing::warn!(details = ?details, "{}", log.label),
        LogLevel::Error => tracing::error!(details = ?details, "{}", log.label),
    }
}

/// Delete logs older than the retention setting as of `now`. Returns the
/// number removed; retention that never expires removes nothing.
pub fn purge_expired_logs(db: &Database, settings: &SettingsStore, now: Timestamp) -> Result<usize> {
    let retention = settings.log_retention_duration();
    if !retention.expires() {
        return Ok(0);
    }
    let cutoff = now.saturating_sub(retention.millis());
    let removed = db.delete_logs_before(cutoff)?;
    if removed > 0 {
        tracing::info!(removed, %retention, "purged expired logs");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::OrderBy;
    use crate::models::SettingValue;
    use crate::schema::{Duration, SettingId};
    use serde_json::json;

    #[derive(Debug)]
    struct Timeout;

    impl std::fmt::Display for Timeout {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("timed out")
        }
    }

    impl std::error::Error for Timeout {}

    fn stored_log_at(db: &Database, created_at: Timestamp) {
        let mut log = AppLogger::default().info(db, "tick").unwrap();
        log.created_at = created_at;
        db.put(&log).unwrap();
    }

    #[test]
    fn test_log_persists_record() {
        let db = Database::open_in_memory().unwrap();
        let logger = AppLogger::new(false);
        let log = logger
            .log(&db, LogLevel::Warn, "Low disk", json!({"free": 12}))
            .unwrap();
        let all: Vec<Log> = db.all(OrderBy::Insertion).unwrap();
        assert_eq!(all, vec![log]);
        assert_eq!(all[0].details, Some(json!({"free": 12})));
    }

    #[test]
    fn test_error_captures_details() {
        let db = Database::open_in_memory().unwrap();
        let log = AppLogger::new(true).error(&db, "Sync failed", &Timeout).unwrap();
        assert_eq!(log.log_level, LogLevel::Error);
        assert_eq!(
            log.details,
            Some(json!({"name": "Timeout", "message": "timed out"}))
        );
    }

    #[test]
    fn test_logger_follows_console_setting() {
        let db = Database::open_in_memory().unwrap();
        let mut settings = SettingsStore::load(&db).unwrap();
        assert!(!AppLogger::from_settings(&settings).console_enabled());
        settings
            .set(&db, SettingId::ConsoleLogs, SettingValue::Bool(true))
            .unwrap();
        assert!(AppLogger::from_settings(&settings).console_enabled());
    }

    #[test]
    fn test_purge_expired_logs() {
        let db = Database::open_in_memory().unwrap();
        let mut settings = SettingsStore::load(&db).unwrap();
        settings
            .set(
                &db,
                SettingId::LogRetentionDuration,
                SettingValue::Duration(Duration::OneDay),
            )
            .unwrap();
        let now = 10 * Duration::OneDay.millis();
        stored_log_at(&db, now - 2 * Duration::OneDay.millis());
        stored_log_at(&db, now - Duration::OneDay.millis());
        stored_log_at(&db, now - 1);

        assert_eq!(purge_expired_logs(&db, &settings, now).unwrap(), 1);
        assert_eq!(db.count::<Log>().unwrap(), 2);
    }

    #[test]
    fn test_purge_keeps_everything_forever() {
        let db = Database::open_in_memory().unwrap();
        let mut settings = SettingsStore::load(&db).unwrap();
        settings
            .set(
                &db,
                SettingId::LogRetentionDuration,
                SettingValue::Duration(Duration::Forever),
            )
            .unwrap();
        stored_log_at(&db, 0);
        assert_eq!(purge_expired_logs(&db, &settings, i64::MAX).unwrap(), 0);
        assert_eq!(db.count::<Log>().unwrap(), 1);
    }
}
