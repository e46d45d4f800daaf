use anyhow::Result;
use tabled::{Table, Tabled, settings::Style};

use liftbook_core::db::{Database, OrderBy};
use liftbook_core::logger::purge_expired_logs;
use liftbook_core::models::{Log, now_ms};
use liftbook_core::schema::LogLevel;
use liftbook_core::service::LiftbookService;

use super::helpers::{format_timestamp, truncate};

/// Newest first, optionally only one level.
fn recent_logs(db: &Database, level: Option<LogLevel>, limit: usize) -> Result<Vec<Log>> {
    Ok(db
        .all::<Log>(OrderBy::CreatedAt)?
        .into_iter()
        .filter(|l| level.is_none_or(|lvl| l.log_level == lvl))
        .take(limit)
        .collect())
}

pub(crate) fn cmd_logs_list(
    db: &Database,
    level: Option<&str>,
    limit: usize,
    json: bool,
) -> Result<()> {
    let level: Option<LogLevel> = level.map(str::parse).transpose()?;
    let logs = recent_logs(db, level, limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
    } else if logs.is_empty() {
        eprintln!("No logs found.");
    } else {
        #[derive(Tabled)]
        struct LogRow {
            #[tabled(rename = "Time")]
            time: String,
            #[tabled(rename = "Level")]
            level: String,
            #[tabled(rename = "Label")]
            label: String,
            #[tabled(rename = "Details")]
            details: String,
        }

        let rows: Vec<LogRow> = logs
            .iter()
            .map(|l| LogRow {
                time: format_timestamp(l.created_at),
                level: l.log_level.to_string(),
                label: truncate(&l.label, 40),
                details: l
                    .details
                    .as_ref()
                    .map(|d| truncate(&d.to_string(), 60))
                    .unwrap_or_default(),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

pub(crate) fn cmd_logs_purge(svc: &LiftbookService, json: bool) -> Result<()> {
    let retention = svc.settings().log_retention_duration();
    let removed = purge_expired_logs(svc.db(), svc.settings(), now_ms())?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "purged": removed, "retention": retention })
        );
    } else if retention.expires() {
        println!("Purged {removed} log(s) older than {retention}");
    } else {
        println!("Log retention is '{retention}'; nothing purged");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_logs_filters_and_limits() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let db = svc.db();
        svc.logger().info(db, "one");
        svc.logger().warn(db, "two");
        svc.logger().info(db, "three");

        assert_eq!(recent_logs(db, None, 10).unwrap().len(), 3);
        assert_eq!(recent_logs(db, None, 2).unwrap().len(), 2);
        let warnings = recent_logs(db, Some(LogLevel::Warn), 10).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].label, "two");
    }

    #[test]
    fn test_list_rejects_unknown_level() {
        let db = Database::open_in_memory().unwrap();
        assert!(cmd_logs_list(&db, Some("verbose"), 10, true).is_err());
        assert!(cmd_logs_list(&db, Some("warn"), 10, true).is_ok());
    }

    #[test]
    fn test_purge_removes_expired() {
        let svc = LiftbookService::new_in_memory().unwrap();
        let mut old = svc.logger().info(svc.db(), "ancient").unwrap();
        old.created_at = 0;
        svc.db().put(&old).unwrap();
        svc.logger().info(svc.db(), "fresh");

        cmd_logs_purge(&svc, true).unwrap();
        let remaining = recent_logs(svc.db(), None, 10).unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].label, "fresh");
    }
}
