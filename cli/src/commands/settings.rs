use anyhow::{Result, bail};
use tabled::{Table, Tabled, settings::Style};

use liftbook_core::models::SettingValue;
use liftbook_core::schema::{Duration, SettingId};
use liftbook_core::service::LiftbookService;

/// Accepts the stored name ("Console Logs") or a kebab-case form
/// ("console-logs"). `log-retention` is short for the retention setting.
pub(crate) fn parse_setting_id(s: &str) -> Result<SettingId> {
    let normalized = s.trim().replace(['-', '_'], " ");
    if normalized.eq_ignore_ascii_case("log retention")
        || normalized.eq_ignore_ascii_case("log retention duration")
    {
        return Ok(SettingId::LogRetentionDuration);
    }
    Ok(normalized.parse()?)
}

pub(crate) fn parse_setting_value(id: SettingId, s: &str) -> Result<SettingValue> {
    if id.default_value().as_bool().is_some() {
        let flag = match s.trim().to_lowercase().as_str() {
            "true" | "on" | "yes" | "1" => true,
            "false" | "off" | "no" | "0" => false,
            other => bail!("{id} expects true or false, got '{other}'"),
        };
        Ok(SettingValue::Bool(flag))
    } else {
        let normalized = s.trim().replace(['-', '_'], " ");
        let duration: Duration = normalized.parse()?;
        Ok(SettingValue::Duration(duration))
    }
}

pub(crate) fn cmd_settings_show(svc: &LiftbookService, json: bool) -> Result<()> {
    let settings = svc.settings().all();

    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        #[derive(Tabled)]
        struct SettingRow {
            #[tabled(rename = "Setting")]
            id: String,
            #[tabled(rename = "Value")]
            value: String,
        }

        let rows: Vec<SettingRow> = settings
            .iter()
            .map(|s| SettingRow {
                id: s.id.to_string(),
                value: s.value.to_string(),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

pub(crate) fn cmd_settings_set(
    svc: &mut LiftbookService,
    id: &str,
    value: &str,
    json: bool,
) -> Result<()> {
    let id = parse_setting_id(id)?;
    let value = parse_setting_value(id, value)?;
    svc.set_setting(id, value)?;

    if json {
        println!("{}", serde_json::json!({ "id": id, "value": value }));
    } else {
        println!("{id} = {value}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_setting_id() {
        assert_eq!(parse_setting_id("console-logs").unwrap(), SettingId::ConsoleLogs);
        assert_eq!(parse_setting_id("Advanced Mode").unwrap(), SettingId::AdvancedMode);
        assert_eq!(
            parse_setting_id("log-retention").unwrap(),
            SettingId::LogRetentionDuration
        );
        assert!(parse_setting_id("dark-mode").is_err());
    }

    #[test]
    fn test_parse_setting_value_by_kind() {
        assert_eq!(
            parse_setting_value(SettingId::InfoMessages, "off").unwrap(),
            SettingValue::Bool(false)
        );
        assert_eq!(
            parse_setting_value(SettingId::LogRetentionDuration, "three-months").unwrap(),
            SettingValue::Duration(Duration::ThreeMonths)
        );
        assert!(parse_setting_value(SettingId::InfoMessages, "one day").is_err());
        assert!(parse_setting_value(SettingId::LogRetentionDuration, "true").is_err());
    }

    #[test]
    fn test_set_updates_service() {
        let mut svc = LiftbookService::new_in_memory().unwrap();
        cmd_settings_set(&mut svc, "console-logs", "on", true).unwrap();
        assert!(svc.settings().console_logs());
        assert!(svc.logger().console_enabled());

        cmd_settings_set(&mut svc, "log-retention", "forever", true).unwrap();
        assert_eq!(svc.settings().log_retention_duration(), Duration::Forever);
    }
}
