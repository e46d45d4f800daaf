use std::collections::BTreeMap;

use crate::db::Database;
use crate::error::{Result, ValidationError};
use crate::models::{Setting, SettingValue};
use crate::schema::{Duration, SettingId};
use crate::service::initialize_settings;

/// Read-through cache of every setting, loaded once and kept in step with the
/// database by [`SettingsStore::set`].
#[derive(Debug, Clone)]
pub struct SettingsStore {
    values: BTreeMap<SettingId, SettingValue>,
}

impl SettingsStore {
    pub fn load(db: &Database) -> Result<Self> {
        let values = initialize_settings(db)?
            .into_iter()
            .map(|s| (s.id, s.value))
            .collect();
        Ok(Self { values })
    }

    #[must_use]
    pub fn get(&self, id: SettingId) -> SettingValue {
        self.values
            .get(&id)
            .copied()
            .unwrap_or_else(|| id.default_value())
    }

    fn flag(&self, id: SettingId) -> bool {
        self.get(id)
            .as_bool()
            .or_else(|| id.default_value().as_bool())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn advanced_mode(&self) -> bool {
        self.flag(SettingId::AdvancedMode)
    }

    #[must_use]
    pub fn instructions_overlay(&self) -> bool {
        self.flag(SettingId::InstructionsOverlay)
    }

    #[must_use]
    pub fn console_logs(&self) -> bool {
        self.flag(SettingId::ConsoleLogs)
    }

    #[must_use]
    pub fn info_messages(&self) -> bool {
        self.flag(SettingId::InfoMessages)
    }

    #[must_use]
    pub fn log_retention_duration(&self) -> Duration {
        self.get(SettingId::LogRetentionDuration)
            .as_duration()
            .unwrap_or(Duration::SixMonths)
    }

    /// All settings in id order.
    #[must_use]
    pub fn all(&self) -> Vec<Setting> {
        SettingId::ALL
            .iter()
            .map(|id| Setting::new(*id, self.get(*id)))
            .collect()
    }

    /// Persist `value` and update the cache. The value must be the same kind
    /// (flag or duration) as the setting's default.
    pub fn set(&mut self, db: &Database, id: SettingId, value: SettingValue) -> Result<()> {
        let expects_flag = id.default_value().as_bool().is_some();
        if expects_flag != value.as_bool().is_some() {
            let kind = if expects_flag { "true or false" } else { "a duration" };
            return Err(ValidationError::single("value", format!("{id} expects {kind}")).into());
        }
        db.put(&Setting::new(id, value))?;
        self.values.insert(id, value);
        tracing::info!(setting = %id, %value, "updated setting");
        Ok(())
    }
}
