//! Value schemas shared by every entity: enumerations, limits, and the
//! field-level checks records run in their [`Validate`] impls.

use std::fmt::Display;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ValidationError;

// --- Limits ---

pub const MAX_TEXT_AREA: usize = 300;
pub const MAX_TEXT_LINE: usize = 50;
pub const MAX_SETS: u32 = 30;
pub const MAX_WEIGHT: f64 = 9_999.0;
pub const MAX_REPS: u32 = 9_999;
pub const MAX_RPE: u32 = 10;
pub const MIN_REST_TIMER: u32 = 30;
pub const MAX_REST_TIMER: u32 = 900;
pub const MAX_DURATION_SEC: u32 = 359_999;
pub const MAX_CALORIES_BURNED: u32 = 9_999;
pub const MAX_CALORIES: u32 = 99_999;
pub const MAX_NUTRITION: u32 = 9_999;
pub const MAX_BODY_WEIGHT: f64 = 9_999.0;
pub const MIN_TEMPERATURE: f64 = 60.0;
pub const MAX_TEMPERATURE: f64 = 115.0;
pub const MAX_BODY_MEASUREMENT: f64 = 999.0;
pub const MIN_BLOOD_PRESSURE: u32 = 30;
pub const MAX_BLOOD_PRESSURE: u32 = 300;
pub const MAX_CHOLESTEROL: u32 = 999;
pub const MAX_PERCENT: f64 = 100.0;
pub const MAX_CLIMBING_ATTEMPTS: u32 = 999;
pub const MAX_TABATA_SECONDS: u32 = 3_600;

/// Length in characters of the table prefix on generated ids (`wko-`, `log-`, ...).
pub const ID_PREFIX_LEN: usize = 4;

// --- Enumerations ---

macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $($variant:ident => $text:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $text)] $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            #[must_use]
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            /// Case-insensitive parse, used for user input. Stored values are
            /// decoded through serde and must match exactly.
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                $name::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().eq_ignore_ascii_case(s))
                    .ok_or_else(|| {
                        let valid: Vec<&str> = $name::ALL.iter().map(|v| v.as_str()).collect();
                        ValidationError::single(
                            "",
                            format!("invalid value '{s}', expected one of: {}", valid.join(", ")),
                        )
                    })
            }
        }
    };
}

string_enum! {
    /// Record-level markers that change how queries treat a record.
    pub enum Status {
        Locked => "Locked",
        Hidden => "Hidden",
        Favorited => "Favorited",
    }
}

string_enum! {
    pub enum LogLevel {
        Debug => "DEBUG",
        Info => "INFO",
        Warn => "WARN",
        Error => "ERROR",
    }
}

string_enum! {
    /// The fixed set of setting ids. The retention id keeps its historical
    /// spelling so existing databases keep resolving.
    pub enum SettingId {
        AdvancedMode => "Advanced Mode",
        InstructionsOverlay => "Instructions Overlay",
        ConsoleLogs => "Console Logs",
        InfoMessages => "Info Messages",
        LogRetentionDuration => "Log Rentention Duration",
    }
}

string_enum! {
    pub enum Duration {
        Now => "Now",
        OneSecond => "One Second",
        OneMinute => "One Minute",
        OneHour => "One Hour",
        OneDay => "One Day",
        OneWeek => "One Week",
        OneMonth => "One Month",
        ThreeMonths => "Three Months",
        SixMonths => "Six Months",
        OneYear => "One Year",
        TwoYears => "Two Years",
        ThreeYears => "Three Years",
        AllTime => "All Time",
        Forever => "Forever",
    }
}

/// Largest integer exactly representable as an `f64`.
const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

impl Duration {
    #[must_use]
    pub fn millis(self) -> i64 {
        match self {
            Duration::Now => 1,
            Duration::OneSecond => 1_000,
            Duration::OneMinute => 60_000,
            Duration::OneHour => 3_600_000,
            Duration::OneDay => 86_400_000,
            Duration::OneWeek => 604_800_000,
            Duration::OneMonth => 2_592_000_000,
            Duration::ThreeMonths => 7_776_000_000,
            Duration::SixMonths => 15_552_000_000,
            Duration::OneYear => 31_536_000_000,
            Duration::TwoYears => 63_072_000_000,
            Duration::ThreeYears => 94_608_000_000,
            Duration::AllTime => MAX_SAFE_INTEGER - 1,
            Duration::Forever => MAX_SAFE_INTEGER,
        }
    }

    /// `All Time` and `Forever` keep records indefinitely.
    #[must_use]
    pub fn expires(self) -> bool {
        !matches!(self, Duration::AllTime | Duration::Forever)
    }
}

string_enum! {
    /// Recurrence keys used as plan ids.
    pub enum PlanId {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
        January => "January",
        February => "February",
        March => "March",
        April => "April",
        May => "May",
        June => "June",
        July => "July",
        August => "August",
        September => "September",
        October => "October",
        November => "November",
        December => "December",
        Monthly => "Monthly",
        Yearly => "Yearly",
    }
}

string_enum! {
    pub enum MeasurementField {
        Calories => "Calories",
        Carbs => "Carbs",
        Fat => "Fat",
        Protein => "Protein",
        BodyWeight => "Body Weight",
        BodyFat => "Body Fat",
        Temperature => "Temperature",
        BloodPressure => "Blood Pressure",
        BloodOxygen => "Blood Oxygen",
        Neck => "Neck",
        Shoulders => "Shoulders",
        Chest => "Chest",
        Waist => "Waist",
        Biceps => "Biceps",
        Forearms => "Forearms",
        Thighs => "Thighs",
        Calves => "Calves",
        Cholesterol => "Cholesterol",
        CholesterolHdl => "Cholesterol HDL",
        CholesterolLdl => "Cholesterol LDL",
        HemoglobinA1c => "Hemoglobin A1C",
    }
}

string_enum! {
    /// Which set shape an exercise records.
    pub enum ExerciseInput {
        Checklist => "Checklist",
        Cardio => "Cardio Exercise",
        Weight => "Weight Exercise",
        SidedWeight => "Sided Weight Exercise",
        ClimbingSession => "Climbing Session",
    }
}

// --- Validation ---

/// Implemented by every record and nested value that carries constraints.
///
/// `collect_issues` appends every failed constraint under `path`; callers
/// normally use [`Validate::validate`].
pub trait Validate {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError);

    fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();
        self.collect_issues("", &mut errors);
        errors.into_result()
    }
}

impl<T: Validate> Validate for Vec<T> {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        for (i, item) in self.iter().enumerate() {
            item.collect_issues(&format!("{path}[{i}]"), errors);
        }
    }
}

impl<T: Validate> Validate for Option<T> {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        if let Some(inner) = self {
            inner.collect_issues(path, errors);
        }
    }
}

/// Decode an untyped candidate into `R` and validate it. Shape and enum
/// failures are reported as issues rather than panics.
pub fn decode<R: DeserializeOwned + Validate>(
    value: &serde_json::Value,
) -> Result<R, ValidationError> {
    let record = R::deserialize(value).map_err(|e| ValidationError::single("", e.to_string()))?;
    record.validate()?;
    Ok(record)
}

#[must_use]
pub fn field_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// A table prefix of [`ID_PREFIX_LEN`] characters followed by a hyphenated
/// UUID. The prefix is not matched against any table.
#[must_use]
pub fn is_generated_id(id: &str) -> bool {
    id.char_indices()
        .nth(ID_PREFIX_LEN)
        .map(|(start, _)| &id[start..])
        .is_some_and(|suffix| suffix.len() == 36 && Uuid::parse_str(suffix).is_ok())
}

#[must_use]
pub fn is_valid_id(id: &str) -> bool {
    is_generated_id(id)
        || SettingId::ALL.iter().any(|s| s.as_str() == id)
        || PlanId::ALL.iter().any(|p| p.as_str() == id)
}

pub fn check_id(errors: &mut ValidationError, path: &str, id: &str) {
    if !is_valid_id(id) {
        errors.push(path, "Invalid Id");
    }
}

pub fn check_timestamp(errors: &mut ValidationError, path: &str, ts: i64) {
    if ts < 0 {
        errors.push(path, "timestamp must not be negative");
    }
}

pub fn check_text_line(errors: &mut ValidationError, path: &str, text: &str) {
    let len = text.trim().chars().count();
    if len < 1 {
        errors.push(path, "must be at least 1 character");
    } else if len > MAX_TEXT_LINE {
        errors.push(path, format!("must be at most {MAX_TEXT_LINE} characters"));
    }
}

pub fn check_text_area(errors: &mut ValidationError, path: &str, text: &str) {
    if text.trim().chars().count() > MAX_TEXT_AREA {
        errors.push(path, format!("must be at most {MAX_TEXT_AREA} characters"));
    }
}

/// Any combination of flags is allowed; repeating one is not.
pub fn check_status_list(errors: &mut ValidationError, path: &str, status: &[Status]) {
    for (i, flag) in status.iter().enumerate() {
        if status[..i].contains(flag) {
            errors.push(path, "Cannot have duplicate status");
            return;
        }
    }
}

pub fn check_range<T: PartialOrd + Display + Copy>(
    errors: &mut ValidationError,
    path: &str,
    value: T,
    min: T,
    max: T,
) {
    if value < min {
        errors.push(path, format!("must be at least {min}"));
    } else if value > max {
        errors.push(path, format!("must be at most {max}"));
    }
}

pub fn check_float_range(errors: &mut ValidationError, path: &str, value: f64, min: f64, max: f64) {
    if value.is_finite() {
        check_range(errors, path, value, min, max);
    } else {
        errors.push(path, "must be a finite number");
    }
}
