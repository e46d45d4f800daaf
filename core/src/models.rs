use std::fmt;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ValidationError;
use crate::schema::{
    Duration, ExerciseInput, LogLevel, MAX_BLOOD_PRESSURE, MAX_BODY_MEASUREMENT, MAX_BODY_WEIGHT,
    MAX_CALORIES, MAX_CALORIES_BURNED, MAX_CHOLESTEROL, MAX_CLIMBING_ATTEMPTS, MAX_DURATION_SEC,
    MAX_NUTRITION, MAX_PERCENT, MAX_REPS, MAX_REST_TIMER, MAX_RPE, MAX_SETS, MAX_TABATA_SECONDS,
    MAX_TEMPERATURE, MAX_WEIGHT, MIN_BLOOD_PRESSURE, MIN_REST_TIMER, MIN_TEMPERATURE,
    MeasurementField, PlanId, SettingId, Status, Validate, check_float_range, check_id,
    check_range, check_status_list, check_text_area, check_text_line, check_timestamp,
    field_path,
};

pub type Id = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

#[must_use]
pub fn now_ms() -> Timestamp {
    Utc::now().timestamp_millis()
}

// --- Tables ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Table {
    Settings,
    Logs,
    Plans,
    Measurements,
    Exercises,
    ExerciseResults,
    Workouts,
    WorkoutResults,
}

impl Table {
    pub const ALL: &'static [Table] = &[
        Table::Settings,
        Table::Logs,
        Table::Plans,
        Table::Measurements,
        Table::Exercises,
        Table::ExerciseResults,
        Table::Workouts,
        Table::WorkoutResults,
    ];

    /// URL-slug form, as used in backups and on the command line.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Table::Settings => "settings",
            Table::Logs => "logs",
            Table::Plans => "plans",
            Table::Measurements => "measurements",
            Table::Exercises => "exercises",
            Table::ExerciseResults => "exercise-results",
            Table::Workouts => "workouts",
            Table::WorkoutResults => "workout-results",
        }
    }

    #[must_use]
    pub fn sql_name(self) -> &'static str {
        match self {
            Table::ExerciseResults => "exercise_results",
            Table::WorkoutResults => "workout_results",
            other => other.as_str(),
        }
    }

    #[must_use]
    pub fn id_prefix(self) -> &'static str {
        match self {
            Table::Settings => "set-",
            Table::Logs => "log-",
            Table::Plans => "pln-",
            Table::Measurements => "msr-",
            Table::Exercises => "exs-",
            Table::ExerciseResults => "exr-",
            Table::Workouts => "wko-",
            Table::WorkoutResults => "wkr-",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Table {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase().replace('_', "-");
        Table::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::single("table", format!("unknown table '{s}'")))
    }
}

/// A fresh `<prefix><uuid>` id for `table`.
#[must_use]
pub fn create_id(table: Table) -> Id {
    format!("{}{}", table.id_prefix(), Uuid::new_v4())
}

// --- Record traits ---

/// A row of one table. The store persists the serialized record and projects
/// `created_at`, `name` and `parent_id` into indexed columns.
pub trait Record: Serialize + DeserializeOwned + Validate + Clone {
    const TABLE: Table;

    fn id(&self) -> &str;

    /// `None` for settings, which carry no timestamp.
    fn created_at(&self) -> Option<Timestamp>;

    fn name(&self) -> Option<&str> {
        None
    }

    fn parent_id(&self) -> Option<&str> {
        None
    }
}

/// Records carrying a status flag list.
pub trait Flagged: Record {
    fn status(&self) -> &[Status];

    fn status_mut(&mut self) -> &mut Vec<Status>;

    fn has_status(&self, flag: Status) -> bool {
        self.status().contains(&flag)
    }

    /// Add or remove `flag` without ever introducing a duplicate.
    fn set_status(&mut self, flag: Status, on: bool) {
        let status = self.status_mut();
        if on {
            if !status.contains(&flag) {
                status.push(flag);
            }
        } else {
            status.retain(|f| *f != flag);
        }
    }
}

/// A parent table whose rows cache their latest non-locked child.
pub trait Parent: Flagged {
    type Child: Flagged;

    fn last_child(&self) -> Option<&Self::Child>;

    fn set_last_child(&mut self, child: Option<Self::Child>);
}

// --- Settings ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Duration(Duration),
}

impl SettingValue {
    #[must_use]
    pub fn as_bool(self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(b),
            SettingValue::Duration(_) => None,
        }
    }

    #[must_use]
    pub fn as_duration(self) -> Option<Duration> {
        match self {
            SettingValue::Duration(d) => Some(d),
            SettingValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Duration(d) => write!(f, "{d}"),
        }
    }
}

impl SettingId {
    #[must_use]
    pub fn default_value(self) -> SettingValue {
        match self {
            SettingId::AdvancedMode | SettingId::ConsoleLogs => SettingValue::Bool(false),
            SettingId::InstructionsOverlay | SettingId::InfoMessages => SettingValue::Bool(true),
            SettingId::LogRetentionDuration => SettingValue::Duration(Duration::SixMonths),
        }
    }
}

/// App-wide setting, one row per [`SettingId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub id: SettingId,
    pub value: SettingValue,
}

impl Setting {
    #[must_use]
    pub fn new(id: SettingId, value: SettingValue) -> Self {
        Self { id, value }
    }

    #[must_use]
    pub fn with_default(id: SettingId) -> Self {
        Self::new(id, id.default_value())
    }
}

impl Validate for Setting {
    // Id and value are closed enumerations; decoding already enforces both.
    fn collect_issues(&self, _path: &str, _errors: &mut ValidationError) {}
}

impl Record for Setting {
    const TABLE: Table = Table::Settings;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn created_at(&self) -> Option<Timestamp> {
        None
    }
}

// --- Logs ---

/// Plain-data snapshot of an error, stored as a log's details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapturedError {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub stack: String,
}

impl CapturedError {
    /// Name is the error's type name, message its `Display` output, and the
    /// stack its rendered `source()` chain, or its `Debug` output when it
    /// has no source.
    pub fn from_error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        let type_name = std::any::type_name::<E>();
        let name = type_name
            .split('<')
            .next()
            .and_then(|path| path.rsplit("::").next())
            .unwrap_or(type_name)
            .to_string();

        let mut chain = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            chain.push(format!("caused by: {cause}"));
            source = cause.source();
        }

        Self {
            name,
            message: err.to_string(),
            stack: if chain.is_empty() {
                format!("{err:?}")
            } else {
                chain.join("\n")
            },
        }
    }

    fn into_details(self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name));
        map.insert("message".to_string(), Value::String(self.message));
        map.insert("stack".to_string(), Value::String(self.stack));
        Value::Object(map)
    }
}

/// What a caller may attach to a log. Nothing here is rejected.
#[derive(Debug, Clone, Default)]
pub enum LogDetails {
    #[default]
    None,
    Map(Map<String, Value>),
    Error(CapturedError),
    Other(Value),
}

impl From<Map<String, Value>> for LogDetails {
    fn from(map: Map<String, Value>) -> Self {
        LogDetails::Map(map)
    }
}

impl From<CapturedError> for LogDetails {
    fn from(err: CapturedError) -> Self {
        LogDetails::Error(err)
    }
}

impl From<Value> for LogDetails {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => LogDetails::None,
            Value::Object(map) => LogDetails::Map(map),
            other => LogDetails::Other(other),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewLog {
    pub log_level: LogLevel,
    pub label: String,
    pub details: LogDetails,
}

/// Internal app log entry; immutable once written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: Id,
    pub created_at: Timestamp,
    pub log_level: LogLevel,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl Log {
    #[must_use]
    pub fn new(params: NewLog) -> Self {
        let details = match params.details {
            LogDetails::None => None,
            LogDetails::Map(map) => Some(Value::Object(map)),
            LogDetails::Error(err) => Some(err.into_details()),
            LogDetails::Other(value) => Some(value),
        };
        Self {
            id: create_id(Table::Logs),
            created_at: now_ms(),
            log_level: params.log_level,
            label: params.label,
            details,
        }
    }
}

impl Validate for Log {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
    }
}

impl Record for Log {
    const TABLE: Table = Table::Logs;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }
}

// --- Plans ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    pub id: PlanId,
    pub created_at: Timestamp,
}

impl Plan {
    #[must_use]
    pub fn new(id: PlanId) -> Self {
        Self {
            id,
            created_at: now_ms(),
        }
    }
}

impl Validate for Plan {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
    }
}

impl Record for Plan {
    const TABLE: Table = Table::Plans;

    fn id(&self) -> &str {
        self.id.as_str()
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }
}

// --- Measurements ---

impl MeasurementField {
    /// The measurement attributes (by serialized name) a field populates.
    #[must_use]
    pub fn attributes(self) -> &'static [&'static str] {
        match self {
            MeasurementField::Calories => &["calories"],
            MeasurementField::Carbs => &["carbs"],
            MeasurementField::Fat => &["fat"],
            MeasurementField::Protein => &["protein"],
            MeasurementField::BodyWeight => &["bodyWeight"],
            MeasurementField::BodyFat => &["bodyFat"],
            MeasurementField::Temperature => &["temperature"],
            MeasurementField::BloodPressure => &["bloodPressureSystolic", "bloodPressureDiastolic"],
            MeasurementField::BloodOxygen => &["bloodOxygen"],
            MeasurementField::Neck => &["neck"],
            MeasurementField::Shoulders => &["shoulders"],
            MeasurementField::Chest => &["chest"],
            MeasurementField::Waist => &["waist"],
            MeasurementField::Biceps => &["leftBicep", "rightBicep"],
            MeasurementField::Forearms => &["leftForearm", "rightForearm"],
            MeasurementField::Thighs => &["leftThigh", "rightThigh"],
            MeasurementField::Calves => &["leftCalf", "rightCalf"],
            MeasurementField::Cholesterol => &["cholesterol"],
            MeasurementField::CholesterolHdl => &["cholesterolHDL"],
            MeasurementField::CholesterolLdl => &["cholesterolLDL"],
            MeasurementField::HemoglobinA1c => &["hemoglobinA1C"],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementValues {
    // Diet
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calories: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fat: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protein: Option<u32>,
    // Weight
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_weight: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_fat: Option<f64>,
    // Health
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure_systolic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_pressure_diastolic: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_oxygen: Option<f64>,
    // Body
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neck: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shoulders: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chest: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub waist: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_bicep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_bicep: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_forearm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_forearm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_thigh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_thigh: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left_calf: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right_calf: Option<f64>,
    // Lab work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cholesterol: Option<u32>,
    #[serde(default, rename = "cholesterolHDL", skip_serializing_if = "Option::is_none")]
    pub cholesterol_hdl: Option<u32>,
    #[serde(default, rename = "cholesterolLDL", skip_serializing_if = "Option::is_none")]
    pub cholesterol_ldl: Option<u32>,
    #[serde(default, rename = "hemoglobinA1C", skip_serializing_if = "Option::is_none")]
    pub hemoglobin_a1c: Option<f64>,
}

enum Reading {
    Int(u32),
    Float(f64),
}

impl MeasurementValues {
    fn readings(&self) -> Vec<(&'static str, Reading)> {
        let ints = [
            ("calories", self.calories),
            ("carbs", self.carbs),
            ("fat", self.fat),
            ("protein", self.protein),
            ("bloodPressureSystolic", self.blood_pressure_systolic),
            ("bloodPressureDiastolic", self.blood_pressure_diastolic),
            ("cholesterol", self.cholesterol),
            ("cholesterolHDL", self.cholesterol_hdl),
            ("cholesterolLDL", self.cholesterol_ldl),
        ];
        let floats = [
            ("bodyWeight", self.body_weight),
            ("bodyFat", self.body_fat),
            ("temperature", self.temperature),
            ("bloodOxygen", self.blood_oxygen),
            ("neck", self.neck),
            ("shoulders", self.shoulders),
            ("chest", self.chest),
            ("waist", self.waist),
            ("leftBicep", self.left_bicep),
            ("rightBicep", self.right_bicep),
            ("leftForearm", self.left_forearm),
            ("rightForearm", self.right_forearm),
            ("leftThigh", self.left_thigh),
            ("rightThigh", self.right_thigh),
            ("leftCalf", self.left_calf),
            ("rightCalf", self.right_calf),
            ("hemoglobinA1C", self.hemoglobin_a1c),
        ];
        ints.into_iter()
            .filter_map(|(name, v)| v.map(|v| (name, Reading::Int(v))))
            .chain(
                floats
                    .into_iter()
                    .filter_map(|(name, v)| v.map(|v| (name, Reading::Float(v)))),
            )
            .collect()
    }

    /// Serialized names of every populated attribute.
    #[must_use]
    pub fn populated(&self) -> Vec<&'static str> {
        self.readings().into_iter().map(|(name, _)| name).collect()
    }

    /// Set a single attribute by serialized name. Integer attributes take
    /// only finite, non-negative whole numbers; anything else is an issue at
    /// the attribute's path and nothing is stored.
    pub fn set(&mut self, name: &str, value: f64) -> Result<(), ValidationError> {
        if !Self::is_attribute(name) {
            return Err(ValidationError::single(name, "is not a measurement attribute"));
        }
        let int = if Self::is_integer_attribute(name) {
            Some(whole_reading(name, value)?)
        } else {
            None
        };
        let float = Some(value);
        match name {
            "calories" => self.calories = int,
            "carbs" => self.carbs = int,
            "fat" => self.fat = int,
            "protein" => self.protein = int,
            "bodyWeight" => self.body_weight = float,
            "bodyFat" => self.body_fat = float,
            "temperature" => self.temperature = float,
            "bloodPressureSystolic" => self.blood_pressure_systolic = int,
            "bloodPressureDiastolic" => self.blood_pressure_diastolic = int,
            "bloodOxygen" => self.blood_oxygen = float,
            "neck" => self.neck = float,
            "shoulders" => self.shoulders = float,
            "chest" => self.chest = float,
            "waist" => self.waist = float,
            "leftBicep" => self.left_bicep = float,
            "rightBicep" => self.right_bicep = float,
            "leftForearm" => self.left_forearm = float,
            "rightForearm" => self.right_forearm = float,
            "leftThigh" => self.left_thigh = float,
            "rightThigh" => self.right_thigh = float,
            "leftCalf" => self.left_calf = float,
            "rightCalf" => self.right_calf = float,
            "cholesterol" => self.cholesterol = int,
            "cholesterolHDL" => self.cholesterol_hdl = int,
            "cholesterolLDL" => self.cholesterol_ldl = int,
            "hemoglobinA1C" => self.hemoglobin_a1c = float,
            _ => {}
        }
        Ok(())
    }

    fn is_integer_attribute(name: &str) -> bool {
        INTEGER_ATTRIBUTES.contains(&name)
    }

    fn is_attribute(name: &str) -> bool {
        Self::is_integer_attribute(name) || FLOAT_ATTRIBUTES.contains(&name)
    }
}

const INTEGER_ATTRIBUTES: [&str; 9] = [
    "calories",
    "carbs",
    "fat",
    "protein",
    "bloodPressureSystolic",
    "bloodPressureDiastolic",
    "cholesterol",
    "cholesterolHDL",
    "cholesterolLDL",
];

const FLOAT_ATTRIBUTES: [&str; 17] = [
    "bodyWeight",
    "bodyFat",
    "temperature",
    "bloodOxygen",
    "neck",
    "shoulders",
    "chest",
    "waist",
    "leftBicep",
    "rightBicep",
    "leftForearm",
    "rightForearm",
    "leftThigh",
    "rightThigh",
    "leftCalf",
    "rightCalf",
    "hemoglobinA1C",
];

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_reading(name: &str, value: f64) -> Result<u32, ValidationError> {
    if !value.is_finite() {
        Err(ValidationError::single(name, "must be a finite number"))
    } else if value < 0.0 {
        Err(ValidationError::single(name, "must be at least 0"))
    } else if value.fract() != 0.0 {
        Err(ValidationError::single(name, "must be a whole number"))
    } else if value > f64::from(u32::MAX) {
        Err(ValidationError::single(name, format!("must be at most {}", u32::MAX)))
    } else {
        Ok(value as u32)
    }
}

fn check_reading(errors: &mut ValidationError, path: &str, name: &str, reading: &Reading) {
    match (name, reading) {
        ("calories", Reading::Int(v)) => check_range(errors, path, *v, 0, MAX_CALORIES),
        ("carbs" | "fat" | "protein", Reading::Int(v)) => {
            check_range(errors, path, *v, 0, MAX_NUTRITION);
        }
        ("bloodPressureSystolic" | "bloodPressureDiastolic", Reading::Int(v)) => {
            check_range(errors, path, *v, MIN_BLOOD_PRESSURE, MAX_BLOOD_PRESSURE);
        }
        ("cholesterol" | "cholesterolHDL" | "cholesterolLDL", Reading::Int(v)) => {
            check_range(errors, path, *v, 0, MAX_CHOLESTEROL);
        }
        ("bodyWeight", Reading::Float(v)) => {
            if *v <= 0.0 {
                errors.push(path, "must be greater than 0");
            } else {
                check_float_range(errors, path, *v, 0.0, MAX_BODY_WEIGHT);
            }
        }
        ("bodyFat" | "bloodOxygen" | "hemoglobinA1C", Reading::Float(v)) => {
            check_float_range(errors, path, *v, 0.0, MAX_PERCENT);
        }
        ("temperature", Reading::Float(v)) => {
            check_float_range(errors, path, *v, MIN_TEMPERATURE, MAX_TEMPERATURE);
        }
        (_, Reading::Float(v)) => check_float_range(errors, path, *v, 0.0, MAX_BODY_MEASUREMENT),
        (_, Reading::Int(_)) => {}
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewMeasurement {
    pub id: Option<Id>,
    pub created_at: Option<Timestamp>,
    pub note: Option<String>,
    pub values: MeasurementValues,
}

/// A single reading in one measurement category. Only the attributes that
/// belong to `field` are populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    pub id: Id,
    pub created_at: Timestamp,
    #[serde(default)]
    pub note: String,
    pub field: MeasurementField,
    #[serde(flatten)]
    pub values: MeasurementValues,
}

impl Measurement {
    #[must_use]
    pub fn new(field: MeasurementField, params: NewMeasurement) -> Self {
        Self {
            id: params.id.unwrap_or_else(|| create_id(Table::Measurements)),
            created_at: params.created_at.unwrap_or_else(now_ms),
            note: params.note.unwrap_or_default(),
            field,
            values: params.values,
        }
    }
}

impl Validate for Measurement {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
        check_text_area(errors, &field_path(path, "note"), &self.note);

        let relevant = self.field.attributes();
        for (name, reading) in self.values.readings() {
            let attr_path = field_path(path, name);
            if relevant.contains(&name) {
                check_reading(errors, &attr_path, name, &reading);
            } else {
                errors.push(attr_path, format!("not used by {} measurements", self.field));
            }
        }
    }
}

impl Record for Measurement {
    const TABLE: Table = Table::Measurements;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }
}

// --- Exercise results ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChecklistSet {
    pub label: String,
    pub checked: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardioSet {
    pub duration_seconds: u32,
    pub calories_burned: u32,
    pub rpe: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightSet {
    /// May be fractional.
    pub weight: f64,
    pub reps: u32,
    pub rpe: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SidedWeightSet {
    pub left: WeightSet,
    pub right: WeightSet,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClimbingSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listed_grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub my_grade: Option<String>,
    #[serde(default)]
    pub styles: Vec<String>,
    pub attempts: u32,
    pub topped: bool,
}

impl Validate for ChecklistSet {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_text_line(errors, &field_path(path, "label"), &self.label);
    }
}

impl Validate for CardioSet {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_range(
            errors,
            &field_path(path, "durationSeconds"),
            self.duration_seconds,
            0,
            MAX_DURATION_SEC,
        );
        check_range(
            errors,
            &field_path(path, "caloriesBurned"),
            self.calories_burned,
            0,
            MAX_CALORIES_BURNED,
        );
        check_range(errors, &field_path(path, "rpe"), self.rpe, 0, MAX_RPE);
    }
}

impl Validate for WeightSet {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_float_range(errors, &field_path(path, "weight"), self.weight, 0.0, MAX_WEIGHT);
        check_range(errors, &field_path(path, "reps"), self.reps, 0, MAX_REPS);
        check_range(errors, &field_path(path, "rpe"), self.rpe, 0, MAX_RPE);
    }
}

impl Validate for SidedWeightSet {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        self.left.collect_issues(&field_path(path, "left"), errors);
        self.right.collect_issues(&field_path(path, "right"), errors);
    }
}

impl Validate for ClimbingSet {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        if let Some(grade) = &self.listed_grade {
            check_text_line(errors, &field_path(path, "listedGrade"), grade);
        }
        if let Some(grade) = &self.my_grade {
            check_text_line(errors, &field_path(path, "myGrade"), grade);
        }
        for (i, style) in self.styles.iter().enumerate() {
            check_text_line(errors, &format!("{}[{i}]", field_path(path, "styles")), style);
        }
        check_range(
            errors,
            &field_path(path, "attempts"),
            self.attempts,
            0,
            MAX_CLIMBING_ATTEMPTS,
        );
    }
}

/// The set list of one result, tagged by the input kind it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub enum SetList {
    Checklist(Vec<ChecklistSet>),
    Cardio(Vec<CardioSet>),
    Weight(Vec<WeightSet>),
    SidedWeight(Vec<SidedWeightSet>),
    Climbing(Vec<ClimbingSet>),
}

impl SetList {
    #[must_use]
    pub fn empty(input: ExerciseInput) -> Self {
        match input {
            ExerciseInput::Checklist => SetList::Checklist(Vec::new()),
            ExerciseInput::Cardio => SetList::Cardio(Vec::new()),
            ExerciseInput::Weight => SetList::Weight(Vec::new()),
            ExerciseInput::SidedWeight => SetList::SidedWeight(Vec::new()),
            ExerciseInput::ClimbingSession => SetList::Climbing(Vec::new()),
        }
    }

    #[must_use]
    pub fn input(&self) -> ExerciseInput {
        match self {
            SetList::Checklist(_) => ExerciseInput::Checklist,
            SetList::Cardio(_) => ExerciseInput::Cardio,
            SetList::Weight(_) => ExerciseInput::Weight,
            SetList::SidedWeight(_) => ExerciseInput::SidedWeight,
            SetList::Climbing(_) => ExerciseInput::ClimbingSession,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            SetList::Checklist(s) => s.len(),
            SetList::Cardio(s) => s.len(),
            SetList::Weight(s) => s.len(),
            SetList::SidedWeight(s) => s.len(),
            SetList::Climbing(s) => s.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone)]
pub struct NewExerciseResult {
    pub parent_id: Id,
    pub sets: SetList,
    pub id: Option<Id>,
    pub created_at: Option<Timestamp>,
    pub status: Vec<Status>,
    pub note: Option<String>,
}

impl NewExerciseResult {
    #[must_use]
    pub fn new(parent_id: impl Into<Id>, sets: SetList) -> Self {
        Self {
            parent_id: parent_id.into(),
            sets,
            id: None,
            created_at: None,
            status: Vec::new(),
            note: None,
        }
    }
}

/// One recorded performance of an exercise. Exactly one set list is present
/// and it matches the parent exercise's `inputs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResult {
    pub id: Id,
    pub created_at: Timestamp,
    #[serde(default)]
    pub status: Vec<Status>,
    pub parent_id: Id,
    #[serde(default)]
    pub note: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklist_sets: Option<Vec<ChecklistSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardio_sets: Option<Vec<CardioSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_sets: Option<Vec<WeightSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sided_weight_sets: Option<Vec<SidedWeightSet>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub climbing_sets: Option<Vec<ClimbingSet>>,
}

impl ExerciseResult {
    #[must_use]
    pub fn new(params: NewExerciseResult) -> Self {
        let mut result = Self {
            id: params.id.unwrap_or_else(|| create_id(Table::ExerciseResults)),
            created_at: params.created_at.unwrap_or_else(now_ms),
            status: params.status,
            parent_id: params.parent_id,
            note: params.note.unwrap_or_default(),
            checklist_sets: None,
            cardio_sets: None,
            weight_sets: None,
            sided_weight_sets: None,
            climbing_sets: None,
        };
        result.set_sets(params.sets);
        result
    }

    /// Replace the result's sets, clearing every other set list.
    pub fn set_sets(&mut self, sets: SetList) {
        self.checklist_sets = None;
        self.cardio_sets = None;
        self.weight_sets = None;
        self.sided_weight_sets = None;
        self.climbing_sets = None;
        match sets {
            SetList::Checklist(s) => self.checklist_sets = Some(s),
            SetList::Cardio(s) => self.cardio_sets = Some(s),
            SetList::Weight(s) => self.weight_sets = Some(s),
            SetList::SidedWeight(s) => self.sided_weight_sets = Some(s),
            SetList::Climbing(s) => self.climbing_sets = Some(s),
        }
    }

    fn present_inputs(&self) -> Vec<ExerciseInput> {
        [
            (self.checklist_sets.is_some(), ExerciseInput::Checklist),
            (self.cardio_sets.is_some(), ExerciseInput::Cardio),
            (self.weight_sets.is_some(), ExerciseInput::Weight),
            (self.sided_weight_sets.is_some(), ExerciseInput::SidedWeight),
            (self.climbing_sets.is_some(), ExerciseInput::ClimbingSession),
        ]
        .into_iter()
        .filter_map(|(present, input)| present.then_some(input))
        .collect()
    }

    /// The input kind of the single present set list, if exactly one is.
    #[must_use]
    pub fn input_kind(&self) -> Option<ExerciseInput> {
        match self.present_inputs().as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// A copy of the single present set list, if exactly one is.
    #[must_use]
    pub fn sets(&self) -> Option<SetList> {
        let sets = match self.input_kind()? {
            ExerciseInput::Checklist => SetList::Checklist(self.checklist_sets.clone()?),
            ExerciseInput::Cardio => SetList::Cardio(self.cardio_sets.clone()?),
            ExerciseInput::Weight => SetList::Weight(self.weight_sets.clone()?),
            ExerciseInput::SidedWeight => SetList::SidedWeight(self.sided_weight_sets.clone()?),
            ExerciseInput::ClimbingSession => SetList::Climbing(self.climbing_sets.clone()?),
        };
        Some(sets)
    }

    #[must_use]
    pub fn set_count(&self) -> usize {
        [
            self.checklist_sets.as_ref().map(Vec::len),
            self.cardio_sets.as_ref().map(Vec::len),
            self.weight_sets.as_ref().map(Vec::len),
            self.sided_weight_sets.as_ref().map(Vec::len),
            self.climbing_sets.as_ref().map(Vec::len),
        ]
        .into_iter()
        .flatten()
        .sum()
    }
}

impl Validate for ExerciseResult {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
        check_status_list(errors, &field_path(path, "status"), &self.status);
        check_id(errors, &field_path(path, "parentId"), &self.parent_id);
        check_text_area(errors, &field_path(path, "note"), &self.note);

        let present = self.present_inputs().len();
        if present != 1 {
            errors.push(
                field_path(path, "sets"),
                format!("exactly one set list must be present, found {present}"),
            );
        }
        self.checklist_sets
            .collect_issues(&field_path(path, "checklistSets"), errors);
        self.cardio_sets
            .collect_issues(&field_path(path, "cardioSets"), errors);
        self.weight_sets
            .collect_issues(&field_path(path, "weightSets"), errors);
        self.sided_weight_sets
            .collect_issues(&field_path(path, "sidedWeightSets"), errors);
        self.climbing_sets
            .collect_issues(&field_path(path, "climbingSets"), errors);
    }
}

impl Record for ExerciseResult {
    const TABLE: Table = Table::ExerciseResults;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.parent_id)
    }
}

impl Flagged for ExerciseResult {
    fn status(&self) -> &[Status] {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Vec<Status> {
        &mut self.status
    }
}

// --- Exercises ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestTimer {
    pub default_duration_seconds: u32,
}

impl Validate for RestTimer {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_range(
            errors,
            &field_path(path, "defaultDurationSeconds"),
            self.default_duration_seconds,
            MIN_REST_TIMER,
            MAX_REST_TIMER,
        );
    }
}

/// Interval timer configuration, all durations in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabataTimer {
    pub prepare: u32,
    pub work: u32,
    pub rest: u32,
    pub sets: u32,
    pub rounds: u32,
    pub rest_between_sets: u32,
    pub rest_between_rounds: u32,
}

impl Validate for TabataTimer {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        let seconds = [
            ("prepare", self.prepare, 0),
            ("work", self.work, 1),
            ("rest", self.rest, 0),
            ("restBetweenSets", self.rest_between_sets, 0),
            ("restBetweenRounds", self.rest_between_rounds, 0),
        ];
        for (name, value, min) in seconds {
            check_range(errors, &field_path(path, name), value, min, MAX_TABATA_SECONDS);
        }
        check_range(errors, &field_path(path, "sets"), self.sets, 1, MAX_SETS);
        check_range(errors, &field_path(path, "rounds"), self.rounds, 1, MAX_SETS);
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewExercise {
    pub id: Option<Id>,
    pub created_at: Option<Timestamp>,
    pub status: Vec<Status>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub inputs: Option<ExerciseInput>,
    pub initial_set_count: Option<u32>,
    pub rest_timer: Option<RestTimer>,
    pub tabata_timer: Option<TabataTimer>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: Id,
    pub created_at: Timestamp,
    #[serde(default)]
    pub status: Vec<Status>,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_child: Option<ExerciseResult>,
    pub inputs: ExerciseInput,
    pub initial_set_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_timer: Option<RestTimer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabata_timer: Option<TabataTimer>,
}

impl Exercise {
    pub const DEFAULT_NAME: &'static str = "My Exercise";

    #[must_use]
    pub fn new(params: NewExercise) -> Self {
        Self {
            id: params.id.unwrap_or_else(|| create_id(Table::Exercises)),
            created_at: params.created_at.unwrap_or_else(now_ms),
            status: params.status,
            name: params.name.unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            desc: params.desc.unwrap_or_default(),
            last_child: None,
            inputs: params.inputs.unwrap_or(ExerciseInput::Checklist),
            initial_set_count: params.initial_set_count.unwrap_or(1),
            rest_timer: params.rest_timer,
            tabata_timer: params.tabata_timer,
        }
    }
}

impl Validate for Exercise {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
        check_status_list(errors, &field_path(path, "status"), &self.status);
        check_text_line(errors, &field_path(path, "name"), &self.name);
        check_text_area(errors, &field_path(path, "desc"), &self.desc);
        self.last_child
            .collect_issues(&field_path(path, "lastChild"), errors);
        check_range(
            errors,
            &field_path(path, "initialSetCount"),
            self.initial_set_count,
            1,
            MAX_SETS,
        );
        self.rest_timer
            .collect_issues(&field_path(path, "restTimer"), errors);
        self.tabata_timer
            .collect_issues(&field_path(path, "tabataTimer"), errors);
    }
}

impl Record for Exercise {
    const TABLE: Table = Table::Exercises;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Flagged for Exercise {
    fn status(&self) -> &[Status] {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Vec<Status> {
        &mut self.status
    }
}

impl Parent for Exercise {
    type Child = ExerciseResult;

    fn last_child(&self) -> Option<&ExerciseResult> {
        self.last_child.as_ref()
    }

    fn set_last_child(&mut self, child: Option<ExerciseResult>) {
        self.last_child = child;
    }
}

// --- Workout results ---

/// Result ids for one exercise group; `None` marks a skipped exercise.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResultGroup {
    pub exercise_result_ids: Vec<Option<Id>>,
}

impl Validate for ExerciseResultGroup {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        let ids_path = field_path(path, "exerciseResultIds");
        for (i, id) in self.exercise_result_ids.iter().enumerate() {
            if let Some(id) = id {
                check_id(errors, &format!("{ids_path}[{i}]"), id);
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkoutResult {
    pub id: Option<Id>,
    pub created_at: Option<Timestamp>,
    pub status: Vec<Status>,
    pub note: Option<String>,
    pub finished_at: Option<Timestamp>,
    pub warmup_result_groups: Vec<ExerciseResultGroup>,
    pub cooldown_result_groups: Vec<ExerciseResultGroup>,
    pub exercise_result_groups: Vec<ExerciseResultGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResult {
    pub id: Id,
    pub created_at: Timestamp,
    #[serde(default)]
    pub status: Vec<Status>,
    pub parent_id: Id,
    #[serde(default)]
    pub note: String,
    /// Absent while the workout is in progress.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<Timestamp>,
    #[serde(default)]
    pub warmup_result_groups: Vec<ExerciseResultGroup>,
    #[serde(default)]
    pub cooldown_result_groups: Vec<ExerciseResultGroup>,
    #[serde(default)]
    pub exercise_result_groups: Vec<ExerciseResultGroup>,
}

impl WorkoutResult {
    #[must_use]
    pub fn new(parent_id: impl Into<Id>, params: NewWorkoutResult) -> Self {
        Self {
            id: params.id.unwrap_or_else(|| create_id(Table::WorkoutResults)),
            created_at: params.created_at.unwrap_or_else(now_ms),
            status: params.status,
            parent_id: parent_id.into(),
            note: params.note.unwrap_or_default(),
            finished_at: params.finished_at,
            warmup_result_groups: params.warmup_result_groups,
            cooldown_result_groups: params.cooldown_result_groups,
            exercise_result_groups: params.exercise_result_groups,
        }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished_at.is_some()
    }
}

impl Validate for WorkoutResult {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
        check_status_list(errors, &field_path(path, "status"), &self.status);
        check_id(errors, &field_path(path, "parentId"), &self.parent_id);
        check_text_area(errors, &field_path(path, "note"), &self.note);
        if let Some(finished_at) = self.finished_at {
            check_timestamp(errors, &field_path(path, "finishedAt"), finished_at);
        }
        self.warmup_result_groups
            .collect_issues(&field_path(path, "warmupResultGroups"), errors);
        self.cooldown_result_groups
            .collect_issues(&field_path(path, "cooldownResultGroups"), errors);
        self.exercise_result_groups
            .collect_issues(&field_path(path, "exerciseResultGroups"), errors);
    }
}

impl Record for WorkoutResult {
    const TABLE: Table = Table::WorkoutResults;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn parent_id(&self) -> Option<&str> {
        Some(&self.parent_id)
    }
}

impl Flagged for WorkoutResult {
    fn status(&self) -> &[Status] {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Vec<Status> {
        &mut self.status
    }
}

// --- Workouts ---

/// Exercises performed together; two or more ids make a superset.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseGroup {
    pub exercise_ids: Vec<Id>,
}

impl ExerciseGroup {
    #[must_use]
    pub fn is_superset(&self) -> bool {
        self.exercise_ids.len() >= 2
    }
}

impl Validate for ExerciseGroup {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        let ids_path = field_path(path, "exerciseIds");
        for (i, id) in self.exercise_ids.iter().enumerate() {
            check_id(errors, &format!("{ids_path}[{i}]"), id);
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct NewWorkout {
    pub id: Option<Id>,
    pub created_at: Option<Timestamp>,
    pub status: Vec<Status>,
    pub name: Option<String>,
    pub desc: Option<String>,
    pub warmup_groups: Vec<ExerciseGroup>,
    pub cooldown_groups: Vec<ExerciseGroup>,
    pub exercise_groups: Vec<ExerciseGroup>,
    pub next_workout_ids: Vec<Id>,
}

/// A workout template; its results are [`WorkoutResult`] rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workout {
    pub id: Id,
    pub created_at: Timestamp,
    #[serde(default)]
    pub status: Vec<Status>,
    pub name: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_child: Option<WorkoutResult>,
    #[serde(default)]
    pub warmup_groups: Vec<ExerciseGroup>,
    #[serde(default)]
    pub cooldown_groups: Vec<ExerciseGroup>,
    #[serde(default)]
    pub exercise_groups: Vec<ExerciseGroup>,
    #[serde(default)]
    pub next_workout_ids: Vec<Id>,
}

impl Workout {
    pub const DEFAULT_NAME: &'static str = "My Workout";

    #[must_use]
    pub fn new(params: NewWorkout) -> Self {
        Self {
            id: params.id.unwrap_or_else(|| create_id(Table::Workouts)),
            created_at: params.created_at.unwrap_or_else(now_ms),
            status: params.status,
            name: params.name.unwrap_or_else(|| Self::DEFAULT_NAME.to_string()),
            desc: params.desc.unwrap_or_default(),
            last_child: None,
            warmup_groups: params.warmup_groups,
            cooldown_groups: params.cooldown_groups,
            exercise_groups: params.exercise_groups,
            next_workout_ids: params.next_workout_ids,
        }
    }

    /// Every exercise id referenced by any group, in warmup, main, cooldown
    /// order.
    #[must_use]
    pub fn exercise_ids(&self) -> Vec<&str> {
        self.warmup_groups
            .iter()
            .chain(&self.exercise_groups)
            .chain(&self.cooldown_groups)
            .flat_map(|g| g.exercise_ids.iter().map(String::as_str))
            .collect()
    }
}

impl Validate for Workout {
    fn collect_issues(&self, path: &str, errors: &mut ValidationError) {
        check_id(errors, &field_path(path, "id"), &self.id);
        check_timestamp(errors, &field_path(path, "createdAt"), self.created_at);
        check_status_list(errors, &field_path(path, "status"), &self.status);
        check_text_line(errors, &field_path(path, "name"), &self.name);
        check_text_area(errors, &field_path(path, "desc"), &self.desc);
        self.last_child
            .collect_issues(&field_path(path, "lastChild"), errors);
        self.warmup_groups
            .collect_issues(&field_path(path, "warmupGroups"), errors);
        self.cooldown_groups
            .collect_issues(&field_path(path, "cooldownGroups"), errors);
        self.exercise_groups
            .collect_issues(&field_path(path, "exerciseGroups"), errors);
        let next_path = field_path(path, "nextWorkoutIds");
        for (i, id) in self.next_workout_ids.iter().enumerate() {
            check_id(errors, &format!("{next_path}[{i}]"), id);
        }
    }
}

impl Record for Workout {
    const TABLE: Table = Table::Workouts;

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> Option<Timestamp> {
        Some(self.created_at)
    }

    fn name(&self) -> Option<&str> {
        Some(&self.name)
    }
}

impl Flagged for Workout {
    fn status(&self) -> &[Status] {
        &self.status
    }

    fn status_mut(&mut self) -> &mut Vec<Status> {
        &mut self.status
    }
}

impl Parent for Workout {
    type Child = WorkoutResult;

    fn last_child(&self) -> Option<&WorkoutResult> {
        self.last_child.as_ref()
    }

    fn set_last_child(&mut self, child: Option<WorkoutResult>) {
        self.last_child = child;
    }
}
