use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local};

use liftbook_core::models::{
    CardioSet, ChecklistSet, ClimbingSet, ExerciseGroup, MeasurementValues, SetList,
    SidedWeightSet, Timestamp, WeightSet,
};
use liftbook_core::schema::{ExerciseInput, MeasurementField, Status};

/// Accepts the stored name ("Weight Exercise") or a short alias ("weight").
pub(crate) fn parse_input(s: &str) -> Result<ExerciseInput> {
    let input = match s.trim().to_lowercase().as_str() {
        "checklist" | "check" => ExerciseInput::Checklist,
        "cardio" => ExerciseInput::Cardio,
        "weight" | "weights" => ExerciseInput::Weight,
        "sided" | "sided-weight" => ExerciseInput::SidedWeight,
        "climbing" | "climb" => ExerciseInput::ClimbingSession,
        _ => s.parse()?,
    };
    Ok(input)
}

pub(crate) fn parse_status(s: &str) -> Result<Status> {
    Ok(s.parse()?)
}

pub(crate) fn parse_measurement_field(s: &str) -> Result<MeasurementField> {
    let normalized = s.trim().replace(['-', '_'], " ");
    Ok(normalized.parse()?)
}

/// Parse one set in the notation for `input`:
///
/// - checklist: `LABEL` or `LABEL:no` for an unchecked item
/// - cardio: `SECONDS[:CALORIES[:RPE]]`
/// - weight: `WEIGHTxREPS[@RPE]`
/// - sided weight: `LEFT/RIGHT`, each in weight notation
/// - climbing: `ATTEMPTS[:top][:GRADE]`
pub(crate) fn parse_sets(input: ExerciseInput, raw: &[String]) -> Result<SetList> {
    let sets = match input {
        ExerciseInput::Checklist => SetList::Checklist(collect(raw, parse_checklist_set)?),
        ExerciseInput::Cardio => SetList::Cardio(collect(raw, parse_cardio_set)?),
        ExerciseInput::Weight => SetList::Weight(collect(raw, parse_weight_set)?),
        ExerciseInput::SidedWeight => SetList::SidedWeight(collect(raw, parse_sided_set)?),
        ExerciseInput::ClimbingSession => SetList::Climbing(collect(raw, parse_climbing_set)?),
    };
    Ok(sets)
}

fn collect<T>(raw: &[String], parse: fn(&str) -> Result<T>) -> Result<Vec<T>> {
    raw.iter()
        .map(|s| parse(s.trim()).with_context(|| format!("Invalid set '{s}'")))
        .collect()
}

fn parse_checklist_set(s: &str) -> Result<ChecklistSet> {
    let (label, checked) = match s.rsplit_once(':') {
        Some((label, "no" | "n" | "skip")) => (label, false),
        Some((label, "yes" | "y" | "done")) => (label, true),
        _ => (s, true),
    };
    if label.is_empty() {
        bail!("Checklist item needs a label");
    }
    Ok(ChecklistSet {
        label: label.to_string(),
        checked,
    })
}

fn parse_cardio_set(s: &str) -> Result<CardioSet> {
    let mut parts = s.split(':');
    let duration_seconds = parse_u32(parts.next(), "duration")?;
    let calories_burned = parts.next().map_or(Ok(0), |p| parse_u32(Some(p), "calories"))?;
    let rpe = parts.next().map_or(Ok(0), |p| parse_u32(Some(p), "RPE"))?;
    if parts.next().is_some() {
        bail!("Expected SECONDS[:CALORIES[:RPE]]");
    }
    Ok(CardioSet {
        duration_seconds,
        calories_burned,
        rpe,
    })
}

fn parse_weight_set(s: &str) -> Result<WeightSet> {
    let (body, rpe) = match s.split_once('@') {
        Some((body, rpe)) => (body, parse_u32(Some(rpe), "RPE")?),
        None => (s, 0),
    };
    let body = body.to_lowercase();
    let Some((weight, reps)) = body.split_once('x').map(|(w, r)| (w.trim(), r.trim())) else {
        bail!("Expected WEIGHTxREPS[@RPE], e.g. 100x5@8");
    };
    let weight: f64 = weight
        .parse()
        .with_context(|| format!("Invalid weight: '{weight}'"))?;
    Ok(WeightSet {
        weight,
        reps: parse_u32(Some(reps), "reps")?,
        rpe,
    })
}

fn parse_sided_set(s: &str) -> Result<SidedWeightSet> {
    let Some((left, right)) = s.split_once('/') else {
        bail!("Expected LEFT/RIGHT, e.g. 20x10/20x9");
    };
    Ok(SidedWeightSet {
        left: parse_weight_set(left.trim())?,
        right: parse_weight_set(right.trim())?,
    })
}

fn parse_climbing_set(s: &str) -> Result<ClimbingSet> {
    let mut parts = s.split(':');
    let attempts = parse_u32(parts.next(), "attempts")?;
    let mut topped = false;
    let mut listed_grade = None;
    for part in parts {
        match part.trim() {
            "top" | "topped" | "sent" => topped = true,
            "" => {}
            grade => listed_grade = Some(grade.to_string()),
        }
    }
    Ok(ClimbingSet {
        listed_grade,
        my_grade: None,
        styles: Vec::new(),
        attempts,
        topped,
    })
}

fn parse_u32(part: Option<&str>, what: &str) -> Result<u32> {
    let part = part.map(str::trim).unwrap_or_default();
    part.parse()
        .with_context(|| format!("Invalid {what}: '{part}'"))
}

/// One group per argument; comma-separated ids form a superset.
pub(crate) fn parse_groups(raw: &[String]) -> Vec<ExerciseGroup> {
    raw.iter()
        .map(|g| ExerciseGroup {
            exercise_ids: g
                .split(',')
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(String::from)
                .collect(),
        })
        .collect()
}

/// Values for `field` as `attr=value` pairs. A field with a single attribute
/// also takes a bare number.
pub(crate) fn parse_measurement_values(
    field: MeasurementField,
    raw: &[String],
) -> Result<MeasurementValues> {
    let attributes = field.attributes();
    let mut values = MeasurementValues::default();
    for arg in raw {
        let (name, value) = match arg.split_once('=') {
            Some((name, value)) => {
                let name = name.trim();
                let Some(attr) = attributes
                    .iter()
                    .copied()
                    .find(|a| a.eq_ignore_ascii_case(name))
                else {
                    bail!(
                        "'{name}' is not recorded for {field}. Use one of: {}",
                        attributes.join(", ")
                    );
                };
                (attr, value)
            }
            None if attributes.len() == 1 => (attributes[0], arg.as_str()),
            None => bail!(
                "{field} takes named values: {}",
                attributes
                    .iter()
                    .map(|a| format!("{a}=N"))
                    .collect::<Vec<_>>()
                    .join(" ")
            ),
        };
        let value: f64 = value
            .trim()
            .parse()
            .with_context(|| format!("Invalid number: '{value}'"))?;
        values.set(name, value)?;
    }
    if values.populated().is_empty() {
        bail!("No values given for {field}");
    }
    Ok(values)
}

pub(crate) fn format_timestamp(ms: Timestamp) -> String {
    DateTime::from_timestamp_millis(ms).map_or_else(
        || ms.to_string(),
        |dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

pub(crate) fn format_status(status: &[Status]) -> String {
    status
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn format_duration(seconds: u32) -> String {
    let (h, m, s) = (seconds / 3600, seconds / 60 % 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Compact one-line rendering of a set list.
pub(crate) fn format_sets(sets: &SetList) -> String {
    fn weight(w: &WeightSet) -> String {
        if w.rpe > 0 {
            format!("{}x{}@{}", w.weight, w.reps, w.rpe)
        } else {
            format!("{}x{}", w.weight, w.reps)
        }
    }

    let parts: Vec<String> = match sets {
        SetList::Checklist(s) => s
            .iter()
            .map(|c| format!("{} {}", if c.checked { "[x]" } else { "[ ]" }, c.label))
            .collect(),
        SetList::Cardio(s) => s
            .iter()
            .map(|c| format!("{} {}cal", format_duration(c.duration_seconds), c.calories_burned))
            .collect(),
        SetList::Weight(s) => s.iter().map(weight).collect(),
        SetList::SidedWeight(s) => s
            .iter()
            .map(|w| format!("{}/{}", weight(&w.left), weight(&w.right)))
            .collect(),
        SetList::Climbing(s) => s
            .iter()
            .map(|c| {
                let grade = c.listed_grade.as_deref().unwrap_or("?");
                let top = if c.topped { " top" } else { "" };
                format!("{grade} x{}{top}", c.attempts)
            })
            .collect(),
    };
    parts.join(", ")
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_input_aliases() {
        assert_eq!(parse_input("weight").unwrap(), ExerciseInput::Weight);
        assert_eq!(parse_input("Sided").unwrap(), ExerciseInput::SidedWeight);
        assert_eq!(
            parse_input("climbing session").unwrap(),
            ExerciseInput::ClimbingSession
        );
        assert!(parse_input("yoga").is_err());
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("locked").unwrap(), Status::Locked);
        assert!(parse_status("pinned").is_err());
    }

    #[test]
    fn test_parse_weight_sets() {
        let sets = parse_sets(ExerciseInput::Weight, &strings(&["100x5@8", "102.5X3"])).unwrap();
        assert_eq!(
            sets,
            SetList::Weight(vec![
                WeightSet {
                    weight: 100.0,
                    reps: 5,
                    rpe: 8
                },
                WeightSet {
                    weight: 102.5,
                    reps: 3,
                    rpe: 0
                },
            ])
        );
        assert!(parse_sets(ExerciseInput::Weight, &strings(&["100"])).is_err());
        assert!(parse_sets(ExerciseInput::Weight, &strings(&["heavyx5"])).is_err());
    }

    #[test]
    fn test_parse_sided_and_cardio_sets() {
        let SetList::SidedWeight(sided) =
            parse_sets(ExerciseInput::SidedWeight, &strings(&["20x10/20x9@7"])).unwrap()
        else {
            panic!("wrong set kind");
        };
        assert_eq!(sided[0].right.reps, 9);
        assert_eq!(sided[0].right.rpe, 7);

        let SetList::Cardio(cardio) =
            parse_sets(ExerciseInput::Cardio, &strings(&["1800:300", "600"])).unwrap()
        else {
            panic!("wrong set kind");
        };
        assert_eq!(cardio[0].calories_burned, 300);
        assert_eq!(cardio[1].duration_seconds, 600);
        assert_eq!(cardio[1].rpe, 0);
    }

    #[test]
    fn test_parse_checklist_and_climbing_sets() {
        let SetList::Checklist(items) =
            parse_sets(ExerciseInput::Checklist, &strings(&["Stretch", "Foam roll:no"])).unwrap()
        else {
            panic!("wrong set kind");
        };
        assert!(items[0].checked);
        assert_eq!(items[1].label, "Foam roll");
        assert!(!items[1].checked);

        let SetList::Climbing(climbs) =
            parse_sets(ExerciseInput::ClimbingSession, &strings(&["3:top:V4", "1"])).unwrap()
        else {
            panic!("wrong set kind");
        };
        assert!(climbs[0].topped);
        assert_eq!(climbs[0].listed_grade.as_deref(), Some("V4"));
        assert!(!climbs[1].topped);
    }

    #[test]
    fn test_parse_groups() {
        let groups = parse_groups(&strings(&["exs-a", "exs-b, exs-c"]));
        assert_eq!(groups.len(), 2);
        assert!(!groups[0].is_superset());
        assert!(groups[1].is_superset());
        assert_eq!(groups[1].exercise_ids, vec!["exs-b", "exs-c"]);
    }

    #[test]
    fn test_parse_measurement_values() {
        let field = parse_measurement_field("body-weight").unwrap();
        assert_eq!(field, MeasurementField::BodyWeight);
        let values = parse_measurement_values(field, &strings(&["81.4"])).unwrap();
        assert_eq!(values.body_weight, Some(81.4));

        let values = parse_measurement_values(
            MeasurementField::BloodPressure,
            &strings(&["bloodPressureSystolic=120", "bloodpressurediastolic=80"]),
        )
        .unwrap();
        assert_eq!(values.blood_pressure_systolic, Some(120));
        assert_eq!(values.blood_pressure_diastolic, Some(80));

        assert!(parse_measurement_values(MeasurementField::BloodPressure, &strings(&["120"])).is_err());
        assert!(parse_measurement_values(MeasurementField::Chest, &strings(&["waist=90"])).is_err());
        assert!(parse_measurement_values(MeasurementField::Chest, &[]).is_err());
    }

    #[test]
    fn test_parse_measurement_values_rejects_bad_whole_numbers() {
        for bad in ["-500", "0.5", "NaN"] {
            let err = parse_measurement_values(MeasurementField::Calories, &strings(&[bad]))
                .unwrap_err();
            assert!(err.to_string().contains("calories"), "{bad}: {err}");
        }
        assert!(
            parse_measurement_values(
                MeasurementField::BloodPressure,
                &strings(&["bloodPressureSystolic=120.6", "bloodPressureDiastolic=80"]),
            )
            .is_err()
        );
    }

    #[test]
    fn test_format_sets() {
        let sets = SetList::Weight(vec![WeightSet {
            weight: 60.0,
            reps: 8,
            rpe: 0,
        }]);
        assert_eq!(format_sets(&sets), "60x8");
        assert_eq!(format_duration(65), "1:05");
        assert_eq!(format_duration(3725), "1:02:05");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(&[Status::Locked, Status::Favorited]), "Locked, Favorited");
        assert_eq!(format_status(&[]), "");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world this is long", 10), "hello w...");
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Überkopfdrücken", 10), "Überkop...");
        assert_eq!(truncate("日清カップヌードル", 8), "日清カップ...");
    }
}
