use anyhow::Result;
use tabled::{Table, Tabled, settings::Style};

use liftbook_core::db::{Database, OrderBy};
use liftbook_core::models::{Measurement, MeasurementValues, NewMeasurement};
use liftbook_core::service::save_measurement;

use super::helpers::{format_timestamp, parse_measurement_field, parse_measurement_values, truncate};

fn format_values(values: &MeasurementValues) -> String {
    match serde_json::to_value(values) {
        Ok(serde_json::Value::Object(map)) => map
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" "),
        _ => String::new(),
    }
}

pub(crate) fn cmd_measure_add(
    db: &Database,
    field: &str,
    values: &[String],
    note: Option<String>,
    json: bool,
) -> Result<()> {
    let field = parse_measurement_field(field)?;
    let measurement = Measurement::new(
        field,
        NewMeasurement {
            note,
            values: parse_measurement_values(field, values)?,
            ..Default::default()
        },
    );
    save_measurement(db, &measurement)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&measurement)?);
    } else {
        println!(
            "Recorded {}: {}",
            measurement.field,
            format_values(&measurement.values)
        );
    }
    Ok(())
}

pub(crate) fn cmd_measure_list(db: &Database, field: Option<&str>, json: bool) -> Result<()> {
    let field = field.map(parse_measurement_field).transpose()?;
    let measurements: Vec<Measurement> = db
        .all::<Measurement>(OrderBy::CreatedAt)?
        .into_iter()
        .filter(|m| field.is_none_or(|f| m.field == f))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&measurements)?);
    } else if measurements.is_empty() {
        eprintln!("No measurements found. Use `liftbook measure add` to record one.");
    } else {
        #[derive(Tabled)]
        struct MeasurementRow {
            #[tabled(rename = "Date")]
            date: String,
            #[tabled(rename = "Field")]
            field: String,
            #[tabled(rename = "Values")]
            values: String,
            #[tabled(rename = "Note")]
            note: String,
        }

        let rows: Vec<MeasurementRow> = measurements
            .iter()
            .map(|m| MeasurementRow {
                date: format_timestamp(m.created_at),
                field: m.field.to_string(),
                values: format_values(&m.values),
                note: truncate(&m.note, 30),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use liftbook_core::schema::MeasurementField;

    #[test]
    fn test_add_measurement() {
        let db = Database::open_in_memory().unwrap();
        cmd_measure_add(&db, "body weight", &["81.5".to_string()], None, true).unwrap();
        cmd_measure_add(
            &db,
            "blood-pressure",
            &["bloodPressureSystolic=118".to_string(), "bloodPressureDiastolic=76".to_string()],
            Some("morning".to_string()),
            true,
        )
        .unwrap();

        let stored: Vec<Measurement> = db.all(OrderBy::Insertion).unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].field, MeasurementField::BodyWeight);
        assert_eq!(stored[1].values.blood_pressure_diastolic, Some(76));
        assert_eq!(stored[1].note, "morning");
    }

    #[test]
    fn test_add_rejects_out_of_range_value() {
        let db = Database::open_in_memory().unwrap();
        assert!(cmd_measure_add(&db, "temperature", &["200".to_string()], None, true).is_err());
        assert_eq!(db.count::<Measurement>().unwrap(), 0);
    }

    #[test]
    fn test_format_values() {
        let mut values = MeasurementValues::default();
        values.set("leftBicep", 35.5).unwrap();
        values.set("rightBicep", 36.0).unwrap();
        assert_eq!(format_values(&values), "leftBicep=35.5 rightBicep=36.0");
    }
}
