use anyhow::Result;
use tabled::{Table, Tabled, settings::Style};

use liftbook_core::db::{Database, OrderBy};
use liftbook_core::models::Plan;
use liftbook_core::schema::PlanId;
use liftbook_core::service::{get_record, save_plan};

use super::helpers::format_timestamp;

pub(crate) fn cmd_plan_add(db: &Database, id: &str, json: bool) -> Result<()> {
    let id: PlanId = id.parse()?;
    let plan = match db.get::<Plan>(id.as_str())? {
        Some(existing) => existing,
        None => {
            let plan = Plan::new(id);
            save_plan(db, &plan)?;
            plan
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        println!("Plan '{}' created {}", plan.id, format_timestamp(plan.created_at));
    }
    Ok(())
}

pub(crate) fn cmd_plan_list(db: &Database, json: bool) -> Result<()> {
    let mut plans: Vec<Plan> = db.all(OrderBy::Insertion)?;
    plans.sort_by_key(|p| p.id);

    if json {
        println!("{}", serde_json::to_string_pretty(&plans)?);
    } else if plans.is_empty() {
        eprintln!("No plans found. Use `liftbook plan add <day|month>` to create one.");
    } else {
        #[derive(Tabled)]
        struct PlanRow {
            #[tabled(rename = "Plan")]
            id: String,
            #[tabled(rename = "Created")]
            created: String,
        }

        let rows: Vec<PlanRow> = plans
            .iter()
            .map(|p| PlanRow {
                id: p.id.to_string(),
                created: format_timestamp(p.created_at),
            })
            .collect();
        println!("{}", Table::new(&rows).with(Style::rounded()));
    }
    Ok(())
}

pub(crate) fn cmd_plan_delete(db: &Database, id: &str, json: bool) -> Result<()> {
    let id: PlanId = id.parse()?;
    let plan: Plan = get_record(db, id.as_str())?;
    db.delete::<Plan>(plan.id.as_str())?;

    if json {
        println!("{}", serde_json::json!({ "deleted": plan.id }));
    } else {
        println!("Deleted plan '{}'", plan.id);
    }
    Ok(())
}
