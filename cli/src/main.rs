mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::commands::{
    cmd_backup_export, cmd_backup_import, cmd_exercise_add, cmd_exercise_delete,
    cmd_exercise_list, cmd_exercise_log, cmd_exercise_result_delete, cmd_exercise_result_status,
    cmd_exercise_show, cmd_exercise_status, cmd_logs_list, cmd_logs_purge, cmd_measure_add,
    cmd_measure_list, cmd_plan_add, cmd_plan_delete, cmd_plan_list, cmd_settings_set,
    cmd_settings_show, cmd_workout_add, cmd_workout_delete, cmd_workout_finish, cmd_workout_list,
    cmd_workout_result_delete, cmd_workout_show, cmd_workout_start, cmd_workout_status,
};
use crate::config::Config;
use liftbook_core::logger::purge_expired_logs;
use liftbook_core::models::now_ms;
use liftbook_core::schema::LogLevel;
use liftbook_core::service::LiftbookService;

#[derive(Parser)]
#[command(
    name = "liftbook",
    version,
    about = "A simple, local-first workout tracker CLI"
)]
struct Cli {
    /// Diagnostic log filter written to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage exercises and log their results
    Exercise {
        #[command(subcommand)]
        command: ExerciseCommands,
    },
    /// Manage workouts and workout sessions
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Record body and health measurements
    Measure {
        #[command(subcommand)]
        command: MeasureCommands,
    },
    /// Manage recurring plans (weekdays, months, monthly, yearly)
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Show or change app settings
    Settings {
        #[command(subcommand)]
        command: SettingsCommands,
    },
    /// Inspect and purge app logs
    Logs {
        #[command(subcommand)]
        command: LogsCommands,
    },
    /// Export or import a full JSON backup
    Backup {
        #[command(subcommand)]
        command: BackupCommands,
    },
}

#[derive(Subcommand)]
enum ExerciseCommands {
    /// Create an exercise
    Add {
        /// Exercise name
        name: String,
        /// Description
        #[arg(short, long)]
        desc: Option<String>,
        /// Input kind: checklist, cardio, weight, sided, climbing
        #[arg(short, long, default_value = "checklist")]
        input: String,
        /// Number of sets a new result starts with
        #[arg(long)]
        sets: Option<u32>,
        /// Default rest timer in seconds (30-900)
        #[arg(long)]
        rest: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List exercises (locked, then favorited, then by name)
    List {
        /// Include hidden exercises, sorted by name
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show an exercise and its results
    Show {
        /// Exercise ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set or clear a status flag (locked, hidden, favorited)
    Status {
        /// Exercise ID
        id: String,
        /// Status flag
        flag: String,
        /// Clear the flag instead of setting it
        #[arg(long)]
        off: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete an exercise and all of its results
    Delete {
        /// Exercise ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Log a result. Sets use the exercise's notation: weight `100x5@8`,
    /// sided `20x10/20x9`, cardio `SECONDS:CALORIES:RPE`,
    /// climbing `ATTEMPTS:top:GRADE`, checklist `LABEL` or `LABEL:no`
    Log {
        /// Exercise ID
        id: String,
        /// One argument per set
        #[arg(required = true)]
        sets: Vec<String>,
        /// Note for this result
        #[arg(short, long)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set or clear a status flag on a logged result
    ResultStatus {
        /// Exercise result ID
        id: String,
        /// Status flag
        flag: String,
        /// Clear the flag instead of setting it
        #[arg(long)]
        off: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a logged result
    ResultDelete {
        /// Exercise result ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// Create a workout. Comma-separated IDs in one group form a superset.
    Add {
        /// Workout name
        name: String,
        /// Description
        #[arg(short, long)]
        desc: Option<String>,
        /// Warmup group (repeatable)
        #[arg(long = "warmup", value_name = "IDS")]
        warmup: Vec<String>,
        /// Main exercise group (repeatable)
        #[arg(short, long = "exercise", value_name = "IDS")]
        exercises: Vec<String>,
        /// Cooldown group (repeatable)
        #[arg(long = "cooldown", value_name = "IDS")]
        cooldown: Vec<String>,
        /// Workout to suggest next (repeatable)
        #[arg(long = "next", value_name = "ID")]
        next: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List workouts (locked, then favorited, then by name)
    List {
        /// Include hidden workouts, sorted by name
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a workout, its exercises and its sessions
    Show {
        /// Workout ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set or clear a status flag (locked, hidden, favorited)
    Status {
        /// Workout ID
        id: String,
        /// Status flag
        flag: String,
        /// Clear the flag instead of setting it
        #[arg(long)]
        off: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a workout and all of its sessions
    Delete {
        /// Workout ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start a session of a workout
    Start {
        /// Workout ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Finish an in-progress session
    Finish {
        /// Workout result (session) ID
        id: String,
        /// Note for this session
        #[arg(short, long)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a session
    ResultDelete {
        /// Workout result (session) ID
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MeasureCommands {
    /// Record a measurement, e.g. `body-weight 81.4` or
    /// `blood-pressure bloodPressureSystolic=120 bloodPressureDiastolic=80`
    Add {
        /// Measurement field
        field: String,
        /// A number, or `attribute=number` pairs
        #[arg(required = true)]
        values: Vec<String>,
        /// Note
        #[arg(short, long)]
        note: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List measurements, newest first
    List {
        /// Only this field
        #[arg(short, long)]
        field: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum PlanCommands {
    /// Create a plan (Monday..Sunday, January..December, Monthly, Yearly)
    Add {
        /// Plan key
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List plans
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a plan
    Delete {
        /// Plan key
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SettingsCommands {
    /// Show every setting
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a setting, e.g. `console-logs on` or `log-retention three-months`
    Set {
        /// Setting name
        id: String,
        /// New value
        value: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum LogsCommands {
    /// Show recent logs, newest first
    List {
        /// Only this level: debug, info, warn, error
        #[arg(short, long)]
        level: Option<String>,
        /// Maximum number of logs
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete logs older than the retention setting
    Purge {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum BackupCommands {
    /// Write every table to a JSON file (`-` for stdout)
    Export {
        /// Destination path
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a backup file and upsert every record from it
    Import {
        /// Backup file path
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;
    let mut svc = LiftbookService::new(&config.db_path)?;
    tracing::debug!(path = %config.db_path.display(), "opened database");

    let purged = purge_expired_logs(svc.db(), svc.settings(), now_ms())?;
    if purged > 0 {
        tracing::debug!(purged, "purged expired logs on startup");
    }

    let result = match cli.command {
        Commands::Exercise { command } => match command {
            ExerciseCommands::Add {
                name,
                desc,
                input,
                sets,
                rest,
                json,
            } => cmd_exercise_add(&svc, name, desc, &input, sets, rest, json),
            ExerciseCommands::List { all, json } => cmd_exercise_list(svc.db(), all, json).await,
            ExerciseCommands::Show { id, json } => cmd_exercise_show(svc.db(), &id, json),
            ExerciseCommands::Status {
                id,
                flag,
                off,
                json,
            } => cmd_exercise_status(svc.db(), &id, &flag, off, json),
            ExerciseCommands::Delete { id, json } => cmd_exercise_delete(&svc, &id, json),
            ExerciseCommands::Log {
                id,
                sets,
                note,
                json,
            } => cmd_exercise_log(svc.db(), &id, &sets, note, json),
            ExerciseCommands::ResultStatus {
                id,
                flag,
                off,
                json,
            } => cmd_exercise_result_status(svc.db(), &id, &flag, off, json),
            ExerciseCommands::ResultDelete { id, json } => {
                cmd_exercise_result_delete(svc.db(), &id, json)
            }
        },
        Commands::Workout { command } => match command {
            WorkoutCommands::Add {
                name,
                desc,
                warmup,
                exercises,
                cooldown,
                next,
                json,
            } => cmd_workout_add(
                &svc, name, desc, &warmup, &exercises, &cooldown, next, json,
            ),
            WorkoutCommands::List { all, json } => cmd_workout_list(svc.db(), all, json).await,
            WorkoutCommands::Show { id, json } => cmd_workout_show(svc.db(), &id, json),
            WorkoutCommands::Status {
                id,
                flag,
                off,
                json,
            } => cmd_workout_status(svc.db(), &id, &flag, off, json),
            WorkoutCommands::Delete { id, json } => cmd_workout_delete(&svc, &id, json),
            WorkoutCommands::Start { id, json } => cmd_workout_start(svc.db(), &id, json),
            WorkoutCommands::Finish { id, note, json } => {
                cmd_workout_finish(&svc, &id, note, json)
            }
            WorkoutCommands::ResultDelete { id, json } => cmd_workout_result_delete(svc.db(), &id, json),
        },
        Commands::Measure { command } => match command {
            MeasureCommands::Add {
                field,
                values,
                note,
                json,
            } => cmd_measure_add(svc.db(), &field, &values, note, json),
            MeasureCommands::List { field, json } => cmd_measure_list(svc.db(), field.as_deref(), json),
        },
        Commands::Plan { command } => match command {
            PlanCommands::Add { id, json } => cmd_plan_add(svc.db(), &id, json),
            PlanCommands::List { json } => cmd_plan_list(svc.db(), json),
            PlanCommands::Delete { id, json } => cmd_plan_delete(svc.db(), &id, json),
        },
        Commands::Settings { command } => match command {
            SettingsCommands::Show { json } => cmd_settings_show(&svc, json),
            SettingsCommands::Set { id, value, json } => {
                cmd_settings_set(&mut svc, &id, &value, json)
            }
        },
        Commands::Logs { command } => match command {
            LogsCommands::List { level, limit, json } => {
                cmd_logs_list(svc.db(), level.as_deref(), limit, json)
            }
            LogsCommands::Purge { json } => cmd_logs_purge(&svc, json),
        },
        Commands::Backup { command } => match command {
            BackupCommands::Export { file, json } => cmd_backup_export(&svc, &file, json),
            BackupCommands::Import { file, json } => cmd_backup_import(&svc, &file, json),
        },
    };

    if let Err(e) = &result {
        svc.logger().log(
            svc.db(),
            LogLevel::Error,
            "Command failed",
            serde_json::json!({ "message": format!("{e:#}") }),
        );
    }
    result
}
