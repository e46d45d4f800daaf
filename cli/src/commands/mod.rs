mod backup;
mod exercise;
mod helpers;
mod logs;
mod measure;
mod plan;
mod settings;
mod workout;

pub(crate) use backup::{cmd_backup_export, cmd_backup_import};
pub(crate) use exercise::{
    cmd_exercise_add, cmd_exercise_delete, cmd_exercise_list, cmd_exercise_log,
    cmd_exercise_result_delete, cmd_exercise_result_status, cmd_exercise_show,
    cmd_exercise_status,
};
pub(crate) use logs::{cmd_logs_list, cmd_logs_purge};
pub(crate) use measure::{cmd_measure_add, cmd_measure_list};
pub(crate) use plan::{cmd_plan_add, cmd_plan_delete, cmd_plan_list};
pub(crate) use settings::{cmd_settings_set, cmd_settings_show};
pub(crate) use workout::{
    cmd_workout_add, cmd_workout_delete, cmd_workout_finish, cmd_workout_list,
    cmd_workout_result_delete, cmd_workout_show, cmd_workout_start, cmd_workout_status,
};
