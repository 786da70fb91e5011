use chrono::NaiveTime;
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::schedule::weekday_from_number;
use crate::models::ScheduleWindow;

/// Sets the weekly window of a personnel for one weekday, replacing any
/// window already stored for that day.
pub fn set_window(
    conn: &Connection,
    personnel_id: &str,
    weekday: i64,
    starting: NaiveTime,
    ending: NaiveTime,
) -> AppResult<ScheduleWindow> {
    let weekday = weekday_from_number(weekday)?;
    if starting >= ending {
        return Err(AppError::BadRequest(
            "schedule must start before it ends".to_string(),
        ));
    }

    let window = ScheduleWindow {
        personnel_id: personnel_id.to_string(),
        weekday,
        starting,
        ending,
    };
    queries::upsert_schedule_window(conn, &window)?;

    tracing::info!(
        personnel_id = %personnel_id,
        weekday = %weekday,
        starting = %starting,
        ending = %ending,
        "schedule window set"
    );
    Ok(window)
}
