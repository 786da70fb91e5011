use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rusqlite::Connection;

use crate::db::queries;
use crate::errors::{AppError, AppResult};
use crate::models::{BookedInterval, ScheduleWindow, Service, SLOT_MINUTES};

/// Start instants on `date` at which a booking lasting `duration_minutes`
/// fits inside `window` without touching any of `booked`.
///
/// The window is cut into 30-minute grid points from its start; a point only
/// exists when its whole slot ends by the window's end. A grid point is
/// blocked when any booked interval overlaps its slot. Walking the points in
/// order, each run of `duration / 30min` unblocked points yields its first
/// point, so every returned instant is the start of a booking that occupies
/// exactly the free slots that justified it.
pub fn open_slots(
    date: NaiveDate,
    window: &ScheduleWindow,
    duration_minutes: i64,
    booked: &[BookedInterval],
) -> Vec<NaiveDateTime> {
    let needed = (duration_minutes / SLOT_MINUTES) as usize;
    if needed == 0 || window.is_degenerate() {
        return vec![];
    }

    let step = Duration::minutes(SLOT_MINUTES);
    let end = date.and_time(window.ending);
    let mut grid = vec![];
    let mut point = date.and_time(window.starting);
    while point + step <= end {
        grid.push(point);
        point += step;
    }

    let mut open = vec![];
    let mut run = 0usize;
    for (i, &point) in grid.iter().enumerate() {
        let blocked = booked.iter().any(|b| b.overlaps(point, point + step));
        if blocked {
            run = 0;
        } else {
            run += 1;
        }
        if run >= needed {
            open.push(grid[i + 1 - needed]);
        }
    }
    open
}

/// Years the store can keep in sortable `YYYY-MM-DD` text.
const STORABLE_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

/// Bookable start instants for `service` on `date`. No window on that
/// weekday yields an empty list.
pub fn for_service(
    conn: &Connection,
    service: &Service,
    date: NaiveDate,
) -> AppResult<Vec<NaiveDateTime>> {
    if !STORABLE_YEARS.contains(&date.year()) {
        return Err(AppError::BadRequest(format!("date out of range: {date}")));
    }

    let Some(window) = queries::get_schedule_window(conn, &service.personnel_id, date.weekday())?
    else {
        return Ok(vec![]);
    };

    let day_start = date.and_time(NaiveTime::MIN);
    // Bookings from the previous day can still run past midnight.
    let from = day_start
        .checked_sub_signed(Duration::days(1))
        .unwrap_or(day_start);
    // Past the last storable day the bound would format as `+10000-..` and
    // sort before every stored row.
    let to = day_start
        .checked_add_signed(Duration::days(1))
        .filter(|t| STORABLE_YEARS.contains(&t.year()))
        .or_else(|| date.and_hms_opt(23, 59, 59))
        .unwrap_or(day_start);
    let booked = queries::list_appointments(conn, &service.personnel_id, &from, &to)?;

    Ok(open_slots(date, &window, service.duration_minutes, &booked))
}
