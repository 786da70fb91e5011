use chrono::{NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleWindow {
    pub personnel_id: String,
    #[serde(with = "weekday_serde")]
    pub weekday: Weekday,
    pub starting: NaiveTime,
    pub ending: NaiveTime,
}

impl ScheduleWindow {
    /// True when the window cannot hold a single slot.
    pub fn is_degenerate(&self) -> bool {
        self.starting >= self.ending
    }
}

/// Weekdays travel as 0 (Sunday) through 6 (Saturday).
pub fn weekday_from_number(n: i64) -> Result<Weekday, AppError> {
    match n {
        0 => Ok(Weekday::Sun),
        1 => Ok(Weekday::Mon),
        2 => Ok(Weekday::Tue),
        3 => Ok(Weekday::Wed),
        4 => Ok(Weekday::Thu),
        5 => Ok(Weekday::Fri),
        6 => Ok(Weekday::Sat),
        _ => Err(AppError::InvalidWeekday),
    }
}

pub fn weekday_number(day: Weekday) -> i64 {
    day.num_days_from_sunday() as i64
}

mod weekday_serde {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_i64(super::weekday_number(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Weekday, D::Error> {
        let n = i64::deserialize(d)?;
        super::weekday_from_number(n).map_err(serde::de::Error::custom)
    }
}
