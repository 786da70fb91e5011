use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: String,
    pub service_id: String,
    pub personnel_id: String,
    pub account_id: String,
    pub starting: NaiveDateTime,
}

/// The span an existing appointment keeps a personnel busy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookedInterval {
    pub starting: NaiveDateTime,
    pub duration_minutes: i64,
}

impl BookedInterval {
    pub fn ending(&self) -> NaiveDateTime {
        self.starting + Duration::minutes(self.duration_minutes)
    }

    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.starting < end && self.ending() > start
    }
}
