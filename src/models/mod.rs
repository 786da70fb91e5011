pub mod appointment;
pub mod schedule;
pub mod service;
pub mod tenant;

pub use appointment::{Appointment, BookedInterval};
pub use schedule::ScheduleWindow;
pub use service::Service;
pub use tenant::MemberRole;

/// Width of one grid point; service durations are whole multiples of it.
pub const SLOT_MINUTES: i64 = 30;
