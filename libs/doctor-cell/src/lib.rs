pub mod memory;
pub mod models;
pub mod schedule;
pub mod services;
pub mod store;

pub use models::*;
pub use schedule::{DaySchedule, Schedule, Session, Sessions, Slot, TimeRange, WorkingHours};
pub use services::*;
