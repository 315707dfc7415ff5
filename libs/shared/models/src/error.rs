use chrono::NaiveDate;
use thiserror::Error;

pub type SchedulingResult<T> = Result<T, SchedulingError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid range: end {end} must be after start {start}")]
    InvalidRange { start: String, end: String },

    #[error("Invalid duration: session duration must be positive, got {0} minutes")]
    InvalidDuration(u32),

    #[error("Schedule conflict: a schedule already starts on {start_date} or ends on {end_date}")]
    ScheduleConflict {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("No schedule spans exactly {start_date} to {end_date}")]
    ScheduleNotFound {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },

    #[error("{0} is a clinic holiday")]
    HolidayConflict(NaiveDate),

    #[error("Doctor is on vacation on {0}")]
    VacationConflict(NaiveDate),

    #[error("{0} is outside the doctor's active days")]
    OutsideActiveDays(NaiveDate),

    #[error("Period {period_id} on {date} is already booked")]
    SlotTaken { date: NaiveDate, period_id: String },

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("A doctor with nationality code {0} already exists")]
    DoctorAlreadyExists(String),

    #[error("Invalid status transition from {from} to {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Operation cancelled before commit")]
    Cancelled,

    #[error("Store error: {0}")]
    Store(String),
}

impl SchedulingError {
    pub fn invalid_range(start: impl ToString, end: impl ToString) -> Self {
        SchedulingError::InvalidRange {
            start: start.to_string(),
            end: end.to_string(),
        }
    }

    /// Stable code for each failure kind.
    pub fn kind(&self) -> &'static str {
        match self {
            SchedulingError::InvalidArgument(_) => "invalid_argument",
            SchedulingError::InvalidRange { .. } => "invalid_range",
            SchedulingError::InvalidDuration(_) => "invalid_duration",
            SchedulingError::ScheduleConflict { .. } => "schedule_conflict",
            SchedulingError::ScheduleNotFound { .. } => "schedule_not_found",
            SchedulingError::HolidayConflict(_) => "holiday_conflict",
            SchedulingError::VacationConflict(_) => "vacation_conflict",
            SchedulingError::OutsideActiveDays(_) => "outside_active_days",
            SchedulingError::SlotTaken { .. } => "slot_taken",
            SchedulingError::NotFound(_) => "not_found",
            SchedulingError::DoctorAlreadyExists(_) => "doctor_already_exists",
            SchedulingError::InvalidStatusTransition { .. } => "invalid_status_transition",
            SchedulingError::Cancelled => "cancelled",
            SchedulingError::Store(_) => "store",
        }
    }

    /// True for failures caused by the caller's input or by a business rule,
    /// as opposed to the persistence collaborator.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, SchedulingError::Store(_) | SchedulingError::Cancelled)
    }
}
