pub mod error;
pub mod ids;

pub use error::{SchedulingError, SchedulingResult};
pub use ids::{
    ActiveDaysId, AppointmentId, DoctorId, HolidayId, PatientId, ScheduleId, SlotId, VacationId,
};
