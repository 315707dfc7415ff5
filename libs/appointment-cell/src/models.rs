use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use shared_models::{AppointmentId, DoctorId, PatientId, SchedulingError, SchedulingResult, SlotId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    Reserved,
    Confirmed,
    Canceled,
}

impl AppointmentStatus {
    /// Legal next states. `Canceled` is terminal.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::Reserved => &[AppointmentStatus::Confirmed, AppointmentStatus::Canceled],
            AppointmentStatus::Confirmed => &[AppointmentStatus::Canceled],
            AppointmentStatus::Canceled => &[],
        }
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        self.valid_transitions().contains(&next)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Reserved => write!(f, "reserved"),
            AppointmentStatus::Confirmed => write!(f, "confirmed"),
            AppointmentStatus::Canceled => write!(f, "canceled"),
        }
    }
}

/// A booking of one period on one date. Status only changes through
/// [`Appointment::confirm`] and [`Appointment::cancel`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Appointment {
    id: AppointmentId,
    doctor_id: DoctorId,
    patient_id: PatientId,
    date: NaiveDate,
    period_id: SlotId,
    status: AppointmentStatus,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
}

impl Appointment {
    pub fn reserve(request: &BookAppointmentRequest) -> Self {
        let now = Utc::now();
        Self {
            id: AppointmentId::generate(),
            doctor_id: request.doctor_id,
            patient_id: request.patient_id,
            date: request.date,
            period_id: request.period_id,
            status: AppointmentStatus::Reserved,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn id(&self) -> AppointmentId {
        self.id
    }

    pub fn doctor_id(&self) -> DoctorId {
        self.doctor_id
    }

    pub fn patient_id(&self) -> PatientId {
        self.patient_id
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn period_id(&self) -> SlotId {
        self.period_id
    }

    pub fn status(&self) -> AppointmentStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    pub fn is_at(&self, doctor_id: DoctorId, date: NaiveDate, period_id: SlotId) -> bool {
        self.doctor_id == doctor_id && self.date == date && self.period_id == period_id
    }

    pub fn confirm(&mut self) -> SchedulingResult<()> {
        self.transition_to(AppointmentStatus::Confirmed)
    }

    pub fn cancel(&mut self) -> SchedulingResult<()> {
        self.transition_to(AppointmentStatus::Canceled)
    }

    fn transition_to(&mut self, next: AppointmentStatus) -> SchedulingResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(SchedulingError::InvalidStatusTransition {
                from: self.status.to_string(),
                to: next.to_string(),
            });
        }

        self.status = next;
        self.modified_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookAppointmentRequest {
    pub doctor_id: DoctorId,
    pub patient_id: PatientId,
    pub date: NaiveDate,
    pub period_id: SlotId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> BookAppointmentRequest {
        BookAppointmentRequest {
            doctor_id: DoctorId::generate(),
            patient_id: PatientId::generate(),
            date: NaiveDate::from_ymd_opt(2030, 1, 5).unwrap(),
            period_id: SlotId::generate(),
        }
    }

    #[test]
    fn test_reserved_on_creation() {
        let request = request();
        let appointment = Appointment::reserve(&request);

        assert_eq!(appointment.status(), AppointmentStatus::Reserved);
        assert_eq!(appointment.created_at(), appointment.modified_at());
        assert!(appointment.is_at(request.doctor_id, request.date, request.period_id));
        assert!(!appointment.is_at(request.doctor_id, request.date, SlotId::generate()));
    }

    #[test]
    fn test_confirm_then_cancel() {
        let mut appointment = Appointment::reserve(&request());

        appointment.confirm().unwrap();
        assert_eq!(appointment.status(), AppointmentStatus::Confirmed);
        assert!(appointment.modified_at() >= appointment.created_at());

        appointment.cancel().unwrap();
        assert_eq!(appointment.status(), AppointmentStatus::Canceled);
    }

    #[test]
    fn test_nothing_leaves_canceled() {
        let mut appointment = Appointment::reserve(&request());
        appointment.cancel().unwrap();

        assert_matches!(
            appointment.confirm(),
            Err(SchedulingError::InvalidStatusTransition { from, to }) if from == "canceled" && to == "confirmed"
        );
        assert_matches!(appointment.cancel(), Err(SchedulingError::InvalidStatusTransition { .. }));
        assert_eq!(appointment.status(), AppointmentStatus::Canceled);
    }

    #[test]
    fn test_confirm_twice_is_rejected() {
        let mut appointment = Appointment::reserve(&request());
        appointment.confirm().unwrap();

        assert_matches!(appointment.confirm(), Err(SchedulingError::InvalidStatusTransition { .. }));
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&AppointmentStatus::Canceled).unwrap(), "\"canceled\"");
    }
}
