use async_trait::async_trait;
use chrono::NaiveDate;

use shared_database::InMemoryTable;
use shared_models::{AppointmentId, DoctorId, SchedulingResult, SlotId};

use crate::models::Appointment;

#[async_trait]
pub trait AppointmentStore: Send + Sync {
    /// True when any appointment, whatever its status, holds this period.
    async fn exists_for_doctor_at(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
        period_id: SlotId,
    ) -> SchedulingResult<bool>;

    async fn get(&self, id: AppointmentId) -> SchedulingResult<Option<Appointment>>;

    async fn save(&self, appointment: Appointment) -> SchedulingResult<()>;

    async fn list_for_doctor_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> SchedulingResult<Vec<Appointment>>;
}

#[derive(Clone)]
pub struct InMemoryAppointmentStore {
    appointments: InMemoryTable<AppointmentId, Appointment>,
}

impl Default for InMemoryAppointmentStore {
    fn default() -> Self {
        Self {
            appointments: InMemoryTable::new("appointments"),
        }
    }
}

impl InMemoryAppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AppointmentStore for InMemoryAppointmentStore {
    async fn exists_for_doctor_at(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
        period_id: SlotId,
    ) -> SchedulingResult<bool> {
        Ok(self
            .appointments
            .any(|appointment| appointment.is_at(doctor_id, date, period_id))
            .await)
    }

    async fn get(&self, id: AppointmentId) -> SchedulingResult<Option<Appointment>> {
        Ok(self.appointments.get(&id).await)
    }

    async fn save(&self, appointment: Appointment) -> SchedulingResult<()> {
        self.appointments.upsert(appointment.id(), appointment).await;
        Ok(())
    }

    async fn list_for_doctor_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> SchedulingResult<Vec<Appointment>> {
        Ok(self
            .appointments
            .filter(|appointment| appointment.doctor_id() == doctor_id && appointment.date() == date)
            .await)
    }
}
