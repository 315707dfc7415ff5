// libs/appointment-cell/src/services/booking.rs
use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use doctor_cell::store::DoctorStore;
use shared_database::KeyedLocks;
use shared_models::{AppointmentId, DoctorId, SchedulingError, SchedulingResult};

use crate::models::{Appointment, AppointmentStatus, BookAppointmentRequest};
use crate::services::conflict::BookingInvariantChecker;
use crate::services::lifecycle::AppointmentLifecycleService;
use crate::store::AppointmentStore;

pub struct AppointmentBookingService {
    doctors: Arc<dyn DoctorStore>,
    appointments: Arc<dyn AppointmentStore>,
    invariants: BookingInvariantChecker,
    lifecycle_service: AppointmentLifecycleService,
    doctor_locks: KeyedLocks<DoctorId>,
    appointment_locks: KeyedLocks<AppointmentId>,
}

impl AppointmentBookingService {
    pub fn new(
        doctors: Arc<dyn DoctorStore>,
        appointments: Arc<dyn AppointmentStore>,
        invariants: BookingInvariantChecker,
    ) -> Self {
        Self {
            doctors,
            appointments,
            invariants,
            lifecycle_service: AppointmentLifecycleService::new(),
            doctor_locks: KeyedLocks::new(),
            appointment_locks: KeyedLocks::new(),
        }
    }

    /// Reserve a period for a patient.
    ///
    /// The doctor's lock is held from the invariant checks through the save, so
    /// two bookings of the same period cannot both pass the `SlotTaken` check.
    /// If `cancel` fires before the save, nothing is written.
    #[instrument(skip(self, request, cancel), fields(doctor_id = %request.doctor_id, date = %request.date))]
    pub async fn book_appointment(
        &self,
        request: BookAppointmentRequest,
        cancel: &CancellationToken,
    ) -> SchedulingResult<AppointmentId> {
        debug!(
            "Booking period {} for patient {}",
            request.period_id, request.patient_id
        );

        let _guard = self.doctor_locks.lock(&request.doctor_id).await;

        if self.doctors.get(request.doctor_id).await?.is_none() {
            warn!("Booking for unknown doctor {}", request.doctor_id);
            return Err(SchedulingError::NotFound(format!("doctor {}", request.doctor_id)));
        }

        self.invariants.check(&request).await?;

        if cancel.is_cancelled() {
            warn!("Booking cancelled before commit");
            return Err(SchedulingError::Cancelled);
        }

        let appointment = Appointment::reserve(&request);
        let appointment_id = appointment.id();
        self.appointments.save(appointment).await?;

        info!("Appointment {} reserved", appointment_id);
        Ok(appointment_id)
    }

    pub async fn confirm_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<()> {
        self.transition(appointment_id, AppointmentStatus::Confirmed).await
    }

    pub async fn cancel_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<()> {
        self.transition(appointment_id, AppointmentStatus::Canceled).await
    }

    pub async fn get_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<Appointment> {
        self.appointments
            .get(appointment_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("appointment {}", appointment_id)))
    }

    pub async fn appointments_for_doctor_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> SchedulingResult<Vec<Appointment>> {
        self.appointments.list_for_doctor_on(doctor_id, date).await
    }

    pub fn valid_status_transitions(&self, status: AppointmentStatus) -> Vec<AppointmentStatus> {
        self.lifecycle_service.get_valid_transitions(status)
    }

    async fn transition(
        &self,
        appointment_id: AppointmentId,
        new_status: AppointmentStatus,
    ) -> SchedulingResult<()> {
        debug!("Moving appointment {} to {}", appointment_id, new_status);

        let _guard = self.appointment_locks.lock(&appointment_id).await;
        let mut appointment = self.get_appointment(appointment_id).await?;

        self.lifecycle_service
            .validate_status_transition(appointment.status(), new_status)?;

        match new_status {
            AppointmentStatus::Confirmed => appointment.confirm()?,
            AppointmentStatus::Canceled => appointment.cancel()?,
            AppointmentStatus::Reserved => {
                return Err(SchedulingError::InvalidStatusTransition {
                    from: appointment.status().to_string(),
                    to: new_status.to_string(),
                })
            }
        }

        self.appointments.save(appointment).await?;
        info!("Appointment {} is now {}", appointment_id, new_status);
        Ok(())
    }
}
