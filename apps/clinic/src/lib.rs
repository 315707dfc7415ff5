//! Composition root for the clinic scheduling core.
//!
//! [`Clinic`] owns one instance of every store and service and exposes the
//! operations callers use. Nothing here is global; each `Clinic` is an
//! independent clinic.

pub mod seed;

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use appointment_cell::{
    Appointment, AppointmentBookingService, AppointmentStatus, BookAppointmentRequest,
    BookingInvariantChecker, InMemoryAppointmentStore,
};
use doctor_cell::memory::{
    InMemoryActiveDaysStore, InMemoryDoctorStore, InMemoryHolidayStore, InMemorySlotStore,
    InMemoryVacationStore,
};
use doctor_cell::models::{CreateDoctorRequest, CreateScheduleRequest, Doctor};
use doctor_cell::services::{AvailabilityService, DoctorService};
use doctor_cell::Slot;
use patient_cell::{CreatePatientRequest, InMemoryPatientStore, Patient, PatientService};
use shared_config::AppConfig;
use shared_models::{
    ActiveDaysId, AppointmentId, DoctorId, HolidayId, PatientId, SchedulingError,
    SchedulingResult, VacationId,
};

pub struct Clinic {
    config: Arc<AppConfig>,
    doctors: DoctorService,
    availability: AvailabilityService,
    patients: PatientService,
    booking: AppointmentBookingService,
}

impl Clinic {
    /// A clinic backed by process-local stores.
    pub fn in_memory(config: AppConfig) -> Self {
        let config = Arc::new(config);

        let doctor_store = Arc::new(InMemoryDoctorStore::new());
        let holidays = Arc::new(InMemoryHolidayStore::new());
        let vacations = Arc::new(InMemoryVacationStore::new());
        let active_days = Arc::new(InMemoryActiveDaysStore::new());
        let appointments = Arc::new(InMemoryAppointmentStore::new());

        let doctors = DoctorService::new(
            Arc::clone(&config),
            doctor_store.clone(),
            Arc::new(InMemorySlotStore::new()),
        );
        let invariants = BookingInvariantChecker::new(
            holidays.clone(),
            vacations.clone(),
            active_days.clone(),
            appointments.clone(),
        );
        let booking = AppointmentBookingService::new(doctor_store.clone(), appointments, invariants);
        let availability = AvailabilityService::new(doctor_store, holidays, vacations, active_days);
        let patients = PatientService::new(Arc::new(InMemoryPatientStore::new()));

        Self {
            config,
            doctors,
            availability,
            patients,
            booking,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    // Doctors and schedules

    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> SchedulingResult<DoctorId> {
        self.doctors.create_doctor(request).await
    }

    pub async fn get_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Doctor> {
        self.doctors.get_doctor(doctor_id).await
    }

    pub async fn add_schedule(
        &self,
        doctor_id: DoctorId,
        request: CreateScheduleRequest,
    ) -> SchedulingResult<()> {
        self.doctors.add_schedule(doctor_id, request).await
    }

    pub async fn generate_slots(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Vec<Slot>> {
        self.doctors.generate_slots(doctor_id, start_date, end_date).await
    }

    pub async fn materialize_slots(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Vec<Slot>> {
        self.doctors.materialize_slots(doctor_id, start_date, end_date).await
    }

    pub async fn slots_for_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Vec<Slot>> {
        self.doctors.slots_for_doctor(doctor_id).await
    }

    // Availability calendar

    pub async fn register_holiday(&self, date: NaiveDate, description: &str) -> SchedulingResult<HolidayId> {
        self.availability.register_holiday(date, description).await
    }

    pub async fn register_vacation(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> SchedulingResult<VacationId> {
        self.availability
            .register_vacation(doctor_id, start_date, end_date, reason)
            .await
    }

    pub async fn register_active_days(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<ActiveDaysId> {
        self.availability
            .register_active_days(doctor_id, start_date, end_date)
            .await
    }

    // Patients

    pub async fn register_patient(&self, request: CreatePatientRequest) -> SchedulingResult<PatientId> {
        self.patients.register_patient(request).await
    }

    pub async fn get_patient(&self, patient_id: PatientId) -> SchedulingResult<Patient> {
        self.patients.get_patient(patient_id).await
    }

    // Appointments

    pub async fn book_appointment(&self, request: BookAppointmentRequest) -> SchedulingResult<AppointmentId> {
        self.book_appointment_with_cancel(request, &CancellationToken::new())
            .await
    }

    /// Books the period, then records the appointment on the patient when the
    /// patient is registered. The booking stands even if that bookkeeping fails.
    pub async fn book_appointment_with_cancel(
        &self,
        request: BookAppointmentRequest,
        cancel: &CancellationToken,
    ) -> SchedulingResult<AppointmentId> {
        let patient_id = request.patient_id;
        let appointment_id = self.booking.book_appointment(request, cancel).await?;

        match self.patients.record_appointment(patient_id, appointment_id).await {
            Ok(()) | Err(SchedulingError::NotFound(_)) => {}
            Err(e) => warn!(
                "Appointment {} booked but not recorded for patient {}: {}",
                appointment_id, patient_id, e
            ),
        }

        Ok(appointment_id)
    }

    pub async fn confirm_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<()> {
        self.booking.confirm_appointment(appointment_id).await
    }

    pub async fn cancel_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<()> {
        self.booking.cancel_appointment(appointment_id).await
    }

    pub async fn get_appointment(&self, appointment_id: AppointmentId) -> SchedulingResult<Appointment> {
        self.booking.get_appointment(appointment_id).await
    }

    pub async fn appointments_for_doctor_on(
        &self,
        doctor_id: DoctorId,
        date: NaiveDate,
    ) -> SchedulingResult<Vec<Appointment>> {
        self.booking.appointments_for_doctor_on(doctor_id, date).await
    }

    pub fn valid_status_transitions(&self, status: AppointmentStatus) -> Vec<AppointmentStatus> {
        self.booking.valid_status_transitions(status)
    }
}
