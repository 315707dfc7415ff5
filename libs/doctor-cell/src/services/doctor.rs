use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, instrument, warn};

use shared_config::AppConfig;
use shared_database::KeyedLocks;
use shared_models::{DoctorId, SchedulingError, SchedulingResult};

use crate::models::{CreateDoctorRequest, CreateScheduleRequest, Doctor};
use crate::schedule::Slot;
use crate::store::{DoctorStore, SlotStore};

pub struct DoctorService {
    doctors: Arc<dyn DoctorStore>,
    slots: Arc<dyn SlotStore>,
    config: Arc<AppConfig>,
    doctor_locks: KeyedLocks<DoctorId>,
    registration_locks: KeyedLocks<String>,
}

impl DoctorService {
    pub fn new(
        config: Arc<AppConfig>,
        doctors: Arc<dyn DoctorStore>,
        slots: Arc<dyn SlotStore>,
    ) -> Self {
        Self {
            doctors,
            slots,
            config,
            doctor_locks: KeyedLocks::new(),
            registration_locks: KeyedLocks::new(),
        }
    }

    /// Register a new doctor. Nationality codes are unique across doctors.
    #[instrument(skip(self, request), fields(nationality_code = %request.nationality_code))]
    pub async fn create_doctor(&self, request: CreateDoctorRequest) -> SchedulingResult<DoctorId> {
        debug!("Creating doctor {} {}", request.name, request.last_name);

        let doctor = Doctor::new(request).map_err(|e| {
            warn!("Rejected doctor registration: {}", e);
            e
        })?;

        let _guard = self
            .registration_locks
            .lock(&doctor.nationality_code().to_string())
            .await;

        if self.doctors.exists(doctor.nationality_code()).await? {
            warn!("Doctor with nationality code {} already exists", doctor.nationality_code());
            return Err(SchedulingError::DoctorAlreadyExists(
                doctor.nationality_code().to_string(),
            ));
        }

        let doctor_id = doctor.id();
        self.doctors.save(doctor).await?;

        info!("Doctor registered with ID: {}", doctor_id);
        Ok(doctor_id)
    }

    pub async fn get_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Doctor> {
        self.doctors
            .get(doctor_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("doctor {}", doctor_id)))
    }

    /// Attach a schedule to a doctor. Load, conflict check and save run under
    /// the doctor's write lock.
    #[instrument(skip(self, request))]
    pub async fn add_schedule(
        &self,
        doctor_id: DoctorId,
        request: CreateScheduleRequest,
    ) -> SchedulingResult<()> {
        debug!(
            "Adding schedule {} to {} for doctor {}",
            request.start_date, request.end_date, doctor_id
        );

        let schedule = request.into_schedule()?;

        let _guard = self.doctor_locks.lock(&doctor_id).await;
        let mut doctor = self.get_doctor(doctor_id).await?;

        if let Err(e) = doctor.create_schedule(schedule) {
            warn!("Schedule rejected for doctor {}: {}", doctor_id, e);
            return Err(e);
        }

        self.doctors.save(doctor).await?;
        info!("Schedule added for doctor {}", doctor_id);
        Ok(())
    }

    /// Slots of the doctor's schedule spanning exactly `start_date..=end_date`,
    /// expanded with the configured [`shared_config::SlotExpansion`].
    pub async fn generate_slots(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Vec<Slot>> {
        debug!(
            "Generating slots for doctor {} from {} to {} ({})",
            doctor_id, start_date, end_date, self.config.slot_expansion
        );

        let doctor = self.get_doctor(doctor_id).await?;
        let slots = doctor.generate_slots(start_date, end_date, self.config.slot_expansion)?;

        debug!("Generated {} slots for doctor {}", slots.len(), doctor_id);
        Ok(slots)
    }

    /// Generate slots and persist them so they can be booked by id. Repeating
    /// the call returns the slots already stored for those intervals, so one
    /// interval never has two bookable ids.
    pub async fn materialize_slots(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<Vec<Slot>> {
        let _guard = self.doctor_locks.lock(&doctor_id).await;

        let generated = self.generate_slots(doctor_id, start_date, end_date).await?;
        let slots = self.slots.save_all(generated).await?;

        info!("Materialized {} slots for doctor {}", slots.len(), doctor_id);
        Ok(slots)
    }

    pub async fn slots_for_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Vec<Slot>> {
        self.slots.list_for_doctor(doctor_id).await
    }
}
