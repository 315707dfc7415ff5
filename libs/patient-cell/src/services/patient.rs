use std::sync::Arc;

use tracing::{debug, info};

use shared_database::KeyedLocks;
use shared_models::{AppointmentId, PatientId, SchedulingError, SchedulingResult};

use crate::models::{CreatePatientRequest, Patient};
use crate::store::PatientStore;

pub struct PatientService {
    patients: Arc<dyn PatientStore>,
    patient_locks: KeyedLocks<PatientId>,
}

impl PatientService {
    pub fn new(patients: Arc<dyn PatientStore>) -> Self {
        Self {
            patients,
            patient_locks: KeyedLocks::new(),
        }
    }

    pub async fn register_patient(&self, request: CreatePatientRequest) -> SchedulingResult<PatientId> {
        debug!("Registering patient {} {}", request.first_name, request.last_name);

        let patient = Patient::new(request)?;
        let patient_id = patient.id;
        self.patients.save(patient).await?;

        info!("Patient registered with ID: {}", patient_id);
        Ok(patient_id)
    }

    pub async fn get_patient(&self, patient_id: PatientId) -> SchedulingResult<Patient> {
        self.patients
            .get(patient_id)
            .await?
            .ok_or_else(|| SchedulingError::NotFound(format!("patient {}", patient_id)))
    }

    /// Append a booking to the patient's appointment list.
    pub async fn record_appointment(
        &self,
        patient_id: PatientId,
        appointment_id: AppointmentId,
    ) -> SchedulingResult<()> {
        let _guard = self.patient_locks.lock(&patient_id).await;
        let mut patient = self.get_patient(patient_id).await?;

        if patient.add_appointment(appointment_id) {
            self.patients.save(patient).await?;
            debug!("Recorded appointment {} for patient {}", appointment_id, patient_id);
        }
        Ok(())
    }
}
