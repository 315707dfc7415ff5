use async_trait::async_trait;

use shared_database::InMemoryTable;
use shared_models::{PatientId, SchedulingResult};

use crate::models::Patient;

#[async_trait]
pub trait PatientStore: Send + Sync {
    async fn get(&self, id: PatientId) -> SchedulingResult<Option<Patient>>;

    async fn save(&self, patient: Patient) -> SchedulingResult<()>;
}

#[derive(Clone)]
pub struct InMemoryPatientStore {
    patients: InMemoryTable<PatientId, Patient>,
}

impl Default for InMemoryPatientStore {
    fn default() -> Self {
        Self {
            patients: InMemoryTable::new("patients"),
        }
    }
}

impl InMemoryPatientStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PatientStore for InMemoryPatientStore {
    async fn get(&self, id: PatientId) -> SchedulingResult<Option<Patient>> {
        Ok(self.patients.get(&id).await)
    }

    async fn save(&self, patient: Patient) -> SchedulingResult<()> {
        self.patients.upsert(patient.id, patient).await;
        Ok(())
    }
}
