use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use doctor_cell::models::ContactInfo;
use shared_models::{AppointmentId, PatientId, SchedulingError, SchedulingResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: PatientId,
    pub first_name: String,
    pub last_name: String,
    pub contact_info: ContactInfo,
    /// Bookings made for this patient. The appointments themselves live in
    /// the appointment store.
    pub appointments: Vec<AppointmentId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn new(request: CreatePatientRequest) -> SchedulingResult<Self> {
        request.validate()?;

        let now = Utc::now();
        Ok(Self {
            id: PatientId::generate(),
            first_name: request.first_name.trim().to_string(),
            last_name: request.last_name.trim().to_string(),
            contact_info: request.contact_info,
            appointments: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Returns false when the appointment was already recorded.
    pub fn add_appointment(&mut self, appointment_id: AppointmentId) -> bool {
        if self.appointments.contains(&appointment_id) {
            return false;
        }
        self.appointments.push(appointment_id);
        self.updated_at = Utc::now();
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePatientRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl CreatePatientRequest {
    pub fn validate(&self) -> SchedulingResult<()> {
        if self.first_name.trim().is_empty() {
            return Err(SchedulingError::InvalidArgument("first name is required".to_string()));
        }
        if self.last_name.trim().is_empty() {
            return Err(SchedulingError::InvalidArgument("last name is required".to_string()));
        }
        Ok(())
    }
}
