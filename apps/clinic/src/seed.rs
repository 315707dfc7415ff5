//! JSON seed document: doctors with their schedules plus the availability
//! calendar. Doctors are referenced by nationality code since their ids are
//! assigned on registration.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use doctor_cell::models::{CreateDoctorRequest, CreateScheduleRequest};
use doctor_cell::Slot;
use shared_models::DoctorId;

use crate::Clinic;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeedDocument {
    #[serde(default)]
    pub doctors: Vec<SeedDoctor>,
    #[serde(default)]
    pub holidays: Vec<SeedHoliday>,
    #[serde(default)]
    pub vacations: Vec<SeedVacation>,
    #[serde(default, alias = "activeDays")]
    pub active_days: Vec<SeedActiveDays>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedDoctor {
    #[serde(flatten)]
    pub doctor: CreateDoctorRequest,
    #[serde(default)]
    pub schedules: Vec<CreateScheduleRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedHoliday {
    pub date: NaiveDate,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedVacation {
    pub nationality_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedActiveDays {
    pub nationality_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Slots materialized for one seeded schedule.
#[derive(Debug, Clone, Serialize)]
pub struct SeededSchedule {
    pub doctor_id: DoctorId,
    pub nationality_code: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub slots: Vec<Slot>,
}

impl SeedDocument {
    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("Seed document is not valid JSON")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read seed file {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("Failed to load seed file {}", path.display()))
    }

    /// Registers everything in the document and materializes the slots of
    /// every schedule. Stops at the first rejected entry.
    pub async fn apply(&self, clinic: &Clinic) -> Result<Vec<SeededSchedule>> {
        let mut doctor_ids: HashMap<String, DoctorId> = HashMap::new();
        let mut seeded = Vec::new();

        for entry in &self.doctors {
            let code = entry.doctor.nationality_code.clone();
            let doctor_id = clinic
                .create_doctor(entry.doctor.clone())
                .await
                .with_context(|| format!("Failed to register doctor {}", code))?;
            doctor_ids.insert(code.clone(), doctor_id);

            for schedule in &entry.schedules {
                let (start_date, end_date) = (schedule.start_date, schedule.end_date);
                clinic
                    .add_schedule(doctor_id, schedule.clone())
                    .await
                    .with_context(|| {
                        format!("Failed to add schedule {} to {} for doctor {}", start_date, end_date, code)
                    })?;

                let slots = clinic.materialize_slots(doctor_id, start_date, end_date).await?;
                debug!("Seeded {} slots for doctor {}", slots.len(), code);

                seeded.push(SeededSchedule {
                    doctor_id,
                    nationality_code: code.clone(),
                    start_date,
                    end_date,
                    slots,
                });
            }
        }

        for holiday in &self.holidays {
            clinic
                .register_holiday(holiday.date, &holiday.description)
                .await
                .with_context(|| format!("Failed to register holiday {}", holiday.date))?;
        }

        for vacation in &self.vacations {
            let doctor_id = lookup(&doctor_ids, &vacation.nationality_code)?;
            clinic
                .register_vacation(doctor_id, vacation.start_date, vacation.end_date, vacation.reason.clone())
                .await
                .with_context(|| format!("Failed to register vacation for doctor {}", vacation.nationality_code))?;
        }

        for range in &self.active_days {
            let doctor_id = lookup(&doctor_ids, &range.nationality_code)?;
            clinic
                .register_active_days(doctor_id, range.start_date, range.end_date)
                .await
                .with_context(|| format!("Failed to register active days for doctor {}", range.nationality_code))?;
        }

        info!(
            "Seed applied: {} doctors, {} schedules, {} holidays",
            self.doctors.len(),
            seeded.len(),
            self.holidays.len()
        );
        Ok(seeded)
    }
}

fn lookup(doctor_ids: &HashMap<String, DoctorId>, nationality_code: &str) -> Result<DoctorId> {
    doctor_ids
        .get(nationality_code)
        .copied()
        .ok_or_else(|| anyhow!("Seed references unknown doctor {}", nationality_code))
}
