//! Persistence seams for the doctor cell.
//!
//! Services receive these as `Arc<dyn ...>` so the composition root decides
//! which backing store is used. `crate::memory` holds the in-process versions.

use async_trait::async_trait;
use chrono::NaiveDate;

use shared_models::{DoctorId, SchedulingResult, SlotId};

use crate::models::{ClinicHoliday, Doctor, DoctorActiveDays, DoctorVacation};
use crate::schedule::Slot;

#[async_trait]
pub trait DoctorStore: Send + Sync {
    /// True when a doctor with this nationality code is already registered.
    async fn exists(&self, nationality_code: &str) -> SchedulingResult<bool>;

    async fn get(&self, id: DoctorId) -> SchedulingResult<Option<Doctor>>;

    /// Inserts or replaces the whole aggregate.
    async fn save(&self, doctor: Doctor) -> SchedulingResult<()>;
}

#[async_trait]
pub trait SlotStore: Send + Sync {
    /// Stores each slot unless the doctor already has a slot for the same
    /// interval, in which case the stored one is kept. Returns the stored slots
    /// in input order.
    async fn save_all(&self, slots: Vec<Slot>) -> SchedulingResult<Vec<Slot>>;

    async fn get(&self, id: SlotId) -> SchedulingResult<Option<Slot>>;

    /// Materialized slots in the order they were saved.
    async fn list_for_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Vec<Slot>>;
}

#[async_trait]
pub trait HolidayStore: Send + Sync {
    async fn is_holiday(&self, date: NaiveDate) -> SchedulingResult<bool>;

    async fn add(&self, holiday: ClinicHoliday) -> SchedulingResult<()>;
}

#[async_trait]
pub trait VacationStore: Send + Sync {
    async fn is_on_vacation(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool>;

    async fn add(&self, vacation: DoctorVacation) -> SchedulingResult<()>;
}

#[async_trait]
pub trait ActiveDaysStore: Send + Sync {
    async fn is_within_active_days(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool>;

    async fn add(&self, active_days: DoctorActiveDays) -> SchedulingResult<()>;
}
