use async_trait::async_trait;
use chrono::NaiveDate;

use shared_database::InMemoryTable;
use shared_models::{ActiveDaysId, DoctorId, HolidayId, SchedulingResult, SlotId, VacationId};

use crate::models::{ClinicHoliday, Doctor, DoctorActiveDays, DoctorVacation};
use crate::schedule::Slot;
use crate::store::{ActiveDaysStore, DoctorStore, HolidayStore, SlotStore, VacationStore};

#[derive(Clone)]
pub struct InMemoryDoctorStore {
    doctors: InMemoryTable<DoctorId, Doctor>,
}

impl Default for InMemoryDoctorStore {
    fn default() -> Self {
        Self {
            doctors: InMemoryTable::new("doctors"),
        }
    }
}

impl InMemoryDoctorStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DoctorStore for InMemoryDoctorStore {
    async fn exists(&self, nationality_code: &str) -> SchedulingResult<bool> {
        Ok(self
            .doctors
            .any(|doctor| doctor.nationality_code() == nationality_code)
            .await)
    }

    async fn get(&self, id: DoctorId) -> SchedulingResult<Option<Doctor>> {
        Ok(self.doctors.get(&id).await)
    }

    async fn save(&self, doctor: Doctor) -> SchedulingResult<()> {
        self.doctors.upsert(doctor.id(), doctor).await;
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemorySlotStore {
    slots: InMemoryTable<SlotId, Slot>,
}

impl Default for InMemorySlotStore {
    fn default() -> Self {
        Self {
            slots: InMemoryTable::new("slots"),
        }
    }
}

impl InMemorySlotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SlotStore for InMemorySlotStore {
    async fn save_all(&self, slots: Vec<Slot>) -> SchedulingResult<Vec<Slot>> {
        let mut stored = Vec::with_capacity(slots.len());
        for slot in slots {
            let candidate = slot.clone();
            stored.push(
                self.slots
                    .insert_or_existing(slot.id, slot, |existing| existing.same_period(&candidate))
                    .await,
            );
        }
        Ok(stored)
    }

    async fn get(&self, id: SlotId) -> SchedulingResult<Option<Slot>> {
        Ok(self.slots.get(&id).await)
    }

    async fn list_for_doctor(&self, doctor_id: DoctorId) -> SchedulingResult<Vec<Slot>> {
        Ok(self.slots.filter(|slot| slot.doctor_id == doctor_id).await)
    }
}

#[derive(Clone)]
pub struct InMemoryHolidayStore {
    holidays: InMemoryTable<HolidayId, ClinicHoliday>,
}

impl Default for InMemoryHolidayStore {
    fn default() -> Self {
        Self {
            holidays: InMemoryTable::new("clinic_holidays"),
        }
    }
}

impl InMemoryHolidayStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HolidayStore for InMemoryHolidayStore {
    async fn is_holiday(&self, date: NaiveDate) -> SchedulingResult<bool> {
        Ok(self.holidays.any(|holiday| holiday.date == date).await)
    }

    async fn add(&self, holiday: ClinicHoliday) -> SchedulingResult<()> {
        self.holidays.upsert(holiday.id, holiday).await;
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryVacationStore {
    vacations: InMemoryTable<VacationId, DoctorVacation>,
}

impl Default for InMemoryVacationStore {
    fn default() -> Self {
        Self {
            vacations: InMemoryTable::new("doctor_vacations"),
        }
    }
}

impl InMemoryVacationStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VacationStore for InMemoryVacationStore {
    async fn is_on_vacation(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool> {
        Ok(self
            .vacations
            .any(|vacation| vacation.doctor_id == doctor_id && vacation.covers(date))
            .await)
    }

    async fn add(&self, vacation: DoctorVacation) -> SchedulingResult<()> {
        self.vacations.upsert(vacation.id, vacation).await;
        Ok(())
    }
}

#[derive(Clone)]
pub struct InMemoryActiveDaysStore {
    active_days: InMemoryTable<ActiveDaysId, DoctorActiveDays>,
}

impl Default for InMemoryActiveDaysStore {
    fn default() -> Self {
        Self {
            active_days: InMemoryTable::new("doctor_active_days"),
        }
    }
}

impl InMemoryActiveDaysStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ActiveDaysStore for InMemoryActiveDaysStore {
    async fn is_within_active_days(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool> {
        Ok(self
            .active_days
            .any(|range| range.doctor_id == doctor_id && range.covers(date))
            .await)
    }

    async fn add(&self, active_days: DoctorActiveDays) -> SchedulingResult<()> {
        self.active_days.upsert(active_days.id, active_days).await;
        Ok(())
    }
}
