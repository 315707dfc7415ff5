use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use shared_models::{ActiveDaysId, DoctorId, HolidayId, SchedulingError, SchedulingResult, VacationId};

use crate::models::{ClinicHoliday, DoctorActiveDays, DoctorVacation};
use crate::store::{ActiveDaysStore, DoctorStore, HolidayStore, VacationStore};

/// Clinic holidays, doctor vacations and doctor active-day ranges.
pub struct AvailabilityService {
    doctors: Arc<dyn DoctorStore>,
    holidays: Arc<dyn HolidayStore>,
    vacations: Arc<dyn VacationStore>,
    active_days: Arc<dyn ActiveDaysStore>,
}

impl AvailabilityService {
    pub fn new(
        doctors: Arc<dyn DoctorStore>,
        holidays: Arc<dyn HolidayStore>,
        vacations: Arc<dyn VacationStore>,
        active_days: Arc<dyn ActiveDaysStore>,
    ) -> Self {
        Self {
            doctors,
            holidays,
            vacations,
            active_days,
        }
    }

    pub async fn register_holiday(
        &self,
        date: NaiveDate,
        description: &str,
    ) -> SchedulingResult<HolidayId> {
        let holiday = ClinicHoliday::new(date, description);
        let id = holiday.id;
        self.holidays.add(holiday).await?;

        info!("Clinic holiday registered on {}", date);
        Ok(id)
    }

    pub async fn register_vacation(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> SchedulingResult<VacationId> {
        debug!("Registering vacation for doctor {}: {} to {}", doctor_id, start_date, end_date);

        let vacation = DoctorVacation::new(doctor_id, start_date, end_date, reason)?;
        self.ensure_doctor_exists(doctor_id).await?;

        let id = vacation.id;
        self.vacations.add(vacation).await?;
        Ok(id)
    }

    pub async fn register_active_days(
        &self,
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> SchedulingResult<ActiveDaysId> {
        debug!("Registering active days for doctor {}: {} to {}", doctor_id, start_date, end_date);

        let active_days = DoctorActiveDays::new(doctor_id, start_date, end_date)?;
        self.ensure_doctor_exists(doctor_id).await?;

        let id = active_days.id;
        self.active_days.add(active_days).await?;
        Ok(id)
    }

    pub async fn is_holiday(&self, date: NaiveDate) -> SchedulingResult<bool> {
        self.holidays.is_holiday(date).await
    }

    pub async fn is_on_vacation(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool> {
        self.vacations.is_on_vacation(doctor_id, date).await
    }

    pub async fn is_within_active_days(&self, doctor_id: DoctorId, date: NaiveDate) -> SchedulingResult<bool> {
        self.active_days.is_within_active_days(doctor_id, date).await
    }

    async fn ensure_doctor_exists(&self, doctor_id: DoctorId) -> SchedulingResult<()> {
        match self.doctors.get(doctor_id).await? {
            Some(_) => Ok(()),
            None => Err(SchedulingError::NotFound(format!("doctor {}", doctor_id))),
        }
    }
}
