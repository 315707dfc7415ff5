use std::sync::Arc;

use tracing::{debug, warn};

use doctor_cell::store::{ActiveDaysStore, HolidayStore, VacationStore};
use shared_models::{SchedulingError, SchedulingResult};

use crate::models::BookAppointmentRequest;
use crate::store::AppointmentStore;

/// Rules a booking must pass before it is written. Checked in a fixed order
/// and the first failure wins: holiday, vacation, active days, taken period.
pub struct BookingInvariantChecker {
    holidays: Arc<dyn HolidayStore>,
    vacations: Arc<dyn VacationStore>,
    active_days: Arc<dyn ActiveDaysStore>,
    appointments: Arc<dyn AppointmentStore>,
}

impl BookingInvariantChecker {
    pub fn new(
        holidays: Arc<dyn HolidayStore>,
        vacations: Arc<dyn VacationStore>,
        active_days: Arc<dyn ActiveDaysStore>,
        appointments: Arc<dyn AppointmentStore>,
    ) -> Self {
        Self {
            holidays,
            vacations,
            active_days,
            appointments,
        }
    }

    pub async fn check(&self, request: &BookAppointmentRequest) -> SchedulingResult<()> {
        debug!(
            "Checking booking invariants for doctor {} on {} period {}",
            request.doctor_id, request.date, request.period_id
        );

        let result = self.first_violation(request).await;
        if let Err(e) = &result {
            warn!("Booking rejected for doctor {}: {}", request.doctor_id, e);
        }
        result
    }

    async fn first_violation(&self, request: &BookAppointmentRequest) -> SchedulingResult<()> {
        if self.holidays.is_holiday(request.date).await? {
            return Err(SchedulingError::HolidayConflict(request.date));
        }

        if self.vacations.is_on_vacation(request.doctor_id, request.date).await? {
            return Err(SchedulingError::VacationConflict(request.date));
        }

        if !self
            .active_days
            .is_within_active_days(request.doctor_id, request.date)
            .await?
        {
            return Err(SchedulingError::OutsideActiveDays(request.date));
        }

        if self
            .appointments
            .exists_for_doctor_at(request.doctor_id, request.date, request.period_id)
            .await?
        {
            return Err(SchedulingError::SlotTaken {
                date: request.date,
                period_id: request.period_id.to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    use doctor_cell::memory::{InMemoryActiveDaysStore, InMemoryHolidayStore, InMemoryVacationStore};
    use doctor_cell::models::{ClinicHoliday, DoctorActiveDays, DoctorVacation};
    use shared_models::{DoctorId, PatientId, SlotId};

    use crate::models::Appointment;
    use crate::store::InMemoryAppointmentStore;

    struct Stores {
        holidays: InMemoryHolidayStore,
        vacations: InMemoryVacationStore,
        active_days: InMemoryActiveDaysStore,
        appointments: InMemoryAppointmentStore,
    }

    impl Stores {
        fn new() -> Self {
            Self {
                holidays: InMemoryHolidayStore::new(),
                vacations: InMemoryVacationStore::new(),
                active_days: InMemoryActiveDaysStore::new(),
                appointments: InMemoryAppointmentStore::new(),
            }
        }

        fn checker(&self) -> BookingInvariantChecker {
            BookingInvariantChecker::new(
                Arc::new(self.holidays.clone()),
                Arc::new(self.vacations.clone()),
                Arc::new(self.active_days.clone()),
                Arc::new(self.appointments.clone()),
            )
        }
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2030, 1, day).unwrap()
    }

    fn request(doctor_id: DoctorId, date: NaiveDate) -> BookAppointmentRequest {
        BookAppointmentRequest {
            doctor_id,
            patient_id: PatientId::generate(),
            date,
            period_id: SlotId::generate(),
        }
    }

    #[tokio::test]
    async fn test_violations_are_reported_in_order() {
        let stores = Stores::new();
        let checker = stores.checker();
        let doctor_id = DoctorId::generate();
        let booking = request(doctor_id, d(10));

        // Nothing registered: the doctor has no active days yet.
        assert_matches!(checker.check(&booking).await, Err(SchedulingError::OutsideActiveDays(_)));

        stores
            .vacations
            .add(DoctorVacation::new(doctor_id, d(8), d(12), None).unwrap())
            .await
            .unwrap();
        assert_matches!(checker.check(&booking).await, Err(SchedulingError::VacationConflict(_)));

        stores.holidays.add(ClinicHoliday::new(d(10), "Clinic closed")).await.unwrap();
        assert_matches!(checker.check(&booking).await, Err(SchedulingError::HolidayConflict(date)) if date == d(10));
    }

    #[tokio::test]
    async fn test_taken_period_is_rejected() {
        let stores = Stores::new();
        let checker = stores.checker();
        let doctor_id = DoctorId::generate();
        stores
            .active_days
            .add(DoctorActiveDays::new(doctor_id, d(1), d(31)).unwrap())
            .await
            .unwrap();

        let booking = request(doctor_id, d(15));
        checker.check(&booking).await.unwrap();

        stores.appointments.save(Appointment::reserve(&booking)).await.unwrap();
        assert_matches!(checker.check(&booking).await, Err(SchedulingError::SlotTaken { .. }));

        let other_period = request(doctor_id, d(15));
        checker.check(&other_period).await.unwrap();
    }
}
