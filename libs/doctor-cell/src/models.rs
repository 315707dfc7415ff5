use chrono::{DateTime, NaiveDate, NaiveTime, Utc, Weekday};
use serde::{Deserialize, Serialize};

use shared_config::SlotExpansion;
use shared_models::{
    ActiveDaysId, DoctorId, HolidayId, SchedulingError, SchedulingResult, VacationId,
};

use crate::schedule::{DaySchedule, Schedule, Slot, WorkingHours};
use crate::services::validation::is_valid_nationality_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub phone_number: String,
    pub mobile_number: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDoctorRequest {
    pub name: String,
    pub last_name: String,
    pub speciality: String,
    pub nationality_code: String,
    pub medical_council_number: String,
    pub gender: Gender,
    #[serde(default)]
    pub contact_info: ContactInfo,
}

impl CreateDoctorRequest {
    /// Checks every field a doctor must satisfy, reporting the first failure.
    pub fn validate(&self) -> SchedulingResult<()> {
        if self.name.is_empty() {
            return Err(SchedulingError::InvalidArgument("name is required".to_string()));
        }
        if self.name.chars().count() < 2 {
            return Err(SchedulingError::InvalidArgument(
                "name must be at least 2 characters".to_string(),
            ));
        }
        if self.last_name.is_empty() {
            return Err(SchedulingError::InvalidArgument("last name is required".to_string()));
        }
        if !is_valid_nationality_code(&self.nationality_code) {
            return Err(SchedulingError::InvalidArgument(format!(
                "nationality code {} failed the checksum",
                self.nationality_code
            )));
        }
        Ok(())
    }
}

/// Doctor aggregate. Owns its schedules; every schedule change goes through
/// [`Doctor::create_schedule`].
#[derive(Debug, Clone, Serialize)]
pub struct Doctor {
    id: DoctorId,
    name: String,
    last_name: String,
    speciality: String,
    nationality_code: String,
    medical_council_number: String,
    gender: Gender,
    contact_info: ContactInfo,
    schedules: Vec<Schedule>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Doctor {
    pub fn new(request: CreateDoctorRequest) -> SchedulingResult<Self> {
        Self::with_id(DoctorId::generate(), request)
    }

    pub fn with_id(id: DoctorId, request: CreateDoctorRequest) -> SchedulingResult<Self> {
        request.validate()?;

        let now = Utc::now();
        Ok(Self {
            id,
            name: request.name,
            last_name: request.last_name,
            speciality: request.speciality,
            nationality_code: request.nationality_code,
            medical_council_number: request.medical_council_number,
            gender: request.gender,
            contact_info: request.contact_info,
            schedules: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    pub fn id(&self) -> DoctorId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.last_name)
    }

    pub fn speciality(&self) -> &str {
        &self.speciality
    }

    pub fn nationality_code(&self) -> &str {
        &self.nationality_code
    }

    pub fn medical_council_number(&self) -> &str {
        &self.medical_council_number
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn contact_info(&self) -> &ContactInfo {
        &self.contact_info
    }

    pub fn schedules(&self) -> &[Schedule] {
        &self.schedules
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Adds a schedule unless one already starts or ends on the same date.
    /// Conflicts are exact-date matches, not range overlaps.
    pub fn create_schedule(&mut self, schedule: Schedule) -> SchedulingResult<()> {
        let conflict = self.schedules.iter().any(|existing| {
            existing.start_date() == schedule.start_date()
                || existing.end_date() == schedule.end_date()
        });

        if conflict {
            return Err(SchedulingError::ScheduleConflict {
                start_date: schedule.start_date(),
                end_date: schedule.end_date(),
            });
        }

        self.schedules.push(schedule);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn find_schedule(&self, start_date: NaiveDate, end_date: NaiveDate) -> Option<&Schedule> {
        self.schedules.iter().find(|s| s.spans(start_date, end_date))
    }

    /// Slots of the schedule spanning exactly `start_date..=end_date`.
    pub fn generate_slots(
        &self,
        start_date: NaiveDate,
        end_date: NaiveDate,
        expansion: SlotExpansion,
    ) -> SchedulingResult<Vec<Slot>> {
        let schedule = self
            .find_schedule(start_date, end_date)
            .ok_or(SchedulingError::ScheduleNotFound {
                start_date,
                end_date,
            })?;

        schedule.generate_slots(self.id, expansion)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingHoursRequest {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayScheduleRequest {
    pub work_day: Weekday,
    pub hours: Vec<WorkingHoursRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub session_duration: u32,
    #[serde(default)]
    pub rest_duration: u32,
    pub day_schedules: Vec<DayScheduleRequest>,
}

impl CreateScheduleRequest {
    pub fn into_schedule(self) -> SchedulingResult<Schedule> {
        let day_schedules = self
            .day_schedules
            .into_iter()
            .map(|day| {
                let hours = day
                    .hours
                    .into_iter()
                    .map(|h| WorkingHours::new(h.start_time, h.end_time))
                    .collect::<SchedulingResult<Vec<_>>>()?;
                Ok(DaySchedule::new(day.work_day, hours))
            })
            .collect::<SchedulingResult<Vec<_>>>()?;

        Schedule::new(
            self.start_date,
            self.end_date,
            self.session_duration,
            self.rest_duration,
            day_schedules,
        )
    }
}

/// A date on which the whole clinic is closed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicHoliday {
    pub id: HolidayId,
    pub date: NaiveDate,
    pub description: String,
}

impl ClinicHoliday {
    pub fn new(date: NaiveDate, description: impl Into<String>) -> Self {
        Self {
            id: HolidayId::generate(),
            date,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorVacation {
    pub id: VacationId,
    pub doctor_id: DoctorId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

impl DoctorVacation {
    pub fn new(
        doctor_id: DoctorId,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> SchedulingResult<Self> {
        ensure_date_order(start_date, end_date)?;
        Ok(Self {
            id: VacationId::generate(),
            doctor_id,
            start_date,
            end_date,
            reason,
        })
    }

    /// Inclusive on both ends.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

/// A date range during which a doctor accepts bookings at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoctorActiveDays {
    pub id: ActiveDaysId,
    pub doctor_id: DoctorId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DoctorActiveDays {
    pub fn new(doctor_id: DoctorId, start_date: NaiveDate, end_date: NaiveDate) -> SchedulingResult<Self> {
        ensure_date_order(start_date, end_date)?;
        Ok(Self {
            id: ActiveDaysId::generate(),
            doctor_id,
            start_date,
            end_date,
        })
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }
}

fn ensure_date_order(start_date: NaiveDate, end_date: NaiveDate) -> SchedulingResult<()> {
    if end_date < start_date {
        return Err(SchedulingError::invalid_range(start_date, end_date));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> CreateDoctorRequest {
        CreateDoctorRequest {
            name: "Samaneh".to_string(),
            last_name: "Yousefi".to_string(),
            speciality: "Dentistry".to_string(),
            nationality_code: "3001011017".to_string(),
            medical_council_number: "MC-1".to_string(),
            gender: Gender::Female,
            contact_info: ContactInfo::default(),
        }
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_doctor_is_built_from_valid_request() {
        let doctor = Doctor::new(request()).unwrap();
        assert_eq!(doctor.full_name(), "Samaneh Yousefi");
        assert_eq!(doctor.nationality_code(), "3001011017");
        assert!(doctor.schedules().is_empty());
    }

    #[test]
    fn test_doctor_validation_failures() {
        let cases: Vec<Box<dyn Fn(&mut CreateDoctorRequest)>> = vec![
            Box::new(|r| r.name = String::new()),
            Box::new(|r| r.name = "S".to_string()),
            Box::new(|r| r.last_name = String::new()),
            Box::new(|r| r.nationality_code = "0000000000".to_string()),
            Box::new(|r| r.nationality_code = "3001011018".to_string()),
        ];

        for mutate in cases {
            let mut req = request();
            mutate(&mut req);
            assert_matches!(Doctor::new(req), Err(SchedulingError::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_two_character_name_is_accepted() {
        let mut req = request();
        req.name = "Al".to_string();
        assert!(Doctor::new(req).is_ok());

        // Length is measured on the name as given.
        let mut req = request();
        req.name = " A".to_string();
        let doctor = Doctor::new(req).unwrap();
        assert_eq!(doctor.name(), " A");
    }

    #[test]
    fn test_speciality_is_optional() {
        let mut req = request();
        req.speciality = String::new();
        let doctor = Doctor::new(req).unwrap();
        assert_eq!(doctor.speciality(), "");
    }

    #[test]
    fn test_schedule_request_conversion_rejects_bad_window() {
        let req = CreateScheduleRequest {
            start_date: d(2030, 1, 1),
            end_date: d(2030, 1, 31),
            session_duration: 30,
            rest_duration: 0,
            day_schedules: vec![DayScheduleRequest {
                work_day: Weekday::Sat,
                hours: vec![WorkingHoursRequest {
                    start_time: NaiveTime::from_hms_opt(12, 0, 0).unwrap(),
                    end_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
                }],
            }],
        };

        assert_matches!(req.into_schedule(), Err(SchedulingError::InvalidRange { .. }));
    }

    #[test]
    fn test_vacation_and_active_days_cover_inclusively() {
        let doctor_id = DoctorId::generate();
        let vacation = DoctorVacation::new(doctor_id, d(2030, 2, 1), d(2030, 2, 3), None).unwrap();
        assert!(vacation.covers(d(2030, 2, 1)));
        assert!(vacation.covers(d(2030, 2, 3)));
        assert!(!vacation.covers(d(2030, 2, 4)));

        let active = DoctorActiveDays::new(doctor_id, d(2030, 1, 1), d(2030, 1, 1)).unwrap();
        assert!(active.covers(d(2030, 1, 1)));
        assert!(!active.covers(d(2029, 12, 31)));

        assert_matches!(
            DoctorActiveDays::new(doctor_id, d(2030, 1, 2), d(2030, 1, 1)),
            Err(SchedulingError::InvalidRange { .. })
        );
    }
}
