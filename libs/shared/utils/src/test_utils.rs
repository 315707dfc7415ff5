use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime, Weekday};

use shared_config::{AppConfig, SlotExpansion};

/// Nationality codes whose check digit is correct. Covers remainders of
/// 0, 4, 2 and 10 in the weighted checksum.
pub const VALID_NATIONALITY_CODES: [&str; 4] =
    ["0100000010", "3001011017", "0499370899", "1000000001"];

pub struct TestConfig {
    pub slot_expansion: SlotExpansion,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            slot_expansion: SlotExpansion::AnchorToStartDate,
        }
    }
}

impl TestConfig {
    pub fn weekly() -> Self {
        Self {
            slot_expansion: SlotExpansion::RepeatWeekly,
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            slot_expansion: self.slot_expansion,
            log_filter: "debug".to_string(),
            seed_file: None,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Routes `tracing` output through the test harness. Safe to call from every test.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
}

pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).expect("valid test time")
}

/// Field values for a doctor that passes validation.
#[derive(Debug, Clone)]
pub struct TestDoctor {
    pub name: String,
    pub last_name: String,
    pub speciality: String,
    pub nationality_code: String,
    pub medical_council_number: String,
    pub phone_number: String,
    pub mobile_number: String,
    pub address: String,
}

impl Default for TestDoctor {
    fn default() -> Self {
        Self {
            name: "Samaneh".to_string(),
            last_name: "Yousefi".to_string(),
            speciality: "Dentistry".to_string(),
            nationality_code: VALID_NATIONALITY_CODES[1].to_string(),
            medical_council_number: "MC-55821".to_string(),
            phone_number: "021-5550100".to_string(),
            mobile_number: "0912-5550100".to_string(),
            address: "12 Clinic Street".to_string(),
        }
    }
}

impl TestDoctor {
    pub fn with_nationality_code(mut self, code: &str) -> Self {
        self.nationality_code = code.to_string();
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = last_name.to_string();
        self
    }
}

/// A schedule with a single day and a single working window.
#[derive(Debug, Clone)]
pub struct ScheduleParams {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub session_duration: u32,
    pub rest_duration: u32,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub work_day: Weekday,
}

impl ScheduleParams {
    /// Saturday 09:00-14:00, 30 minute sessions with 10 minutes rest.
    pub fn default_for(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            session_duration: 30,
            rest_duration: 10,
            start_time: time(9, 0),
            end_time: time(14, 0),
            work_day: Weekday::Sat,
        }
    }

    pub fn with_window(mut self, start_time: NaiveTime, end_time: NaiveTime) -> Self {
        self.start_time = start_time;
        self.end_time = end_time;
        self
    }

    pub fn with_durations(mut self, session_duration: u32, rest_duration: u32) -> Self {
        self.session_duration = session_duration;
        self.rest_duration = rest_duration;
        self
    }

    pub fn on(mut self, work_day: Weekday) -> Self {
        self.work_day = work_day;
        self
    }
}
