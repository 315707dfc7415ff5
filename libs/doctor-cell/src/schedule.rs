use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use shared_config::SlotExpansion;
use shared_models::{DoctorId, ScheduleId, SchedulingError, SchedulingResult, SlotId};

const SECONDS_PER_MINUTE: i64 = 60;

/// A validated time-of-day interval. `end` is always strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TimeRange {
    start: NaiveTime,
    end: NaiveTime,
}

impl TimeRange {
    pub fn new(start: NaiveTime, end: NaiveTime) -> SchedulingResult<Self> {
        if end <= start {
            return Err(SchedulingError::invalid_range(start, end));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Strict overlap: ranges that only touch at a boundary do not overlap.
    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start < other.end && self.end > other.start
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

impl<'de> Deserialize<'de> for TimeRange {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            start: NaiveTime,
            end: NaiveTime,
        }

        let raw = Raw::deserialize(deserializer)?;
        TimeRange::new(raw.start, raw.end).map_err(serde::de::Error::custom)
    }
}

/// One working window of a day, e.g. the morning or the evening shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkingHours(TimeRange);

impl WorkingHours {
    pub fn new(start: NaiveTime, end: NaiveTime) -> SchedulingResult<Self> {
        TimeRange::new(start, end).map(Self)
    }

    pub fn range(&self) -> &TimeRange {
        &self.0
    }

    pub fn start(&self) -> NaiveTime {
        self.0.start
    }

    pub fn end(&self) -> NaiveTime {
        self.0.end
    }
}

impl From<TimeRange> for WorkingHours {
    fn from(range: TimeRange) -> Self {
        Self(range)
    }
}

/// A bookable session produced by slicing a day's working windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub work_day: Weekday,
    pub start: NaiveTime,
    pub end: NaiveTime,
}

/// The working windows of one weekday. Windows are sliced in the order they
/// were declared and may overlap each other.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub work_day: Weekday,
    pub hours: Vec<WorkingHours>,
}

impl DaySchedule {
    pub fn new(work_day: Weekday, hours: Vec<WorkingHours>) -> Self {
        Self { work_day, hours }
    }

    /// Slices every window into back-to-back sessions separated by
    /// `rest_duration` minutes. A session that would run past the end of its
    /// window is dropped, and each window starts fresh at its own start time.
    ///
    /// The returned iterator borrows the schedule and recomputes from scratch
    /// on every call.
    pub fn generate(
        &self,
        session_duration: u32,
        rest_duration: u32,
    ) -> SchedulingResult<Sessions<'_>> {
        if session_duration == 0 {
            return Err(SchedulingError::InvalidDuration(session_duration));
        }

        let session = i64::from(session_duration) * SECONDS_PER_MINUTE;
        let rest = i64::from(rest_duration) * SECONDS_PER_MINUTE;

        Ok(Sessions {
            work_day: self.work_day,
            windows: self.hours.iter(),
            current: None,
            session,
            step: session + rest,
        })
    }
}

/// Lazy session sequence returned by [`DaySchedule::generate`].
#[derive(Debug, Clone)]
pub struct Sessions<'a> {
    work_day: Weekday,
    windows: std::slice::Iter<'a, WorkingHours>,
    // (cursor, window end), both in seconds from midnight
    current: Option<(i64, i64)>,
    session: i64,
    step: i64,
}

impl Iterator for Sessions<'_> {
    type Item = Session;

    fn next(&mut self) -> Option<Session> {
        loop {
            if let Some((cursor, window_end)) = self.current {
                if cursor + self.session <= window_end {
                    self.current = Some((cursor + self.step, window_end));
                    return Some(Session {
                        work_day: self.work_day,
                        start: time_from_seconds(cursor)?,
                        end: time_from_seconds(cursor + self.session)?,
                    });
                }
                self.current = None;
            }

            let window = self.windows.next()?;
            self.current = Some((
                whole_seconds_at_or_after(window.start()),
                i64::from(window.end().num_seconds_from_midnight()),
            ));
        }
    }
}

// Sub-second window starts round up so no session opens before its window.
fn whole_seconds_at_or_after(time: NaiveTime) -> i64 {
    let seconds = i64::from(time.num_seconds_from_midnight());
    if time.nanosecond() > 0 {
        seconds + 1
    } else {
        seconds
    }
}

fn time_from_seconds(seconds: i64) -> Option<NaiveTime> {
    let seconds = u32::try_from(seconds).ok()?;
    NaiveTime::from_num_seconds_from_midnight_opt(seconds, 0)
}

/// A concrete bookable interval for one doctor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub doctor_id: DoctorId,
    pub start_date_time: NaiveDateTime,
    pub end_date_time: NaiveDateTime,
}

impl Slot {
    pub fn new(doctor_id: DoctorId, start_date_time: NaiveDateTime, end_date_time: NaiveDateTime) -> Self {
        Self {
            id: SlotId::generate(),
            doctor_id,
            start_date_time,
            end_date_time,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.start_date_time.date()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end_date_time - self.start_date_time).num_minutes()
    }

    /// Same doctor and same interval, whatever the ids.
    pub fn same_period(&self, other: &Slot) -> bool {
        self.doctor_id == other.doctor_id
            && self.start_date_time == other.start_date_time
            && self.end_date_time == other.end_date_time
    }
}

/// A doctor's weekly availability template for a bounded date span.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schedule {
    id: ScheduleId,
    start_date: NaiveDate,
    end_date: NaiveDate,
    session_duration: u32,
    rest_duration: u32,
    day_schedules: Vec<DaySchedule>,
}

impl Schedule {
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        session_duration: u32,
        rest_duration: u32,
        day_schedules: Vec<DaySchedule>,
    ) -> SchedulingResult<Self> {
        if end_date < start_date {
            return Err(SchedulingError::invalid_range(start_date, end_date));
        }
        if session_duration == 0 {
            return Err(SchedulingError::InvalidDuration(session_duration));
        }

        Ok(Self {
            id: ScheduleId::generate(),
            start_date,
            end_date,
            session_duration,
            rest_duration,
            day_schedules,
        })
    }

    pub fn id(&self) -> ScheduleId {
        self.id
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    pub fn session_duration(&self) -> u32 {
        self.session_duration
    }

    pub fn rest_duration(&self) -> u32 {
        self.rest_duration
    }

    pub fn day_schedules(&self) -> &[DaySchedule] {
        &self.day_schedules
    }

    pub fn spans(&self, start_date: NaiveDate, end_date: NaiveDate) -> bool {
        self.start_date == start_date && self.end_date == end_date
    }

    /// Expands the weekly template into slots. Every slot gets a new id.
    pub fn generate_slots(
        &self,
        doctor_id: DoctorId,
        expansion: SlotExpansion,
    ) -> SchedulingResult<Vec<Slot>> {
        let mut slots = Vec::new();

        match expansion {
            SlotExpansion::AnchorToStartDate => {
                for day in &self.day_schedules {
                    self.push_sessions(&mut slots, doctor_id, day, self.start_date)?;
                }
            }
            SlotExpansion::RepeatWeekly => {
                for date in self.start_date.iter_days().take_while(|d| *d <= self.end_date) {
                    for day in self.day_schedules.iter().filter(|d| d.work_day == date.weekday()) {
                        self.push_sessions(&mut slots, doctor_id, day, date)?;
                    }
                }
            }
        }

        Ok(slots)
    }

    fn push_sessions(
        &self,
        slots: &mut Vec<Slot>,
        doctor_id: DoctorId,
        day: &DaySchedule,
        date: NaiveDate,
    ) -> SchedulingResult<()> {
        for session in day.generate(self.session_duration, self.rest_duration)? {
            slots.push(Slot::new(
                doctor_id,
                date.and_time(session.start),
                date.and_time(session.end),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn saturday(windows: &[(NaiveTime, NaiveTime)]) -> DaySchedule {
        DaySchedule::new(
            Weekday::Sat,
            windows
                .iter()
                .map(|(start, end)| WorkingHours::new(*start, *end).unwrap())
                .collect(),
        )
    }

    fn spans(sessions: Sessions<'_>) -> Vec<(NaiveTime, NaiveTime)> {
        sessions.map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn test_time_range_requires_end_after_start() {
        assert!(TimeRange::new(t(12, 0), t(16, 0)).is_ok());
        assert_eq!(
            TimeRange::new(t(10, 0), t(10, 0)),
            Err(SchedulingError::invalid_range(t(10, 0), t(10, 0)))
        );
        assert!(TimeRange::new(t(11, 0), t(10, 0)).is_err());
    }

    #[test]
    fn test_overlap_scenarios() {
        let main = TimeRange::new(t(10, 0), t(12, 0)).unwrap();
        let cases = [
            ((10, 30), (11, 30), true),
            ((11, 0), (13, 0), true),
            ((9, 0), (11, 0), true),
            ((9, 0), (13, 0), true),
            ((10, 0), (12, 0), true),
            ((8, 0), (9, 0), false),
            ((13, 0), (14, 0), false),
            ((8, 0), (10, 0), false),
            ((12, 0), (13, 0), false),
        ];

        for ((sh, sm), (eh, em), expected) in cases {
            let other = TimeRange::new(t(sh, sm), t(eh, em)).unwrap();
            assert_eq!(main.overlaps(&other), expected, "{:?}", other);
            assert_eq!(other.overlaps(&main), expected, "symmetry for {:?}", other);
        }
    }

    #[test]
    fn test_time_range_deserialization_validates() {
        let ok: TimeRange = serde_json::from_str(r#"{"start":"09:00:00","end":"10:00:00"}"#).unwrap();
        assert_eq!(ok.duration_minutes(), 60);

        let bad = serde_json::from_str::<TimeRange>(r#"{"start":"10:00:00","end":"09:00:00"}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn test_hourly_sessions_fill_window() {
        let day = saturday(&[(t(10, 0), t(14, 0))]);
        let sessions: Vec<Session> = day.generate(60, 0).unwrap().collect();

        assert_eq!(sessions.len(), 4);
        assert!(sessions.iter().all(|s| s.work_day == Weekday::Sat));
        assert_eq!((sessions[0].start, sessions[0].end), (t(10, 0), t(11, 0)));
        assert_eq!((sessions[3].start, sessions[3].end), (t(13, 0), t(14, 0)));
    }

    #[test]
    fn test_windows_are_sliced_independently() {
        let day = saturday(&[(t(10, 0), t(14, 0)), (t(17, 0), t(20, 0))]);
        let sessions = spans(day.generate(60, 0).unwrap());

        assert_eq!(sessions.len(), 7);
        assert_eq!(sessions[4], (t(17, 0), t(18, 0)));
        assert_eq!(sessions[6], (t(19, 0), t(20, 0)));
    }

    #[test]
    fn test_trailing_partial_session_is_dropped() {
        let day = saturday(&[(t(10, 0), t(12, 0))]);
        assert_eq!(
            spans(day.generate(45, 0).unwrap()),
            vec![(t(10, 0), t(10, 45)), (t(10, 45), t(11, 30))]
        );
    }

    #[test]
    fn test_rest_is_inserted_between_sessions() {
        let day = saturday(&[(t(10, 0), t(12, 0))]);
        assert_eq!(
            spans(day.generate(45, 15).unwrap()),
            vec![(t(10, 0), t(10, 45)), (t(11, 0), t(11, 45))]
        );

        assert_eq!(
            spans(day.generate(30, 15).unwrap()),
            vec![(t(10, 0), t(10, 30)), (t(10, 45), t(11, 15)), (t(11, 30), t(12, 0))]
        );
    }

    #[test]
    fn test_rest_does_not_carry_across_windows() {
        let day = saturday(&[(t(9, 0), t(10, 0)), (t(10, 0), t(11, 0))]);
        assert_eq!(
            spans(day.generate(40, 30).unwrap()),
            vec![(t(9, 0), t(9, 40)), (t(10, 0), t(10, 40))]
        );
    }

    #[test]
    fn test_short_window_yields_nothing() {
        let day = saturday(&[(t(10, 0), t(10, 20)), (t(11, 0), t(11, 30))]);
        assert_eq!(spans(day.generate(30, 0).unwrap()), vec![(t(11, 0), t(11, 30))]);
    }

    #[test]
    fn test_zero_session_duration_is_rejected() {
        let day = saturday(&[(t(10, 0), t(12, 0))]);
        assert_eq!(day.generate(0, 5).err(), Some(SchedulingError::InvalidDuration(0)));
    }

    #[test]
    fn test_generation_is_restartable() {
        let day = saturday(&[(t(8, 0), t(12, 0)), (t(13, 0), t(15, 0))]);
        let first = spans(day.generate(25, 5).unwrap());
        let second = spans(day.generate(25, 5).unwrap());
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_window_ending_at_midnight_edge() {
        let day = saturday(&[(t(22, 0), NaiveTime::from_hms_opt(23, 59, 59).unwrap())]);
        let sessions = spans(day.generate(60, 0).unwrap());
        assert_eq!(sessions, vec![(t(22, 0), t(23, 0))]);
    }

    #[test]
    fn test_sub_second_window_start_rounds_up() {
        let start = NaiveTime::from_hms_milli_opt(10, 0, 0, 500).unwrap();
        let day = saturday(&[(start, t(12, 0))]);
        let sessions: Vec<Session> = day.generate(60, 0).unwrap().collect();

        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].start, NaiveTime::from_hms_opt(10, 0, 1).unwrap());
        assert!(sessions.iter().all(|s| s.start >= start && s.end <= t(12, 0)));
    }

    #[test]
    fn test_schedule_validation() {
        assert_eq!(
            Schedule::new(d(2030, 1, 10), d(2030, 1, 9), 30, 0, vec![]).err(),
            Some(SchedulingError::invalid_range(d(2030, 1, 10), d(2030, 1, 9)))
        );
        assert_eq!(
            Schedule::new(d(2030, 1, 1), d(2030, 1, 1), 0, 0, vec![]).err(),
            Some(SchedulingError::InvalidDuration(0))
        );
        assert!(Schedule::new(d(2030, 1, 1), d(2030, 1, 1), 15, 0, vec![]).is_ok());
    }

    #[test]
    fn test_anchored_slots_land_on_start_date() {
        let schedule = Schedule::new(
            d(2030, 1, 1),
            d(2030, 1, 31),
            60,
            0,
            vec![saturday(&[(t(10, 0), t(12, 0))])],
        )
        .unwrap();
        let doctor_id = DoctorId::generate();

        let slots = schedule.generate_slots(doctor_id, SlotExpansion::AnchorToStartDate).unwrap();

        assert_eq!(slots.len(), 2);
        assert!(slots.iter().all(|s| s.date() == d(2030, 1, 1) && s.doctor_id == doctor_id));
        assert_eq!(slots[0].start_date_time, d(2030, 1, 1).and_time(t(10, 0)));
        assert_eq!(slots[1].end_date_time, d(2030, 1, 1).and_time(t(12, 0)));
        assert_ne!(slots[0].id, slots[1].id);
    }

    #[test]
    fn test_weekly_slots_repeat_on_matching_weekdays() {
        // 2030-01-05 is a Saturday.
        let schedule = Schedule::new(
            d(2030, 1, 1),
            d(2030, 1, 14),
            60,
            0,
            vec![
                saturday(&[(t(10, 0), t(11, 0))]),
                DaySchedule::new(Weekday::Mon, vec![WorkingHours::new(t(9, 0), t(11, 0)).unwrap()]),
            ],
        )
        .unwrap();

        let slots = schedule
            .generate_slots(DoctorId::generate(), SlotExpansion::RepeatWeekly)
            .unwrap();
        let starts: Vec<NaiveDateTime> = slots.iter().map(|s| s.start_date_time).collect();

        assert_eq!(
            starts,
            vec![
                d(2030, 1, 5).and_time(t(10, 0)),
                d(2030, 1, 7).and_time(t(9, 0)),
                d(2030, 1, 7).and_time(t(10, 0)),
                d(2030, 1, 12).and_time(t(10, 0)),
                d(2030, 1, 14).and_time(t(9, 0)),
                d(2030, 1, 14).and_time(t(10, 0)),
            ]
        );
    }

    #[test]
    fn test_slot_times_are_stable_across_generations() {
        let schedule = Schedule::new(
            d(2030, 1, 1),
            d(2030, 1, 7),
            30,
            10,
            vec![saturday(&[(t(9, 0), t(14, 0))])],
        )
        .unwrap();
        let doctor_id = DoctorId::generate();

        let times = |slots: Vec<Slot>| -> Vec<(NaiveDateTime, NaiveDateTime)> {
            slots.into_iter().map(|s| (s.start_date_time, s.end_date_time)).collect()
        };

        let first = schedule.generate_slots(doctor_id, SlotExpansion::RepeatWeekly).unwrap();
        let second = schedule.generate_slots(doctor_id, SlotExpansion::RepeatWeekly).unwrap();
        assert_eq!(first.len(), 7);
        assert_eq!(times(first), times(second));
    }
}
