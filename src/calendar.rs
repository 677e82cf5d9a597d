use chrono::{Datelike, Duration, Local, Locale, Month, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use elsa::FrozenBTreeMap;
use num_traits::FromPrimitive;
use once_cell::sync::Lazy;
use std::fmt;
use std::ops::{Add, Sub};

// Captured on first use and kept for the lifetime of the process.
static TODAY: Lazy<NaiveDate> = Lazy::new(|| Local::now().date_naive());

// A Monday. Weekday labels are produced by walking forward from here.
static REFERENCE_WEEK_START: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2024, 1, 1).expect("2024-01-01 is a valid date"));

/// The local date as seen the first time any widget asked for it.
pub fn reference_today() -> NaiveDate {
    *TODAY
}

pub(crate) fn localized(date: NaiveDate, fmt: &str, locale: Locale) -> String {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::default()))
        .format_localized(fmt, locale)
        .to_string()
}

/// A (year, month) pair, always normalized to `month0` in `0..=11`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarMonth {
    year: i32,
    month0: u32,
}

impl CalendarMonth {
    /// Builds a month from a possibly out-of-range zero based month,
    /// rolling overflow and underflow into the year.
    pub fn new(year: i32, month0: i64) -> Self {
        let total = year as i64 * 12 + month0;

        CalendarMonth {
            year: total.div_euclid(12) as i32,
            month0: total.rem_euclid(12) as u32,
        }
    }

    /// Earliest month chrono can represent.
    pub fn min_supported() -> Self {
        CalendarMonth::from(NaiveDate::MIN)
    }

    /// Latest month whose length can still be computed, i.e. whose
    /// following month is representable as well.
    pub fn max_supported() -> Self {
        CalendarMonth::from(NaiveDate::MAX).pred()
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month0(&self) -> u32 {
        self.month0
    }

    pub fn month(&self) -> Month {
        Month::from_u32(self.month0 + 1).expect("month0 is normalized")
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .expect("Month should lie within the supported date range")
    }

    /// The date of `day` in this month, if the month has that many days.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month0 + 1, day)
    }

    pub fn succ(&self) -> Self {
        *self + 1
    }

    pub fn pred(&self) -> Self {
        *self - 1
    }

    /// Number of days, read off as "day zero" of the following month.
    pub fn num_days(&self) -> u32 {
        (self.succ().first_day() - Duration::days(1)).day()
    }
}

impl<T: Datelike> From<T> for CalendarMonth {
    fn from(d: T) -> Self {
        CalendarMonth::new(d.year(), d.month0() as i64)
    }
}

impl Add<i32> for CalendarMonth {
    type Output = CalendarMonth;
    fn add(self, rhs: i32) -> Self::Output {
        CalendarMonth::new(self.year, self.month0 as i64 + rhs as i64)
    }
}

impl Sub<i32> for CalendarMonth {
    type Output = CalendarMonth;
    fn sub(self, rhs: i32) -> Self::Output {
        CalendarMonth::new(self.year, self.month0 as i64 - rhs as i64)
    }
}

impl fmt::Display for CalendarMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month0 + 1)
    }
}

/// Parameters needed to lay out one month, derived from the current month.
#[derive(Debug, Clone, PartialEq)]
pub struct GridParams {
    pub month: CalendarMonth,
    pub start_weekday: u32,
    pub day_count: u32,
    pub weekday_short_names: [String; 7],
}

pub struct CalendarState {
    current: CalendarMonth,
    reference_today: NaiveDate,
    locale: Locale,
    first_weekday: Weekday,
    month_lengths: FrozenBTreeMap<CalendarMonth, Box<u32>>,
}

impl CalendarState {
    pub fn new<T>(seed: T) -> Self
    where
        CalendarMonth: From<T>,
    {
        CalendarState {
            current: CalendarMonth::from(seed),
            reference_today: reference_today(),
            locale: Locale::en_US,
            first_weekday: Weekday::Mon,
            month_lengths: FrozenBTreeMap::default(),
        }
    }

    pub fn with_reference_today(mut self, today: NaiveDate) -> Self {
        self.reference_today = today;
        self
    }

    pub fn locale(mut self, locale: Locale) -> Self {
        self.locale = locale;
        self
    }

    pub fn first_weekday(mut self, weekday: Weekday) -> Self {
        self.first_weekday = weekday;
        self
    }

    pub fn current(&self) -> CalendarMonth {
        self.current
    }

    pub fn reference_today(&self) -> NaiveDate {
        self.reference_today
    }

    /// Moves `delta` months, stopping at the edges of the supported range.
    pub fn advance_month(&mut self, delta: i32) {
        let target = self.current + delta;
        let clamped = target.clamp(
            CalendarMonth::min_supported(),
            CalendarMonth::max_supported(),
        );

        if clamped != target {
            log::warn!("{} is out of range, stopping at {}", target, clamped);
        }

        self.current = clamped;
        log::debug!("Current month is now {}", self.current);
    }

    /// Jumps back to the month containing the reference date.
    pub fn reset_to_today(&mut self) {
        self.current = CalendarMonth::from(self.reference_today);
    }

    pub fn month_length(&self) -> u32 {
        if let Some(days) = self.month_lengths.get(&self.current) {
            *days
        } else {
            *self
                .month_lengths
                .insert(self.current, Box::new(self.current.num_days()))
        }
    }

    /// Column of the first day of the current month, counted from the
    /// configured first day of the week.
    pub fn start_weekday(&self) -> u32 {
        let first = self.current.first_day().weekday().num_days_from_monday();
        (first + 7 - self.first_weekday.num_days_from_monday()) % 7
    }

    pub fn weekday_short_names(&self) -> [String; 7] {
        let week_start = *REFERENCE_WEEK_START
            + Duration::days(self.first_weekday.num_days_from_monday() as i64);

        let mut names: [String; 7] = Default::default();
        for (offset, name) in names.iter_mut().enumerate() {
            *name = localized(week_start + Duration::days(offset as i64), "%a", self.locale);
        }
        names
    }

    pub fn month_name(&self) -> String {
        localized(self.current.first_day(), "%B", self.locale)
    }

    pub fn params(&self) -> GridParams {
        GridParams {
            month: self.current,
            start_weekday: self.start_weekday(),
            day_count: self.month_length(),
            weekday_short_names: self.weekday_short_names(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn truncates_to_month() {
        let month = CalendarMonth::from(date(2024, 6, 15));
        assert_eq!(month.year(), 2024);
        assert_eq!(month.month0(), 5);
        assert_eq!(month.first_day(), date(2024, 6, 1));
        assert_eq!(month.month(), Month::June);
    }

    #[test]
    fn normalizes_overflow() {
        assert_eq!(CalendarMonth::new(2023, 12), CalendarMonth::new(2024, 0));
        assert_eq!(CalendarMonth::new(2024, -1), CalendarMonth::new(2023, 11));
        assert_eq!(CalendarMonth::new(2024, -25), CalendarMonth::new(2021, 11));
        assert_eq!(CalendarMonth::new(2024, 0) - 1, CalendarMonth::new(2023, 11));
        assert_eq!(CalendarMonth::new(2023, 11) + 1, CalendarMonth::new(2024, 0));
        assert_eq!(CalendarMonth::new(2023, 11).succ().pred(), CalendarMonth::new(2023, 11));
    }

    #[test]
    fn gregorian_month_lengths() {
        let common = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        let leap = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

        for (year, expected) in [(2023, common), (2024, leap), (1900, common), (2000, leap)] {
            for (month0, days) in expected.iter().enumerate() {
                let state = CalendarState::new(date(year, month0 as u32 + 1, 1));
                assert_eq!(state.month_length(), *days, "{}-{}", year, month0 + 1);
            }
        }
    }

    #[test]
    fn month_length_is_cached() {
        let state = CalendarState::new(date(2024, 2, 10));
        assert!(state.month_lengths.get(&state.current()).is_none());
        assert_eq!(state.month_length(), 29);
        assert_eq!(state.month_lengths.get(&state.current()), Some(&29));
        assert_eq!(state.month_length(), 29);
    }

    #[test]
    fn advance_and_back_is_identity() {
        let mut state = CalendarState::new(date(2023, 12, 31));
        let original = state.current();

        state.advance_month(1);
        assert_eq!(state.current(), CalendarMonth::new(2024, 0));
        state.advance_month(-1);
        assert_eq!(state.current(), original);

        state.advance_month(-13);
        assert_eq!(state.current(), CalendarMonth::new(2022, 10));
    }

    #[test]
    fn advance_stops_at_supported_range() {
        let mut state = CalendarState::new(date(2024, 6, 1));

        state.advance_month(i32::MAX);
        assert_eq!(state.current(), CalendarMonth::max_supported());
        assert_eq!(state.month_length(), 30);
        assert!(state.start_weekday() <= 6);

        state.advance_month(i32::MIN);
        assert_eq!(state.current(), CalendarMonth::min_supported());
        assert_eq!(state.month_length(), 31);
        assert!(state.start_weekday() <= 6);
    }

    #[test]
    fn start_weekday_depends_on_week_start() {
        // 2024-02-01 is a Thursday
        let monday_first = CalendarState::new(date(2024, 2, 1));
        assert_eq!(monday_first.start_weekday(), 3);

        let sunday_first = CalendarState::new(date(2024, 2, 1)).first_weekday(Weekday::Sun);
        assert_eq!(sunday_first.start_weekday(), 4);

        // 2024-09-01 is a Sunday
        let monday_first = CalendarState::new(date(2024, 9, 1));
        assert_eq!(monday_first.start_weekday(), 6);
    }

    #[test]
    fn weekday_names_follow_week_start() {
        let state = CalendarState::new(date(2024, 2, 1));
        assert_eq!(
            state.weekday_short_names(),
            ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"].map(String::from)
        );

        let state = state.first_weekday(Weekday::Sun);
        assert_eq!(state.weekday_short_names()[0], "Sun");
        assert_eq!(state.weekday_short_names()[6], "Sat");
    }

    #[test]
    fn month_name_is_localized() {
        let state = CalendarState::new(date(2024, 3, 1));
        assert_eq!(state.month_name(), "March");

        let state = state.locale(Locale::de_DE);
        assert_eq!(state.month_name(), "März");
    }

    #[test]
    fn reset_to_today_uses_reference_date() {
        let mut state =
            CalendarState::new(date(2020, 1, 1)).with_reference_today(date(2024, 6, 15));
        state.advance_month(7);
        state.reset_to_today();
        assert_eq!(state.current(), CalendarMonth::new(2024, 5));
    }
}
