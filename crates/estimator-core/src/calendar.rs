use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Dated calendar for a site: which weekdays are off and which dates are
/// public holidays. Used to derive the day counts a [`SiteCalendar`] needs.
///
/// [`SiteCalendar`]: crate::coverage::SiteCalendar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HolidayCalendar {
    holidays: BTreeSet<NaiveDate>,
    weekly_off_days: BTreeSet<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayCalendarConfig {
    weekly_off_days: Vec<Weekday>,
    holidays: Vec<NaiveDate>,
}

impl Default for HolidayCalendar {
    /// Sunday off, no holidays.
    fn default() -> Self {
        Self::custom([Weekday::Sun], [])
    }
}

impl HolidayCalendar {
    pub fn custom<I, J>(weekly_off_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let config = HolidayCalendarConfig::new(weekly_off_days, holidays);
        Self::from_config(&config)
    }

    pub fn from_config(config: &HolidayCalendarConfig) -> Self {
        Self {
            holidays: config.holidays.iter().copied().collect(),
            weekly_off_days: config
                .weekly_off_days
                .iter()
                .map(|day| day.num_days_from_monday())
                .collect(),
        }
    }

    pub fn to_config(&self) -> HolidayCalendarConfig {
        HolidayCalendarConfig::from(self)
    }

    pub fn add_holiday(&mut self, date: NaiveDate) {
        self.holidays.insert(date);
    }

    pub fn add_holidays(&mut self, dates: &[NaiveDate]) {
        self.holidays.extend(dates);
    }

    /// Add the same month/day holiday for every year in the range (inclusive).
    /// Dates that do not exist in a given year (Feb 29) are skipped.
    pub fn add_recurring_holiday(&mut self, month: u32, day: u32, start_year: i32, end_year: i32) {
        for year in start_year..=end_year {
            if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
                self.holidays.insert(date);
            }
        }
    }

    pub fn set_weekly_off_days(&mut self, days: &[Weekday]) {
        self.weekly_off_days = days.iter().map(|day| day.num_days_from_monday()).collect();
    }

    pub fn is_weekly_off(&self, date: NaiveDate) -> bool {
        self.weekly_off_days
            .contains(&date.weekday().num_days_from_monday())
    }

    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        !self.is_weekly_off(date) && !self.holidays.contains(&date)
    }

    /// Weekly off days falling in `year`.
    pub fn count_weekly_off_days(&self, year: i32) -> u32 {
        Self::days_of_year(year)
            .filter(|date| self.is_weekly_off(*date))
            .count() as u32
    }

    /// Holidays in `year` that would otherwise have been working days.
    pub fn count_public_holidays(&self, year: i32) -> u32 {
        self.holidays
            .iter()
            .filter(|date| date.year() == year && !self.is_weekly_off(**date))
            .count() as u32
    }

    pub fn count_working_days(&self, year: i32) -> u32 {
        Self::days_of_year(year)
            .filter(|date| self.is_working_day(*date))
            .count() as u32
    }

    // Capped at 365 days so leap years line up with the 365-day coverage basis.
    fn days_of_year(year: i32) -> impl Iterator<Item = NaiveDate> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1);
        (0..365).filter_map(move |offset| start.map(|day| day + Duration::days(offset)))
    }
}

impl HolidayCalendarConfig {
    pub fn new<I, J>(weekly_off_days: I, holidays: J) -> Self
    where
        I: IntoIterator<Item = Weekday>,
        J: IntoIterator<Item = NaiveDate>,
    {
        let mut off: Vec<Weekday> = weekly_off_days.into_iter().collect();
        off.sort_by_key(|wd| wd.num_days_from_monday());
        off.dedup_by(|a, b| a.num_days_from_monday() == b.num_days_from_monday());

        let mut holidays: Vec<NaiveDate> = holidays.into_iter().collect();
        holidays.sort();
        holidays.dedup();

        Self {
            weekly_off_days: off,
            holidays,
        }
    }

    pub fn weekly_off_days(&self) -> &[Weekday] {
        &self.weekly_off_days
    }

    pub fn holidays(&self) -> &[NaiveDate] {
        &self.holidays
    }
}

impl From<&HolidayCalendar> for HolidayCalendarConfig {
    fn from(calendar: &HolidayCalendar) -> Self {
        const ALL_WEEKDAYS: [Weekday; 7] = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        let off = ALL_WEEKDAYS
            .into_iter()
            .filter(|day| calendar.weekly_off_days.contains(&day.num_days_from_monday()));
        HolidayCalendarConfig::new(off, calendar.holidays.iter().copied())
    }
}
