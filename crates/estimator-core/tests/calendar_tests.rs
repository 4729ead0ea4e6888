use chrono::{NaiveDate, Weekday};
use service_estimator::calendar::{HolidayCalendar, HolidayCalendarConfig};
use service_estimator::coverage::SiteCalendar;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn default_calendar_has_sunday_off() {
    let cal = HolidayCalendar::default();
    // 2025-01-05 is a Sunday, 2025-01-04 a Saturday.
    assert!(cal.is_weekly_off(d(2025, 1, 5)));
    assert!(!cal.is_weekly_off(d(2025, 1, 4)));
    assert_eq!(cal.count_weekly_off_days(2025), 52);
    assert_eq!(cal.count_working_days(2025), 313);
}

#[test]
fn holidays_on_off_days_count_once() {
    let mut cal = HolidayCalendar::default();
    cal.add_holidays(&[d(2025, 1, 1), d(2025, 12, 25)]);
    // Sunday: already an off day.
    cal.add_holiday(d(2025, 1, 5));

    assert_eq!(cal.count_public_holidays(2025), 2);
    assert_eq!(cal.count_working_days(2025), 311);
    assert!(!cal.is_working_day(d(2025, 1, 1)));
    assert!(cal.is_working_day(d(2025, 1, 2)));
}

#[test]
fn recurring_holidays_only_count_in_their_year() {
    let mut cal = HolidayCalendar::default();
    cal.add_recurring_holiday(12, 2, 2024, 2026);
    // 2025-12-02 is a Tuesday.
    assert_eq!(cal.count_public_holidays(2025), 1);
    assert!(!cal.is_working_day(d(2026, 12, 2)));
}

#[test]
fn site_calendar_derives_counts_from_holiday_calendar() {
    let mut cal = HolidayCalendar::custom([Weekday::Fri, Weekday::Sat], []);
    cal.add_holidays(&[d(2025, 1, 1), d(2025, 3, 31), d(2025, 6, 6)]);

    let site = SiteCalendar::for_year(2025, &cal, 365.0, 30.0, 10.0, 8.0);
    // 2025-06-06 is a Friday.
    assert_eq!(site.public_holiday_days, 2.0);
    assert_eq!(site.weekly_off_days, 104.0);
    assert_eq!(site.effective_working_days(), 365.0 - 30.0 - 10.0 - 2.0 - 104.0);
}

#[test]
fn config_round_trips_through_json() {
    let mut cal = HolidayCalendar::default();
    cal.set_weekly_off_days(&[Weekday::Sat, Weekday::Fri, Weekday::Sat]);
    cal.add_holiday(d(2025, 5, 1));

    let config = cal.to_config();
    assert_eq!(config.weekly_off_days(), &[Weekday::Fri, Weekday::Sat]);
    assert_eq!(config.holidays(), &[d(2025, 5, 1)]);

    let json = serde_json::to_string(&config).unwrap();
    let parsed: HolidayCalendarConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(HolidayCalendar::from_config(&parsed), cal);
}
