//! Stage three: size relief staff so required coverage survives leave and days off.

use crate::calendar::HolidayCalendar;
use serde::{Deserialize, Serialize};

const DAYS_PER_YEAR: f64 = 365.0;

/// Leave, holiday and coverage assumptions for one site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteCalendar {
    /// Days per year the site must be staffed.
    pub coverage_days_required: f64,
    pub annual_leave_days: f64,
    pub sick_leave_days: f64,
    pub public_holiday_days: f64,
    pub weekly_off_days: f64,
    pub shift_hours: f64,
}

impl Default for SiteCalendar {
    fn default() -> Self {
        Self {
            coverage_days_required: 365.0,
            annual_leave_days: 30.0,
            sick_leave_days: 10.0,
            public_holiday_days: 10.0,
            weekly_off_days: 52.0,
            shift_hours: 8.0,
        }
    }
}

impl SiteCalendar {
    /// Derive public-holiday and weekly-off counts from a dated calendar.
    ///
    /// Holidays that fall on a weekly off day are counted once, as off days.
    pub fn for_year(
        year: i32,
        calendar: &HolidayCalendar,
        coverage_days_required: f64,
        annual_leave_days: f64,
        sick_leave_days: f64,
        shift_hours: f64,
    ) -> Self {
        Self {
            coverage_days_required,
            annual_leave_days,
            sick_leave_days,
            public_holiday_days: calendar.count_public_holidays(year) as f64,
            weekly_off_days: calendar.count_weekly_off_days(year) as f64,
            shift_hours,
        }
    }

    pub fn effective_working_days(&self) -> f64 {
        let absent = self.annual_leave_days
            + self.sick_leave_days
            + self.public_holiday_days
            + self.weekly_off_days;
        (DAYS_PER_YEAR - absent).max(0.0)
    }

    /// Ratio of required coverage to available days, or 1 when no days are
    /// available at all.
    pub fn coverage_factor(&self) -> f64 {
        let working_days = self.effective_working_days();
        if working_days == 0.0 {
            tracing::warn!("no effective working days; coverage factor falls back to 1");
            return 1.0;
        }
        self.coverage_days_required / working_days
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageAdjustment {
    pub active: f64,
    pub relief: f64,
    pub total_with_relief: f64,
    pub coverage_factor: f64,
    pub effective_working_days: f64,
}

impl CoverageAdjustment {
    /// Scale a slice of active headcount by the same relief ratio.
    pub fn with_relief(&self, active_share: f64) -> f64 {
        if self.active == 0.0 {
            return active_share;
        }
        active_share * self.total_with_relief / self.active
    }
}

pub fn adjust_for_coverage(active: f64, calendar: &SiteCalendar) -> CoverageAdjustment {
    let coverage_factor = calendar.coverage_factor();
    let relief = (active * coverage_factor - active).max(0.0);
    let adjustment = CoverageAdjustment {
        active,
        relief,
        total_with_relief: active + relief,
        coverage_factor,
        effective_working_days: calendar.effective_working_days(),
    };
    tracing::debug!(
        active,
        relief,
        coverage_factor,
        "coverage adjustment applied"
    );
    adjustment
}
