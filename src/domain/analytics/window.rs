//! Aggregation windows.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// Period bounding an aggregation, anchored on a reference date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalyticsWindow {
    /// The reference date only.
    Day,
    /// The seven days ending on the reference date.
    Week,
}

impl AnalyticsWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsWindow::Day => "day",
            AnalyticsWindow::Week => "week",
        }
    }

    pub fn length_days(&self) -> u64 {
        match self {
            AnalyticsWindow::Day => 1,
            AnalyticsWindow::Week => 7,
        }
    }

    /// First day covered by the window.
    pub fn start_date(&self, reference: NaiveDate) -> NaiveDate {
        reference
            .checked_sub_days(Days::new(self.length_days() - 1))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Half-open UTC interval `[start, end)` covered by the window.
    pub fn bounds(&self, reference: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = start_of_day(self.start_date(reference));
        let end = reference
            .checked_add_days(Days::new(1))
            .map(start_of_day)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        (start, end)
    }

    /// Every date in the window, oldest first.
    pub fn days(&self, reference: NaiveDate) -> Vec<NaiveDate> {
        self.start_date(reference)
            .iter_days()
            .take_while(|d| *d <= reference)
            .collect()
    }
}

fn start_of_day(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}
