use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Request body for the weekly report endpoint, used to read total tracked
/// time for the current week/day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReportRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub date_range_start: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub date_range_end: OffsetDateTime,
    pub amount_shown: String,
    pub weekly_filter: WeeklyFilter,
}

impl WeeklyReportRequest {
    pub fn new(date_range_start: OffsetDateTime, date_range_end: OffsetDateTime) -> Self {
        Self {
            date_range_start,
            date_range_end,
            amount_shown: "HIDE_AMOUNT".to_string(),
            weekly_filter: WeeklyFilter::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyFilter {
    pub group: String,
    pub subgroup: String,
}

impl Default for WeeklyFilter {
    fn default() -> Self {
        Self {
            group: "PROJECT".to_string(),
            subgroup: "TIME".to_string(),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyReport {
    #[serde(default)]
    pub totals: Vec<ReportTotal>,
    #[serde(default)]
    pub totals_by_day: Vec<DayTotal>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportTotal {
    /// Total tracked seconds in the requested range.
    #[serde(default)]
    pub total_time: i64,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTotal {
    /// Calendar date as `YYYY-MM-DD`.
    pub date: String,
    /// Tracked seconds on that date.
    #[serde(default)]
    pub duration: i64,
}
