use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const PREDEFINED_TAGS: [&str; 6] = [
    "Tired",
    "Dizzy",
    "Headache",
    "Nausea",
    "Anxiety",
    "Joint Pain",
];

/// Parses exactly `YYYY-MM-DD`: ten characters, zero-padded, no whitespace.
pub fn parse_log_date(raw: &str) -> Option<NaiveDate> {
    let well_formed = raw.len() == 10
        && raw.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).ok()
}

/// One dated health entry as stored by the journal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogRecord {
    pub id: String,
    pub log_date: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: String,
}

impl LogRecord {
    /// `None` when `log_date` is not a `YYYY-MM-DD` calendar date.
    pub fn date(&self) -> Option<NaiveDate> {
        parse_log_date(&self.log_date)
    }

    /// Absent tags read as empty.
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppData {
    pub logs: Vec<LogRecord>,
}

#[derive(Debug, Deserialize)]
pub struct CreateLogRequest {
    #[serde(default)]
    pub symptoms: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub log_date: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct CalendarCell {
    pub day: Option<u32>,
    pub has_entry: bool,
    pub is_today: bool,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub year: i32,
    pub month: u32,
    pub title: String,
    pub cells: Vec<CalendarCell>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagCount {
    pub tag: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct DailyCount {
    pub date: String,
    pub label: String,
    pub count: u64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SummaryStats {
    pub window_start: String,
    pub window_end: String,
    pub total_count: u64,
    pub daily_average: f64,
    pub ranked_tags: Vec<TagCount>,
    pub daily_series: Vec<DailyCount>,
}
