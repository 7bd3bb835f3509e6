//! Log bookkeeping on top of the in-memory journal.
//!
//! These play the storage collaborator's role: they hand the calendar and
//! summary code plain `LogRecord` slices and never aggregate themselves.

use crate::errors::AppError;
use crate::models::{AppData, CreateLogRequest, DATE_FORMAT, LogRecord, parse_log_date};
use chrono::{DateTime, Local, NaiveDate};
use uuid::Uuid;

pub const RECENT_LOG_LIMIT: usize = 20;
const MAX_TAG_LEN: usize = 40;

pub fn create_log(
    data: &mut AppData,
    request: CreateLogRequest,
    now: DateTime<Local>,
) -> Result<LogRecord, AppError> {
    let log_date = match request.log_date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => parse_log_date(raw)
            .ok_or_else(|| AppError::bad_request("log_date must be a YYYY-MM-DD date"))?,
        _ => now.date_naive(),
    };

    let mut tags: Vec<String> = Vec::new();
    for tag in request.tags.unwrap_or_default() {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LEN {
            return Err(AppError::bad_request(format!(
                "tags must be at most {MAX_TAG_LEN} characters"
            )));
        }
        if !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }

    let record = LogRecord {
        id: Uuid::new_v4().to_string(),
        log_date: log_date.format(DATE_FORMAT).to_string(),
        tags: Some(tags),
        symptoms: request.symptoms.trim().to_string(),
        notes: request.notes.trim().to_string(),
        created_at: now.to_rfc3339(),
    };
    data.logs.push(record.clone());
    Ok(record)
}

pub fn delete_log(data: &mut AppData, id: &str) -> Result<LogRecord, AppError> {
    let position = data
        .logs
        .iter()
        .position(|log| log.id == id)
        .ok_or_else(|| AppError::not_found(format!("no log with id {id}")))?;
    Ok(data.logs.remove(position))
}

/// Newest first by creation time, bounded to `RECENT_LOG_LIMIT`.
pub fn recent_logs(data: &AppData) -> Vec<LogRecord> {
    let mut logs = data.logs.clone();
    logs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    logs.truncate(RECENT_LOG_LIMIT);
    logs
}

/// Logs dated on or after `start`, in date order. Malformed dates are passed
/// through, ahead of the rest, so the aggregators can report and skip them.
pub fn logs_since(data: &AppData, start: NaiveDate) -> Vec<LogRecord> {
    let mut logs: Vec<LogRecord> = data
        .logs
        .iter()
        .filter(|log| log.date().is_none_or(|date| date >= start))
        .cloned()
        .collect();
    logs.sort_by_key(LogRecord::date);
    logs
}

pub fn logs_on(data: &AppData, date: NaiveDate) -> Vec<LogRecord> {
    data.logs
        .iter()
        .filter(|log| log.date() == Some(date))
        .cloned()
        .collect()
}
