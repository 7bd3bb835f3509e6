use crate::calendar::{MonthCursor, advance_month, build_calendar, date_clicked};
use crate::errors::AppError;
use crate::journal::{self, create_log, delete_log, recent_logs};
use crate::models::{CalendarResponse, CreateLogRequest, LogRecord, PREDEFINED_TAGS, SummaryStats};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::summary::{DEFAULT_TOP_TAGS, DEFAULT_WINDOW_DAYS, compute_stats, window_of};
use crate::ui::{DashboardView, render_index};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::Html,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

const MAX_WINDOW_DAYS: i64 = 366;

/// Calendar query values arrive as raw strings so that a malformed value is
/// reported as a 400 with a useful message.
#[derive(Debug, Deserialize, Default)]
pub struct CalendarQuery {
    pub year: Option<String>,
    pub month: Option<String>,
    pub delta: Option<String>,
    pub day: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SummaryQuery {
    pub days: Option<String>,
    pub top: Option<String>,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Html<String>, AppError> {
    let today = state.today();
    let cursor = resolve_cursor(&query, today)?;
    let day = parse_param::<u32>("day", query.day.as_deref())?;

    let data = state.journal.lock().await;
    let calendar = build_calendar(cursor, &data.logs, today);
    let selected = date_clicked(cursor, day);
    let selected_logs = selected
        .map(|date| journal::logs_on(&data, date))
        .unwrap_or_default();
    let recent = recent_logs(&data);

    let (start, end) = window_of(today, DEFAULT_WINDOW_DAYS);
    let summary = compute_stats(
        &journal::logs_since(&data, start),
        start,
        end,
        DEFAULT_TOP_TAGS,
    );

    Ok(Html(render_index(&DashboardView {
        cursor,
        calendar: &calendar,
        selected,
        selected_logs: &selected_logs,
        recent_logs: &recent,
        summary: &summary,
    })))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    let today = state.today();
    let cursor = resolve_cursor(&query, today)?;
    let data = state.journal.lock().await;
    Ok(Json(build_calendar(cursor, &data.logs, today)))
}

pub async fn get_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<SummaryStats>, AppError> {
    let days = parse_param::<i64>("days", query.days.as_deref())?.unwrap_or(DEFAULT_WINDOW_DAYS);
    if !(0..=MAX_WINDOW_DAYS).contains(&days) {
        return Err(AppError::bad_request(format!(
            "days must be between 0 and {MAX_WINDOW_DAYS}"
        )));
    }
    let top = parse_param::<usize>("top", query.top.as_deref())?.unwrap_or(DEFAULT_TOP_TAGS);

    let (start, end) = window_of(state.today(), days);
    let data = state.journal.lock().await;
    let logs = journal::logs_since(&data, start);
    Ok(Json(compute_stats(&logs, start, end, top)))
}

pub async fn list_logs(State(state): State<AppState>) -> Json<Vec<LogRecord>> {
    let data = state.journal.lock().await;
    Json(recent_logs(&data))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<CreateLogRequest>,
) -> Result<(StatusCode, Json<LogRecord>), AppError> {
    let mut data = state.journal.lock().await;
    let mut next = data.clone();
    let record = create_log(&mut next, payload, state.now())?;
    persist_data(&state.data_path, &next).await?;
    *data = next;
    info!(id = %record.id, log_date = %record.log_date, "created health log");
    Ok((StatusCode::CREATED, Json(record)))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let mut data = state.journal.lock().await;
    let mut next = data.clone();
    let removed = delete_log(&mut next, &id)?;
    persist_data(&state.data_path, &next).await?;
    *data = next;
    info!(id = %removed.id, "deleted health log");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn list_tags() -> Json<Vec<&'static str>> {
    Json(PREDEFINED_TAGS.to_vec())
}

fn resolve_cursor(query: &CalendarQuery, today: NaiveDate) -> Result<MonthCursor, AppError> {
    let base = MonthCursor::from_date(today);
    let year = parse_param::<i32>("year", query.year.as_deref())?.unwrap_or(base.year());
    let month = parse_param::<u32>("month", query.month.as_deref())?.unwrap_or(base.month());
    let cursor = MonthCursor::new(year, month).ok_or_else(|| {
        AppError::bad_request("month must be between 1 and 12 in a supported year")
    })?;

    match parse_param::<i32>("delta", query.delta.as_deref())? {
        Some(delta) => advance_month(cursor, delta)
            .ok_or_else(|| AppError::bad_request("delta moves past the supported date range")),
        None => Ok(cursor),
    }
}

fn parse_param<T: std::str::FromStr>(name: &str, raw: Option<&str>) -> Result<Option<T>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|_| AppError::bad_request(format!("{name} must be an integer"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AppData;
    use chrono::{Local, TimeZone};
    use std::sync::Arc;

    fn pinned_state(name: &str) -> AppState {
        let mut path = std::env::temp_dir();
        path.push(format!("health_journal_handlers_{}_{name}.json", std::process::id()));
        let now = Local.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        AppState::with_clock(path, AppData::default(), Arc::new(move || now))
    }

    fn new_log(log_date: &str, tags: &[&str]) -> CreateLogRequest {
        CreateLogRequest {
            symptoms: String::new(),
            notes: String::new(),
            tags: Some(tags.iter().map(|tag| tag.to_string()).collect()),
            log_date: Some(log_date.to_string()),
        }
    }

    #[tokio::test]
    async fn summary_and_calendar_follow_the_pinned_clock() {
        let state = pinned_state("pinned");
        for (date, tags) in [
            ("2024-03-01", &["Tired"][..]),
            ("2024-03-01", &["Tired", "Headache"][..]),
            ("2024-03-03", &["Tired"][..]),
            ("2024-02-01", &["Old"][..]),
        ] {
            create(State(state.clone()), Json(new_log(date, tags)))
                .await
                .unwrap();
        }

        let Json(stats) = get_summary(State(state.clone()), Query(SummaryQuery::default()))
            .await
            .unwrap();
        assert_eq!(stats.window_start, "2024-02-29");
        assert_eq!(stats.window_end, "2024-03-07");
        assert_eq!(stats.total_count, 3);
        let ranked: Vec<(&str, u64)> = stats
            .ranked_tags
            .iter()
            .map(|tag| (tag.tag.as_str(), tag.count))
            .collect();
        assert_eq!(ranked, vec![("Tired", 3), ("Headache", 1)]);

        let Json(calendar) = get_calendar(State(state.clone()), Query(CalendarQuery::default()))
            .await
            .unwrap();
        assert_eq!((calendar.year, calendar.month), (2024, 3));
        let marked: Vec<u32> = calendar
            .cells
            .iter()
            .filter(|cell| cell.has_entry)
            .filter_map(|cell| cell.day)
            .collect();
        assert_eq!(marked, vec![1, 3]);
        let today: Vec<u32> = calendar
            .cells
            .iter()
            .filter(|cell| cell.is_today)
            .filter_map(|cell| cell.day)
            .collect();
        assert_eq!(today, vec![7]);

        let _ = tokio::fs::remove_file(&state.data_path).await;
    }

    #[tokio::test]
    async fn failed_write_leaves_journal_unchanged() {
        let now = Local.with_ymd_and_hms(2024, 3, 7, 12, 0, 0).unwrap();
        let kept = LogRecord {
            id: "kept".to_string(),
            log_date: "2024-03-01".to_string(),
            tags: None,
            symptoms: String::new(),
            notes: String::new(),
            created_at: now.to_rfc3339(),
        };
        let data = AppData {
            logs: vec![kept.clone()],
        };
        // A directory cannot be written as a file.
        let state = AppState::with_clock(std::env::temp_dir(), data, Arc::new(move || now));

        let err = create(State(state.clone()), Json(new_log("2024-03-02", &["Tired"])))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.journal.lock().await.logs, vec![kept.clone()]);

        let err = delete(State(state.clone()), Path("kept".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(state.journal.lock().await.logs, vec![kept]);
    }

    #[test]
    fn unsupported_years_are_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let err = resolve_cursor(&query("300000", "2", ""), today).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        let err = resolve_cursor(&query("2024", "2", &i32::MAX.to_string()), today).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("delta"));
    }

    #[tokio::test]
    async fn summary_rejects_bad_window() {
        let state = pinned_state("window");
        let query = SummaryQuery {
            days: Some("-3".to_string()),
            top: None,
        };
        let err = get_summary(State(state), Query(query)).await.unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }

    fn query(year: &str, month: &str, delta: &str) -> CalendarQuery {
        CalendarQuery {
            year: Some(year.to_string()),
            month: Some(month.to_string()),
            delta: Some(delta.to_string()),
            day: None,
        }
    }

    #[test]
    fn cursor_defaults_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let cursor = resolve_cursor(&CalendarQuery::default(), today).unwrap();
        assert_eq!(cursor, MonthCursor::new(2024, 7).unwrap());
    }

    #[test]
    fn cursor_applies_delta() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let cursor = resolve_cursor(&query("2024", "1", "-1"), today).unwrap();
        assert_eq!(cursor, MonthCursor::new(2023, 12).unwrap());
    }

    #[test]
    fn fractional_delta_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let err = resolve_cursor(&query("2024", "1", "1.5"), today).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("delta"));
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let today = NaiveDate::from_ymd_opt(2024, 7, 4).unwrap();
        let err = resolve_cursor(&query("2024", "13", ""), today).unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
