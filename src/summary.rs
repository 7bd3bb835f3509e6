use crate::models::{DailyCount, LogRecord, SummaryStats, TagCount};
use chrono::{Duration, NaiveDate};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

pub const DEFAULT_WINDOW_DAYS: i64 = 7;
pub const DEFAULT_TOP_TAGS: usize = 3;

/// Trailing window ending at `now`; both ends are inclusive.
pub fn default_window(now: NaiveDate) -> (NaiveDate, NaiveDate) {
    window_of(now, DEFAULT_WINDOW_DAYS)
}

pub fn window_of(now: NaiveDate, days: i64) -> (NaiveDate, NaiveDate) {
    (now - Duration::days(days), now)
}

pub fn compute_stats(
    logs: &[LogRecord],
    window_start: NaiveDate,
    now: NaiveDate,
    top_n: usize,
) -> SummaryStats {
    let in_window: Vec<(NaiveDate, &LogRecord)> = logs
        .iter()
        .filter_map(|log| match log.date() {
            Some(date) => Some((date, log)),
            None => {
                warn!(id = %log.id, log_date = %log.log_date, "skipping log with malformed date");
                None
            }
        })
        .filter(|(date, _)| *date >= window_start && *date <= now)
        .collect();

    let total_count = in_window.len() as u64;
    let window_days = (now - window_start).num_days().max(1);

    SummaryStats {
        window_start: window_start.to_string(),
        window_end: now.to_string(),
        total_count,
        daily_average: total_count as f64 / window_days as f64,
        ranked_tags: rank_tags(in_window.iter().map(|(_, log)| *log), top_n),
        daily_series: daily_series(in_window.iter().map(|(date, _)| *date)),
    }
}

/// Counts tags and ranks them by count. Equal counts keep the order in which
/// each tag first appears, which the stable sort preserves.
pub fn rank_tags<'a>(logs: impl IntoIterator<Item = &'a LogRecord>, top_n: usize) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for log in logs {
        for tag in log.tags() {
            match index.get(tag.as_str()).copied() {
                Some(slot) => counts[slot].count = counts[slot].count.saturating_add(1),
                None => {
                    index.insert(tag.as_str(), counts.len());
                    counts.push(TagCount {
                        tag: tag.clone(),
                        count: 1,
                    });
                }
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(top_n);
    counts
}

fn daily_series(dates: impl IntoIterator<Item = NaiveDate>) -> Vec<DailyCount> {
    let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
    for date in dates {
        let count = per_day.entry(date).or_default();
        *count = count.saturating_add(1);
    }

    per_day
        .into_iter()
        .map(|(date, count)| DailyCount {
            date: date.to_string(),
            label: day_label(date),
            count,
        })
        .collect()
}

fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
