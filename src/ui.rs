use crate::calendar::MonthCursor;
use crate::models::{CalendarResponse, LogRecord, PREDEFINED_TAGS, SummaryStats};
use chrono::NaiveDate;
use std::fmt::Write;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct DashboardView<'a> {
    pub cursor: MonthCursor,
    pub calendar: &'a CalendarResponse,
    pub selected: Option<NaiveDate>,
    pub selected_logs: &'a [LogRecord],
    pub recent_logs: &'a [LogRecord],
    pub summary: &'a SummaryStats,
}

pub fn render_index(view: &DashboardView<'_>) -> String {
    let nav_link = |delta| {
        view.cursor
            .advance(delta)
            .map(|cursor| month_link(cursor, None))
            .unwrap_or_else(|| month_link(view.cursor, None))
    };
    let top = view.summary.ranked_tags.first();

    INDEX_HTML
        .replace("{{TITLE}}", &escape(&view.calendar.title))
        .replace("{{PREV}}", &nav_link(-1))
        .replace("{{NEXT}}", &nav_link(1))
        .replace("{{GRID}}", &render_grid(view))
        .replace("{{SELECTED}}", &render_selected(view))
        .replace("{{RECENT}}", &render_recent(view.recent_logs))
        .replace("{{TOTAL}}", &view.summary.total_count.to_string())
        .replace(
            "{{TOP_TAG}}",
            &top.map(|t| escape(&t.tag)).unwrap_or_else(|| "None".to_string()),
        )
        .replace("{{TOP_COUNT}}", &top.map(|t| t.count).unwrap_or(0).to_string())
        .replace("{{AVERAGE}}", &format!("{:.1}", view.summary.daily_average))
        .replace("{{RANKED}}", &render_ranked(view.summary))
        .replace("{{SERIES}}", &render_series(view.summary))
        .replace("{{TAG_OPTIONS}}", &render_tag_options())
}

fn month_link(cursor: MonthCursor, day: Option<u32>) -> String {
    let mut link = format!("/?year={}&amp;month={}", cursor.year(), cursor.month());
    if let Some(day) = day {
        let _ = write!(link, "&amp;day={day}");
    }
    link
}

fn render_grid(view: &DashboardView<'_>) -> String {
    let mut html = String::new();
    for name in DAY_NAMES {
        let _ = write!(html, r#"<div class="dow">{name}</div>"#);
    }
    for cell in &view.calendar.cells {
        let Some(day) = cell.day else {
            html.push_str(r#"<div class="cell empty"></div>"#);
            continue;
        };
        let mut class = String::from("cell");
        if cell.is_today {
            class.push_str(" today");
        }
        if view.selected.is_some_and(|date| view.cursor.date_of(day) == Some(date)) {
            class.push_str(" selected");
        }
        let dot = if cell.has_entry { r#"<span class="dot"></span>"# } else { "" };
        let _ = write!(
            html,
            r#"<a class="{class}" href="{}"><span>{day}</span>{dot}</a>"#,
            month_link(view.cursor, Some(day))
        );
    }
    html
}

fn render_selected(view: &DashboardView<'_>) -> String {
    let Some(date) = view.selected else {
        return r#"<p class="muted">Pick a day to see its entries.</p>"#.to_string();
    };
    let mut html = format!("<h3>{}</h3>", date.format("%A, %B %-d, %Y"));
    if view.selected_logs.is_empty() {
        html.push_str(r#"<p class="muted">No entries for this day.</p>"#);
        return html;
    }
    html.push_str(&render_log_list(view.selected_logs, false));
    html
}

fn render_recent(logs: &[LogRecord]) -> String {
    if logs.is_empty() {
        return r#"<p class="muted">No health logs yet</p>"#.to_string();
    }
    render_log_list(logs, true)
}

fn render_log_list(logs: &[LogRecord], with_date: bool) -> String {
    let mut html = String::from(r#"<ul class="logs">"#);
    for log in logs {
        let tags = log
            .tags()
            .iter()
            .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape(tag)))
            .collect::<String>();
        let date = match log.date() {
            Some(date) if with_date => {
                format!(r#"<div class="muted">{}</div>"#, date.format("%A, %B %-d, %Y"))
            }
            _ => String::new(),
        };
        let _ = write!(
            html,
            r#"<li>{date}<strong>{}</strong> {tags}<p>{}</p><button data-id="{}" class="delete">Delete</button></li>"#,
            escape(&log.symptoms),
            escape(&log.notes),
            escape(&log.id),
        );
    }
    html.push_str("</ul>");
    html
}

fn render_ranked(summary: &SummaryStats) -> String {
    if summary.ranked_tags.is_empty() {
        return r#"<p class="muted">No symptoms logged this week</p>"#.to_string();
    }
    let max = summary.ranked_tags[0].count.max(1);
    let mut html = String::new();
    for (rank, tag) in summary.ranked_tags.iter().enumerate() {
        let width = tag.count as f64 / max as f64 * 100.0;
        let _ = write!(
            html,
            r#"<div class="rank"><span class="pos">#{}</span><span class="name">{}</span><span class="count">{} times</span><div class="bar"><div style="width:{width:.0}%"></div></div></div>"#,
            rank + 1,
            escape(&tag.tag),
            tag.count,
        );
    }
    html
}

fn render_series(summary: &SummaryStats) -> String {
    if summary.daily_series.is_empty() {
        return r#"<p class="muted">No data to display</p>"#.to_string();
    }
    let max = summary
        .daily_series
        .iter()
        .map(|point| point.count)
        .max()
        .unwrap_or(1)
        .max(1);
    let mut html = String::from(r#"<div class="chart">"#);
    for point in &summary.daily_series {
        let height = point.count as f64 / max as f64 * 100.0;
        let _ = write!(
            html,
            r#"<div class="col" title="{}"><div class="fill" style="height:{height:.0}%"></div><span>{}</span><small>{}</small></div>"#,
            point.date, point.count, point.label,
        );
    }
    html.push_str("</div>");
    html
}

fn render_tag_options() -> String {
    PREDEFINED_TAGS
        .iter()
        .map(|tag| format!(r#"<label><input type="checkbox" name="tags" value="{tag}"/> {tag}</label>"#))
        .collect()
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Health Journal</title>
  <style>
    :root {
      --bg: #f4f6fb;
      --ink: #1f2933;
      --muted: #6b7280;
      --accent: #3b82f6;
      --good: #22c55e;
      --card: #ffffff;
      --shadow: 0 12px 32px rgba(31, 41, 51, 0.08);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(1040px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    .card {
      background: var(--card);
      border-radius: 16px;
      box-shadow: var(--shadow);
      padding: 24px;
    }

    .row {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 24px;
    }

    .muted {
      color: var(--muted);
    }

    .head {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .head a {
      text-decoration: none;
      padding: 6px 12px;
      border-radius: 8px;
      color: var(--ink);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 6px;
    }

    .dow {
      text-align: center;
      font-size: 0.85rem;
      color: var(--muted);
    }

    .cell {
      aspect-ratio: 1;
      display: flex;
      flex-direction: column;
      align-items: center;
      justify-content: center;
      border-radius: 8px;
      color: var(--ink);
      text-decoration: none;
    }

    .cell.empty {
      visibility: hidden;
    }

    .cell.today {
      border: 2px solid var(--accent);
      font-weight: 700;
    }

    .cell.selected {
      background: #e0ecff;
    }

    .dot {
      width: 6px;
      height: 6px;
      border-radius: 50%;
      background: var(--good);
      margin-top: 4px;
    }

    .stat {
      font-size: 2.4rem;
      font-weight: 700;
      color: var(--accent);
    }

    .rank {
      display: grid;
      grid-template-columns: 40px 1fr auto;
      gap: 4px 12px;
      margin-bottom: 12px;
    }

    .bar {
      grid-column: 2 / 4;
      background: #e5e7eb;
      border-radius: 999px;
      height: 8px;
    }

    .bar div {
      background: var(--accent);
      height: 100%;
      border-radius: 999px;
    }

    .chart {
      display: flex;
      align-items: flex-end;
      gap: 12px;
      height: 220px;
    }

    .col {
      flex: 1;
      height: 100%;
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      align-items: center;
    }

    .fill {
      width: 100%;
      background: var(--accent);
      border-radius: 6px 6px 0 0;
    }

    .tag {
      display: inline-block;
      background: #eef2ff;
      border-radius: 999px;
      padding: 2px 10px;
      margin: 0 4px;
      font-size: 0.8rem;
    }

    .logs {
      list-style: none;
      padding: 0;
    }

    form {
      display: grid;
      gap: 12px;
    }
  </style>
</head>
<body>
  <main>
    <div class="row">
      <section class="card">
        <div class="head">
          <a href="{{PREV}}">&lsaquo;</a>
          <h2>{{TITLE}}</h2>
          <a href="{{NEXT}}">&rsaquo;</a>
        </div>
        <div class="grid">{{GRID}}</div>
      </section>
      <section class="card">
        {{SELECTED}}
      </section>
    </div>

    <div class="row">
      <section class="card">
        <div class="muted">Total Logs</div>
        <div class="stat">{{TOTAL}}</div>
        <div class="muted">entries this week</div>
      </section>
      <section class="card">
        <div class="muted">Top Symptom</div>
        <div class="stat">{{TOP_TAG}}</div>
        <div class="muted">{{TOP_COUNT}} times logged</div>
      </section>
      <section class="card">
        <div class="muted">Daily Average</div>
        <div class="stat">{{AVERAGE}}</div>
        <div class="muted">logs per day</div>
      </section>
    </div>

    <div class="row">
      <section class="card">
        <h3>Most Common Symptoms</h3>
        {{RANKED}}
      </section>
      <section class="card">
        <h3>Daily Log Activity</h3>
        {{SERIES}}
      </section>
    </div>

    <section class="card">
      <h3>Recent Logs</h3>
      {{RECENT}}
    </section>

    <section class="card">
      <h3>Add Health Log</h3>
      <form id="log-form">
        <input name="symptoms" placeholder="e.g., headache, fatigue" />
        <div>{{TAG_OPTIONS}}</div>
        <textarea name="notes" rows="3" placeholder="Add any additional details..."></textarea>
        <input name="log_date" type="date" />
        <button type="submit">Save Health Log</button>
        <p id="form-error" class="muted"></p>
      </form>
    </section>
  </main>

  <script>
    const form = document.getElementById('log-form');
    form.addEventListener('submit', async (event) => {
      event.preventDefault();
      const fields = new FormData(form);
      const payload = {
        symptoms: fields.get('symptoms') || '',
        notes: fields.get('notes') || '',
        tags: fields.getAll('tags'),
        log_date: fields.get('log_date') || null,
      };
      const res = await fetch('/api/logs', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
      });
      if (!res.ok) {
        document.getElementById('form-error').textContent = await res.text();
        return;
      }
      window.location.reload();
    });

    document.querySelectorAll('button.delete').forEach((button) => {
      button.addEventListener('click', async () => {
        if (!confirm('Are you sure you want to delete this log?')) return;
        const res = await fetch(`/api/logs/${button.dataset.id}`, { method: 'DELETE' });
        if (res.ok) {
          window.location.reload();
        }
      });
    });
  </script>
</body>
</html>
"#;
