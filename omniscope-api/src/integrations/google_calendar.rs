use anyhow::{anyhow, bail, Result};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;

/// Longest text kept for the summary, location and link fields.
const MAX_FIELD_CHARS: usize = 500;

/// A Google Calendar events export: `{"result": [event, ...]}`.
///
/// Events stay as raw JSON so one malformed event fails on its own
/// instead of rejecting the whole feed.
#[derive(Debug, Default, Deserialize)]
pub struct CalendarFeed {
    #[serde(default)]
    pub result: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GoogleEvent {
    #[serde(default)]
    id: String,
    summary: Option<String>,
    description: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    location: Option<String>,
    #[serde(default)]
    attendees: Vec<Attendee>,
    hangout_link: Option<String>,
    html_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EventTime {
    date_time: Option<String>,
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Attendee {
    email: Option<String>,
}

/// One event ready to be stored
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedEvent {
    pub external_event_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: i64,
    pub end_time: i64,
    pub is_all_day: bool,
    pub location: Option<String>,
    pub attendees: Vec<String>,
    pub hangout_link: Option<String>,
    pub html_link: Option<String>,
}

fn truncate_chars(value: &str) -> String {
    value.chars().take(MAX_FIELD_CHARS).collect()
}

fn short_text(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(|v| truncate_chars(&v))
}

/// Timed events carry an RFC 3339 `dateTime`. All-day events carry a bare
/// `date`, which starts at midnight UTC and ends at the last second of the day.
fn parse_time(time: &EventTime, end_of_day: bool) -> Result<(i64, bool)> {
    if let Some(date_time) = &time.date_time {
        let parsed = DateTime::parse_from_rfc3339(date_time)
            .map_err(|e| anyhow!("Invalid dateTime '{}': {}", date_time, e))?;
        return Ok((parsed.timestamp(), false));
    }

    if let Some(date) = &time.date {
        let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|e| anyhow!("Invalid date '{}': {}", date, e))?;
        let clock = if end_of_day {
            NaiveTime::from_hms_opt(23, 59, 59)
        } else {
            NaiveTime::from_hms_opt(0, 0, 0)
        }
        .ok_or_else(|| anyhow!("Invalid time of day"))?;
        let timestamp = DateTime::<Utc>::from_naive_utc_and_offset(day.and_time(clock), Utc).timestamp();
        return Ok((timestamp, true));
    }

    bail!("Event time has neither dateTime nor date")
}

/// Converts one raw event from the feed.
pub fn parse_event(value: serde_json::Value) -> Result<ImportedEvent> {
    let event: GoogleEvent = serde_json::from_value(value)?;

    if event.id.trim().is_empty() {
        bail!("Event has no id");
    }

    let start = event
        .start
        .ok_or_else(|| anyhow!("Event {} has no start", event.id))?;
    let (start_time, is_all_day) = parse_time(&start, false)?;

    // A missing end closes the event where it started
    let end_time = match &event.end {
        Some(end) => parse_time(end, true)?.0,
        None if is_all_day => parse_time(&start, true)?.0,
        None => start_time,
    };

    let summary = event
        .summary
        .filter(|s| !s.is_empty())
        .map(|s| truncate_chars(&s))
        .unwrap_or_else(|| "Untitled".to_string());

    let attendees = event
        .attendees
        .into_iter()
        .filter_map(|a| a.email)
        .filter(|email| !email.is_empty())
        .collect();

    Ok(ImportedEvent {
        external_event_id: event.id,
        summary,
        description: event.description,
        start_time,
        end_time,
        is_all_day,
        location: short_text(event.location),
        attendees,
        hangout_link: short_text(event.hangout_link),
        html_link: short_text(event.html_link),
    })
}
