use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A calendar event imported from an external calendar, keyed by the
/// provider's event id.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalendarEvent {
    pub id: i64,
    pub external_event_id: String,
    pub summary: String,
    pub description: Option<String>,
    pub start_time: i64, // Unix timestamp
    pub end_time: i64,   // Unix timestamp
    pub is_all_day: bool,
    pub location: Option<String>,
    /// Attendee email addresses
    pub attendees: Vec<String>,
    pub hangout_link: Option<String>,
    pub html_link: Option<String>,
    pub synced_at: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct CalendarEventsResponse {
    pub events: Vec<CalendarEvent>,
}

/// Outcome of one import run. A failed event is counted and skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CalendarImportSummary {
    pub synced: usize,
    pub errors: usize,
}
