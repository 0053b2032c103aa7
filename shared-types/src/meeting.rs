use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A recorded meeting. Participant and organization names are plain
/// strings that follow contact and company renames.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Meeting {
    pub id: i64,
    pub title: String,
    pub meeting_date: i64, // Unix timestamp
    pub summary: Option<String>,
    pub participants: Vec<String>,
    pub primary_lead: Option<String>,
    pub organizations: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateMeetingRequest {
    pub title: String,
    pub meeting_date: i64,
    pub summary: Option<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    pub primary_lead: Option<String>,
    #[serde(default)]
    pub organizations: Vec<String>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct MeetingsResponse {
    pub meetings: Vec<Meeting>,
}
