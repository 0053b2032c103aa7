use crate::database::{not_found, AsyncDbConnection};
use anyhow::Result;
use record_ops::propagation::{decode_list, encode_list};
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{CreateMeetingRequest, Meeting};

const MEETING_COLUMNS: &str = "id, title, meeting_date, summary, participants, primary_lead,
    organizations, created_at, updated_at";

/// Stored lists that fail to decode read back as empty rather than failing the row.
fn stored_list(id: i64, column: &str, raw: &str) -> Vec<String> {
    decode_list(raw).unwrap_or_else(|e| {
        tracing::warn!("Meeting {} has unreadable {}: {}", id, column, e);
        Vec::new()
    })
}

fn meeting_from_row(row: &Row<'_>) -> rusqlite::Result<Meeting> {
    let id: i64 = row.get(0)?;
    let participants: String = row.get(4)?;
    let organizations: String = row.get(6)?;

    Ok(Meeting {
        id,
        title: row.get(1)?,
        meeting_date: row.get(2)?,
        summary: row.get(3)?,
        participants: stored_list(id, "participants", &participants),
        primary_lead: row.get(5)?,
        organizations: stored_list(id, "organizations", &organizations),
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

pub async fn insert_meeting(conn: AsyncDbConnection, request: &CreateMeetingRequest) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let participants_json = encode_list(&request.participants)?;
    let organizations_json = encode_list(&request.organizations)?;

    let id: i64 = conn.query_row(
        "INSERT INTO meetings
         (title, meeting_date, summary, participants, primary_lead, organizations,
          created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            request.title.trim(),
            request.meeting_date,
            request.summary.as_ref(),
            &participants_json,
            request.primary_lead.as_ref(),
            &organizations_json,
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_meeting(conn: AsyncDbConnection, id: i64) -> Result<Meeting> {
    let conn = conn.lock().await?;

    conn.query_row(
        &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?"),
        [id],
        meeting_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("Meeting", id))
}

pub async fn list_meetings(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Meeting>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {MEETING_COLUMNS} FROM meetings ORDER BY meeting_date DESC LIMIT ?"
    ))?;

    let meetings = stmt
        .query_map([limit], meeting_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(meetings)
}
