use crate::database::AsyncDbConnection;
use crate::integrations::google_calendar::{parse_event, CalendarFeed, ImportedEvent};
use anyhow::Result;
use record_ops::propagation::{decode_list, encode_list};
use rusqlite::{params, Connection, Row};
use shared_types::{CalendarEvent, CalendarImportSummary};

const EVENT_COLUMNS: &str = "id, external_event_id, summary, description, start_time, end_time,
    is_all_day, location, attendees, hangout_link, html_link, synced_at";

fn event_from_row(row: &Row<'_>) -> rusqlite::Result<CalendarEvent> {
    let id: i64 = row.get(0)?;
    let attendees: String = row.get(8)?;

    Ok(CalendarEvent {
        id,
        external_event_id: row.get(1)?,
        summary: row.get(2)?,
        description: row.get(3)?,
        start_time: row.get(4)?,
        end_time: row.get(5)?,
        is_all_day: row.get(6)?,
        location: row.get(7)?,
        attendees: decode_list(&attendees).unwrap_or_else(|e| {
            tracing::warn!("Calendar event {} has unreadable attendees: {}", id, e);
            Vec::new()
        }),
        hangout_link: row.get(9)?,
        html_link: row.get(10)?,
        synced_at: row.get(11)?,
    })
}

/// Inserts the event, or refreshes the stored row with the same external id.
pub fn upsert_event(conn: &Connection, event: &ImportedEvent, synced_at: i64) -> Result<i64> {
    let attendees_json = encode_list(&event.attendees)?;

    let id: i64 = conn.query_row(
        "INSERT INTO calendar_events
         (external_event_id, summary, description, start_time, end_time, is_all_day,
          location, attendees, hangout_link, html_link, synced_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(external_event_id) DO UPDATE SET
            summary = excluded.summary,
            description = excluded.description,
            start_time = excluded.start_time,
            end_time = excluded.end_time,
            is_all_day = excluded.is_all_day,
            location = excluded.location,
            attendees = excluded.attendees,
            hangout_link = excluded.hangout_link,
            html_link = excluded.html_link,
            synced_at = excluded.synced_at
         RETURNING id",
        params![
            &event.external_event_id,
            &event.summary,
            event.description.as_ref(),
            event.start_time,
            event.end_time,
            event.is_all_day,
            event.location.as_ref(),
            &attendees_json,
            event.hangout_link.as_ref(),
            event.html_link.as_ref(),
            synced_at
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

/// Stores every event of the feed in one transaction. An event that fails to
/// parse or store is logged and counted, and the rest of the feed still lands.
pub fn import_feed(conn: &mut Connection, feed: CalendarFeed) -> Result<CalendarImportSummary> {
    let synced_at = chrono::Utc::now().timestamp();
    let mut summary = CalendarImportSummary::default();

    let tx = conn.transaction()?;
    for (index, raw) in feed.result.into_iter().enumerate() {
        match parse_event(raw).and_then(|event| upsert_event(&tx, &event, synced_at)) {
            Ok(_) => summary.synced += 1,
            Err(e) => {
                tracing::warn!("Skipping calendar event #{}: {}", index, e);
                summary.errors += 1;
            }
        }
    }
    tx.commit()?;

    tracing::info!(
        "Calendar import finished: {} synced, {} errors",
        summary.synced,
        summary.errors
    );
    Ok(summary)
}

pub async fn import_calendar_feed(
    conn: AsyncDbConnection,
    feed: CalendarFeed,
) -> Result<CalendarImportSummary> {
    let mut conn = conn.lock().await?;
    import_feed(&mut conn, feed)
}

pub async fn list_calendar_events(conn: AsyncDbConnection, limit: usize) -> Result<Vec<CalendarEvent>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {EVENT_COLUMNS} FROM calendar_events ORDER BY start_time DESC LIMIT ?"
    ))?;
    let events = stmt
        .query_map([limit as i64], event_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(events)
}
