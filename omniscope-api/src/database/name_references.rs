//! Reads and writes the name-bearing fields touched by a rename.

use anyhow::Result;
use rusqlite::{params, Connection};
use shared_types::{NameField, NameFieldRewrite, NameFieldValue, RecordType, RenameSubject, RenameSummary};

fn table_for(record_type: RecordType) -> &'static str {
    match record_type {
        RecordType::Task => "tasks",
        RecordType::Meeting => "meetings",
        RecordType::Contact => "contacts",
    }
}

/// Loads every non-null value of `field`.
pub fn load_field_values(conn: &Connection, field: NameField) -> Result<Vec<NameFieldValue>> {
    let sql = format!(
        "SELECT id, {column} FROM {table} WHERE {column} IS NOT NULL ORDER BY id",
        column = field.column(),
        table = table_for(field.record_type()),
    );

    let mut stmt = conn.prepare(&sql)?;
    let values = stmt
        .query_map([], |row| {
            Ok(NameFieldValue {
                record_id: row.get(0)?,
                field,
                value: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(values)
}

pub fn apply_rewrite(conn: &Connection, rewrite: &NameFieldRewrite) -> Result<()> {
    let sql = format!(
        "UPDATE {table} SET {column} = ?1, updated_at = ?2 WHERE id = ?3",
        table = table_for(rewrite.record_type),
        column = rewrite.field.column(),
    );

    conn.execute(
        &sql,
        params![rewrite.value, chrono::Utc::now().timestamp(), rewrite.record_id],
    )?;

    Ok(())
}

/// Rewrites all references from `old_name` to `new_name` for fields that can
/// name a `subject`. Unreadable fields are logged and left untouched.
pub fn propagate_rename(
    conn: &Connection,
    subject: RenameSubject,
    old_name: &str,
    new_name: &str,
) -> Result<RenameSummary> {
    let mut values = Vec::new();
    for field in subject.affected_fields() {
        values.extend(load_field_values(conn, *field)?);
    }

    let report = record_ops::propagate_all(old_name, new_name, &values);

    for skipped in &report.skipped {
        tracing::warn!(
            "Skipping unreadable {} field {:?} on {} {}: {}",
            skipped.field.column(),
            skipped.field,
            skipped.record_type,
            skipped.record_id,
            skipped.error
        );
    }

    for rewrite in &report.rewrites {
        apply_rewrite(conn, rewrite)?;
    }

    tracing::info!(
        "Renamed {:?} '{}' -> '{}': {} fields rewritten, {} skipped",
        subject,
        old_name,
        new_name,
        report.rewrites.len(),
        report.skipped.len()
    );

    Ok(RenameSummary {
        old_name: old_name.to_string(),
        new_name: new_name.to_string(),
        skipped: report.skipped.len(),
        rewritten: report.rewrites,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;

    fn insert_meeting_raw(conn: &Connection, participants: &str, organizations: &str) -> i64 {
        conn.query_row(
            "INSERT INTO meetings (title, meeting_date, participants, organizations, created_at, updated_at)
             VALUES ('Sync', 0, ?1, ?2, 0, 0) RETURNING id",
            params![participants, organizations],
            |row| row.get(0),
        )
        .unwrap()
    }

    #[test]
    fn test_corrupt_list_is_skipped_without_aborting() {
        let (_dir, db) = test_database();
        let conn = db.connection.lock().unwrap();

        let corrupt = insert_meeting_raw(&conn, "[\"Jake Ryan\",", "[\"OmniScope\"]");
        let healthy = insert_meeting_raw(&conn, "[\"Jake Ryan\"]", "[\"OmniScope\",\"Acme\"]");

        let summary =
            propagate_rename(&conn, RenameSubject::Company, "omniscope", "OmniScope Labs").unwrap();

        assert_eq!(summary.rewritten.len(), 2);
        assert_eq!(summary.skipped, 0);

        let summary = propagate_rename(&conn, RenameSubject::Contact, "Jake Ryan", "Jacob Ryan").unwrap();
        assert_eq!(summary.rewritten.len(), 1);
        assert_eq!(summary.rewritten[0].record_id, healthy);
        assert_eq!(summary.skipped, 1);

        let stored: String = conn
            .query_row("SELECT participants FROM meetings WHERE id = ?", [corrupt], |row| row.get(0))
            .unwrap();
        assert_eq!(stored, "[\"Jake Ryan\",");
    }

    #[test]
    fn test_company_rename_updates_contact_organization() {
        let (_dir, db) = test_database();
        let conn = db.connection.lock().unwrap();

        conn.execute(
            "INSERT INTO contacts (name, organization, created_at, updated_at)
             VALUES ('Jake Ryan', 'OmniScope', 0, 0), ('Asim Khan', 'Acme', 0, 0)",
            [],
        )
        .unwrap();

        let summary =
            propagate_rename(&conn, RenameSubject::Company, "OmniScope", "OmniScope Labs").unwrap();

        assert_eq!(summary.rewritten.len(), 1);
        assert_eq!(summary.rewritten[0].field, NameField::ContactOrganization);

        let organizations: Vec<String> = conn
            .prepare("SELECT organization FROM contacts ORDER BY id")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();
        assert_eq!(organizations, vec!["OmniScope Labs", "Acme"]);
    }
}
