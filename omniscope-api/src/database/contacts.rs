use crate::database::name_references;
use crate::database::{invalid_operation, not_found, AsyncDbConnection};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use shared_types::{
    ApprovalStatus, Contact, CreateContactRequest, RenameSubject, RenameSummary,
    UpdateContactRequest,
};

const CONTACT_COLUMNS: &str = "id, name, email, phone, organization, title, date_of_birth,
    address, website, linkedin, approval_status, is_duplicate, merged_into_contact_id,
    created_at, updated_at";

fn contact_from_row(row: &Row<'_>) -> rusqlite::Result<Contact> {
    let approval_status: String = row.get(10)?;

    Ok(Contact {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        phone: row.get(3)?,
        organization: row.get(4)?,
        title: row.get(5)?,
        date_of_birth: row.get(6)?,
        address: row.get(7)?,
        website: row.get(8)?,
        linkedin: row.get(9)?,
        approval_status: ApprovalStatus::from_db(&approval_status).unwrap_or_default(),
        is_duplicate: row.get(11)?,
        merged_into_contact_id: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}

pub(crate) fn read_contact(conn: &Connection, id: i64) -> Result<Option<Contact>> {
    let contact = conn
        .query_row(
            &format!("SELECT {CONTACT_COLUMNS} FROM contacts WHERE id = ?"),
            [id],
            contact_from_row,
        )
        .optional()?;

    Ok(contact)
}

fn write_update(conn: &Connection, id: i64, update: &UpdateContactRequest) -> Result<()> {
    let now = chrono::Utc::now().timestamp();

    conn.execute(
        "UPDATE contacts SET
            name = COALESCE(?1, name),
            email = COALESCE(?2, email),
            phone = COALESCE(?3, phone),
            organization = COALESCE(?4, organization),
            title = COALESCE(?5, title),
            date_of_birth = COALESCE(?6, date_of_birth),
            address = COALESCE(?7, address),
            website = COALESCE(?8, website),
            linkedin = COALESCE(?9, linkedin),
            approval_status = COALESCE(?10, approval_status),
            updated_at = ?11
         WHERE id = ?12",
        params![
            update.name.as_deref().map(str::trim),
            update.email.as_ref(),
            update.phone.as_ref(),
            update.organization.as_ref(),
            update.title.as_ref(),
            update.date_of_birth.as_ref(),
            update.address.as_ref(),
            update.website.as_ref(),
            update.linkedin.as_ref(),
            update.approval_status.map(|s| s.as_str().to_string()),
            now,
            id
        ],
    )?;

    Ok(())
}

pub async fn insert_contact(conn: AsyncDbConnection, request: &CreateContactRequest) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();
    let approval_status = request.approval_status.unwrap_or_default();

    let id: i64 = conn.query_row(
        "INSERT INTO contacts
         (name, email, phone, organization, title, date_of_birth, address, website, linkedin,
          approval_status, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            request.name.trim(),
            request.email.as_ref(),
            request.phone.as_ref(),
            request.organization.as_ref(),
            request.title.as_ref(),
            request.date_of_birth.as_ref(),
            request.address.as_ref(),
            request.website.as_ref(),
            request.linkedin.as_ref(),
            approval_status.as_str(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_contact(conn: AsyncDbConnection, id: i64) -> Result<Contact> {
    let conn = conn.lock().await?;

    read_contact(&conn, id)?.ok_or_else(|| not_found("Contact", id))
}

pub async fn list_contacts(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Contact>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts ORDER BY created_at DESC, id DESC LIMIT ?"
    ))?;

    let contacts = stmt
        .query_map([limit], contact_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Approved contacts that have not been merged away: the duplicate candidate pool.
pub async fn list_candidate_contacts(conn: AsyncDbConnection) -> Result<Vec<Contact>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {CONTACT_COLUMNS} FROM contacts
         WHERE approval_status = 'approved' AND is_duplicate = 0
         ORDER BY id"
    ))?;

    let contacts = stmt
        .query_map([], contact_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(contacts)
}

/// Applies `update` and, when the name changes, rewrites every stored
/// reference to the old name in the same transaction.
pub async fn update_contact(
    conn: AsyncDbConnection,
    id: i64,
    update: &UpdateContactRequest,
) -> Result<(Contact, Option<RenameSummary>)> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let current =
        read_contact(&tx, id)?.ok_or_else(|| not_found("Contact", id))?;

    write_update(&tx, id, update)?;

    let rename = match update.name.as_deref().map(str::trim) {
        Some(new_name) if new_name != current.name.trim() => Some(
            name_references::propagate_rename(&tx, RenameSubject::Contact, &current.name, new_name)?,
        ),
        _ => None,
    };

    let contact =
        read_contact(&tx, id)?.ok_or_else(|| not_found("Contact", id))?;
    tx.commit()?;

    Ok((contact, rename))
}

/// Copies missing fields from `source_id` into `target_id` and marks the
/// source as a merged duplicate. Returns the updated target and the fields
/// that were copied.
///
/// Runs in an immediate transaction so the "already merged" check and the
/// writes see the same state.
pub async fn merge_contacts(
    conn: AsyncDbConnection,
    target_id: i64,
    source_id: i64,
) -> Result<(Contact, UpdateContactRequest)> {
    if target_id == source_id {
        return Err(invalid_operation("Cannot merge a contact into itself".to_string()));
    }

    let mut conn = conn.lock().await?;
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let target = read_contact(&tx, target_id)?
        .ok_or_else(|| not_found("Contact", target_id))?;
    let source = read_contact(&tx, source_id)?
        .ok_or_else(|| not_found("Contact", source_id))?;

    for contact in [&target, &source] {
        if contact.is_duplicate {
            return Err(invalid_operation(format!(
                "Contact {} has already been merged",
                contact.id
            )));
        }
    }

    let updates = record_ops::reconcile(&target, &source);
    if !updates.is_empty() {
        write_update(&tx, target_id, &updates)?;
    }

    tx.execute(
        "UPDATE contacts SET is_duplicate = 1, merged_into_contact_id = ?1, updated_at = ?2
         WHERE id = ?3",
        params![target_id, chrono::Utc::now().timestamp(), source_id],
    )?;

    let merged = read_contact(&tx, target_id)?
        .ok_or_else(|| not_found("Contact", target_id))?;
    tx.commit()?;

    Ok((merged, updates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{meetings, tasks, test_database, InvalidOperation};
    use shared_types::{CreateMeetingRequest, CreateTaskRequest, TaskPriority};

    fn request(name: &str, email: Option<&str>, organization: Option<&str>) -> CreateContactRequest {
        CreateContactRequest {
            name: name.to_string(),
            email: email.map(str::to_string),
            phone: None,
            organization: organization.map(str::to_string),
            title: None,
            date_of_birth: None,
            address: None,
            website: None,
            linkedin: None,
            approval_status: Some(ApprovalStatus::Approved),
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_contact() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let id = insert_contact(conn.clone(), &request("  Jake Ryan ", Some("jake@x.com"), None))
            .await
            .unwrap();
        let contact = get_contact(conn.clone(), id).await.unwrap();

        assert_eq!(contact.name, "Jake Ryan");
        assert_eq!(contact.email.as_deref(), Some("jake@x.com"));
        assert_eq!(contact.approval_status, ApprovalStatus::Approved);
        assert!(!contact.is_duplicate);
        assert!(get_contact(conn, id + 1).await.is_err());
    }

    #[tokio::test]
    async fn test_candidate_pool_skips_pending_and_merged() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let kept = insert_contact(conn.clone(), &request("Jake Ryan", None, None)).await.unwrap();
        let merged = insert_contact(conn.clone(), &request("Jake R", None, None)).await.unwrap();
        let mut pending = request("Pending Person", None, None);
        pending.approval_status = None;
        insert_contact(conn.clone(), &pending).await.unwrap();

        merge_contacts(conn.clone(), kept, merged).await.unwrap();

        let pool = list_candidate_contacts(conn).await.unwrap();
        let ids: Vec<i64> = pool.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![kept]);
    }

    #[tokio::test]
    async fn test_merge_fills_gaps_and_marks_source() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let target = insert_contact(conn.clone(), &request("Jake Ryan", Some("a@x.com"), None))
            .await
            .unwrap();
        let mut source_request = request("Jake Ryan", Some("b@x.com"), Some("OmniScope"));
        source_request.phone = Some("+1".to_string());
        let source = insert_contact(conn.clone(), &source_request).await.unwrap();

        let (merged, applied) = merge_contacts(conn.clone(), target, source).await.unwrap();

        assert_eq!(merged.email.as_deref(), Some("a@x.com"));
        assert_eq!(merged.phone.as_deref(), Some("+1"));
        assert_eq!(merged.organization.as_deref(), Some("OmniScope"));
        assert_eq!(applied.changed_fields(), vec!["phone", "organization"]);

        let source = get_contact(conn, source).await.unwrap();
        assert!(source.is_duplicate);
        assert_eq!(source.merged_into_contact_id, Some(target));
    }

    #[tokio::test]
    async fn test_crossing_merge_is_rejected_inside_the_store() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let a = insert_contact(conn.clone(), &request("Jake Ryan", None, None)).await.unwrap();
        let b = insert_contact(conn.clone(), &request("jake ryan", None, None)).await.unwrap();

        merge_contacts(conn.clone(), a, b).await.unwrap();
        let err = merge_contacts(conn.clone(), b, a).await.unwrap_err();
        assert!(err.downcast_ref::<InvalidOperation>().is_some());
        assert_eq!(err.to_string(), format!("Contact {} has already been merged", b));

        let a = get_contact(conn.clone(), a).await.unwrap();
        assert!(!a.is_duplicate);
        assert_eq!(a.merged_into_contact_id, None);

        let err = merge_contacts(conn, a.id, a.id).await.unwrap_err();
        assert!(err.downcast_ref::<InvalidOperation>().is_some());
    }

    #[tokio::test]
    async fn test_rename_propagates_to_tasks_and_meetings() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let id = insert_contact(conn.clone(), &request("John Puls", None, None)).await.unwrap();
        let task_id = tasks::insert_task(
            conn.clone(),
            &CreateTaskRequest {
                project_id: None,
                title: "Send deck".to_string(),
                description: None,
                priority: TaskPriority::High,
                due_date: None,
                assigned_to: Some("john puls".to_string()),
            },
        )
        .await
        .unwrap();
        let meeting_id = meetings::insert_meeting(
            conn.clone(),
            &CreateMeetingRequest {
                title: "Weekly sync".to_string(),
                meeting_date: 1_760_000_000,
                summary: None,
                participants: vec![
                    "Jake Ryan".to_string(),
                    "John Puls".to_string(),
                    "Asim Khan".to_string(),
                ],
                primary_lead: Some("John Puls".to_string()),
                organizations: vec!["OmniScope".to_string()],
            },
        )
        .await
        .unwrap();

        let update = UpdateContactRequest {
            name: Some("John P. Puls".to_string()),
            ..Default::default()
        };
        let (contact, rename) = update_contact(conn.clone(), id, &update).await.unwrap();

        assert_eq!(contact.name, "John P. Puls");
        let rename = rename.expect("name changed");
        assert_eq!(rename.old_name, "John Puls");
        assert_eq!(rename.rewritten.len(), 3);
        assert_eq!(rename.skipped, 0);

        let task = tasks::get_task(conn.clone(), task_id).await.unwrap();
        assert_eq!(task.assigned_to.as_deref(), Some("John P. Puls"));

        let meeting = meetings::get_meeting(conn, meeting_id).await.unwrap();
        assert_eq!(meeting.participants, vec!["Jake Ryan", "John P. Puls", "Asim Khan"]);
        assert_eq!(meeting.primary_lead.as_deref(), Some("John P. Puls"));
    }

    #[tokio::test]
    async fn test_update_without_name_change_does_not_propagate() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let id = insert_contact(conn.clone(), &request("Jake Ryan", None, None)).await.unwrap();
        let update = UpdateContactRequest {
            name: Some(" Jake Ryan ".to_string()),
            title: Some("CTO".to_string()),
            ..Default::default()
        };

        let (contact, rename) = update_contact(conn, id, &update).await.unwrap();

        assert_eq!(contact.title.as_deref(), Some("CTO"));
        assert!(rename.is_none());
    }
}
