use crate::database::{not_found, AsyncDbConnection};
use anyhow::Result;
use rusqlite::{params, OptionalExtension, Row};
use shared_types::{CreateTaskRequest, Task, TaskPriority, TaskStatus, UpdateTaskRequest};

const TASK_COLUMNS: &str = "id, project_id, title, description, status, priority, due_date,
    assigned_to, created_at, updated_at";

fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    let status: String = row.get(4)?;
    let priority: String = row.get(5)?;

    Ok(Task {
        id: row.get(0)?,
        project_id: row.get(1)?,
        title: row.get(2)?,
        description: row.get(3)?,
        status: TaskStatus::from_db(&status).unwrap_or(TaskStatus::Todo),
        priority: TaskPriority::from_db(&priority).unwrap_or(TaskPriority::Medium),
        due_date: row.get(6)?,
        assigned_to: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

pub async fn insert_task(conn: AsyncDbConnection, request: &CreateTaskRequest) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO tasks
         (project_id, title, description, status, priority, due_date, assigned_to,
          created_at, updated_at)
         VALUES (?, ?, ?, 'todo', ?, ?, ?, ?, ?)
         RETURNING id",
        params![
            request.project_id,
            request.title.trim(),
            request.description.as_ref(),
            request.priority.as_str(),
            request.due_date.as_ref(),
            request.assigned_to.as_ref(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_task(conn: AsyncDbConnection, id: i64) -> Result<Task> {
    let conn = conn.lock().await?;

    conn.query_row(
        &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?"),
        [id],
        task_from_row,
    )
    .optional()?
    .ok_or_else(|| not_found("Task", id))
}

pub async fn list_tasks(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Task>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks ORDER BY id LIMIT ?"
    ))?;

    let tasks = stmt
        .query_map([limit], task_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tasks)
}

pub async fn update_task(conn: AsyncDbConnection, id: i64, update: &UpdateTaskRequest) -> Result<Task> {
    {
        let conn = conn.lock().await?;
        let changed = conn.execute(
            "UPDATE tasks SET
                project_id = COALESCE(?1, project_id),
                title = COALESCE(?2, title),
                description = COALESCE(?3, description),
                status = COALESCE(?4, status),
                priority = COALESCE(?5, priority),
                due_date = COALESCE(?6, due_date),
                assigned_to = COALESCE(?7, assigned_to),
                updated_at = ?8
             WHERE id = ?9",
            params![
                update.project_id,
                update.title.as_deref().map(str::trim),
                update.description.as_ref(),
                update.status.map(|s| s.as_str().to_string()),
                update.priority.map(|p| p.as_str().to_string()),
                update.due_date.as_ref(),
                update.assigned_to.as_ref(),
                chrono::Utc::now().timestamp(),
                id
            ],
        )?;

        if changed == 0 {
            return Err(not_found("Task", id));
        }
    }

    get_task(conn, id).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_database;

    #[tokio::test]
    async fn test_insert_update_and_list_tasks() {
        let (_dir, db) = test_database();
        let conn = db.async_connection.clone();

        let id = insert_task(
            conn.clone(),
            &CreateTaskRequest {
                project_id: None,
                title: "Draft proposal".to_string(),
                description: Some("For the OmniScope pilot".to_string()),
                priority: TaskPriority::High,
                due_date: Some("2026-03-14".to_string()),
                assigned_to: None,
            },
        )
        .await
        .unwrap();

        let task = get_task(conn.clone(), id).await.unwrap();
        assert_eq!(task.status, TaskStatus::Todo);
        assert_eq!(task.priority, TaskPriority::High);

        let updated = update_task(
            conn.clone(),
            id,
            &UpdateTaskRequest {
                status: Some(TaskStatus::Done),
                assigned_to: Some("Jake Ryan".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.assigned_to.as_deref(), Some("Jake Ryan"));
        assert_eq!(updated.title, "Draft proposal");

        assert_eq!(list_tasks(conn.clone(), 10).await.unwrap().len(), 1);
        assert!(update_task(conn, id + 1, &UpdateTaskRequest::default()).await.is_err());
    }
}
