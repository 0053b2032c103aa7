use rusqlite::Connection;

/// Run all database migrations
pub fn run_migrations(conn: &Connection) -> anyhow::Result<()> {
    // Create contacts table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS contacts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            email VARCHAR,
            phone VARCHAR,
            organization VARCHAR,
            title VARCHAR,
            date_of_birth VARCHAR,
            address VARCHAR,
            website VARCHAR,
            linkedin VARCHAR,
            approval_status VARCHAR NOT NULL DEFAULT 'pending' CHECK (approval_status IN ('pending', 'approved')),
            is_duplicate BOOLEAN NOT NULL DEFAULT 0,
            merged_into_contact_id INTEGER,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL,
            FOREIGN KEY (merged_into_contact_id) REFERENCES contacts (id)
        )",
        [],
    )?;

    // Create companies table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS companies (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR NOT NULL,
            domain VARCHAR,
            industry VARCHAR,
            location VARCHAR,
            website VARCHAR,
            linkedin_url VARCHAR,
            approval_status VARCHAR NOT NULL DEFAULT 'pending' CHECK (approval_status IN ('pending', 'approved')),
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create tasks table
    conn.execute(
        "CREATE TABLE IF NOT EXISTS tasks (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            project_id INTEGER,
            title VARCHAR NOT NULL,
            description VARCHAR,
            status VARCHAR NOT NULL DEFAULT 'todo' CHECK (status IN ('todo', 'in-progress', 'review', 'done', 'cancelled')),
            priority VARCHAR NOT NULL DEFAULT 'medium' CHECK (priority IN ('low', 'medium', 'high', 'critical')),
            due_date VARCHAR,
            assigned_to VARCHAR,
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create meetings table; participant and organization lists are JSON arrays
    conn.execute(
        "CREATE TABLE IF NOT EXISTS meetings (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            title VARCHAR NOT NULL,
            meeting_date BIGINT NOT NULL,
            summary VARCHAR,
            participants VARCHAR NOT NULL DEFAULT '[]',
            primary_lead VARCHAR,
            organizations VARCHAR NOT NULL DEFAULT '[]',
            created_at BIGINT NOT NULL,
            updated_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create calendar events table; attendees is a JSON array of emails
    conn.execute(
        "CREATE TABLE IF NOT EXISTS calendar_events (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            external_event_id VARCHAR NOT NULL UNIQUE,
            summary VARCHAR NOT NULL,
            description VARCHAR,
            start_time BIGINT NOT NULL,
            end_time BIGINT NOT NULL,
            is_all_day BOOLEAN NOT NULL DEFAULT 0,
            location VARCHAR,
            attendees VARCHAR NOT NULL DEFAULT '[]',
            hangout_link VARCHAR,
            html_link VARCHAR,
            synced_at BIGINT NOT NULL
        )",
        [],
    )?;

    // Create indexes for performance
    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_contacts_approval
            ON contacts(approval_status, is_duplicate)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_companies_approval
            ON companies(approval_status)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_tasks_assigned_to
            ON tasks(assigned_to)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_meetings_date
            ON meetings(meeting_date)",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_calendar_events_start
            ON calendar_events(start_time)",
        [],
    )?;

    Ok(())
}
