use crate::database::name_references;
use crate::database::{not_found, AsyncDbConnection};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension, Row};
use shared_types::{
    ApprovalStatus, Company, CreateCompanyRequest, RenameSubject, RenameSummary,
    UpdateCompanyRequest,
};

const COMPANY_COLUMNS: &str = "id, name, domain, industry, location, website, linkedin_url,
    approval_status, created_at, updated_at";

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    let approval_status: String = row.get(7)?;

    Ok(Company {
        id: row.get(0)?,
        name: row.get(1)?,
        domain: row.get(2)?,
        industry: row.get(3)?,
        location: row.get(4)?,
        website: row.get(5)?,
        linkedin_url: row.get(6)?,
        approval_status: ApprovalStatus::from_db(&approval_status).unwrap_or_default(),
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}

fn read_company(conn: &Connection, id: i64) -> Result<Option<Company>> {
    let company = conn
        .query_row(
            &format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?"),
            [id],
            company_from_row,
        )
        .optional()?;

    Ok(company)
}

pub async fn insert_company(conn: AsyncDbConnection, request: &CreateCompanyRequest) -> Result<i64> {
    let conn = conn.lock().await?;
    let now = chrono::Utc::now().timestamp();

    let id: i64 = conn.query_row(
        "INSERT INTO companies
         (name, domain, industry, location, website, linkedin_url, approval_status,
          created_at, updated_at)
          VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
          RETURNING id",
        params![
            request.name.trim(),
            request.domain.as_ref(),
            request.industry.as_ref(),
            request.location.as_ref(),
            request.website.as_ref(),
            request.linkedin_url.as_ref(),
            request.approval_status.unwrap_or_default().as_str(),
            now,
            now
        ],
        |row| row.get(0),
    )?;

    Ok(id)
}

pub async fn get_company(conn: AsyncDbConnection, id: i64) -> Result<Company> {
    let conn = conn.lock().await?;

    read_company(&conn, id)?.ok_or_else(|| not_found("Company", id))
}

pub async fn list_companies(conn: AsyncDbConnection, limit: usize) -> Result<Vec<Company>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies ORDER BY created_at DESC, id DESC LIMIT ?"
    ))?;

    let companies = stmt
        .query_map([limit], company_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(companies)
}

/// Approved companies: the duplicate candidate pool.
pub async fn list_candidate_companies(conn: AsyncDbConnection) -> Result<Vec<Company>> {
    let conn = conn.lock().await?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {COMPANY_COLUMNS} FROM companies
         WHERE approval_status = 'approved'
         ORDER BY id"
    ))?;

    let companies = stmt
        .query_map([], company_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(companies)
}

/// Applies `update`; a name change is propagated to meeting organizations
/// and contact organizations in the same transaction.
pub async fn update_company(
    conn: AsyncDbConnection,
    id: i64,
    update: &UpdateCompanyRequest,
) -> Result<(Company, Option<RenameSummary>)> {
    let mut conn = conn.lock().await?;
    let tx = conn.transaction()?;

    let current =
        read_company(&tx, id)?.ok_or_else(|| not_found("Company", id))?;

    tx.execute(
        "UPDATE companies SET
            name = COALESCE(?1, name),
            domain = COALESCE(?2, domain),
            industry = COALESCE(?3, industry),
            location = COALESCE(?4, location),
            website = COALESCE(?5, website),
            linkedin_url = COALESCE(?6, linkedin_url),
            approval_status = COALESCE(?7, approval_status),
            updated_at = ?8
         WHERE id = ?9",
        params![
            update.name.as_deref().map(str::trim),
            update.domain.as_ref(),
            update.industry.as_ref(),
            update.location.as_ref(),
            update.website.as_ref(),
            update.linkedin_url.as_ref(),
            update.approval_status.map(|s| s.as_str().to_string()),
            chrono::Utc::now().timestamp(),
            id
        ],
    )?;

    let rename = match update.name.as_deref().map(str::trim) {
        Some(new_name) if new_name != current.name.trim() => Some(
            name_references::propagate_rename(&tx, RenameSubject::Company, &current.name, new_name)?,
        ),
        _ => None,
    };

    let company =
        read_company(&tx, id)?.ok_or_else(|| not_found("Company", id))?;
    tx.commit()?;

    Ok((company, rename))
}
