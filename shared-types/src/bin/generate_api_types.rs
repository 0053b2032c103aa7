use shared_types::*;
use std::fs;
use std::path::Path;
use ts_rs::TS;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Generate TypeScript definitions for API types
    let mut types = Vec::new();

    // Contact types
    types.push(clean_type(ApprovalStatus::export_to_string()?));
    types.push(clean_type(Contact::export_to_string()?));
    types.push(clean_type(CreateContactRequest::export_to_string()?));
    types.push(clean_type(UpdateContactRequest::export_to_string()?));
    types.push(clean_type(ContactsResponse::export_to_string()?));
    types.push(clean_type(ContactUpdateResponse::export_to_string()?));

    // Company types
    types.push(clean_type(Company::export_to_string()?));
    types.push(clean_type(CreateCompanyRequest::export_to_string()?));
    types.push(clean_type(UpdateCompanyRequest::export_to_string()?));
    types.push(clean_type(CompaniesResponse::export_to_string()?));
    types.push(clean_type(CompanyUpdateResponse::export_to_string()?));

    // Duplicate detection and merge types
    types.push(clean_type(MatchResult::export_to_string()?));
    types.push(clean_type(DuplicatesResponse::export_to_string()?));
    types.push(clean_type(MergeContactsRequest::export_to_string()?));
    types.push(clean_type(MergeContactsResponse::export_to_string()?));

    // Rename propagation types
    types.push(clean_type(RecordType::export_to_string()?));
    types.push(clean_type(NameField::export_to_string()?));
    types.push(clean_type(RenameSubject::export_to_string()?));
    types.push(clean_type(NameFieldRewrite::export_to_string()?));
    types.push(clean_type(RenameSummary::export_to_string()?));

    // Task types
    types.push(clean_type(Task::export_to_string()?));
    types.push(clean_type(TaskStatus::export_to_string()?));
    types.push(clean_type(TaskPriority::export_to_string()?));
    types.push(clean_type(CreateTaskRequest::export_to_string()?));
    types.push(clean_type(UpdateTaskRequest::export_to_string()?));
    types.push(clean_type(TaskFilter::export_to_string()?));
    types.push(clean_type(TaskSortField::export_to_string()?));
    types.push(clean_type(SortDirection::export_to_string()?));
    types.push(clean_type(TaskSort::export_to_string()?));
    types.push(clean_type(TaskStats::export_to_string()?));
    types.push(clean_type(TasksResponse::export_to_string()?));

    // Meeting types
    types.push(clean_type(Meeting::export_to_string()?));
    types.push(clean_type(CreateMeetingRequest::export_to_string()?));
    types.push(clean_type(MeetingsResponse::export_to_string()?));

    // Calendar import types
    types.push(clean_type(CalendarEvent::export_to_string()?));
    types.push(clean_type(CalendarEventsResponse::export_to_string()?));
    types.push(clean_type(CalendarImportSummary::export_to_string()?));

    types.push(clean_type(ErrorResponse::export_to_string()?));

    let output_dir = Path::new("../web/src/api-types");
    fs::create_dir_all(output_dir)?;

    let output_path = output_dir.join("types.ts");
    let output = types.join("\n\n");

    fs::write(&output_path, output)?;
    println!("Generated TypeScript types in {}", output_path.display());

    Ok(())
}

/// Strips per-type imports and generator banners so all definitions can share one file.
fn clean_type(mut type_def: String) -> String {
    type_def.retain(|c| c != '\r');

    let filtered: Vec<&str> = type_def
        .lines()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.starts_with("import type")
                && !trimmed.starts_with("// This file was generated")
                && !trimmed.starts_with("/* This file was generated")
        })
        .collect();

    let result = filtered.join("\n").trim().to_string();
    if result.is_empty() {
        result
    } else {
        format!("{}\n", result)
    }
}
