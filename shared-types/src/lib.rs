use serde::{Deserialize, Serialize};
use ts_rs::TS;

pub mod calendar;
pub mod company;
pub mod contact;
pub mod duplicate;
pub mod meeting;
pub mod name_field;
pub mod task;

pub use calendar::{CalendarEvent, CalendarEventsResponse, CalendarImportSummary};
pub use company::{
    CompaniesResponse, Company, CompanyUpdateResponse, CreateCompanyRequest, UpdateCompanyRequest,
};
pub use contact::{
    ApprovalStatus, Contact, ContactUpdateResponse, ContactsResponse, CreateContactRequest,
    UpdateContactRequest,
};
pub use duplicate::{
    DuplicatesResponse, MatchResult, MergeContactsRequest, MergeContactsResponse,
};
pub use meeting::{CreateMeetingRequest, Meeting, MeetingsResponse};
pub use name_field::{
    FieldShape, NameField, NameFieldRewrite, NameFieldValue, RecordType, RenameSubject,
    RenameSummary,
};
pub use task::{
    CreateTaskRequest, SortDirection, Task, TaskFilter, TaskPriority, TaskSort, TaskSortField,
    TaskStats, TaskStatus, TasksResponse, UpdateTaskRequest,
};

/// Error response for API endpoints
#[derive(Debug, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorResponse {
    pub error: String,
}
