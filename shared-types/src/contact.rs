use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::RenameSummary;

/// Review state of a contact or company. Only approved records take part in
/// duplicate detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalStatus {
    #[default]
    Pending,
    Approved,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
        }
    }

    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            _ => None,
        }
    }
}

impl std::fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Contact {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub approval_status: ApprovalStatus,
    pub is_duplicate: bool,
    pub merged_into_contact_id: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export)]
pub struct CreateContactRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub organization: Option<String>,
    pub title: Option<String>,
    pub date_of_birth: Option<String>,
    pub address: Option<String>,
    pub website: Option<String>,
    pub linkedin: Option<String>,
    pub approval_status: Option<ApprovalStatus>,
}

/// Partial contact update. `None` leaves the stored value untouched.
///
/// Also used as the output of merge reconciliation, where only the
/// mergeable attributes are ever populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UpdateContactRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approval_status: Option<ApprovalStatus>,
}

impl UpdateContactRequest {
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty() && self.approval_status.is_none()
    }

    /// Names of the text attributes this update sets, in column order.
    pub fn changed_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("organization", &self.organization),
            ("title", &self.title),
            ("date_of_birth", &self.date_of_birth),
            ("address", &self.address),
            ("website", &self.website),
            ("linkedin", &self.linkedin),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_some())
        .map(|(field, _)| field)
        .collect()
    }
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactsResponse {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct ContactUpdateResponse {
    pub contact: Contact,
    /// Present when the update changed the contact's name
    pub rename: Option<RenameSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_status_round_trips_through_db_text() {
        assert_eq!(
            ApprovalStatus::from_db(ApprovalStatus::Approved.as_str()),
            Some(ApprovalStatus::Approved)
        );
        assert_eq!(ApprovalStatus::from_db("archived"), None);
        assert_eq!(ApprovalStatus::default(), ApprovalStatus::Pending);
    }

    #[test]
    fn test_update_request_reports_changed_fields() {
        let update = UpdateContactRequest {
            phone: Some("+1".to_string()),
            linkedin: Some("https://linkedin.com/in/jake".to_string()),
            ..Default::default()
        };

        assert_eq!(update.changed_fields(), vec!["phone", "linkedin"]);
        assert!(!update.is_empty());
        assert!(UpdateContactRequest::default().is_empty());
    }

    #[test]
    fn test_update_request_skips_unset_fields_when_serialized() {
        let update = UpdateContactRequest {
            phone: Some("+1".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_string(&update).unwrap();
        assert_eq!(json, r#"{"phone":"+1"}"#);
    }
}
