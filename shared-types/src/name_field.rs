use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Kind of record that carries a name-bearing field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RecordType {
    Task,
    Meeting,
    Contact,
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Task => "task",
            RecordType::Meeting => "meeting",
            RecordType::Contact => "contact",
        }
    }
}

impl std::fmt::Display for RecordType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How a name-bearing field stores its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
    /// A single name
    Scalar,
    /// An ordered list of names, JSON-encoded in storage
    List,
}

/// Every persisted field that refers to a person or organization by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum NameField {
    TaskAssignee,
    MeetingParticipants,
    MeetingPrimaryLead,
    MeetingOrganizations,
    ContactOrganization,
}

impl NameField {
    pub fn record_type(&self) -> RecordType {
        match self {
            NameField::TaskAssignee => RecordType::Task,
            NameField::MeetingParticipants
            | NameField::MeetingPrimaryLead
            | NameField::MeetingOrganizations => RecordType::Meeting,
            NameField::ContactOrganization => RecordType::Contact,
        }
    }

    pub fn shape(&self) -> FieldShape {
        match self {
            NameField::MeetingParticipants | NameField::MeetingOrganizations => FieldShape::List,
            NameField::TaskAssignee
            | NameField::MeetingPrimaryLead
            | NameField::ContactOrganization => FieldShape::Scalar,
        }
    }

    /// Storage column holding the field
    pub fn column(&self) -> &'static str {
        match self {
            NameField::TaskAssignee => "assigned_to",
            NameField::MeetingParticipants => "participants",
            NameField::MeetingPrimaryLead => "primary_lead",
            NameField::MeetingOrganizations => "organizations",
            NameField::ContactOrganization => "organization",
        }
    }
}

/// The entity whose name changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum RenameSubject {
    Contact,
    Company,
}

impl RenameSubject {
    /// Fields that may reference an entity of this kind by name.
    pub fn affected_fields(&self) -> &'static [NameField] {
        match self {
            RenameSubject::Contact => &[
                NameField::TaskAssignee,
                NameField::MeetingParticipants,
                NameField::MeetingPrimaryLead,
            ],
            RenameSubject::Company => &[
                NameField::MeetingOrganizations,
                NameField::ContactOrganization,
            ],
        }
    }
}

/// One stored name-bearing value, as read from persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameFieldValue {
    pub record_id: i64,
    pub field: NameField,
    /// Stored text; list fields hold their JSON encoding
    pub value: Option<String>,
}

impl NameFieldValue {
    pub fn record_type(&self) -> RecordType {
        self.field.record_type()
    }
}

/// A new stored value for one name-bearing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct NameFieldRewrite {
    pub record_type: RecordType,
    pub record_id: i64,
    pub field: NameField,
    pub value: String,
}

/// Outcome of propagating a rename, reported back to the client.
#[derive(Debug, Clone, Default, Serialize, TS)]
#[ts(export)]
pub struct RenameSummary {
    pub old_name: String,
    pub new_name: String,
    pub rewritten: Vec<NameFieldRewrite>,
    /// Number of fields left unchanged because their stored value was unreadable
    pub skipped: usize,
}
