//! Rewrites stored name references after a contact or company is renamed.
//!
//! Matching is a case-insensitive comparison of the whole trimmed name, never
//! token-wise or fuzzy. List fields are handled as `Vec<String>`; JSON only
//! appears in [`decode_list`] and [`encode_list`].

use shared_types::{FieldShape, NameField, NameFieldRewrite, NameFieldValue, RecordType};

#[derive(Debug, thiserror::Error)]
pub enum PropagationError {
    #[error("Malformed name list: {0}")]
    MalformedList(#[from] serde_json::Error),
}

/// Result of propagating a rename into one field.
#[derive(Debug)]
pub enum FieldOutcome {
    /// Field does not reference the old name, or is absent
    Unchanged,
    /// New stored value for the field
    Rewritten(String),
    /// Stored value could not be read; the field is left as it was
    Skipped(PropagationError),
}

impl FieldOutcome {
    /// Value to store after propagation: the rewrite if there is one,
    /// otherwise the original value.
    pub fn resolve(self, original: Option<&str>) -> Option<String> {
        match self {
            FieldOutcome::Rewritten(value) => Some(value),
            FieldOutcome::Unchanged | FieldOutcome::Skipped(_) => original.map(str::to_string),
        }
    }
}

fn same_name(stored: &str, name: &str) -> bool {
    stored.trim().to_lowercase() == name.trim().to_lowercase()
}

/// Returns `new_name` when `value` is the old name.
pub fn propagate_scalar(old_name: &str, new_name: &str, value: Option<&str>) -> Option<String> {
    value
        .filter(|v| same_name(v, old_name))
        .map(|_| new_name.to_string())
}

/// Replaces the first entry equal to `old_name` in place. Returns whether an
/// entry was replaced. Other entries and their order are untouched.
pub fn propagate_list(old_name: &str, new_name: &str, names: &mut [String]) -> bool {
    match names.iter_mut().find(|entry| same_name(entry, old_name)) {
        Some(entry) => {
            *entry = new_name.to_string();
            true
        }
        None => false,
    }
}

/// Decodes a stored name list. JSON `null` is an empty list.
pub fn decode_list(raw: &str) -> Result<Vec<String>, PropagationError> {
    let names: Option<Vec<String>> = serde_json::from_str(raw)?;
    Ok(names.unwrap_or_default())
}

pub fn encode_list(names: &[String]) -> Result<String, PropagationError> {
    Ok(serde_json::to_string(names)?)
}

fn rewrite_list(old_name: &str, new_name: &str, raw: &str) -> Result<Option<String>, PropagationError> {
    let mut names = decode_list(raw)?;
    if propagate_list(old_name, new_name, &mut names) {
        Ok(Some(encode_list(&names)?))
    } else {
        Ok(None)
    }
}

/// Propagates a rename into a single stored field.
///
/// Never fails: an unreadable list is reported as [`FieldOutcome::Skipped`]
/// so one corrupt record cannot abort a rename across the rest.
pub fn propagate(old_name: &str, new_name: &str, shape: FieldShape, raw: Option<&str>) -> FieldOutcome {
    let Some(raw) = raw else {
        return FieldOutcome::Unchanged;
    };
    if old_name.trim().is_empty() {
        return FieldOutcome::Unchanged;
    }

    let rewritten = match shape {
        FieldShape::Scalar => propagate_scalar(old_name, new_name, Some(raw)),
        FieldShape::List => match rewrite_list(old_name, new_name, raw) {
            Ok(value) => value,
            Err(e) => return FieldOutcome::Skipped(e),
        },
    };

    match rewritten {
        Some(value) if value != raw => FieldOutcome::Rewritten(value),
        _ => FieldOutcome::Unchanged,
    }
}

/// A field left alone because its stored value was unreadable.
#[derive(Debug)]
pub struct SkippedField {
    pub record_type: RecordType,
    pub record_id: i64,
    pub field: NameField,
    pub error: PropagationError,
}

#[derive(Debug, Default)]
pub struct PropagationReport {
    pub rewrites: Vec<NameFieldRewrite>,
    pub skipped: Vec<SkippedField>,
}

impl PropagationReport {
    pub fn is_empty(&self) -> bool {
        self.rewrites.is_empty() && self.skipped.is_empty()
    }
}

/// Applies [`propagate`] independently to every value.
pub fn propagate_all(old_name: &str, new_name: &str, values: &[NameFieldValue]) -> PropagationReport {
    let mut report = PropagationReport::default();

    for value in values {
        match propagate(old_name, new_name, value.field.shape(), value.value.as_deref()) {
            FieldOutcome::Unchanged => {}
            FieldOutcome::Rewritten(rewritten) => report.rewrites.push(NameFieldRewrite {
                record_type: value.record_type(),
                record_id: value.record_id,
                field: value.field,
                value: rewritten,
            }),
            FieldOutcome::Skipped(error) => report.skipped.push(SkippedField {
                record_type: value.record_type(),
                record_id: value.record_id,
                field: value.field,
                error,
            }),
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rewritten(outcome: FieldOutcome) -> String {
        match outcome {
            FieldOutcome::Rewritten(value) => value,
            other => panic!("expected a rewrite, got {:?}", other),
        }
    }

    #[test]
    fn test_list_rewrite_preserves_order_and_other_entries() {
        let raw = r#"["Jake Ryan","John Puls","Asim Khan"]"#;

        let value = rewritten(propagate("John Puls", "John P. Puls", FieldShape::List, Some(raw)));

        assert_eq!(value, r#"["Jake Ryan","John P. Puls","Asim Khan"]"#);
    }

    #[test]
    fn test_list_rewrite_keeps_other_entries_by_value() {
        let raw = "[ \"\\u0041sim Khan\" ,\n  \"John Puls\" ]";

        let value = rewritten(propagate("John Puls", "John P. Puls", FieldShape::List, Some(raw)));

        assert_eq!(value, r#"["Asim Khan","John P. Puls"]"#);
        assert_eq!(decode_list(&value).unwrap()[0], decode_list(raw).unwrap()[0]);
    }

    #[test]
    fn test_list_without_match_keeps_stored_text() {
        let raw = "[ \"\\u0041sim Khan\" ]";

        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::List, Some(raw)),
            FieldOutcome::Unchanged
        ));
    }

    #[test]
    fn test_list_rewrite_replaces_only_first_occurrence() {
        let mut names = vec![
            "john puls".to_string(),
            "Asim Khan".to_string(),
            "JOHN PULS".to_string(),
        ];

        assert!(propagate_list("John Puls", "John Puls Jr", &mut names));
        assert_eq!(names, vec!["John Puls Jr", "Asim Khan", "JOHN PULS"]);
    }

    #[test]
    fn test_new_name_containing_old_is_not_rematched() {
        let raw = r#"["John Puls"]"#;

        let value = rewritten(propagate("John Puls", "John Puls Sr", FieldShape::List, Some(raw)));

        assert_eq!(decode_list(&value).unwrap(), vec!["John Puls Sr"]);
    }

    #[test]
    fn test_matching_is_whole_name_not_token() {
        let raw = r#"["John Puls Jr","Johnny Puls"]"#;

        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::List, Some(raw)),
            FieldOutcome::Unchanged
        ));
        assert_eq!(propagate_scalar("John", "Jon", Some("John Puls")), None);
    }

    #[test]
    fn test_scalar_match_ignores_case_and_padding() {
        let outcome = propagate("John Puls", "John P. Puls", FieldShape::Scalar, Some("  JOHN puls "));

        assert_eq!(rewritten(outcome), "John P. Puls");
    }

    #[test]
    fn test_absent_and_unrelated_fields_are_noops() {
        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::Scalar, None),
            FieldOutcome::Unchanged
        ));
        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::Scalar, Some("Asim Khan")),
            FieldOutcome::Unchanged
        ));
        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::List, Some(r#"["Asim Khan"]"#)),
            FieldOutcome::Unchanged
        ));
        assert!(matches!(
            propagate("John Puls", "John P. Puls", FieldShape::List, Some("null")),
            FieldOutcome::Unchanged
        ));
    }

    #[test]
    fn test_malformed_json_is_skipped_and_kept() {
        let raw = r#"["John Puls","#;

        let outcome = propagate("John Puls", "John P. Puls", FieldShape::List, Some(raw));
        assert!(matches!(outcome, FieldOutcome::Skipped(_)));
        assert_eq!(outcome.resolve(Some(raw)).as_deref(), Some(raw));
    }

    #[test]
    fn test_non_string_entries_are_malformed() {
        let outcome = propagate("John Puls", "John P. Puls", FieldShape::List, Some(r#"["John Puls", 4]"#));
        assert!(matches!(outcome, FieldOutcome::Skipped(PropagationError::MalformedList(_))));

        let outcome = propagate("John Puls", "John P. Puls", FieldShape::List, Some(r#"{"name":"John Puls"}"#));
        assert!(matches!(outcome, FieldOutcome::Skipped(_)));
    }

    #[test]
    fn test_blank_old_name_changes_nothing() {
        assert!(matches!(
            propagate("  ", "Jake Ryan", FieldShape::Scalar, Some("")),
            FieldOutcome::Unchanged
        ));
    }

    #[test]
    fn test_propagate_all_collects_rewrites_and_skips() {
        let values = vec![
            NameFieldValue {
                record_id: 1,
                field: NameField::TaskAssignee,
                value: Some("John Puls".to_string()),
            },
            NameFieldValue {
                record_id: 2,
                field: NameField::MeetingParticipants,
                value: Some(r#"["Jake Ryan","John Puls"]"#.to_string()),
            },
            NameFieldValue {
                record_id: 3,
                field: NameField::MeetingParticipants,
                value: Some("not json".to_string()),
            },
            NameFieldValue {
                record_id: 4,
                field: NameField::MeetingPrimaryLead,
                value: None,
            },
        ];

        let report = propagate_all("John Puls", "John P. Puls", &values);

        assert_eq!(report.rewrites.len(), 2);
        assert_eq!(report.rewrites[0].record_type, RecordType::Task);
        assert_eq!(report.rewrites[0].value, "John P. Puls");
        assert_eq!(report.rewrites[1].record_id, 2);
        assert_eq!(report.rewrites[1].value, r#"["Jake Ryan","John P. Puls"]"#);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].record_id, 3);
        assert_eq!(report.skipped[0].record_type, RecordType::Meeting);
    }
}
