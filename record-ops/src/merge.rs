use shared_types::{Contact, UpdateContactRequest};

/// Optional scalar attributes that a merge may copy from one contact to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeableField {
    Email,
    Phone,
    Organization,
    Title,
    DateOfBirth,
    Address,
    Website,
    Linkedin,
}

impl MergeableField {
    pub const ALL: [MergeableField; 8] = [
        MergeableField::Email,
        MergeableField::Phone,
        MergeableField::Organization,
        MergeableField::Title,
        MergeableField::DateOfBirth,
        MergeableField::Address,
        MergeableField::Website,
        MergeableField::Linkedin,
    ];

    pub fn read<'a>(&self, contact: &'a Contact) -> Option<&'a str> {
        match self {
            MergeableField::Email => contact.email.as_deref(),
            MergeableField::Phone => contact.phone.as_deref(),
            MergeableField::Organization => contact.organization.as_deref(),
            MergeableField::Title => contact.title.as_deref(),
            MergeableField::DateOfBirth => contact.date_of_birth.as_deref(),
            MergeableField::Address => contact.address.as_deref(),
            MergeableField::Website => contact.website.as_deref(),
            MergeableField::Linkedin => contact.linkedin.as_deref(),
        }
    }

    fn slot<'a>(&self, updates: &'a mut UpdateContactRequest) -> &'a mut Option<String> {
        match self {
            MergeableField::Email => &mut updates.email,
            MergeableField::Phone => &mut updates.phone,
            MergeableField::Organization => &mut updates.organization,
            MergeableField::Title => &mut updates.title,
            MergeableField::DateOfBirth => &mut updates.date_of_birth,
            MergeableField::Address => &mut updates.address,
            MergeableField::Website => &mut updates.website,
            MergeableField::Linkedin => &mut updates.linkedin,
        }
    }
}

/// Only `None` and `""` are missing. Whitespace is a value like any other.
fn has_value(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// Computes the updates that fill gaps on `target` from `source`.
///
/// The target is authoritative: a field it already holds is never
/// overwritten. An empty update means there is nothing to copy.
pub fn reconcile(target: &Contact, source: &Contact) -> UpdateContactRequest {
    let mut updates = UpdateContactRequest::default();

    for field in MergeableField::ALL {
        if has_value(field.read(target)) {
            continue;
        }
        if let Some(value) = field.read(source).filter(|v| !v.is_empty()) {
            *field.slot(&mut updates) = Some(value.to_string());
        }
    }

    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::ApprovalStatus;

    fn blank_contact(id: i64, name: &str) -> Contact {
        Contact {
            id,
            name: name.to_string(),
            email: None,
            phone: None,
            organization: None,
            title: None,
            date_of_birth: None,
            address: None,
            website: None,
            linkedin: None,
            approval_status: ApprovalStatus::Approved,
            is_duplicate: false,
            merged_into_contact_id: None,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_fills_only_missing_fields() {
        let mut target = blank_contact(1, "Jake Ryan");
        target.email = Some("a@x.com".to_string());
        let mut source = blank_contact(2, "Jake Ryan");
        source.email = Some("b@x.com".to_string());
        source.phone = Some("+1".to_string());

        let updates = reconcile(&target, &source);

        assert_eq!(
            updates,
            UpdateContactRequest {
                phone: Some("+1".to_string()),
                ..Default::default()
            }
        );
    }

    #[test]
    fn test_empty_target_values_count_as_missing() {
        let mut target = blank_contact(1, "Jake Ryan");
        target.website = Some(String::new());
        let mut source = blank_contact(2, "Jake Ryan");
        source.website = Some("https://omniscope.io".to_string());

        let updates = reconcile(&target, &source);

        assert_eq!(updates.website.as_deref(), Some("https://omniscope.io"));
        assert_eq!(updates.changed_fields(), vec!["website"]);
    }

    #[test]
    fn test_whitespace_target_value_is_kept() {
        let mut target = blank_contact(1, "Jake Ryan");
        target.title = Some("   ".to_string());
        let mut source = blank_contact(2, "Jake Ryan");
        source.title = Some("CTO".to_string());

        let updates = reconcile(&target, &source);

        assert!(updates.title.is_none());
        assert!(updates.is_empty());
    }

    #[test]
    fn test_empty_source_values_are_not_copied() {
        let target = blank_contact(1, "Jake Ryan");
        let mut source = blank_contact(2, "Jake Ryan");
        source.address = Some(String::new());
        source.phone = Some("  ".to_string());

        let updates = reconcile(&target, &source);

        assert!(updates.address.is_none());
        assert_eq!(updates.phone.as_deref(), Some("  "));
    }

    #[test]
    fn test_copies_every_mergeable_field_into_empty_target() {
        let target = blank_contact(1, "Jake Ryan");
        let source = Contact {
            email: Some("jake@x.com".to_string()),
            phone: Some("+1 555 0100".to_string()),
            organization: Some("OmniScope".to_string()),
            title: Some("CEO".to_string()),
            date_of_birth: Some("1990-04-02".to_string()),
            address: Some("1 Main St".to_string()),
            website: Some("https://jake.dev".to_string()),
            linkedin: Some("https://linkedin.com/in/jake".to_string()),
            ..blank_contact(2, "Jake Ryan")
        };

        let updates = reconcile(&target, &source);

        assert_eq!(updates.changed_fields().len(), MergeableField::ALL.len());
        assert!(updates.name.is_none());
        assert!(updates.approval_status.is_none());
    }

    #[test]
    fn test_never_touches_populated_target_fields() {
        let target = Contact {
            email: Some("a@x.com".to_string()),
            organization: Some("OmniScope".to_string()),
            ..blank_contact(1, "Jake Ryan")
        };
        let source = Contact {
            email: Some("b@x.com".to_string()),
            organization: Some("Other Co".to_string()),
            ..blank_contact(2, "Jake Ryan")
        };

        let updates = reconcile(&target, &source);

        for field in MergeableField::ALL {
            if has_value(field.read(&target)) {
                assert!(field.slot(&mut updates.clone()).is_none());
            }
        }
        assert!(updates.is_empty());
    }
}
