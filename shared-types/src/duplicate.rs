use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Contact, UpdateContactRequest};

/// A candidate record that looks like the same real-world entity as the
/// record being checked. `confidence` is recomputed per request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchResult {
    pub record_id: i64,
    pub confidence: u8,
    /// Matched-signal labels in the order they fired, joined for display
    pub reason: String,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct DuplicatesResponse {
    pub matches: Vec<MatchResult>,
}

#[derive(Debug, Deserialize, TS)]
#[ts(export)]
pub struct MergeContactsRequest {
    pub source_contact_id: i64,
}

#[derive(Debug, Serialize, TS)]
#[ts(export)]
pub struct MergeContactsResponse {
    pub contact: Contact,
    /// Fields copied from the source into gaps on the target
    pub applied: UpdateContactRequest,
    pub merged_contact_id: i64,
}
