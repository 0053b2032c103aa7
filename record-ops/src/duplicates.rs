use shared_types::{ApprovalStatus, Company, Contact, MatchResult};

use crate::name_matcher::{score, NameProfile};

/// Upper bound on matches returned for one target.
pub const MAX_DUPLICATE_RESULTS: usize = 5;

/// A stored record that can be offered as a possible duplicate.
pub trait Candidate {
    fn candidate_id(&self) -> i64;

    fn profile(&self) -> NameProfile<'_>;

    fn approval_status(&self) -> ApprovalStatus;
}

impl Candidate for Contact {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn profile(&self) -> NameProfile<'_> {
        NameProfile::new(
            &self.name,
            self.email.as_deref(),
            self.organization.as_deref(),
        )
    }

    fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }
}

/// Companies are compared by name alone.
impl Candidate for Company {
    fn candidate_id(&self) -> i64 {
        self.id
    }

    fn profile(&self) -> NameProfile<'_> {
        NameProfile::new(&self.name, None, None)
    }

    fn approval_status(&self) -> ApprovalStatus {
        self.approval_status
    }
}

/// Ranks approved candidates by how closely they match `target`.
///
/// Pending candidates never appear in the output. Results are sorted by
/// descending confidence, ties keep their input order, and at most
/// [`MAX_DUPLICATE_RESULTS`] are returned.
pub fn find_duplicates<C: Candidate>(target: &NameProfile<'_>, candidates: &[C]) -> Vec<MatchResult> {
    rank(target, candidates.iter())
}

/// Same as [`find_duplicates`] but skips the candidate with `exclude_id`,
/// used when the target is itself a stored record.
pub fn find_duplicates_excluding<C: Candidate>(
    target: &NameProfile<'_>,
    candidates: &[C],
    exclude_id: i64,
) -> Vec<MatchResult> {
    rank(
        target,
        candidates.iter().filter(|c| c.candidate_id() != exclude_id),
    )
}

fn rank<'c, C, I>(target: &NameProfile<'_>, candidates: I) -> Vec<MatchResult>
where
    C: Candidate + 'c,
    I: Iterator<Item = &'c C>,
{
    let mut matches: Vec<MatchResult> = candidates
        .filter(|c| c.approval_status() == ApprovalStatus::Approved)
        .filter_map(|c| {
            let result = score(target, &c.profile());
            result.is_match().then(|| MatchResult {
                record_id: c.candidate_id(),
                confidence: result.confidence,
                reason: result.reason(),
            })
        })
        .collect();

    // sort_by is stable, so equal scores keep candidate order
    matches.sort_by(|a, b| b.confidence.cmp(&a.confidence));
    matches.truncate(MAX_DUPLICATE_RESULTS);
    matches
}
