//! Fuzzy comparison of two name/contact tuples.
//!
//! Scoring walks a fixed, ordered table of rules and stops at the first one
//! whose predicate holds. A shared organization then adds a bonus, unless the
//! winning rule already required the organizations to match.

/// The attributes compared by the matcher. Borrowed from whatever record
/// the caller holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameProfile<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub organization: Option<&'a str>,
}

impl<'a> NameProfile<'a> {
    pub fn new(name: &'a str, email: Option<&'a str>, organization: Option<&'a str>) -> Self {
        Self {
            name,
            email,
            organization,
        }
    }
}

/// Identity of a scoring rule, independent of its display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatchRuleKind {
    ExactName,
    SameEmail,
    SwappedName,
    FirstNameAndOrganization,
    NameOverlap,
    LastNameAndOrganization,
    FirstName,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchScore {
    /// 0 when nothing matched, otherwise 1..=99
    pub confidence: u8,
    /// Signal labels in the order they fired
    pub reasons: Vec<&'static str>,
    /// The base rule that fired
    pub rule: Option<MatchRuleKind>,
}

impl MatchScore {
    fn no_match() -> Self {
        Self {
            confidence: 0,
            reasons: Vec::new(),
            rule: None,
        }
    }

    pub fn is_match(&self) -> bool {
        self.confidence > 0
    }

    /// Reasons joined for display, e.g. `"Exact name match, Same organization"`
    pub fn reason(&self) -> String {
        self.reasons.join(", ")
    }
}

pub const ORGANIZATION_BOOST: u8 = 10;
pub const MAX_CONFIDENCE: u8 = 99;
const ORGANIZATION_REASON: &str = "Same organization";

/// Trimmed, lower-cased view of a profile.
struct Normalized {
    full: String,
    parts: Vec<String>,
    email: Option<String>,
    organization: Option<String>,
}

impl Normalized {
    fn from_profile(profile: &NameProfile<'_>) -> Self {
        let full = normalize(profile.name);
        let parts = full.split_whitespace().map(str::to_string).collect();

        Self {
            full,
            parts,
            email: normalize_optional(profile.email),
            organization: normalize_optional(profile.organization),
        }
    }

    fn first(&self) -> Option<&str> {
        self.parts.first().map(String::as_str)
    }

    fn last(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    fn has_several_parts(&self) -> bool {
        self.parts.len() >= 2
    }
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

fn normalize_optional(value: Option<&str>) -> Option<String> {
    value.map(normalize).filter(|v| !v.is_empty())
}

fn same_organization(a: &Normalized, b: &Normalized) -> bool {
    matches!((&a.organization, &b.organization), (Some(x), Some(y)) if x == y)
}

fn same_first_name(a: &Normalized, b: &Normalized) -> bool {
    matches!((a.first(), b.first()), (Some(x), Some(y)) if x == y)
}

struct MatchRule {
    kind: MatchRuleKind,
    confidence: u8,
    reason: &'static str,
    /// Rule already requires equal organizations, so no boost applies
    accounts_for_organization: bool,
    matches: fn(&Normalized, &Normalized) -> bool,
}

const MATCH_RULES: [MatchRule; 7] = [
    MatchRule {
        kind: MatchRuleKind::ExactName,
        confidence: 95,
        reason: "Exact name match",
        accounts_for_organization: false,
        matches: |a, b| !a.full.is_empty() && a.full == b.full,
    },
    MatchRule {
        kind: MatchRuleKind::SameEmail,
        confidence: 90,
        reason: "Same email address",
        accounts_for_organization: false,
        matches: |a, b| matches!((&a.email, &b.email), (Some(x), Some(y)) if x == y),
    },
    MatchRule {
        kind: MatchRuleKind::SwappedName,
        confidence: 80,
        reason: "Name parts swapped",
        accounts_for_organization: false,
        matches: |a, b| {
            a.has_several_parts()
                && b.has_several_parts()
                && a.first() == b.last()
                && a.last() == b.first()
        },
    },
    MatchRule {
        kind: MatchRuleKind::FirstNameAndOrganization,
        confidence: 75,
        reason: "Same first name + organization",
        accounts_for_organization: true,
        matches: |a, b| same_first_name(a, b) && same_organization(a, b),
    },
    MatchRule {
        kind: MatchRuleKind::NameOverlap,
        confidence: 65,
        reason: "Name overlap",
        accounts_for_organization: false,
        matches: |a, b| {
            a.full.chars().count() > 3
                && b.full.chars().count() > 3
                && (a.full.contains(b.full.as_str()) || b.full.contains(a.full.as_str()))
        },
    },
    MatchRule {
        kind: MatchRuleKind::LastNameAndOrganization,
        confidence: 55,
        reason: "Same last name + organization",
        accounts_for_organization: true,
        matches: |a, b| {
            a.has_several_parts()
                && b.has_several_parts()
                && a.last() == b.last()
                && same_organization(a, b)
        },
    },
    MatchRule {
        kind: MatchRuleKind::FirstName,
        confidence: 40,
        reason: "Same first name",
        accounts_for_organization: false,
        matches: |a, b| {
            same_first_name(a, b) && a.first().is_some_and(|first| first.chars().count() >= 3)
        },
    },
];

/// Scores how likely `candidate` is the same entity as `target`.
pub fn score(target: &NameProfile<'_>, candidate: &NameProfile<'_>) -> MatchScore {
    let target = Normalized::from_profile(target);
    let candidate = Normalized::from_profile(candidate);

    let Some(rule) = MATCH_RULES
        .iter()
        .find(|rule| (rule.matches)(&target, &candidate))
    else {
        return MatchScore::no_match();
    };

    let mut confidence = rule.confidence;
    let mut reasons = vec![rule.reason];

    if !rule.accounts_for_organization && same_organization(&target, &candidate) {
        confidence = confidence.saturating_add(ORGANIZATION_BOOST).min(MAX_CONFIDENCE);
        reasons.push(ORGANIZATION_REASON);
    }

    MatchScore {
        confidence,
        reasons,
        rule: Some(rule.kind),
    }
}
