use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum score at which a card is presented as a strong match.
///
/// Display heuristic only: no engine path branches on it.
pub const STRONG_MATCH_MIN: u8 = 50;

/// What kind of record a card represents.
///
/// Candidates review `Job` cards; recruiters review `Person` cards.
/// The tag drives which fields are display-relevant, nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateKind {
    #[serde(rename = "JOB")]
    Job,
    #[serde(rename = "PERSON")]
    Person,
}

/// Display payload of a card. Opaque to the review engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardAttributes {
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}

/// One reviewable unit surfaced to the opposite role.
///
/// `score` is produced by the remote ranking service and is immutable once
/// the candidate sits in the deck; the client never re-ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub kind: CandidateKind,
    pub score: u8,
    #[serde(flatten)]
    pub attributes: CardAttributes,
}

impl MatchCandidate {
    /// Display heuristic: is this card worth highlighting as a strong match?
    pub fn is_strong_match(&self) -> bool {
        self.score >= STRONG_MATCH_MIN
    }

    /// Badge tier for the score pill: strong / middling / weak.
    pub fn score_tier(&self) -> ScoreTier {
        if self.score >= 70 {
            ScoreTier::Strong
        } else if self.score >= 40 {
            ScoreTier::Middling
        } else {
            ScoreTier::Weak
        }
    }
}

/// Presentation tier for the score badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreTier {
    Strong,
    Middling,
    Weak,
}

/// The two user roles the service ranks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Candidate,
    Recruiter,
}

impl Role {
    /// Kind of card this role reviews.
    pub fn reviews(&self) -> CandidateKind {
        match self {
            Role::Candidate => CandidateKind::Job,
            Role::Recruiter => CandidateKind::Person,
        }
    }
}

/// The party a ranking is computed for: a role plus its record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Party {
    pub id: String,
    pub role: Role,
}

impl Party {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self { id: id.into(), role }
    }
}

/// Outcome of a committed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Accept,
    Reject,
}

/// A recorded decision, ready for the fire-and-forget side channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    #[serde(rename = "eventId")]
    pub event_id: Uuid,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub decision: Decision,
    #[serde(rename = "decidedAt")]
    pub decided_at: DateTime<Utc>,
}

impl DecisionRecord {
    pub fn new(candidate_id: impl Into<String>, decision: Decision) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            candidate_id: candidate_id.into(),
            decision,
            decided_at: Utc::now(),
        }
    }
}

/// Per-dimension breakdown of a CV-versus-JD comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchBreakdown {
    #[serde(rename = "skillsMatch")]
    pub skills_match: u8,
    #[serde(rename = "experienceMatch")]
    pub experience_match: u8,
    #[serde(rename = "educationMatch")]
    pub education_match: u8,
}

/// Full result of the on-demand two-way comparison contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "overallScore")]
    pub overall_score: u8,
    pub breakdown: MatchBreakdown,
    #[serde(rename = "matchedSkills", default)]
    pub matched_skills: Vec<String>,
    #[serde(rename = "missingSkills", default)]
    pub missing_skills: Vec<String>,
    #[serde(rename = "extraSkills", default)]
    pub extra_skills: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(score: u8) -> MatchCandidate {
        MatchCandidate {
            id: "j-001".to_string(),
            kind: CandidateKind::Job,
            score,
            attributes: CardAttributes {
                title: "Senior Rust Engineer".to_string(),
                subtitle: "Acme - Remote".to_string(),
                tags: vec!["Rust".to_string(), "Tokio".to_string()],
                description: None,
                avatar_url: None,
            },
        }
    }

    #[test]
    fn test_strong_match_boundary() {
        assert!(!card(49).is_strong_match());
        assert!(card(50).is_strong_match());
        assert!(card(100).is_strong_match());
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(card(82).score_tier(), ScoreTier::Strong);
        assert_eq!(card(70).score_tier(), ScoreTier::Strong);
        assert_eq!(card(45).score_tier(), ScoreTier::Middling);
        assert_eq!(card(31).score_tier(), ScoreTier::Weak);
    }

    #[test]
    fn test_role_reviews_opposite_kind() {
        assert_eq!(Role::Candidate.reviews(), CandidateKind::Job);
        assert_eq!(Role::Recruiter.reviews(), CandidateKind::Person);
    }

    #[test]
    fn test_decision_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Decision::Accept).unwrap(), "\"accept\"");
        assert_eq!(serde_json::to_string(&Decision::Reject).unwrap(), "\"reject\"");
    }

    #[test]
    fn test_role_serializes_screaming_case() {
        assert_eq!(serde_json::to_string(&Role::Candidate).unwrap(), "\"CANDIDATE\"");
        assert_eq!(serde_json::to_string(&Role::Recruiter).unwrap(), "\"RECRUITER\"");
    }
}
