use serde::{Deserialize, Serialize};

use crate::models::domain::{CandidateKind, CardAttributes, MatchCandidate, Role};

/// One entry of the ranking contract, pre-sorted by the service.
///
/// The wire shape carries no kind tag; the kind follows from which role
/// requested the ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedMatchResponse {
    pub id: String,
    pub score: u8,
    pub title: String,
    pub subtitle: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "avatarUrl", default)]
    pub avatar_url: Option<String>,
}

impl RankedMatchResponse {
    /// Lift the wire entry into a deck candidate for the given kind.
    pub fn into_candidate(self, kind: CandidateKind) -> MatchCandidate {
        MatchCandidate {
            id: self.id,
            kind,
            score: self.score,
            attributes: CardAttributes {
                title: self.title,
                subtitle: self.subtitle,
                tags: self.tags,
                description: self.description,
                avatar_url: self.avatar_url,
            },
        }
    }
}

/// Response of the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub role: Role,
}

/// Error body the service returns on failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranked_entry_lifts_into_candidate() {
        let json = r#"{
            "id": "j-001",
            "score": 82,
            "title": "Senior Java Engineer",
            "subtitle": "FPT Software - Ha Noi",
            "tags": ["Java", "Spring Boot"],
            "description": "Build backend services."
        }"#;

        let entry: RankedMatchResponse = serde_json::from_str(json).unwrap();
        let card = entry.into_candidate(CandidateKind::Job);

        assert_eq!(card.id, "j-001");
        assert_eq!(card.score, 82);
        assert_eq!(card.kind, CandidateKind::Job);
        assert_eq!(card.attributes.tags.len(), 2);
        assert!(card.attributes.avatar_url.is_none());
    }
}
