// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    CandidateKind, CardAttributes, Decision, DecisionRecord, MatchBreakdown, MatchCandidate,
    MatchReport, Party, Role, ScoreTier, STRONG_MATCH_MIN,
};
pub use requests::{CompareRequest, DecisionEventRequest, LoginRequest};
pub use responses::{ErrorResponse, LoginResponse, RankedMatchResponse};
