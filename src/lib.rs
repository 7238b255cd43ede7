//! JobDeck - client-side match review engine for the JobDeck swipe app
//!
//! This library implements the interactive match-review engine: an ordered
//! deck of ranked match candidates with a deterministic accept/reject
//! protocol, a gesture-to-decision state machine, and debounced prefix
//! search with stale-response rejection. Ranking and search themselves run
//! on a remote matching service consumed through narrow HTTP contracts.

pub mod app;
pub mod config;
pub mod core;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    GestureCommitter, GesturePhase, MatchDeck, MatchOrchestrator, RefreshOutcome, SearchDebouncer,
    SuggestionFetcher, SuggestionPanel,
};
pub use crate::models::{
    CandidateKind, CardAttributes, Decision, DecisionRecord, MatchCandidate, MatchReport, Party,
    Role,
};
