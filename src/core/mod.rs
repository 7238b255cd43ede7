// Core review-engine exports
pub mod deck;
pub mod gesture;
pub mod orchestrator;
pub mod search;

pub use deck::MatchDeck;
pub use gesture::{GestureCommitter, GesturePhase, DEFAULT_COMMIT_THRESHOLD};
pub use orchestrator::{MatchOrchestrator, RankingRequest, RefreshOutcome};
pub use search::{
    InputOutcome, SearchDebouncer, SearchSession, SuggestionFetcher, SuggestionPanel,
    DEFAULT_DEBOUNCE,
};
