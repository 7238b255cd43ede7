use std::sync::Arc;

use crate::core::deck::MatchDeck;
use crate::core::gesture::GestureCommitter;
use crate::models::{Decision, DecisionRecord, MatchCandidate, MatchReport, Party};
use crate::services::{ApiClient, ApiError};

/// A generation-stamped ranking request handed to whoever performs the
/// fetch. Only the latest stamp's result is ever applied to the deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRequest {
    pub party: Party,
    pub generation: u64,
}

/// What `apply_ranking` did with a completed fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The deck was replaced with this many candidates.
    Applied(usize),
    /// Current-generation fetch failed; the deck is untouched.
    Failed,
    /// A newer refresh superseded this one; result dropped.
    Stale,
}

/// Session-level coordinator of the review engine.
///
/// Owns the deck and the gesture committer exclusively; nothing else
/// mutates them. Ranking refreshes are generation-guarded so a stale
/// response never overwrites a deck populated by a newer request, and
/// committed decisions advance the deck synchronously - the side-channel
/// report never gates the visible transition.
pub struct MatchOrchestrator {
    api: Arc<ApiClient>,
    deck: MatchDeck,
    committer: GestureCommitter,
    generation: u64,
    busy: bool,
}

impl MatchOrchestrator {
    pub fn new(api: Arc<ApiClient>, commit_threshold: f64) -> Self {
        Self {
            api,
            deck: MatchDeck::new(),
            committer: GestureCommitter::new(commit_threshold),
            generation: 0,
            busy: false,
        }
    }

    // ── Ranking refresh ───────────────────────────────────────

    /// Start a refresh for the given party, superseding any outstanding
    /// one. The returned request carries the generation stamp the eventual
    /// result must present to be applied.
    pub fn begin_refresh(&mut self, party: &Party) -> RankingRequest {
        self.generation += 1;
        self.busy = true;

        tracing::debug!(
            "Ranking refresh for party {} (generation {})",
            party.id,
            self.generation
        );

        RankingRequest {
            party: party.clone(),
            generation: self.generation,
        }
    }

    /// Apply a completed ranking fetch.
    ///
    /// Stale results are dropped wholesale. A current-generation success
    /// replaces the deck and abandons any in-flight gesture; a
    /// current-generation failure leaves the deck untouched (the UI shows
    /// its neutral empty state, no retry loop).
    pub fn apply_ranking(
        &mut self,
        generation: u64,
        result: Result<Vec<MatchCandidate>, ApiError>,
    ) -> RefreshOutcome {
        if generation != self.generation {
            tracing::debug!(
                "Dropping stale ranking response (generation {} != {})",
                generation,
                self.generation
            );
            return RefreshOutcome::Stale;
        }

        self.busy = false;

        match result {
            Ok(candidates) => {
                let count = candidates.len();
                self.deck.replace(candidates);
                self.committer.reset();
                tracing::debug!("Deck replaced with {} candidates", count);
                RefreshOutcome::Applied(count)
            }
            Err(e) => {
                tracing::warn!("Ranking fetch failed, deck unchanged: {}", e);
                RefreshOutcome::Failed
            }
        }
    }

    /// Convenience path: begin, fetch, apply in one call. Event-loop
    /// drivers that need overlap spawn the fetch instead and feed the
    /// completion back through `apply_ranking`.
    pub async fn refresh(&mut self, party: &Party) -> RefreshOutcome {
        let request = self.begin_refresh(party);
        let result = self.api.rank_for_party(&request.party).await;
        self.apply_ranking(request.generation, result)
    }

    /// True while a ranking fetch is outstanding. Used by the UI to gate
    /// the refresh control; a refresh issued anyway supersedes rather than
    /// queues.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    // ── Gesture and decisions ─────────────────────────────────

    /// Begin a drag on the top card. Refused when the deck is empty.
    pub fn drag_start(&mut self) -> bool {
        if self.deck.is_empty() {
            return false;
        }
        self.committer.drag_start()
    }

    /// Update the live drag offset (presentation only).
    pub fn drag_move(&mut self, offset: f64) {
        self.committer.drag_move(offset);
    }

    /// Release the drag. A commit pops the top card and yields the record
    /// for the fire-and-forget side channel; an undecided release yields
    /// nothing and leaves the deck untouched.
    pub fn drag_end(&mut self) -> Option<DecisionRecord> {
        let decision = self.committer.drag_end()?;
        self.commit(decision)
    }

    /// Decide on the top card via the action buttons. `None` when the deck
    /// is empty (the buttons are disabled then; this is the backstop).
    pub fn decide(&mut self, decision: Decision) -> Option<DecisionRecord> {
        self.commit(decision)
    }

    fn commit(&mut self, decision: Decision) -> Option<DecisionRecord> {
        let top = self.deck.peek_top()?;
        let record = DecisionRecord::new(top.id.clone(), decision);

        // Optimistic: the deck advances now; reporting happens off-path
        self.deck.pop_top();
        // The next candidate is top; abandon leftover drag state and rearm
        self.committer.reset();

        tracing::debug!(
            "Committed {:?} on {} ({} cards left)",
            decision,
            record.candidate_id,
            self.deck.len()
        );

        Some(record)
    }

    /// On-demand two-way comparison; independent of the deck.
    pub async fn compare(
        &self,
        candidate_id: &str,
        job_id: &str,
    ) -> Result<MatchReport, ApiError> {
        self.api.compare_two(candidate_id, job_id).await
    }

    // ── Read access ───────────────────────────────────────────

    pub fn deck(&self) -> &MatchDeck {
        &self.deck
    }

    pub fn committer(&self) -> &GestureCommitter {
        &self.committer
    }

    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CandidateKind, CardAttributes, Role};

    fn card(id: &str, score: u8) -> MatchCandidate {
        MatchCandidate {
            id: id.to_string(),
            kind: CandidateKind::Job,
            score,
            attributes: CardAttributes {
                title: format!("Job {}", id),
                subtitle: "Acme".to_string(),
                tags: vec![],
                description: None,
                avatar_url: None,
            },
        }
    }

    fn orchestrator() -> MatchOrchestrator {
        let api = Arc::new(ApiClient::new("http://localhost:0".to_string(), 1, None));
        MatchOrchestrator::new(api, 100.0)
    }

    fn party() -> Party {
        Party::new("c-001", Role::Candidate)
    }

    #[test]
    fn test_apply_current_generation_replaces_deck() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        assert!(orch.is_busy());

        let outcome = orch.apply_ranking(request.generation, Ok(vec![card("j1", 90)]));

        assert_eq!(outcome, RefreshOutcome::Applied(1));
        assert!(!orch.is_busy());
        assert_eq!(orch.deck().peek_top().unwrap().id, "j1");
    }

    #[test]
    fn test_stale_ranking_never_overwrites_newer() {
        let mut orch = orchestrator();

        let first = orch.begin_refresh(&party());
        let second = orch.begin_refresh(&party());

        // Second request resolves first and is applied
        let outcome = orch.apply_ranking(second.generation, Ok(vec![card("j2", 60)]));
        assert_eq!(outcome, RefreshOutcome::Applied(1));

        // First request resolves late and must be dropped
        let outcome = orch.apply_ranking(first.generation, Ok(vec![card("j1", 90)]));
        assert_eq!(outcome, RefreshOutcome::Stale);
        assert_eq!(orch.deck().peek_top().unwrap().id, "j2");
    }

    #[test]
    fn test_failed_ranking_leaves_deck_untouched() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(request.generation, Ok(vec![card("j1", 90)]));

        let request = orch.begin_refresh(&party());
        let outcome = orch.apply_ranking(
            request.generation,
            Err(ApiError::ApiError("rank failed: 500".to_string())),
        );

        assert_eq!(outcome, RefreshOutcome::Failed);
        assert!(!orch.is_busy());
        assert_eq!(orch.deck().len(), 1, "deck survives a failed refresh");
    }

    #[test]
    fn test_stale_error_does_not_clear_busy() {
        let mut orch = orchestrator();
        let first = orch.begin_refresh(&party());
        let _second = orch.begin_refresh(&party());

        let outcome = orch.apply_ranking(
            first.generation,
            Err(ApiError::ApiError("rank failed: 500".to_string())),
        );

        assert_eq!(outcome, RefreshOutcome::Stale);
        assert!(orch.is_busy(), "newer request still outstanding");
    }

    #[test]
    fn test_commit_pops_and_records_top() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(
            request.generation,
            Ok(vec![card("j1", 90), card("j2", 60), card("j3", 30)]),
        );

        let record = orch.decide(Decision::Accept).expect("deck not empty");

        assert_eq!(record.candidate_id, "j1");
        assert_eq!(record.decision, Decision::Accept);
        assert_eq!(orch.deck().len(), 2);
        assert_eq!(orch.deck().peek_top().unwrap().id, "j2");
    }

    #[test]
    fn test_decide_on_empty_deck_yields_nothing() {
        let mut orch = orchestrator();

        assert!(orch.decide(Decision::Accept).is_none());
        assert!(orch.decide(Decision::Reject).is_none());
        assert_eq!(orch.deck().len(), 0);
    }

    #[test]
    fn test_gesture_commit_advances_deck_once() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(request.generation, Ok(vec![card("j1", 90), card("j2", 60)]));

        assert!(orch.drag_start());
        orch.drag_move(140.0);
        let record = orch.drag_end().expect("commit");
        assert_eq!(record.candidate_id, "j1");
        assert_eq!(record.decision, Decision::Accept);

        // Straggling release from the same gesture
        assert!(orch.drag_end().is_none());
        assert_eq!(orch.deck().len(), 1);
    }

    #[test]
    fn test_undecided_gesture_leaves_deck_untouched() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(request.generation, Ok(vec![card("j1", 90)]));

        assert!(orch.drag_start());
        orch.drag_move(60.0);
        assert!(orch.drag_end().is_none());

        assert_eq!(orch.deck().len(), 1);
        assert_eq!(orch.deck().peek_top().unwrap().id, "j1");
    }

    #[test]
    fn test_drag_start_refused_on_empty_deck() {
        let mut orch = orchestrator();
        assert!(!orch.drag_start());
    }

    #[test]
    fn test_replace_abandons_inflight_drag() {
        let mut orch = orchestrator();
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(request.generation, Ok(vec![card("j1", 90)]));

        assert!(orch.drag_start());
        orch.drag_move(140.0);

        // Deck replaced mid-gesture: the drag is abandoned, not committed
        let request = orch.begin_refresh(&party());
        orch.apply_ranking(request.generation, Ok(vec![card("j9", 70)]));

        assert!(orch.drag_end().is_none());
        assert_eq!(orch.deck().len(), 1);
        assert_eq!(orch.deck().peek_top().unwrap().id, "j9");
    }
}
