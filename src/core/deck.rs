use std::collections::{HashSet, VecDeque};

use crate::models::MatchCandidate;

/// The ordered, mutable queue of match candidates awaiting a decision.
///
/// Front = next to review. The order is whatever the ranking service
/// returned; the deck never re-sorts. Length only ever decreases via
/// `replace` (wholesale) or exactly one element via `pop_top`.
#[derive(Debug, Default)]
pub struct MatchDeck {
    cards: VecDeque<MatchCandidate>,
}

impl MatchDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically discard the current sequence and install the new one in
    /// the given order. Duplicate ids beyond the first occurrence are
    /// discarded so the no-duplicate invariant holds.
    pub fn replace(&mut self, candidates: Vec<MatchCandidate>) {
        let mut seen: HashSet<String> = HashSet::with_capacity(candidates.len());
        let mut cards = VecDeque::with_capacity(candidates.len());

        for candidate in candidates {
            if seen.insert(candidate.id.clone()) {
                cards.push_back(candidate);
            } else {
                tracing::debug!("Discarding duplicate deck entry: {}", candidate.id);
            }
        }

        self.cards = cards;
    }

    /// The next candidate to review, if any. An empty deck is a normal
    /// terminal state, not an error.
    pub fn peek_top(&self) -> Option<&MatchCandidate> {
        self.cards.front()
    }

    /// Remove the front candidate. No-op on an empty deck, which guards
    /// against duplicate decision events popping two cards.
    pub fn pop_top(&mut self) {
        if self.cards.pop_front().is_none() {
            tracing::debug!("pop_top on empty deck ignored");
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining cards in review order, front first.
    pub fn iter(&self) -> impl Iterator<Item = &MatchCandidate> {
        self.cards.iter()
    }
}
