use crate::models::Decision;

/// Drag displacement required to convert a gesture into a decision,
/// applied symmetrically in both directions.
pub const DEFAULT_COMMIT_THRESHOLD: f64 = 100.0;

/// Phase of the current gesture. `Dragging` is presentation-only; the
/// decision is evaluated exactly once, at release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Idle,
    Dragging,
}

/// Maps a continuous one-dimensional drag to a discrete decision.
///
/// Offset updates while dragging drive visuals only. At release the final
/// offset is compared against the commit threshold: past `+T` accepts,
/// past `-T` rejects, anything in between leaves the deck untouched and
/// returns the card to rest.
///
/// After a commit the committer disarms itself so a straggling callback
/// from the same physical gesture cannot produce a second decision; the
/// owner rearms it when the next candidate becomes top.
#[derive(Debug, Clone)]
pub struct GestureCommitter {
    threshold: f64,
    phase: GesturePhase,
    offset: f64,
    armed: bool,
}

impl GestureCommitter {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.abs(),
            phase: GesturePhase::Idle,
            offset: 0.0,
            armed: true,
        }
    }

    /// Begin a drag. Refused while disarmed or already dragging.
    pub fn drag_start(&mut self) -> bool {
        if !self.armed || self.phase != GesturePhase::Idle {
            return false;
        }
        self.phase = GesturePhase::Dragging;
        self.offset = 0.0;
        true
    }

    /// Update the live offset. Purely presentational: never commits,
    /// ignored outside a drag.
    pub fn drag_move(&mut self, offset: f64) {
        if self.phase == GesturePhase::Dragging {
            self.offset = offset;
        }
    }

    /// End the gesture and evaluate the commit threshold once against the
    /// final offset. `None` means undecided: no deck mutation follows and
    /// the card returns to rest.
    pub fn drag_end(&mut self) -> Option<Decision> {
        if self.phase != GesturePhase::Dragging {
            return None;
        }

        let offset = self.offset;
        self.phase = GesturePhase::Idle;
        self.offset = 0.0;

        let decision = if offset > self.threshold {
            Some(Decision::Accept)
        } else if offset < -self.threshold {
            Some(Decision::Reject)
        } else {
            None
        };

        if let Some(decision) = decision {
            // Disarm until the next candidate becomes top
            self.armed = false;
            tracing::debug!("Gesture committed at offset {:.1}: {:?}", offset, decision);
        }

        decision
    }

    /// Allow the next gesture once a new candidate is top.
    pub fn rearm(&mut self) {
        self.armed = true;
    }

    /// Abandon any in-progress gesture and rearm. Called when the deck is
    /// replaced under the user's finger.
    pub fn reset(&mut self) {
        self.phase = GesturePhase::Idle;
        self.offset = 0.0;
        self.armed = true;
    }

    pub fn phase(&self) -> GesturePhase {
        self.phase
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Card rotation in degrees for the live offset, clamped at +/-18
    /// once the drag passes twice the commit threshold.
    pub fn rotation(&self) -> f64 {
        let limit = self.threshold * 2.0;
        let clamped = self.offset.clamp(-limit, limit);
        clamped / limit * 18.0
    }

    /// Opacity of the (reject, accept) direction overlays for the live
    /// offset. Each fades in between 20% and 150% of the threshold on its
    /// own side.
    pub fn overlay_opacity(&self) -> (f64, f64) {
        let fade_start = self.threshold * 0.2;
        let fade_full = self.threshold * 1.5;
        let span = fade_full - fade_start;

        let fade = |distance: f64| ((distance - fade_start) / span).clamp(0.0, 1.0);

        let reject = if self.offset < 0.0 { fade(-self.offset) } else { 0.0 };
        let accept = if self.offset > 0.0 { fade(self.offset) } else { 0.0 };

        (reject, accept)
    }
}

impl Default for GestureCommitter {
    fn default() -> Self {
        Self::new(DEFAULT_COMMIT_THRESHOLD)
    }
}
