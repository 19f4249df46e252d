// src/selector.rs
//
// Picks the closest-in-path vehicle among the in-lane candidates and
// carries the previous frame's choice across calls. The selector only
// computes indices; flag mutation on the caller's objects happens in
// the apply_selection adapter.

use tracing::debug;

use crate::types::TrackedObject;

/// Outcome of one selection round: the new winner and, when the winner
/// changed, the previous winner to demote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub winner: Option<usize>,
    pub demoted: Option<usize>,
}

/// Frame-to-frame CIPV chooser.
///
/// Owns the previous-winner state explicitly so every camera instance
/// gets independent hysteresis and tests can reset it.
#[derive(Debug, Default)]
pub struct CipvSelector {
    previous_winner: Option<usize>,
}

impl CipvSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Choose among `candidates`, each an object index with its forward
    /// ground distance, listed in input order.
    ///
    /// The longitudinally nearest candidate wins; ties keep the first
    /// one encountered. A frame without candidates leaves the previous
    /// winner's flag (and the retained state) untouched, so a transient
    /// one-frame loss of containment does not clear CIPV status.
    pub fn select(&mut self, candidates: &[(usize, f32)]) -> Selection {
        let mut best: Option<(usize, f32)> = None;
        for &(index, forward_x) in candidates {
            match best {
                Some((_, best_x)) if forward_x >= best_x => {}
                _ => best = Some((index, forward_x)),
            }
        }

        match best {
            Some((winner, _)) => {
                let demoted = match self.previous_winner {
                    Some(previous) if previous != winner => Some(previous),
                    _ => None,
                };
                self.previous_winner = Some(winner);
                Selection {
                    winner: Some(winner),
                    demoted,
                }
            }
            None => {
                debug!("no CIPV candidate this frame");
                Selection {
                    winner: None,
                    demoted: None,
                }
            }
        }
    }

    pub fn previous_winner(&self) -> Option<usize> {
        self.previous_winner
    }

    pub fn reset(&mut self) {
        self.previous_winner = None;
    }
}

/// Apply a selection to the caller-owned object collection.
///
/// Clears the demoted object's flag before setting the winner's, so at
/// most one object carries the flag afterwards. Setting the same winner
/// twice is idempotent.
pub fn apply_selection(objects: &mut [TrackedObject], selection: &Selection) {
    if let Some(winner) = selection.winner {
        if let Some(demoted) = selection.demoted {
            if let Some(object) = objects.get_mut(demoted) {
                object.is_cipv = false;
            }
        }
        if let Some(object) = objects.get_mut(winner) {
            object.is_cipv = true;
        }
    }
}
