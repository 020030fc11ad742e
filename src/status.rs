// SPDX-License-Identifier: PMPL-1.0-or-later

//! Pure embed-status state machine.
//!
//! ```text
//! Connecting --confirm_loaded--> Connected
//! Connecting --fall_back-------> Failed
//! Connected | Failed --reset---> Connecting
//! ```
//!
//! Both terminal transitions check both flags first, so whichever detector
//! gets there first wins and every later one is a no-op.

use crate::types::{EmbedState, FailureReason};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EmbedStatus {
    state: EmbedState,
    loaded: bool,
    fallback_shown: bool,
    failure: Option<FailureReason>,
}

impl EmbedStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EmbedState {
        self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_fallback_shown(&self) -> bool {
        self.fallback_shown
    }

    pub fn failure(&self) -> Option<FailureReason> {
        self.failure
    }

    /// True while no detector has claimed the current cycle.
    pub fn is_undecided(&self) -> bool {
        !self.loaded && !self.fallback_shown
    }

    /// Move to `Connected`. Returns the previous state when the move happened.
    pub fn confirm_loaded(&mut self) -> Option<EmbedState> {
        if !self.is_undecided() {
            return None;
        }
        let previous = self.state;
        self.loaded = true;
        self.state = EmbedState::Connected;
        Some(previous)
    }

    /// Move to `Failed`. At most once per cycle.
    pub fn fall_back(&mut self, reason: FailureReason) -> Option<EmbedState> {
        if !self.is_undecided() {
            return None;
        }
        let previous = self.state;
        self.fallback_shown = true;
        self.failure = Some(reason);
        self.state = EmbedState::Failed;
        Some(previous)
    }

    /// Clear both flags and start over in `Connecting`.
    pub fn reset(&mut self) -> EmbedState {
        let previous = self.state;
        *self = Self::default();
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_connecting_with_flags_clear() {
        let status = EmbedStatus::new();
        assert_eq!(status.state(), EmbedState::Connecting);
        assert!(status.is_undecided());
        assert_eq!(status.failure(), None);
    }

    #[test]
    fn fallback_is_at_most_once() {
        let mut status = EmbedStatus::new();
        assert_eq!(
            status.fall_back(FailureReason::LoadTimedOut),
            Some(EmbedState::Connecting)
        );
        assert_eq!(status.fall_back(FailureReason::LoadBlocked), None);
        assert_eq!(status.failure(), Some(FailureReason::LoadTimedOut));
    }

    #[test]
    fn load_after_fallback_is_ignored() {
        let mut status = EmbedStatus::new();
        status.fall_back(FailureReason::LoadBlocked);
        assert_eq!(status.confirm_loaded(), None);
        assert_eq!(status.state(), EmbedState::Failed);
        assert!(!status.is_loaded());
    }

    #[test]
    fn fallback_after_load_is_ignored() {
        let mut status = EmbedStatus::new();
        status.confirm_loaded();
        assert_eq!(status.fall_back(FailureReason::LoadBlocked), None);
        assert_eq!(status.state(), EmbedState::Connected);
        assert!(!status.is_fallback_shown());
    }

    #[test]
    fn reset_clears_everything() {
        let mut status = EmbedStatus::new();
        status.fall_back(FailureReason::LoadBlocked);
        assert_eq!(status.reset(), EmbedState::Failed);
        assert_eq!(status, EmbedStatus::new());
        assert!(status.confirm_loaded().is_some());
    }
}
