// SPDX-License-Identifier: PMPL-1.0-or-later

//! Core type definitions for embed-shell

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Connection state of the embedded application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbedState {
    #[default]
    Connecting,
    Connected,
    Failed,
}

impl EmbedState {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmbedState::Connecting => "connecting",
            EmbedState::Connected => "connected",
            EmbedState::Failed => "failed",
        }
    }

    /// Translation key for the status label.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            EmbedState::Connecting => "status.connecting",
            EmbedState::Connected => "status.connected",
            EmbedState::Failed => "status.failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, EmbedState::Connecting)
    }
}

impl fmt::Display for EmbedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a cycle ended in [`EmbedState::Failed`].
///
/// Missing translations are not part of this taxonomy: they are recovered
/// inside the catalog and only ever show up as a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The frame reported an error, or rendered with a zero-sized box.
    LoadBlocked,
    /// No signal arrived before the load timeout elapsed.
    LoadTimedOut,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::LoadBlocked => f.write_str("load blocked"),
            FailureReason::LoadTimedOut => f.write_str("load timed out"),
        }
    }
}

/// One effective state change, stamped with the controller clock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    pub cycle: u64,
    pub from: EmbedState,
    pub to: EmbedState,
    pub reason: Option<FailureReason>,
    pub at_ms: u64,
}

impl Transition {
    pub fn at(&self) -> Duration {
        Duration::from_millis(self.at_ms)
    }
}

/// Rendered box of the embedded frame, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct FrameRect {
    pub width: f64,
    pub height: f64,
}

impl FrameRect {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Blocked or collapsed frames usually render with one zero side.
    pub fn is_collapsed(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }
}

/// A host signal fed to the controller at a given offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalKind {
    Load,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedSignal {
    pub kind: SignalKind,
    pub at_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_connecting_is_non_terminal() {
        assert!(!EmbedState::Connecting.is_terminal());
        assert!(EmbedState::Connected.is_terminal());
        assert!(EmbedState::Failed.is_terminal());
    }

    #[test]
    fn collapsed_when_either_side_is_zero() {
        assert!(FrameRect::new(0.0, 600.0).is_collapsed());
        assert!(FrameRect::new(800.0, 0.0).is_collapsed());
        assert!(!FrameRect::new(800.0, 600.0).is_collapsed());
    }

    #[test]
    fn state_serializes_lowercase() {
        let json = serde_json::to_string(&EmbedState::Connected).unwrap();
        assert_eq!(json, "\"connected\"");
    }
}
