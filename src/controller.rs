// SPDX-License-Identifier: PMPL-1.0-or-later

//! Embed-status controller: turns frame signals and delayed checks into one
//! visible outcome per cycle.
//!
//! Four detectors race for the cycle: the settle check after a load event,
//! an error event, the timeout guard, and the zero-size blocking heuristic.
//! Each checks both status flags before acting. Every timer is tagged with
//! the cycle that scheduled it, and [`EmbedController::reset`] cancels the
//! previous cycle's timers, so nothing stale can touch a fresh cycle.

use crate::status::EmbedStatus;
use crate::timeline::{TimerId, Timeline};
use crate::types::{EmbedState, FailureReason, Transition};
use crate::view::{EmbedView, FrameProbe};
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1500);

/// Delays used by one detection cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionSettings {
    pub settle_delay: Duration,
    pub load_timeout: Duration,
    pub detection_delay: Duration,
}

impl Default for DetectionSettings {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            load_timeout: Duration::from_millis(5000),
            detection_delay: Duration::from_millis(2000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    Settle,
    Timeout,
    Blocking,
}

#[derive(Debug, Clone, Copy)]
struct PendingCheck {
    cycle: u64,
    check: Check,
}

pub struct EmbedController<V: EmbedView, P: FrameProbe> {
    status: EmbedStatus,
    settings: DetectionSettings,
    timeline: Timeline<PendingCheck>,
    outstanding: Vec<TimerId>,
    cycle: u64,
    transitions: Vec<Transition>,
    view: V,
    probe: P,
}

impl<V: EmbedView, P: FrameProbe> EmbedController<V, P> {
    /// Build a controller in `Connecting` and arm the timeout guard and the
    /// blocking heuristic for the first cycle.
    pub fn new(settings: DetectionSettings, view: V, probe: P) -> Self {
        Self::starting_at(Duration::ZERO, settings, view, probe)
    }

    /// Like [`EmbedController::new`], with the clock already at `now`. The
    /// first cycle's checks are measured from there.
    pub fn starting_at(now: Duration, settings: DetectionSettings, view: V, probe: P) -> Self {
        let mut timeline = Timeline::new();
        timeline.set_now(now);
        let mut controller = Self {
            status: EmbedStatus::new(),
            settings,
            timeline,
            outstanding: Vec::new(),
            cycle: 0,
            transitions: Vec::new(),
            view,
            probe,
        };
        controller.view.set_status(EmbedState::Connecting);
        controller.arm_cycle();
        controller
    }

    pub fn status(&self) -> &EmbedStatus {
        &self.status
    }

    pub fn state(&self) -> EmbedState {
        self.status.state()
    }

    pub fn settings(&self) -> DetectionSettings {
        self.settings
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn now(&self) -> Duration {
        self.timeline.now()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Deadline of the next pending check, if any.
    pub fn next_deadline(&mut self) -> Option<Duration> {
        self.timeline.next_deadline()
    }

    /// The frame's load event fired. Confirmation waits for the settle delay
    /// so redirects and blocked pages have time to show themselves.
    pub fn report_load_event(&mut self) {
        debug!(cycle = self.cycle, "frame load event");
        self.schedule(self.settings.settle_delay, Check::Settle);
    }

    /// The frame's error event fired. Falls back immediately.
    pub fn report_error_event(&mut self) {
        warn!(cycle = self.cycle, "frame error event");
        self.transition_to_fallback(FailureReason::LoadBlocked);
    }

    /// Arm a guard that falls back if nothing has decided the cycle by then.
    pub fn run_timeout_guard(&mut self, timeout: Duration) {
        self.schedule(timeout, Check::Timeout);
    }

    /// Arm a check of the frame's rendered size after `delay`.
    pub fn run_blocking_heuristic(&mut self, delay: Duration) {
        self.schedule(delay, Check::Blocking);
    }

    /// Show fallback content. Returns false when the cycle was already decided.
    pub fn transition_to_fallback(&mut self, reason: FailureReason) -> bool {
        let Some(from) = self.status.fall_back(reason) else {
            return false;
        };
        info!(cycle = self.cycle, %reason, "showing fallback content");
        self.view.hide_loading();
        self.view.hide_frame();
        self.view.show_fallback();
        self.view.set_status(EmbedState::Failed);
        self.record(from, Some(reason));
        true
    }

    /// Show the embedded frame. Returns false when the cycle was already decided.
    pub fn transition_to_connected(&mut self) -> bool {
        let Some(from) = self.status.confirm_loaded() else {
            return false;
        };
        info!(cycle = self.cycle, "showing embedded frame");
        self.view.hide_loading();
        self.view.hide_fallback();
        self.view.set_status(EmbedState::Connected);
        self.view.reveal_status_bar();
        self.record(from, None);
        true
    }

    /// Start a fresh cycle pointed at `embed_url`.
    pub fn reset(&mut self, embed_url: &str) {
        for id in self.outstanding.drain(..) {
            self.timeline.cancel(id);
        }
        let from = self.status.reset();
        self.cycle += 1;
        info!(cycle = self.cycle, url = embed_url, "restarting embed detection");

        self.view.point_frame(embed_url);
        self.view.set_status(EmbedState::Connecting);
        self.view.show_loading();
        self.view.hide_fallback();
        self.view.show_frame();
        if from != EmbedState::Connecting {
            self.record(from, None);
        }
        self.arm_cycle();
    }

    /// Move the clock forward by `elapsed`, firing every check that falls due.
    pub fn advance(&mut self, elapsed: Duration) {
        let target = self.timeline.now() + elapsed;
        self.advance_to(target);
    }

    pub fn advance_to(&mut self, at: Duration) {
        while let Some((id, pending)) = self.timeline.pop_due(at) {
            self.outstanding.retain(|outstanding| *outstanding != id);
            self.fire(pending);
        }
        self.timeline.set_now(at);
    }

    /// Fire checks until none are pending. Every check is one-shot, so this
    /// always terminates.
    pub fn run_until_settled(&mut self) {
        while let Some(deadline) = self.timeline.next_deadline() {
            self.advance_to(deadline);
        }
    }

    fn arm_cycle(&mut self) {
        self.run_timeout_guard(self.settings.load_timeout);
        self.run_blocking_heuristic(self.settings.detection_delay);
    }

    fn schedule(&mut self, delay: Duration, check: Check) {
        let id = self.timeline.schedule(
            delay,
            PendingCheck {
                cycle: self.cycle,
                check,
            },
        );
        self.outstanding.push(id);
    }

    fn fire(&mut self, pending: PendingCheck) {
        if pending.cycle != self.cycle {
            debug!(stale = pending.cycle, current = self.cycle, "dropping stale check");
            return;
        }
        if !self.status.is_undecided() {
            return;
        }
        match pending.check {
            Check::Settle => {
                self.transition_to_connected();
            }
            Check::Timeout => {
                warn!(cycle = self.cycle, "load timeout elapsed");
                self.transition_to_fallback(FailureReason::LoadTimedOut);
            }
            Check::Blocking => match self.probe.rendered_size() {
                Some(rect) if !rect.is_collapsed() => {
                    debug!(width = rect.width, height = rect.height, "frame has a rendered box");
                }
                rect => {
                    warn!(?rect, "frame has zero dimensions, likely blocked");
                    self.transition_to_fallback(FailureReason::LoadBlocked);
                }
            },
        }
    }

    fn record(&mut self, from: EmbedState, reason: Option<FailureReason>) {
        self.transitions.push(Transition {
            cycle: self.cycle,
            from,
            to: self.status.state(),
            reason,
            at_ms: self.timeline.now().as_millis() as u64,
        });
    }
}
