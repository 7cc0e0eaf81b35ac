//! Haptic/audio feedback collaborators
//!
//! The simulation core only talks to the `Feedback` trait. Backends are
//! fire-and-forget: nothing is queued, and `Throttled` drops any event that
//! repeats within `MIN_FEEDBACK_INTERVAL_SECS` of its previous firing.

use std::cell::RefCell;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::platform::Clock;

/// Minimum spacing between two firings of the same event
pub const MIN_FEEDBACK_INTERVAL_SECS: f64 = 0.018;

/// Impact strength
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImpactLevel {
    Light,
    Medium,
    Heavy,
}

/// Feedback notification types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeedbackEvent {
    Tap,
    SelectionChanged,
    Impact(ImpactLevel),
    Success,
    Warning,
    Error,
}

impl FeedbackEvent {
    const SLOTS: usize = 8;

    /// Stable index for per-event bookkeeping
    fn slot(&self) -> usize {
        match self {
            FeedbackEvent::Tap => 0,
            FeedbackEvent::SelectionChanged => 1,
            FeedbackEvent::Impact(ImpactLevel::Light) => 2,
            FeedbackEvent::Impact(ImpactLevel::Medium) => 3,
            FeedbackEvent::Impact(ImpactLevel::Heavy) => 4,
            FeedbackEvent::Success => 5,
            FeedbackEvent::Warning => 6,
            FeedbackEvent::Error => 7,
        }
    }
}

/// Feedback capability injected into the match controller
pub trait Feedback {
    fn emit(&mut self, event: FeedbackEvent);

    /// Global toggle; backends without one ignore it
    fn set_enabled(&mut self, _enabled: bool) {}

    fn tap(&mut self) {
        self.emit(FeedbackEvent::Tap);
    }

    fn selection_changed(&mut self) {
        self.emit(FeedbackEvent::SelectionChanged);
    }

    fn impact(&mut self, level: ImpactLevel) {
        self.emit(FeedbackEvent::Impact(level));
    }

    fn success(&mut self) {
        self.emit(FeedbackEvent::Success);
    }

    fn warning(&mut self) {
        self.emit(FeedbackEvent::Warning);
    }

    fn error(&mut self) {
        self.emit(FeedbackEvent::Error);
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullFeedback;

impl Feedback for NullFeedback {
    fn emit(&mut self, _event: FeedbackEvent) {}
}

/// Writes events to the log (headless runs)
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFeedback;

impl Feedback for LogFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        log::debug!("feedback: {:?}", event);
    }
}

/// Records events in order. Clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct RecordingFeedback {
    events: Rc<RefCell<Vec<FeedbackEvent>>>,
}

impl RecordingFeedback {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<FeedbackEvent> {
        self.events.borrow().clone()
    }

    pub fn count(&self, event: FeedbackEvent) -> usize {
        self.events.borrow().iter().filter(|e| **e == event).count()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Feedback for RecordingFeedback {
    fn emit(&mut self, event: FeedbackEvent) {
        self.events.borrow_mut().push(event);
    }
}

/// Rate limiter and on/off switch in front of another backend
pub struct Throttled<F, C> {
    inner: F,
    clock: C,
    enabled: bool,
    last_fired: [Option<f64>; FeedbackEvent::SLOTS],
}

impl<F: Feedback, C: Clock> Throttled<F, C> {
    pub fn new(inner: F, clock: C) -> Self {
        Self {
            inner,
            clock,
            enabled: true,
            last_fired: [None; FeedbackEvent::SLOTS],
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn inner(&self) -> &F {
        &self.inner
    }
}

impl<F: Feedback, C: Clock> Feedback for Throttled<F, C> {
    fn emit(&mut self, event: FeedbackEvent) {
        if !self.enabled {
            return;
        }
        let now = self.clock.now_secs();
        let slot = &mut self.last_fired[event.slot()];
        if slot.is_some_and(|last| now - last < MIN_FEEDBACK_INTERVAL_SECS) {
            return;
        }
        *slot = Some(now);
        self.inner.emit(event);
    }

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }
}
