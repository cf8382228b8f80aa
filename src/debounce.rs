//! Debouncing for rapid filter changes.
//!
//! The clock is passed in by the caller, so the quiet-period logic is
//! deterministic and testable without sleeping. Only the most recent
//! submitted value is ever released; superseded values are dropped.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<(T, Instant)>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Debouncer { delay, pending: None }
    }

    /// Queue a value, superseding any pending one and restarting the quiet
    /// period from `now`.
    pub fn submit(&mut self, value: T, now: Instant) {
        self.pending = Some((value, now + self.delay));
    }

    /// Release the pending value once its quiet period has elapsed. Returns
    /// the value at most once.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some((_, deadline)) if now >= *deadline => {
                self.pending.take().map(|(value, _)| value)
            }
            _ => None,
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// A debounced filter slot: the currently active config plus the pending one.
/// UI code calls `update` on every control change and `tick` on its frame or
/// timer loop; aggregation only runs when `tick` reports a new activation.
#[derive(Debug)]
pub struct FilterSession<T> {
    debouncer: Debouncer<T>,
    active: T,
}

impl<T: Clone> FilterSession<T> {
    pub fn new(initial: T, delay: Duration) -> Self {
        FilterSession {
            debouncer: Debouncer::new(delay),
            active: initial,
        }
    }

    pub fn update(&mut self, config: T, now: Instant) {
        self.debouncer.submit(config, now);
    }

    /// Promote the pending config if its quiet period has elapsed. Returns
    /// `true` exactly when the active config changed owners this tick.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(config) => {
                self.active = config;
                true
            }
            None => false,
        }
    }

    pub fn active(&self) -> &T {
        &self.active
    }
}
