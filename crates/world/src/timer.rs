//! Explicit timed continuations.
//!
//! Delayed effects (damage tint revert, eating, spawn intervals) are plain
//! countdown state advanced by the frame loop. A continuation that has been
//! started cannot be cancelled: it always fires once its time has elapsed.

use serde::{Deserialize, Serialize};

/// Single-shot countdown in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    remaining: f32,
    fired: bool,
}

impl Countdown {
    /// Start a countdown of `seconds`.
    pub fn new(seconds: f32) -> Self {
        Self {
            remaining: seconds.max(0.0),
            fired: false,
        }
    }

    /// Advance by `dt`, returning `true` on the tick the countdown completes.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.fired {
            return false;
        }
        self.remaining = (self.remaining - dt).max(0.0);
        if self.remaining <= 0.0 {
            self.fired = true;
            return true;
        }
        false
    }

    /// Seconds left before the countdown fires.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Whether the countdown has already fired.
    pub fn is_done(&self) -> bool {
        self.fired
    }
}

/// Pending actions that resolve after their own delay.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Continuations<A> {
    pending: Vec<(Countdown, A)>,
}

impl<A> Continuations<A> {
    /// Empty set.
    pub fn new() -> Self {
        Self {
            pending: Vec::new(),
        }
    }

    /// Schedule `action` to complete after `seconds`.
    pub fn start(&mut self, seconds: f32, action: A) {
        self.pending.push((Countdown::new(seconds), action));
    }

    /// Advance every continuation and return the actions that completed, in start order.
    pub fn tick(&mut self, dt: f32) -> Vec<A> {
        let mut completed = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for (mut countdown, action) in self.pending.drain(..) {
            if countdown.tick(dt) {
                completed.push(action);
            } else {
                still_pending.push((countdown, action));
            }
        }
        self.pending = still_pending;
        completed
    }

    /// Number of continuations still waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Whether any waiting continuation carries `action`.
    pub fn contains(&self, action: &A) -> bool
    where
        A: PartialEq,
    {
        self.pending.iter().any(|(_, pending)| pending == action)
    }
}
