// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Classification of reconcile wake-ups into create, update, resume and timer triggers.
//!
//! kube-runtime calls the reconciler for every watch event and every requeue without
//! saying why. The ledger remembers, per resource, the last generation a pass ran for
//! and when its refresh timer is next due, and turns each wake-up into either a
//! trigger or a wait.

use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Why a reconciliation pass runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The resource appeared while the controller was running
    Create,
    /// The resource's declared state changed
    Update,
    /// The resource existed before the controller started
    Resume,
    /// The periodic refresh timer fired
    Timer,
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Trigger::Create => "create",
            Trigger::Update => "update",
            Trigger::Resume => "resume",
            Trigger::Timer => "timer",
        };
        f.write_str(name)
    }
}

/// A fixed-interval timer whose first firing is one interval after registration
#[derive(Debug, Clone, Copy)]
pub struct TimerSchedule {
    interval: Duration,
    next_due: Instant,
}

impl TimerSchedule {
    pub fn register(now: Instant, interval: Duration) -> Self {
        Self {
            interval,
            next_due: now + interval,
        }
    }

    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next_due
    }

    /// Time left until the next firing, zero when due
    pub fn remaining(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    /// Record a firing at `now`; the next one is a full interval later
    pub fn fire(&mut self, now: Instant) {
        self.next_due = now + self.interval;
    }
}

/// What to do with a wake-up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Run a pass, then wake again after the given delay
    Run(Trigger, Duration),
    /// Nothing to do until the given delay has elapsed
    Wait(Duration),
}

#[derive(Debug)]
struct ResourceState {
    observed_generation: Option<i64>,
    timer: TimerSchedule,
}

/// Per-resource trigger memory
#[derive(Debug)]
pub struct TriggerLedger {
    interval: Duration,
    states: Mutex<HashMap<String, ResourceState>>,
}

impl TriggerLedger {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            states: Mutex::new(HashMap::new()),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Decide what a wake-up for resource `key` means.
    ///
    /// `existed_before_start` distinguishes resume from create on first sight.
    pub fn decide(
        &self,
        key: &str,
        generation: Option<i64>,
        existed_before_start: bool,
        now: Instant,
    ) -> Decision {
        let mut states = self.states.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(state) = states.get_mut(key) {
            if state.observed_generation != generation {
                state.observed_generation = generation;
                // One pass also covers a timer that came due at the same moment
                if state.timer.is_due(now) {
                    state.timer.fire(now);
                }
                return Decision::Run(Trigger::Update, state.timer.remaining(now));
            }

            if state.timer.is_due(now) {
                state.timer.fire(now);
                return Decision::Run(Trigger::Timer, state.timer.remaining(now));
            }

            return Decision::Wait(state.timer.remaining(now));
        }

        let timer = TimerSchedule::register(now, self.interval);
        states.insert(
            key.to_string(),
            ResourceState {
                observed_generation: generation,
                timer,
            },
        );
        let trigger = if existed_before_start {
            Trigger::Resume
        } else {
            Trigger::Create
        };
        Decision::Run(trigger, timer.remaining(now))
    }

    /// Forget a resource once it is deleted
    pub fn forget(&self, key: &str) {
        self.states
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(key);
    }

    pub fn tracked(&self) -> usize {
        self.states.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
