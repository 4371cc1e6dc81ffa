use std::time::Duration;

use super::types::{Point, PowerUpKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeferredEffect {
    ExpirePowerUp(PowerUpKind),
    DespawnPowerUp(Point),
}

#[derive(Clone, Debug)]
struct ScheduledEffect {
    deadline: Duration,
    run_id: u64,
    effect: DeferredEffect,
}

/// Effects due at a point on the engine clock. Each entry remembers the run it was
/// scheduled in so the caller can drop anything left over from an earlier run.
#[derive(Clone, Debug, Default)]
pub struct DeferredEffects {
    entries: Vec<ScheduledEffect>,
}

impl DeferredEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `effect`, replacing any pending entry for the same effect.
    pub fn schedule(&mut self, deadline: Duration, run_id: u64, effect: DeferredEffect) {
        self.cancel(effect);
        self.entries.push(ScheduledEffect {
            deadline,
            run_id,
            effect,
        });
    }

    pub fn cancel(&mut self, effect: DeferredEffect) {
        self.entries.retain(|entry| entry.effect != effect);
    }

    pub fn deadline_of(&self, effect: DeferredEffect) -> Option<Duration> {
        self.entries
            .iter()
            .find(|entry| entry.effect == effect)
            .map(|entry| entry.deadline)
    }

    /// Removes and returns every entry due at `now`, earliest deadline first.
    pub fn take_due(&mut self, now: Duration) -> Vec<(u64, DeferredEffect)> {
        let (mut due, pending): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| entry.deadline <= now);
        self.entries = pending;

        due.sort_by_key(|entry| entry.deadline);
        due.into_iter()
            .map(|entry| (entry.run_id, entry.effect))
            .collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
