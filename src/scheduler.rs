//! Periodic processes on a virtual clock
//!
//! The scheduler owns no game state. It only tells the session which timer
//! fires next, in strict time order. Firings due at the same instant come
//! out in registration order (movement, spawn, countdown, effect sweep).

use serde::{Deserialize, Serialize};

use crate::sim::SimEvent;
use crate::tuning::Tuning;

/// The four periodic processes, in registration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Process {
    Movement,
    Spawn,
    Countdown,
    EffectSweep,
}

impl Process {
    pub const ALL: [Process; 4] = [
        Process::Movement,
        Process::Spawn,
        Process::Countdown,
        Process::EffectSweep,
    ];

    /// Event this process feeds into the session queue
    pub fn event(self) -> SimEvent {
        match self {
            Process::Movement => SimEvent::Move,
            Process::Spawn => SimEvent::Spawn,
            Process::Countdown => SimEvent::Countdown,
            Process::EffectSweep => SimEvent::SweepEffects,
        }
    }

    pub fn period_ms(self, tuning: &Tuning) -> u64 {
        match self {
            Process::Movement => tuning.movement_interval_ms,
            Process::Spawn => tuning.spawn_interval_ms,
            Process::Countdown => tuning.countdown_interval_ms,
            Process::EffectSweep => tuning.effect_sweep_interval_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Timer {
    process: Process,
    period_ms: u64,
    next_due_ms: u64,
}

/// Virtual clock plus the set of armed timers
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    pub fn is_active(&self, process: Process) -> bool {
        self.timers.iter().any(|t| t.process == process)
    }

    /// Arm all four processes; each first fires one period from now.
    /// Re-arming replaces any existing timers. A process whose first firing
    /// would land past the end of the clock stays disarmed.
    pub fn start_all(&mut self, tuning: &Tuning) {
        let now_ms = self.now_ms;
        self.timers = Process::ALL
            .iter()
            .filter_map(|&process| {
                let period_ms = process.period_ms(tuning).max(1);
                let Some(next_due_ms) = now_ms.checked_add(period_ms) else {
                    log::warn!("{:?} not armed: clock exhausted at {}", process, now_ms);
                    return None;
                };
                Some(Timer {
                    process,
                    period_ms,
                    next_due_ms,
                })
            })
            .collect();
    }

    /// Disarm everything. Safe to call repeatedly.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    /// Pop the earliest firing due at or before `until_ms`, rescheduling its
    /// timer. The clock moves to the firing time.
    ///
    /// A timer whose next firing would run past the end of the clock is
    /// disarmed after this firing.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<(u64, Process)> {
        // min_by_key keeps the first minimum, i.e. registration order on ties
        let index = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.next_due_ms <= until_ms)
            .min_by_key(|(_, t)| t.next_due_ms)
            .map(|(i, _)| i)?;

        let timer = &mut self.timers[index];
        let at = timer.next_due_ms;
        let process = timer.process;
        match at.checked_add(timer.period_ms) {
            Some(next) => timer.next_due_ms = next,
            None => {
                log::debug!("{:?} timer ran out of clock at {}", process, at);
                self.timers.remove(index);
            }
        }
        self.now_ms = self.now_ms.max(at);
        Some((at, process))
    }

    /// Move the clock forward (never backward)
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }
}
