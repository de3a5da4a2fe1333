//! Session controller
//!
//! A [`Session`] is the single owner of all mutable game state. Timer firings
//! and player input both become [`Event`]s on one ordered queue, and the
//! queue is drained one event at a time. Nothing else touches the state.
//!
//! Lifecycle: `open` → Idle → `start` → Running → GameOver (lives or time) →
//! `start` again for a fully reset run. `stop`/`close` cancel every timer from
//! any state.

use std::collections::VecDeque;

use serde::Serialize;
use thiserror::Error;

use crate::scheduler::{Process, Scheduler};
use crate::settings::{InputSource, Settings};
use crate::sim::{
    Action, Effect, EndReason, GameState, Outcome, SessionState, SessionStatus, SimEvent, Target,
    TargetKind, TargetSet, step,
};
use crate::tuning::{Tuning, TuningError};

/// Cap on the per-session outcome log
pub const MAX_OUTCOME_LOG: usize = 1024;

/// Host callback receiving the coin reward
pub type RewardCallback = Box<dyn FnMut(u32)>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is closed")]
    Closed,
    #[error(transparent)]
    Tuning(#[from] TuningError),
}

/// Event kind carried on the queue
pub type EventKind = SimEvent;

/// A queued unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    /// Virtual time the event belongs to
    pub at_ms: u64,
    /// Run the event was produced for
    pub epoch: u64,
    pub kind: EventKind,
}

/// Why an event was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropReason {
    /// Session is Idle or GameOver
    NotRunning,
    /// Produced for an earlier run
    StaleEpoch,
    /// Key press with no binding
    UnboundKey,
}

/// Result of dispatching one event
#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    Applied(Vec<Outcome>),
    Dropped(DropReason),
}

impl Dispatch {
    pub fn outcomes(&self) -> &[Outcome] {
        match self {
            Dispatch::Applied(outcomes) => outcomes,
            Dispatch::Dropped(_) => &[],
        }
    }

    pub fn is_dropped(&self) -> bool {
        matches!(self, Dispatch::Dropped(_))
    }
}

/// Read-only view for a host renderer
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub now_ms: u64,
    pub session: SessionState,
    pub targets: Vec<Target>,
    pub effects: Vec<Effect>,
}

pub struct Session {
    tuning: Tuning,
    settings: Settings,
    state: GameState,
    scheduler: Scheduler,
    queue: VecDeque<Event>,
    /// Bumped on every start; events from older runs are dropped
    epoch: u64,
    on_reward: Option<RewardCallback>,
    closed: bool,
    outcomes: VecDeque<Outcome>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("status", &self.state.session.status)
            .field("epoch", &self.epoch)
            .field("now_ms", &self.scheduler.now_ms())
            .field("queued", &self.queue.len())
            .field("closed", &self.closed)
            .finish()
    }
}

impl Session {
    /// Open a session in the Idle state
    pub fn open(
        tuning: Tuning,
        settings: Settings,
        seed: u64,
        on_reward: impl FnMut(u32) + 'static,
    ) -> Result<Self, SessionError> {
        tuning.validate()?;
        let mut state = GameState::new(seed, &tuning);
        state.effects.set_enabled(settings.hit_effects);
        log::info!("Session opened (seed {})", seed);
        Ok(Self {
            tuning,
            settings,
            state,
            scheduler: Scheduler::new(),
            queue: VecDeque::new(),
            epoch: 0,
            on_reward: Some(Box::new(on_reward)),
            closed: false,
            outcomes: VecDeque::new(),
        })
    }

    // === Lifecycle ===

    /// Start a fresh run with the current seed
    pub fn start(&mut self) -> Result<(), SessionError> {
        self.restart(self.state.seed)
    }

    /// Start a fresh run with a new seed. Allowed from any state: everything
    /// is reinitialized and all four processes are (re)armed.
    ///
    /// A run still in progress first ends as [`EndReason::Aborted`], the same
    /// way [`Session::stop`] ends it.
    pub fn restart(&mut self, seed: u64) -> Result<(), SessionError> {
        if self.closed {
            return Err(SessionError::Closed);
        }
        self.scheduler.cancel_all();
        self.queue.clear();
        if self.state.session.is_running() {
            log::info!("Restart abandons the run in progress");
            self.finish(EndReason::Aborted);
        }
        self.epoch += 1;

        self.state.reset_for_run(seed, &self.tuning);
        self.state.now_ms = self.scheduler.now_ms();
        self.scheduler.start_all(&self.tuning);

        log::info!("Session started (seed {}, epoch {})", seed, self.epoch);
        Ok(())
    }

    /// Cancel every periodic process. Idempotent and callable from any state.
    ///
    /// A run still in progress ends as [`EndReason::Aborted`] without a reward.
    pub fn stop(&mut self) {
        self.scheduler.cancel_all();
        self.queue.clear();
        if self.state.session.is_running() {
            self.finish(EndReason::Aborted);
        }
    }

    /// Host teardown: stop and detach the reward callback
    pub fn close(&mut self) {
        self.stop();
        if !self.closed {
            self.closed = true;
            self.on_reward = None;
            log::info!("Session closed");
        }
    }

    // === Time and input ===

    /// Advance virtual time by `dt_ms` and process everything that came due
    pub fn advance(&mut self, dt_ms: u64) -> Vec<Outcome> {
        let target = self.scheduler.now_ms().saturating_add(dt_ms);
        self.advance_to(target)
    }

    /// Advance virtual time to `now_ms` and process everything that came due.
    ///
    /// Each firing is dispatched before the next one is popped, so a run that
    /// ends part way through stops the loop and nothing past GameOver is queued.
    pub fn advance_to(&mut self, now_ms: u64) -> Vec<Outcome> {
        let mut outcomes = self.pump();
        while self.state.session.is_running() {
            let Some((at_ms, process)) = self.scheduler.pop_due(now_ms) else {
                break;
            };
            self.enqueue(at_ms, process.event());
            outcomes.append(&mut self.pump());
        }
        self.scheduler.set_now(now_ms);
        outcomes
    }

    /// Player action at the current time
    pub fn resolve(&mut self, action: Action) -> Dispatch {
        self.dispatch_now(SimEvent::Input(action))
    }

    /// Key or on-screen control
    pub fn handle_input(&mut self, source: InputSource) -> Dispatch {
        match self.settings.action_for(source) {
            Some(action) => self.resolve(action),
            None => Dispatch::Dropped(DropReason::UnboundKey),
        }
    }

    /// Queue an event for the current run at the current time and process it
    /// (along with anything queued before it)
    pub fn dispatch_now(&mut self, kind: EventKind) -> Dispatch {
        let event = Event {
            at_ms: self.scheduler.now_ms(),
            epoch: self.epoch,
            kind,
        };
        self.pump();
        self.dispatch(event)
    }

    /// Append an event to the queue without processing it
    pub fn post(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Drain the queue in order
    pub fn pump(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(event) = self.queue.pop_front() {
            if let Dispatch::Applied(mut applied) = self.dispatch(event) {
                outcomes.append(&mut applied);
            }
        }
        outcomes
    }

    fn enqueue(&mut self, at_ms: u64, kind: EventKind) {
        self.queue.push_back(Event {
            at_ms,
            epoch: self.epoch,
            kind,
        });
    }

    /// Apply one event if, and only if, it belongs to the current run and the
    /// run is still going.
    fn dispatch(&mut self, event: Event) -> Dispatch {
        if event.epoch != self.epoch {
            log::trace!("Dropping {:?} from epoch {}", event.kind, event.epoch);
            return Dispatch::Dropped(DropReason::StaleEpoch);
        }
        if !self.state.session.is_running() {
            log::trace!("Dropping {:?}: session not running", event.kind);
            return Dispatch::Dropped(DropReason::NotRunning);
        }

        self.state.now_ms = self.state.now_ms.max(event.at_ms);
        let result = step(&mut self.state, event.kind, &self.tuning);
        let mut outcomes = result.outcomes;
        if let Some(reason) = result.ended {
            outcomes.push(self.finish(reason));
        }
        self.record(&outcomes);
        Dispatch::Applied(outcomes)
    }

    /// Enter GameOver, cancel timers, pay the reward once
    fn finish(&mut self, reason: EndReason) -> Outcome {
        self.scheduler.cancel_all();
        let session = &mut self.state.session;
        session.status = SessionStatus::GameOver;
        session.end_reason = Some(reason);

        if reason.pays_reward() && session.reward.is_none() {
            let reward = session.compute_reward(&self.tuning);
            session.reward = Some(reward);
            match self.on_reward.as_mut() {
                Some(callback) => callback(reward),
                None => log::warn!("Reward of {} earned with no callback attached", reward),
            }
        }

        let session = &self.state.session;
        log::info!(
            "Game over ({:?}): score {}, hits {}, reward {:?}",
            reason,
            session.score,
            session.hit_count,
            session.reward
        );
        let outcome = Outcome::GameOver {
            reason,
            reward: session.reward,
        };
        if reason == EndReason::Aborted {
            self.record(std::slice::from_ref(&outcome));
        }
        outcome
    }

    fn record(&mut self, outcomes: &[Outcome]) {
        for outcome in outcomes {
            if self.outcomes.len() == MAX_OUTCOME_LOG {
                self.outcomes.pop_front();
            }
            self.outcomes.push_back(outcome.clone());
        }
    }

    // === Host / test helpers ===

    /// Place a target directly (tutorials, tests). Only while Running.
    pub fn inject_target(&mut self, action: Action, kind: TargetKind, position: f32) -> Option<u32> {
        if !self.state.session.is_running() {
            return None;
        }
        Some(
            self.state
                .targets
                .insert(action, kind, position, &self.tuning),
        )
    }

    pub fn state(&self) -> &SessionState {
        &self.state.session
    }

    pub fn status(&self) -> SessionStatus {
        self.state.session.status
    }

    pub fn targets(&self) -> &TargetSet {
        &self.state.targets
    }

    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        self.state.effects.iter()
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Outcomes since the session was opened, oldest first (bounded)
    pub fn outcomes(&self) -> impl Iterator<Item = &Outcome> {
        self.outcomes.iter()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of armed periodic processes
    pub fn active_processes(&self) -> usize {
        self.scheduler.active_count()
    }

    pub fn is_process_active(&self, process: Process) -> bool {
        self.scheduler.is_active(process)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            now_ms: self.scheduler.now_ms(),
            session: self.state.session.clone(),
            targets: self.state.targets.iter().cloned().collect(),
            effects: self.state.effects.iter().cloned().collect(),
        }
    }
}
