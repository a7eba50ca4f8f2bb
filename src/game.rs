//! Frame driver
//!
//! Owns everything a host needs between frames: the simulation state, the
//! frame clock, queued input and the best-score store. The host calls
//! [`Game::frame`] once per animation frame.

use serde::{Deserialize, Serialize};

use crate::best_score::{BestScore, ScoreStore};
use crate::renderer::{RenderDispatcher, RenderFrame};
use crate::sim::{FrameClock, GameEvent, GamePhase, GameState, InputEvent, Outcome, tick};
use crate::tuning::{Tuning, TuningError};

/// End-of-run report for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub outcome: Outcome,
    pub coins: u32,
    /// Best score after this run was recorded
    pub best: u32,
    pub new_record: bool,
    pub elapsed_secs: f32,
}

/// Game instance holding all state
pub struct Game<S: ScoreStore> {
    pub state: GameState,
    clock: FrameClock,
    pending: Vec<InputEvent>,
    store: S,
    last_summary: Option<RunSummary>,
}

impl<S: ScoreStore> Game<S> {
    /// Fails if `tuning` does not pass [`Tuning::validate`]
    pub fn new(seed: u64, tuning: Tuning, store: S) -> Result<Self, TuningError> {
        Ok(Self {
            state: GameState::with_tuning(seed, tuning)?,
            clock: FrameClock::new(),
            pending: Vec::new(),
            store,
            last_summary: None,
        })
    }

    /// Queue an input for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.pending.push(event);
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    /// Summary of the most recent finished run (cleared on restart)
    pub fn last_summary(&self) -> Option<&RunSummary> {
        self.last_summary.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run one frame at `now_ms`. Returns the events raised this frame.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        // The clock advances even while paused
        let dt = self.clock.delta(now_ms);
        let inputs = std::mem::take(&mut self.pending);
        tick(&mut self.state, &inputs, dt);

        let events = self.state.drain_events();
        for event in &events {
            match *event {
                GameEvent::RunEnded {
                    outcome,
                    coins,
                    elapsed_secs,
                } => self.finish_run(outcome, coins, elapsed_secs),
                GameEvent::Restarted => self.last_summary = None,
                _ => {}
            }
        }
        events
    }

    /// Run a frame and hand the snapshot to a dispatcher
    pub fn frame_and_draw(
        &mut self,
        now_ms: f64,
        aspect: f32,
        dispatcher: &mut impl RenderDispatcher,
    ) -> Vec<GameEvent> {
        let events = self.frame(now_ms);
        dispatcher.dispatch(&RenderFrame::capture(&self.state, aspect));
        events
    }

    /// Compare against the stored best and persist a new record
    fn finish_run(&mut self, outcome: Outcome, coins: u32, elapsed_secs: f32) {
        let mut best = BestScore::load(&self.store);
        let new_record = best.record(coins);
        if new_record {
            best.save(&mut self.store);
        }
        self.last_summary = Some(RunSummary {
            outcome,
            coins,
            best: best.coins,
            new_record,
            elapsed_secs,
        });
    }
}
