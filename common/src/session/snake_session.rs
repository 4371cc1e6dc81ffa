use std::time::Duration;

use crate::log;
use crate::games::snake::{Difficulty, Direction, GameEvent, GamePhase, SnakeGameState};
use super::collaborators::{AudioCue, AudioSink, HighScoreStore, RenderSink, TickScheduler};
use super::command::SessionCommand;
use super::scheduler::IntervalScheduler;

/// Binds one engine to its render, audio, high-score and scheduling collaborators.
pub struct SnakeSession<R, A, H, S = IntervalScheduler>
where
    R: RenderSink,
    A: AudioSink,
    H: HighScoreStore,
    S: TickScheduler,
{
    game_state: SnakeGameState,
    render_sink: R,
    audio_sink: A,
    high_score_store: H,
    scheduler: S,
    high_score: u32,
}

impl<R, A, H, S> SnakeSession<R, A, H, S>
where
    R: RenderSink,
    A: AudioSink,
    H: HighScoreStore,
    S: TickScheduler,
{
    pub fn new(
        game_state: SnakeGameState,
        render_sink: R,
        audio_sink: A,
        high_score_store: H,
        mut scheduler: S,
    ) -> Self {
        let high_score = match high_score_store.load_high_score() {
            Ok(score) => score,
            Err(e) => {
                log!("Failed to load high score: {}", e);
                0
            }
        };

        scheduler.set_interval(game_state.tick_interval());
        if game_state.phase == GamePhase::Running {
            scheduler.resume();
        } else {
            scheduler.suspend();
        }

        let mut session = Self {
            game_state,
            render_sink,
            audio_sink,
            high_score_store,
            scheduler,
            high_score,
        };
        session.render();
        session
    }

    pub fn game_state(&self) -> &SnakeGameState {
        &self.game_state
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn render_sink(&self) -> &R {
        &self.render_sink
    }

    pub fn audio_sink(&self) -> &A {
        &self.audio_sink
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Direction(direction) => self.set_direction(direction),
            SessionCommand::Start => self.start(),
            SessionCommand::Restart => self.restart(),
            SessionCommand::Reset => self.reset(),
            SessionCommand::Pause => self.pause(),
            SessionCommand::Resume => self.resume(),
            SessionCommand::TogglePause => self.toggle_pause(),
            SessionCommand::SelectDifficulty(difficulty) => self.select_difficulty(difficulty),
            SessionCommand::Shutdown => {}
        }
    }

    pub fn start(&mut self) {
        if self.game_state.start() {
            self.on_run_started();
        }
        self.render();
    }

    pub fn restart(&mut self) {
        self.game_state.restart();
        self.on_run_started();
        self.render();
    }

    pub fn reset(&mut self) {
        let was_active = self.is_active();
        self.game_state.reset();
        self.scheduler.suspend();
        self.scheduler.set_interval(self.game_state.tick_interval());
        if was_active {
            self.audio_sink.play(AudioCue::RunStopped);
        }
        self.render();
    }

    pub fn pause(&mut self) {
        if self.game_state.pause() {
            self.scheduler.suspend();
            self.audio_sink.play(AudioCue::RunStopped);
            self.render();
        }
    }

    pub fn resume(&mut self) {
        if self.game_state.resume() {
            self.scheduler.resume();
            self.audio_sink.play(AudioCue::RunStarted);
            self.render();
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.game_state.phase {
            GamePhase::Running => self.pause(),
            GamePhase::Paused => self.resume(),
            GamePhase::Idle | GamePhase::Over => {}
        }
    }

    pub fn select_difficulty(&mut self, difficulty: Difficulty) {
        if self.game_state.select_difficulty(difficulty) {
            self.scheduler.set_interval(self.game_state.tick_interval());
            self.render();
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.game_state.set_direction(direction);
    }

    pub fn tick(&mut self) {
        let events = self.game_state.tick();
        self.dispatch(&events);
        self.render();
    }

    pub fn advance_time(&mut self, elapsed: Duration) {
        let events = self.game_state.advance_time(elapsed);
        if !events.is_empty() {
            self.dispatch(&events);
            self.render();
        }
    }

    fn is_active(&self) -> bool {
        matches!(self.game_state.phase, GamePhase::Running | GamePhase::Paused)
    }

    fn on_run_started(&mut self) {
        self.scheduler.set_interval(self.game_state.tick_interval());
        self.scheduler.resume();
        self.audio_sink.play(AudioCue::RunStarted);
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::FoodEaten { .. } => self.audio_sink.play(AudioCue::FoodEaten),
                GameEvent::PowerUpCollected(kind) => {
                    self.audio_sink.play(AudioCue::PowerUpCollected(*kind))
                }
                GameEvent::SpeedChanged { interval } => self.scheduler.set_interval(*interval),
                GameEvent::GameOver(_) => {
                    self.scheduler.suspend();
                    self.audio_sink.play(AudioCue::GameOver);
                    self.record_high_score();
                }
                GameEvent::LevelUp { .. }
                | GameEvent::PowerUpSpawned(_)
                | GameEvent::PowerUpExpired(_)
                | GameEvent::PowerUpDespawned(_) => {}
            }
        }
    }

    fn record_high_score(&mut self) {
        let score = self.game_state.score;
        if score <= self.high_score {
            return;
        }
        self.high_score = score;
        match self.high_score_store.save_high_score(score) {
            Ok(()) => log!("New high score: {}", score),
            Err(e) => log!("Failed to save high score {}: {}", score, e),
        }
    }

    fn render(&mut self) {
        let snapshot = self.game_state.snapshot(self.high_score);
        self.render_sink.render(&snapshot);
    }
}
