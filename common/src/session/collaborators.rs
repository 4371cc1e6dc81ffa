use std::time::Duration;

use crate::games::snake::{GameSnapshot, PowerUpKind};

/// Consumes one snapshot per engine mutation.
pub trait RenderSink {
    fn render(&mut self, snapshot: &GameSnapshot);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AudioCue {
    FoodEaten,
    PowerUpCollected(PowerUpKind),
    GameOver,
    RunStarted,
    RunStopped,
}

/// Fire-and-forget sound effects.
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

pub trait HighScoreStore {
    fn load_high_score(&self) -> Result<u32, String>;
    fn save_high_score(&self, score: u32) -> Result<(), String>;
}

/// Owner of the repeating tick timer.
pub trait TickScheduler {
    fn set_interval(&mut self, interval: Duration);
    fn suspend(&mut self);
    fn resume(&mut self);
}

/// Render sink for hosts without a display.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoRender;

impl RenderSink for NoRender {
    fn render(&mut self, _snapshot: &GameSnapshot) {}
}

/// Audio sink for hosts without sound.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silent;

impl AudioSink for Silent {
    fn play(&mut self, _cue: AudioCue) {}
}
