use std::time::Duration;

use super::types::{Direction, GameOverReason, GamePhase, Point, PowerUp, PowerUpKind};

/// Owned, read-only view of one engine state, handed to render sinks.
#[derive(Clone, Debug, PartialEq)]
pub struct GameSnapshot {
    pub tile_count: u32,
    /// Head first.
    pub snake: Vec<Point>,
    pub heading: Option<Direction>,
    pub food: Option<Point>,
    pub obstacles: Vec<Point>,
    pub power_ups: Vec<PowerUp>,
    pub score: u32,
    pub level: u32,
    pub high_score: u32,
    pub time_remaining: Option<Duration>,
    /// Active kinds with the time left on each.
    pub active_power_ups: Vec<(PowerUpKind, Duration)>,
    pub phase: GamePhase,
    pub game_over_reason: Option<GameOverReason>,
    pub tick_interval: Duration,
}

impl GameSnapshot {
    pub fn head(&self) -> Option<Point> {
        self.snake.first().copied()
    }

    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.iter().any(|(active, _)| *active == kind)
    }
}
