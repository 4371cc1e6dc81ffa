use std::time::Duration;

use super::types::{GameOverReason, Point, PowerUp, PowerUpKind};

/// Things that happened during one `tick` or `advance_time` call.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    FoodEaten { position: Point, score: u32 },
    LevelUp { level: u32, obstacles_added: u32 },
    SpeedChanged { interval: Duration },
    PowerUpSpawned(PowerUp),
    PowerUpCollected(PowerUpKind),
    PowerUpExpired(PowerUpKind),
    PowerUpDespawned(PowerUp),
    GameOver(GameOverReason),
}
