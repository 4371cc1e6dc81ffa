mod effects;
mod events;
mod game_state;
mod placement;
mod settings;
mod snake;
mod snapshot;
mod types;

pub use effects::{DeferredEffect, DeferredEffects};
pub use events::GameEvent;
pub use game_state::SnakeGameState;
pub use placement::find_free_cell;
pub use settings::{Difficulty, DifficultyProfile, GameSettings};
pub use snake::Snake;
pub use snapshot::GameSnapshot;
pub use types::{Direction, GameOverReason, GamePhase, Point, PowerUp, PowerUpKind};
