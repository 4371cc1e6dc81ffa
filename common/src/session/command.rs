use crate::games::snake::{Difficulty, Direction};

/// Input delivered to a running session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    Direction(Direction),
    Start,
    Restart,
    Reset,
    Pause,
    Resume,
    TogglePause,
    SelectDifficulty(Difficulty),
    Shutdown,
}
