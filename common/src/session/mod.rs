mod collaborators;
mod command;
mod scheduler;
mod snake_session;
mod tick_loop;

pub use collaborators::{AudioCue, AudioSink, HighScoreStore, NoRender, RenderSink, Silent, TickScheduler};
pub use command::SessionCommand;
pub use scheduler::{IntervalScheduler, Schedule};
pub use snake_session::SnakeSession;
pub use tick_loop::run_tick_loop;
