use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

use crate::log;
use super::collaborators::{AudioSink, HighScoreStore, RenderSink};
use super::command::SessionCommand;
use super::scheduler::IntervalScheduler;
use super::snake_session::SnakeSession;

fn tick_timer(period: Duration) -> Interval {
    let mut timer = interval_at(Instant::now() + period, period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    timer
}

/// Owns the session and serializes every mutation through one task: timer ticks and
/// commands are handled strictly one at a time. Returns the session once the command
/// channel closes or `Shutdown` arrives.
pub async fn run_tick_loop<R, A, H>(
    mut session: SnakeSession<R, A, H, IntervalScheduler>,
    mut command_rx: mpsc::UnboundedReceiver<SessionCommand>,
) -> SnakeSession<R, A, H, IntervalScheduler>
where
    R: RenderSink,
    A: AudioSink,
    H: HighScoreStore,
{
    let mut applied = session.scheduler().schedule();
    let mut applied_run = session.game_state().run_id();
    let mut timer = tick_timer(applied.interval);
    let mut last_tick = Instant::now();

    loop {
        tokio::select! {
            _ = timer.tick(), if !applied.suspended => {
                let now = Instant::now();
                session.advance_time(now.duration_since(last_tick));
                last_tick = now;
                session.tick();
            }
            command = command_rx.recv() => {
                match command {
                    None | Some(SessionCommand::Shutdown) => break,
                    Some(command) => {
                        // Running time since the last tick belongs to the run the command finds.
                        if !applied.suspended {
                            let now = Instant::now();
                            session.advance_time(now.duration_since(last_tick));
                            last_tick = now;
                        }
                        session.handle(command);
                    }
                }
            }
        }

        let schedule = session.scheduler().schedule();
        let run_id = session.game_state().run_id();
        if !schedule.suspended && (applied.suspended || run_id != applied_run) {
            // Paused time and time of a replaced run must not count towards timers.
            last_tick = Instant::now();
            timer = tick_timer(schedule.interval);
        } else if schedule.interval != applied.interval {
            timer = tick_timer(schedule.interval);
        }
        applied = schedule;
        applied_run = run_id;
    }

    log!("Tick loop stopped at score {}", session.game_state().score);
    session
}
