mod config;
mod state;
mod ui;

use clap::{Parser, ValueEnum};
use eframe::egui;
use std::path::PathBuf;
use tokio::sync::mpsc;
use snake_common::config::Validate;
use snake_common::games::SessionRng;
use snake_common::games::snake::{Difficulty, SnakeGameState};
use snake_common::high_score::FileHighScoreStore;
use snake_common::session::{IntervalScheduler, SnakeSession, run_tick_loop};
use snake_common::{log, logger};

use config::{get_config_store, ClientConfig};
use state::{EventLogAudio, SharedRender, SharedState};
use ui::SnakeApp;

#[derive(Clone, Copy, ValueEnum)]
enum DifficultyArg {
    Easy,
    Normal,
    Hard,
}

impl From<DifficultyArg> for Difficulty {
    fn from(value: DifficultyArg) -> Self {
        match value {
            DifficultyArg::Easy => Difficulty::Easy,
            DifficultyArg::Normal => Difficulty::Normal,
            DifficultyArg::Hard => Difficulty::Hard,
        }
    }
}

#[derive(Parser)]
#[command(name = "snake_desktop_client")]
#[command(version, about = "Single-player grid snake")]
struct Args {
    /// Config file; defaults to snake_client_config.yaml next to the executable
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the configured difficulty
    #[arg(long)]
    difficulty: Option<DifficultyArg>,

    /// Enables timed mode with this many seconds per run
    #[arg(long)]
    time_limit_secs: Option<u64>,

    #[arg(long)]
    use_log_prefix: bool,
}

/// Applies command-line overrides and validates the result again.
fn apply_overrides(mut config: ClientConfig, args: &Args) -> Result<ClientConfig, String> {
    if let Some(difficulty) = args.difficulty {
        config.game.difficulty = difficulty.into();
        config.game.custom_profile = None;
    }
    if let Some(secs) = args.time_limit_secs {
        config.game.time_limit_ms = Some(secs.saturating_mul(1000));
    }
    config
        .validate()
        .map_err(|e| format!("Invalid command-line override: {}", e))?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Client".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_store = get_config_store(args.config.clone());
    let config = apply_overrides(config_store.load_or_create()?, &args)?;

    let shared_state = SharedState::new(config.event_log_size);
    let (command_tx, command_rx) = mpsc::unbounded_channel();

    let game_state = SnakeGameState::new(config.game.clone(), SessionRng::from_random());
    let interval = game_state.tick_interval();
    let session = SnakeSession::new(
        game_state,
        SharedRender::new(shared_state.clone()),
        EventLogAudio::new(shared_state.clone()),
        FileHighScoreStore::from_file(config.high_score_file.clone()),
        IntervalScheduler::new(interval),
    );

    let loop_handle = std::thread::spawn(move || {
        let rt = match tokio::runtime::Runtime::new() {
            Ok(rt) => rt,
            Err(e) => {
                log!("Failed to start tokio runtime: {}", e);
                return;
            }
        };
        let session = rt.block_on(run_tick_loop(session, command_rx));
        log!("Session closed, high score {}", session.high_score());
    });

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title("Snake"),
        ..Default::default()
    };

    let app_state = shared_state.clone();
    let app_tx = command_tx.clone();
    let max_cell_size = config.window.max_cell_size;
    eframe::run_native(
        "Snake",
        options,
        Box::new(move |cc| {
            app_state.set_repaint_context(cc.egui_ctx.clone());
            Ok(Box::new(SnakeApp::new(app_state, app_tx, max_cell_size)))
        }),
    )?;

    let _ = command_tx.send(snake_common::session::SessionCommand::Shutdown);
    if loop_handle.join().is_err() {
        log!("Tick loop thread panicked");
    }

    Ok(())
}
