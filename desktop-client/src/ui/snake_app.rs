use eframe::egui;
use std::time::Duration;
use tokio::sync::mpsc;
use snake_common::games::snake::{
    Difficulty, Direction, GameOverReason, GamePhase, GameSnapshot,
};
use snake_common::session::SessionCommand;

use crate::state::SharedState;
use super::board::{cell_size_for, render_board};
use super::colors;

pub struct SnakeApp {
    shared_state: SharedState,
    command_tx: mpsc::UnboundedSender<SessionCommand>,
    max_cell_size: f32,
}

impl SnakeApp {
    pub fn new(
        shared_state: SharedState,
        command_tx: mpsc::UnboundedSender<SessionCommand>,
        max_cell_size: f32,
    ) -> Self {
        Self {
            shared_state,
            command_tx,
            max_cell_size,
        }
    }

    fn send(&self, command: SessionCommand) {
        let _ = self.command_tx.send(command);
    }

    fn handle_input(&self, ctx: &egui::Context, snapshot: &GameSnapshot) {
        let direction = ctx.input(|i| {
            if i.key_pressed(egui::Key::ArrowUp) || i.key_pressed(egui::Key::W) {
                Some(Direction::Up)
            } else if i.key_pressed(egui::Key::ArrowDown) || i.key_pressed(egui::Key::S) {
                Some(Direction::Down)
            } else if i.key_pressed(egui::Key::ArrowLeft) || i.key_pressed(egui::Key::A) {
                Some(Direction::Left)
            } else if i.key_pressed(egui::Key::ArrowRight) || i.key_pressed(egui::Key::D) {
                Some(Direction::Right)
            } else {
                None
            }
        });
        if let Some(direction) = direction {
            self.send(SessionCommand::Direction(direction));
        }

        let (space, enter, reset, difficulty) = ctx.input(|i| {
            let difficulty = if i.key_pressed(egui::Key::Num1) {
                Some(Difficulty::Easy)
            } else if i.key_pressed(egui::Key::Num2) {
                Some(Difficulty::Normal)
            } else if i.key_pressed(egui::Key::Num3) {
                Some(Difficulty::Hard)
            } else {
                None
            };
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::Enter),
                i.key_pressed(egui::Key::R),
                difficulty,
            )
        });

        if space {
            self.send(SessionCommand::TogglePause);
        }
        if enter {
            match snapshot.phase {
                GamePhase::Idle => self.send(SessionCommand::Start),
                GamePhase::Over => self.send(SessionCommand::Restart),
                GamePhase::Running | GamePhase::Paused => {}
            }
        }
        if reset {
            self.send(SessionCommand::Reset);
        }
        if let Some(difficulty) = difficulty {
            self.send(SessionCommand::SelectDifficulty(difficulty));
        }
    }

    fn render_status(&self, ui: &mut egui::Ui, snapshot: &GameSnapshot) {
        ui.horizontal(|ui| {
            ui.heading(format!("Score: {}", snapshot.score));
            ui.separator();
            ui.label(format!("Level: {}", snapshot.level));
            ui.separator();
            ui.label(format!("High score: {}", snapshot.high_score));
            if let Some(remaining) = snapshot.time_remaining {
                ui.separator();
                ui.label(format_remaining("Time", remaining));
            }
        });

        ui.horizontal(|ui| {
            ui.label(format!("Tick: {} ms", snapshot.tick_interval.as_millis()));
            for (kind, remaining) in &snapshot.active_power_ups {
                ui.separator();
                ui.label(
                    egui::RichText::new(format_remaining(kind.label(), *remaining))
                        .color(colors::power_up_color(*kind)),
                );
            }
        });
    }

    fn render_phase_banner(&self, ui: &mut egui::Ui, snapshot: &GameSnapshot) {
        match snapshot.phase {
            GamePhase::Idle => {
                ui.label("Press Enter to start. 1/2/3 select Easy/Normal/Hard.");
            }
            GamePhase::Running => {
                ui.label("Arrow keys or WASD to steer, Space to pause, R to reset.");
            }
            GamePhase::Paused => {
                ui.label(
                    egui::RichText::new("Paused")
                        .color(egui::Color32::YELLOW)
                        .size(24.0),
                );
            }
            GamePhase::Over => {
                let reason = snapshot
                    .game_over_reason
                    .map(describe_reason)
                    .unwrap_or("Game over");
                ui.label(
                    egui::RichText::new(format!("Game Over: {}", reason))
                        .color(egui::Color32::RED)
                        .size(24.0),
                );
                ui.label("Press Enter to play again.");
            }
        }
    }

    fn render_event_log(&self, ui: &mut egui::Ui) {
        egui::ScrollArea::vertical()
            .id_salt("event_log_scroll")
            .max_height(120.0)
            .show(ui, |ui| {
                for event in self.shared_state.get_events() {
                    ui.label(event);
                }
            });
    }
}

fn format_remaining(label: &str, remaining: Duration) -> String {
    format!("{}: {:.1}s", label, remaining.as_secs_f32())
}

fn describe_reason(reason: GameOverReason) -> &'static str {
    match reason {
        GameOverReason::WallCollision => "hit the wall",
        GameOverReason::SelfCollision => "ran into itself",
        GameOverReason::ObstacleCollision => "hit an obstacle",
        GameOverReason::TimeUp => "time is up",
    }
}

impl eframe::App for SnakeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let Some(snapshot) = self.shared_state.get_snapshot() else {
                ui.centered_and_justified(|ui| {
                    ui.label("Waiting for game state...");
                });
                return;
            };

            self.handle_input(ctx, &snapshot);

            ui.vertical_centered(|ui| {
                self.render_status(ui, &snapshot);
                ui.add_space(8.0);

                let available = ui.available_size() - egui::vec2(0.0, 180.0);
                let cell_size = cell_size_for(available, snapshot.tile_count, self.max_cell_size);
                render_board(ui, &snapshot, cell_size);

                ui.add_space(8.0);
                self.render_phase_banner(ui, &snapshot);
                ui.separator();
                self.render_event_log(ui);
            });
        });
    }
}
