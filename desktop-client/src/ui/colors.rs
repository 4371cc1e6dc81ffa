use eframe::egui;
use snake_common::games::snake::PowerUpKind;

pub const BOARD_BACKGROUND: egui::Color32 = egui::Color32::from_rgb(24, 24, 28);
pub const GRID_LINE: egui::Color32 = egui::Color32::from_rgb(36, 36, 42);
pub const SNAKE_HEAD: egui::Color32 = egui::Color32::from_rgb(120, 220, 90);
pub const SNAKE_BODY: egui::Color32 = egui::Color32::from_rgb(70, 170, 60);
pub const SHIELDED_SNAKE: egui::Color32 = egui::Color32::from_rgb(90, 170, 230);
pub const FOOD: egui::Color32 = egui::Color32::from_rgb(230, 60, 60);
pub const OBSTACLE: egui::Color32 = egui::Color32::from_rgb(120, 120, 130);

pub fn power_up_color(kind: PowerUpKind) -> egui::Color32 {
    match kind {
        PowerUpKind::SpeedBoost => egui::Color32::from_rgb(250, 200, 40),
        PowerUpKind::Shield => egui::Color32::from_rgb(70, 150, 250),
        PowerUpKind::DoublePoints => egui::Color32::from_rgb(200, 90, 230),
    }
}
