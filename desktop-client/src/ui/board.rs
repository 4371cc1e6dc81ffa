use eframe::egui;
use snake_common::games::snake::{GameSnapshot, Point, PowerUpKind};

use super::colors;

const GRID_LINE_WIDTH: f32 = 1.0;

fn cell_rect(origin: egui::Pos2, cell_size: f32, point: Point) -> egui::Rect {
    egui::Rect::from_min_size(
        egui::pos2(
            origin.x + point.x as f32 * cell_size,
            origin.y + point.y as f32 * cell_size,
        ),
        egui::vec2(cell_size, cell_size),
    )
}

pub fn cell_size_for(available: egui::Vec2, tile_count: u32, max_cell_size: f32) -> f32 {
    let tiles = tile_count.max(1) as f32;
    (available.x.min(available.y) / tiles).clamp(4.0, max_cell_size)
}

pub fn render_board(ui: &mut egui::Ui, snapshot: &GameSnapshot, cell_size: f32) {
    let board_size = cell_size * snapshot.tile_count as f32;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(board_size, board_size), egui::Sense::hover());
    let painter = ui.painter();

    painter.rect_filled(rect, 4.0, colors::BOARD_BACKGROUND);

    for i in 1..snapshot.tile_count {
        let offset = i as f32 * cell_size;
        let stroke = egui::Stroke::new(GRID_LINE_WIDTH, colors::GRID_LINE);
        painter.line_segment(
            [egui::pos2(rect.left() + offset, rect.top()), egui::pos2(rect.left() + offset, rect.bottom())],
            stroke,
        );
        painter.line_segment(
            [egui::pos2(rect.left(), rect.top() + offset), egui::pos2(rect.right(), rect.top() + offset)],
            stroke,
        );
    }

    let origin = rect.min;

    for obstacle in &snapshot.obstacles {
        painter.rect_filled(cell_rect(origin, cell_size, *obstacle).shrink(1.0), 2.0, colors::OBSTACLE);
    }

    if let Some(food) = snapshot.food {
        let food_rect = cell_rect(origin, cell_size, food);
        painter.circle_filled(food_rect.center(), cell_size * 0.38, colors::FOOD);
    }

    for power_up in &snapshot.power_ups {
        let power_up_rect = cell_rect(origin, cell_size, power_up.position);
        let color = colors::power_up_color(power_up.kind);
        painter.circle_filled(power_up_rect.center(), cell_size * 0.42, color);
        painter.circle_stroke(
            power_up_rect.center(),
            cell_size * 0.25,
            egui::Stroke::new(2.0, egui::Color32::WHITE),
        );
    }

    let body_color = if snapshot.is_power_up_active(PowerUpKind::Shield) {
        colors::SHIELDED_SNAKE
    } else {
        colors::SNAKE_BODY
    };
    for (index, segment) in snapshot.snake.iter().enumerate() {
        // The head can sit outside the grid after a wall hit.
        if !segment.is_within(snapshot.tile_count as i32) {
            continue;
        }
        let color = if index == 0 { colors::SNAKE_HEAD } else { body_color };
        painter.rect_filled(cell_rect(origin, cell_size, *segment).shrink(1.0), 3.0, color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_size_fits_smaller_side() {
        let size = cell_size_for(egui::vec2(600.0, 400.0), 20, 100.0);
        assert_eq!(size, 20.0);
    }

    #[test]
    fn test_cell_size_capped() {
        let size = cell_size_for(egui::vec2(2000.0, 2000.0), 20, 28.0);
        assert_eq!(size, 28.0);
    }

    #[test]
    fn test_cell_rect_position() {
        let rect = cell_rect(egui::pos2(10.0, 20.0), 5.0, Point::new(2, 3));
        assert_eq!(rect.min, egui::pos2(20.0, 35.0));
        assert_eq!(rect.max, egui::pos2(25.0, 40.0));
    }
}
