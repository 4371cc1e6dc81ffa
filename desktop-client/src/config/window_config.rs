use serde::{Deserialize, Serialize};
use snake_common::config::Validate;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone, Copy)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
    /// Upper bound for one grid cell in pixels; the board shrinks to fit the window.
    pub max_cell_size: f32,
}

impl Validate for WindowConfig {
    fn validate(&self) -> Result<(), String> {
        if self.width < 200.0 || self.height < 200.0 {
            return Err(format!(
                "Window must be at least 200x200, got {}x{}",
                self.width, self.height
            ));
        }
        if self.max_cell_size < 4.0 || self.max_cell_size > 100.0 {
            return Err(format!(
                "Max cell size must be between 4 and 100, got {}",
                self.max_cell_size
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 760.0,
            max_cell_size: 28.0,
        }
    }
}
