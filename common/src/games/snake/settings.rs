use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::Validate;
use super::types::Point;

pub const DEFAULT_TILE_COUNT: u32 = 20;
pub const DEFAULT_POINTS_PER_LEVEL: u32 = 5;
pub const DEFAULT_MIN_INTERVAL_MS: u64 = 50;
pub const DEFAULT_PLACEMENT_ATTEMPTS: u32 = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
}

/// Per-run speed, obstacle growth and time-bonus tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub initial_interval_ms: u64,
    pub interval_decrement_ms: u64,
    pub obstacles_per_level: u32,
    pub time_bonus_ms: u64,
}

impl DifficultyProfile {
    pub fn initial_interval(&self) -> Duration {
        Duration::from_millis(self.initial_interval_ms)
    }

    pub fn interval_decrement(&self) -> Duration {
        Duration::from_millis(self.interval_decrement_ms)
    }

    pub fn time_bonus(&self) -> Duration {
        Duration::from_millis(self.time_bonus_ms)
    }
}

impl Difficulty {
    pub fn profile(&self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                initial_interval_ms: 150,
                interval_decrement_ms: 2,
                obstacles_per_level: 1,
                time_bonus_ms: 3000,
            },
            Difficulty::Normal => DifficultyProfile {
                initial_interval_ms: 100,
                interval_decrement_ms: 3,
                obstacles_per_level: 2,
                time_bonus_ms: 2000,
            },
            Difficulty::Hard => DifficultyProfile {
                initial_interval_ms: 80,
                interval_decrement_ms: 4,
                obstacles_per_level: 3,
                time_bonus_ms: 1000,
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub tile_count: u32,
    pub start_position: Point,
    /// Food cell of a fresh run; randomly placed when `None`.
    pub initial_food: Option<Point>,
    pub difficulty: Difficulty,
    /// Overrides the `difficulty` preset when present.
    #[serde(default)]
    pub custom_profile: Option<DifficultyProfile>,
    /// Enables timed mode.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
    pub points_per_level: u32,
    pub min_interval_ms: u64,
    #[serde(default)]
    pub initial_obstacles: u32,
    pub max_power_ups: usize,
    pub power_up_spawn_probability: f32,
    pub power_up_duration_ms: u64,
    pub power_up_lifetime_ms: u64,
    pub placement_attempts: u32,
}

impl GameSettings {
    pub fn profile(&self) -> DifficultyProfile {
        self.custom_profile
            .clone()
            .unwrap_or_else(|| self.difficulty.profile())
    }

    pub fn tile_count(&self) -> i32 {
        self.tile_count as i32
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn power_up_duration(&self) -> Duration {
        Duration::from_millis(self.power_up_duration_ms)
    }

    pub fn power_up_lifetime(&self) -> Duration {
        Duration::from_millis(self.power_up_lifetime_ms)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            tile_count: DEFAULT_TILE_COUNT,
            start_position: Point::new(10, 10),
            initial_food: Some(Point::new(15, 15)),
            difficulty: Difficulty::Normal,
            custom_profile: None,
            time_limit_ms: None,
            points_per_level: DEFAULT_POINTS_PER_LEVEL,
            min_interval_ms: DEFAULT_MIN_INTERVAL_MS,
            initial_obstacles: 0,
            max_power_ups: 2,
            power_up_spawn_probability: 0.02,
            power_up_duration_ms: 10_000,
            power_up_lifetime_ms: 8_000,
            placement_attempts: DEFAULT_PLACEMENT_ATTEMPTS,
        }
    }
}

impl Validate for DifficultyProfile {
    fn validate(&self) -> Result<(), String> {
        if self.initial_interval_ms < 20 || self.initial_interval_ms > 2000 {
            return Err("initial_interval_ms must be between 20 and 2000".to_string());
        }
        if self.interval_decrement_ms > self.initial_interval_ms {
            return Err("interval_decrement_ms must not exceed initial_interval_ms".to_string());
        }
        if self.obstacles_per_level > 50 {
            return Err("obstacles_per_level must not exceed 50".to_string());
        }
        if self.time_bonus_ms > 60_000 {
            return Err("time_bonus_ms must not exceed 60000".to_string());
        }
        Ok(())
    }
}

impl Validate for GameSettings {
    fn validate(&self) -> Result<(), String> {
        if self.tile_count < 5 || self.tile_count > 100 {
            return Err("tile_count must be between 5 and 100".to_string());
        }
        let tile_count = self.tile_count();
        if !self.start_position.is_within(tile_count) {
            return Err("start_position must lie inside the grid".to_string());
        }
        if let Some(food) = self.initial_food {
            if !food.is_within(tile_count) {
                return Err("initial_food must lie inside the grid".to_string());
            }
            if food == self.start_position {
                return Err("initial_food must differ from start_position".to_string());
            }
        }

        let profile = self.profile();
        profile.validate()?;

        if self.min_interval_ms < 10 {
            return Err("min_interval_ms must be at least 10".to_string());
        }
        if self.min_interval_ms > profile.initial_interval_ms {
            return Err("min_interval_ms must not exceed the initial interval".to_string());
        }
        if self.points_per_level == 0 {
            return Err("points_per_level must be greater than 0".to_string());
        }
        if let Some(limit) = self.time_limit_ms
            && limit < 1000
        {
            return Err("time_limit_ms must be at least 1000".to_string());
        }
        let cells = (self.tile_count * self.tile_count) as usize;
        if self.initial_obstacles as usize + self.max_power_ups + 2 > cells {
            return Err("initial_obstacles and max_power_ups do not fit on the grid".to_string());
        }
        if self.max_power_ups > 10 {
            return Err("max_power_ups must not exceed 10".to_string());
        }
        if !(0.0..=1.0).contains(&self.power_up_spawn_probability) {
            return Err("power_up_spawn_probability must be between 0.0 and 1.0".to_string());
        }
        if self.power_up_duration_ms < 100 {
            return Err("power_up_duration_ms must be at least 100".to_string());
        }
        if self.power_up_lifetime_ms < 100 {
            return Err("power_up_lifetime_ms must be at least 100".to_string());
        }
        if self.placement_attempts == 0 {
            return Err("placement_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}
