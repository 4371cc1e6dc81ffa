use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::log;
use crate::games::SessionRng;
use super::effects::{DeferredEffect, DeferredEffects};
use super::events::GameEvent;
use super::placement::find_free_cell;
use super::settings::{Difficulty, DifficultyProfile, GameSettings};
use super::snake::Snake;
use super::snapshot::GameSnapshot;
use super::types::{Direction, GameOverReason, GamePhase, Point, PowerUp, PowerUpKind};

/// Authoritative simulation state of one single-player snake game.
///
/// The engine holds no timer. The host calls `tick` at `tick_interval()` and feeds
/// elapsed wall-clock time through `advance_time`, which drives timed mode and
/// power-up expiry.
#[derive(Clone, Debug)]
pub struct SnakeGameState {
    pub snake: Snake,
    pub food: Option<Point>,
    pub obstacles: HashSet<Point>,
    pub power_ups: Vec<PowerUp>,
    pub score: u32,
    pub level: u32,
    pub phase: GamePhase,
    pub game_over_reason: Option<GameOverReason>,
    settings: GameSettings,
    profile: DifficultyProfile,
    rng: SessionRng,
    base_interval: Duration,
    time_remaining: Option<Duration>,
    /// Kind -> deadline on `clock`.
    active_power_ups: HashMap<PowerUpKind, Duration>,
    effects: DeferredEffects,
    clock: Duration,
    run_id: u64,
}

impl SnakeGameState {
    pub fn new(settings: GameSettings, rng: SessionRng) -> Self {
        let profile = settings.profile();
        let mut state = Self {
            snake: Snake::new(settings.start_position),
            food: None,
            obstacles: HashSet::new(),
            power_ups: Vec::new(),
            score: 0,
            level: 1,
            phase: GamePhase::Idle,
            game_over_reason: None,
            base_interval: profile.initial_interval(),
            time_remaining: settings.time_limit(),
            active_power_ups: HashMap::new(),
            effects: DeferredEffects::new(),
            clock: Duration::ZERO,
            run_id: 0,
            settings,
            profile,
            rng,
        };
        state.begin_run();
        state
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn profile(&self) -> &DifficultyProfile {
        &self.profile
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.time_remaining
    }

    pub fn is_power_up_active(&self, kind: PowerUpKind) -> bool {
        self.active_power_ups.contains_key(&kind)
    }

    /// Permanent interval, shortened by every food eaten.
    pub fn base_interval(&self) -> Duration {
        self.base_interval
    }

    /// Interval the scheduler should tick at right now.
    pub fn tick_interval(&self) -> Duration {
        if self.is_power_up_active(PowerUpKind::SpeedBoost) {
            (self.base_interval / 2).max(self.settings.min_interval())
        } else {
            self.base_interval
        }
    }

    pub fn reset(&mut self) {
        self.begin_run();
        self.phase = GamePhase::Idle;
    }

    pub fn start(&mut self) -> bool {
        match self.phase {
            GamePhase::Idle | GamePhase::Over => {
                self.begin_run();
                self.phase = GamePhase::Running;
                log!("Run {} started ({:?})", self.run_id, self.settings.difficulty);
                true
            }
            GamePhase::Running | GamePhase::Paused => false,
        }
    }

    pub fn restart(&mut self) {
        self.begin_run();
        self.phase = GamePhase::Running;
        log!("Run {} restarted ({:?})", self.run_id, self.settings.difficulty);
    }

    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Paused;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Running;
        true
    }

    /// Switches the preset used by the next run. Refused mid-run.
    pub fn select_difficulty(&mut self, difficulty: Difficulty) -> bool {
        if matches!(self.phase, GamePhase::Running | GamePhase::Paused) {
            return false;
        }
        self.settings.difficulty = difficulty;
        self.settings.custom_profile = None;
        self.reset();
        true
    }

    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.phase != GamePhase::Running {
            return false;
        }
        self.snake.request_heading(direction)
    }

    pub fn tick(&mut self) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running {
            return events;
        }

        self.snake.apply_pending_heading();
        let Some(heading) = self.snake.heading else {
            return events;
        };

        let interval_before = self.tick_interval();
        let next_head = self.snake.head().step(heading);
        let ate = self.food == Some(next_head);
        let self_hit = self.snake.advance(next_head, ate);

        if ate {
            self.eat_food(next_head, &mut events);
        }
        self.collect_power_up(next_head, &mut events);

        if let Some(reason) = self.collision_at(next_head, self_hit) {
            self.finish(reason, &mut events);
            return events;
        }
        if self.time_remaining == Some(Duration::ZERO) {
            self.finish(GameOverReason::TimeUp, &mut events);
            return events;
        }

        self.maybe_spawn_power_up(&mut events);

        let interval = self.tick_interval();
        if interval != interval_before {
            events.push(GameEvent::SpeedChanged { interval });
        }
        events
    }

    /// Advances the engine clock. Paused and finished runs ignore time.
    pub fn advance_time(&mut self, elapsed: Duration) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if self.phase != GamePhase::Running {
            return events;
        }

        let interval_before = self.tick_interval();
        self.clock += elapsed;
        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining = remaining.saturating_sub(elapsed);
        }

        for (run_id, effect) in self.effects.take_due(self.clock) {
            self.apply_effect(run_id, effect, &mut events);
        }

        if self.time_remaining == Some(Duration::ZERO) {
            self.finish(GameOverReason::TimeUp, &mut events);
            return events;
        }

        let interval = self.tick_interval();
        if interval != interval_before {
            events.push(GameEvent::SpeedChanged { interval });
        }
        events
    }

    pub fn snapshot(&self, high_score: u32) -> GameSnapshot {
        let mut obstacles: Vec<Point> = self.obstacles.iter().copied().collect();
        obstacles.sort_by_key(|p| (p.y, p.x));

        let mut active_power_ups: Vec<(PowerUpKind, Duration)> = self
            .active_power_ups
            .iter()
            .map(|(kind, deadline)| (*kind, deadline.saturating_sub(self.clock)))
            .collect();
        active_power_ups.sort_by_key(|(kind, _)| *kind);

        GameSnapshot {
            tile_count: self.settings.tile_count,
            snake: self.snake.body.iter().copied().collect(),
            heading: self.snake.heading,
            food: self.food,
            obstacles,
            power_ups: self.power_ups.clone(),
            score: self.score,
            level: self.level,
            high_score: high_score.max(self.score),
            time_remaining: self.time_remaining,
            active_power_ups,
            phase: self.phase,
            game_over_reason: self.game_over_reason,
            tick_interval: self.tick_interval(),
        }
    }

    fn begin_run(&mut self) {
        self.run_id += 1;
        self.profile = self.settings.profile();
        self.snake = Snake::new(self.settings.start_position);
        self.food = None;
        self.obstacles.clear();
        self.power_ups.clear();
        self.score = 0;
        self.level = 1;
        self.game_over_reason = None;
        self.base_interval = self.profile.initial_interval();
        self.time_remaining = self.settings.time_limit();
        self.active_power_ups.clear();
        self.effects.clear();
        self.clock = Duration::ZERO;

        let initial_food = self.settings.initial_food;
        self.food = match initial_food {
            Some(food) if food.is_within(self.settings.tile_count()) && !self.snake.occupies(&food) => {
                Some(food)
            }
            _ => self.find_free_cell(),
        };

        for _ in 0..self.settings.initial_obstacles {
            match self.find_free_cell() {
                Some(cell) => {
                    self.obstacles.insert(cell);
                }
                None => break,
            }
        }
    }

    fn find_free_cell(&mut self) -> Option<Point> {
        let tile_count = self.settings.tile_count();
        let attempts = self.settings.placement_attempts;
        let snake = &self.snake;
        let obstacles = &self.obstacles;
        let power_ups = &self.power_ups;
        let food = self.food;

        find_free_cell(&mut self.rng, tile_count, attempts, |p| {
            snake.occupies(p)
                || obstacles.contains(p)
                || food == Some(*p)
                || power_ups.iter().any(|power_up| power_up.position == *p)
        })
    }

    fn eat_food(&mut self, position: Point, events: &mut Vec<GameEvent>) {
        let points = if self.is_power_up_active(PowerUpKind::DoublePoints) {
            2
        } else {
            1
        };
        let previous_score = self.score;
        self.score += points;

        self.food = None;
        self.food = self.find_free_cell();
        if self.food.is_none() {
            log!("No free cell left for food at score {}", self.score);
        }

        self.base_interval = self
            .base_interval
            .saturating_sub(self.profile.interval_decrement())
            .max(self.settings.min_interval());

        let time_bonus = self.profile.time_bonus();
        if let Some(remaining) = self.time_remaining.as_mut() {
            *remaining += time_bonus;
        }

        events.push(GameEvent::FoodEaten {
            position,
            score: self.score,
        });

        // A doubled score can step over a multiple, so count crossed thresholds.
        let per_level = self.settings.points_per_level;
        let levels_gained = self.score / per_level - previous_score / per_level;
        for _ in 0..levels_gained {
            self.level_up(events);
        }
    }

    fn level_up(&mut self, events: &mut Vec<GameEvent>) {
        self.level += 1;

        let mut added = 0;
        for _ in 0..self.profile.obstacles_per_level {
            let Some(cell) = self.find_free_cell() else {
                log!("No free cell left for obstacles on level {}", self.level);
                break;
            };
            self.obstacles.insert(cell);
            added += 1;
        }

        log!("Level {} reached, {} obstacles added", self.level, added);
        events.push(GameEvent::LevelUp {
            level: self.level,
            obstacles_added: added,
        });
    }

    fn collect_power_up(&mut self, head: Point, events: &mut Vec<GameEvent>) {
        let Some(index) = self.power_ups.iter().position(|p| p.position == head) else {
            return;
        };
        let power_up = self.power_ups.remove(index);
        self.effects
            .cancel(DeferredEffect::DespawnPowerUp(power_up.position));
        self.activate_power_up(power_up.kind);
        events.push(GameEvent::PowerUpCollected(power_up.kind));
    }

    /// Re-collecting an active kind pushes its deadline out instead of stacking.
    fn activate_power_up(&mut self, kind: PowerUpKind) {
        let deadline = self.clock + self.settings.power_up_duration();
        self.active_power_ups.insert(kind, deadline);
        self.effects
            .schedule(deadline, self.run_id, DeferredEffect::ExpirePowerUp(kind));
        log!("{} active until {:?}", kind.label(), deadline);
    }

    fn maybe_spawn_power_up(&mut self, events: &mut Vec<GameEvent>) {
        if self.power_ups.len() >= self.settings.max_power_ups
            || !self.rng.chance(self.settings.power_up_spawn_probability)
        {
            return;
        }
        let Some(kind) = self.rng.pick(&PowerUpKind::ALL) else {
            return;
        };
        let Some(position) = self.find_free_cell() else {
            return;
        };

        let power_up = PowerUp { position, kind };
        self.power_ups.push(power_up);
        self.effects.schedule(
            self.clock + self.settings.power_up_lifetime(),
            self.run_id,
            DeferredEffect::DespawnPowerUp(position),
        );
        events.push(GameEvent::PowerUpSpawned(power_up));
    }

    fn apply_effect(&mut self, run_id: u64, effect: DeferredEffect, events: &mut Vec<GameEvent>) {
        if run_id != self.run_id || self.phase != GamePhase::Running {
            log!("Dropping {:?} scheduled by run {}", effect, run_id);
            return;
        }

        match effect {
            DeferredEffect::ExpirePowerUp(kind) => {
                if self.active_power_ups.remove(&kind).is_some() {
                    log!("{} expired", kind.label());
                    events.push(GameEvent::PowerUpExpired(kind));
                }
            }
            DeferredEffect::DespawnPowerUp(position) => {
                if let Some(index) = self.power_ups.iter().position(|p| p.position == position) {
                    let power_up = self.power_ups.remove(index);
                    events.push(GameEvent::PowerUpDespawned(power_up));
                }
            }
        }
    }

    fn collision_at(&self, head: Point, self_hit: bool) -> Option<GameOverReason> {
        if !head.is_within(self.settings.tile_count()) {
            return Some(GameOverReason::WallCollision);
        }
        if self_hit {
            return Some(GameOverReason::SelfCollision);
        }
        if self.obstacles.contains(&head) && !self.is_power_up_active(PowerUpKind::Shield) {
            return Some(GameOverReason::ObstacleCollision);
        }
        None
    }

    fn finish(&mut self, reason: GameOverReason, events: &mut Vec<GameEvent>) {
        self.phase = GamePhase::Over;
        self.game_over_reason = Some(reason);
        log!(
            "Run {} over: {:?}, score {}, level {}",
            self.run_id,
            reason,
            self.score,
            self.level
        );
        events.push(GameEvent::GameOver(reason));
    }

    #[cfg(test)]
    fn place_power_up(&mut self, position: Point, kind: PowerUpKind) {
        self.power_ups.push(PowerUp { position, kind });
        self.effects.schedule(
            self.clock + self.settings.power_up_lifetime(),
            self.run_id,
            DeferredEffect::DespawnPowerUp(position),
        );
    }

    #[cfg(test)]
    fn set_snake(&mut self, body: &[(i32, i32)], heading: Direction) {
        let mut snake = Snake::new(Point::new(body[0].0, body[0].1));
        for &(x, y) in &body[1..] {
            snake.body.push_back(Point::new(x, y));
            snake.body_set.insert(Point::new(x, y));
        }
        snake.heading = Some(heading);
        self.snake = snake;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn test_settings() -> GameSettings {
        GameSettings {
            custom_profile: Some(DifficultyProfile {
                initial_interval_ms: 100,
                interval_decrement_ms: 5,
                obstacles_per_level: 2,
                time_bonus_ms: 2000,
            }),
            min_interval_ms: 20,
            power_up_spawn_probability: 0.0,
            ..GameSettings::default()
        }
    }

    fn running_state(settings: GameSettings) -> SnakeGameState {
        let mut state = SnakeGameState::new(settings, SessionRng::new(42));
        assert!(state.start());
        state
    }

    #[test]
    fn test_new_state_is_idle() {
        let state = SnakeGameState::new(test_settings(), SessionRng::new(42));
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.snake.head(), Point::new(10, 10));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.food, Some(Point::new(15, 15)));
        assert_eq!(state.level, 1);
        assert_eq!(state.tick_interval(), ms(100));
    }

    #[test]
    fn test_tick_and_direction_ignored_while_idle() {
        let mut state = SnakeGameState::new(test_settings(), SessionRng::new(42));
        assert!(!state.set_direction(Direction::Right));
        assert!(state.tick().is_empty());
        assert_eq!(state.snake.head(), Point::new(10, 10));
    }

    #[test]
    fn test_start_then_right_moves_head_one_cell() {
        let mut state = running_state(test_settings());
        assert!(state.set_direction(Direction::Right));
        state.tick();
        assert_eq!(state.snake.head(), Point::new(11, 10));
        assert_eq!(state.snake.len(), 1);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_without_heading_stays_put() {
        let mut state = running_state(test_settings());
        for _ in 0..5 {
            assert!(state.tick().is_empty());
        }
        assert_eq!(state.snake.head(), Point::new(10, 10));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_start_refused_while_running() {
        let mut state = running_state(test_settings());
        assert!(!state.start());
    }

    #[test]
    fn test_eating_food_scores_grows_and_speeds_up() {
        let mut state = running_state(test_settings());
        state.set_snake(&[(14, 15)], Direction::Right);

        let events = state.tick();

        assert_eq!(state.score, 1);
        assert_eq!(state.snake.len(), 2);
        assert_eq!(state.snake.head(), Point::new(15, 15));
        assert_eq!(state.base_interval(), ms(95));
        let food = state.food.unwrap();
        assert!(!state.snake.occupies(&food));
        assert!(!state.obstacles.contains(&food));
        assert!(events.contains(&GameEvent::FoodEaten {
            position: Point::new(15, 15),
            score: 1
        }));
        assert!(events.contains(&GameEvent::SpeedChanged { interval: ms(95) }));
    }

    #[test]
    fn test_double_points_scores_two() {
        let mut state = running_state(test_settings());
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.set_snake(&[(14, 15)], Direction::Right);
        state.tick();
        assert_eq!(state.score, 2);
    }

    #[test]
    fn test_interval_floored_at_minimum() {
        let mut state = running_state(test_settings());
        state.base_interval = ms(22);
        state.set_snake(&[(14, 15)], Direction::Right);
        state.tick();
        assert_eq!(state.base_interval(), ms(20));
    }

    #[test]
    fn test_level_up_every_five_points_adds_obstacles() {
        let mut state = running_state(test_settings());
        state.score = 4;
        state.set_snake(&[(14, 15)], Direction::Right);

        let events = state.tick();

        assert_eq!(state.score, 5);
        assert_eq!(state.level, 2);
        assert_eq!(state.obstacles.len(), 2);
        assert!(events.contains(&GameEvent::LevelUp {
            level: 2,
            obstacles_added: 2
        }));
        let food = state.food.unwrap();
        assert!(!state.obstacles.contains(&food));
        assert!(!state.obstacles.iter().any(|o| state.snake.occupies(o)));
    }

    #[test]
    fn test_double_points_stepping_over_threshold_still_levels_up() {
        let mut state = running_state(test_settings());
        state.score = 4;
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.set_snake(&[(14, 15)], Direction::Right);
        state.tick();
        assert_eq!(state.score, 6);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_wall_collision_ends_run_and_freezes_ticks() {
        let mut state = running_state(test_settings());
        state.set_snake(&[(19, 3)], Direction::Right);

        let events = state.tick();

        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(state.game_over_reason, Some(GameOverReason::WallCollision));
        assert!(events.contains(&GameEvent::GameOver(GameOverReason::WallCollision)));

        let frozen = state.snake.body.clone();
        assert!(state.tick().is_empty());
        assert!(state.advance_time(ms(5000)).is_empty());
        assert_eq!(state.snake.body, frozen);
    }

    #[test]
    fn test_self_collision() {
        let mut state = running_state(test_settings());
        state.set_snake(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)], Direction::Left);
        assert!(state.set_direction(Direction::Down));
        state.tick();
        assert_eq!(state.game_over_reason, Some(GameOverReason::SelfCollision));
    }

    #[test]
    fn test_following_own_tail_is_safe() {
        let mut state = running_state(test_settings());
        state.set_snake(&[(5, 5), (5, 6), (4, 6), (4, 5)], Direction::Up);
        assert!(state.set_direction(Direction::Left));
        state.tick();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.head(), Point::new(4, 5));
    }

    #[test]
    fn test_obstacle_without_shield_ends_run() {
        let mut state = running_state(test_settings());
        state.obstacles.insert(Point::new(11, 10));
        state.set_direction(Direction::Right);
        state.tick();
        assert_eq!(state.game_over_reason, Some(GameOverReason::ObstacleCollision));
    }

    #[test]
    fn test_obstacle_with_shield_keeps_running() {
        let mut state = running_state(test_settings());
        state.obstacles.insert(Point::new(11, 10));
        state.activate_power_up(PowerUpKind::Shield);
        state.set_direction(Direction::Right);
        state.tick();
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.snake.head(), Point::new(11, 10));
    }

    #[test]
    fn test_reversal_request_is_dropped() {
        let mut state = running_state(test_settings());
        state.set_snake(&[(5, 5), (4, 5)], Direction::Right);
        assert!(!state.set_direction(Direction::Left));
        state.tick();
        assert_eq!(state.snake.head(), Point::new(6, 5));
    }

    #[test]
    fn test_single_segment_cannot_reverse() {
        let mut state = running_state(test_settings());
        assert!(state.set_direction(Direction::Right));
        state.tick();
        assert!(!state.set_direction(Direction::Left));
        state.tick();
        assert_eq!(state.snake.head(), Point::new(12, 10));
        assert_eq!(state.snake.heading, Some(Direction::Right));
    }

    #[test]
    fn test_timed_mode_runs_out() {
        let mut state = running_state(GameSettings {
            time_limit_ms: Some(5000),
            ..test_settings()
        });
        assert!(state.advance_time(ms(4000)).is_empty());
        assert_eq!(state.time_remaining(), Some(ms(1000)));

        let events = state.advance_time(ms(1500));
        assert_eq!(state.time_remaining(), Some(Duration::ZERO));
        assert_eq!(state.phase, GamePhase::Over);
        assert_eq!(events, vec![GameEvent::GameOver(GameOverReason::TimeUp)]);
    }

    #[test]
    fn test_time_bonus_on_food() {
        let mut state = running_state(GameSettings {
            time_limit_ms: Some(5000),
            ..test_settings()
        });
        state.set_snake(&[(14, 15)], Direction::Right);
        state.tick();
        assert_eq!(state.time_remaining(), Some(ms(7000)));
    }

    #[test]
    fn test_untimed_mode_never_runs_out() {
        let mut state = running_state(test_settings());
        state.advance_time(Duration::from_secs(3600));
        assert_eq!(state.time_remaining(), None);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_power_up_pickup_activates_and_expires() {
        let mut state = running_state(test_settings());
        state.place_power_up(Point::new(11, 10), PowerUpKind::Shield);
        state.set_direction(Direction::Right);

        let events = state.tick();
        assert!(events.contains(&GameEvent::PowerUpCollected(PowerUpKind::Shield)));
        assert!(state.power_ups.is_empty());
        assert!(state.is_power_up_active(PowerUpKind::Shield));

        assert!(state.advance_time(ms(9999)).is_empty());
        let events = state.advance_time(ms(1));
        assert_eq!(events, vec![GameEvent::PowerUpExpired(PowerUpKind::Shield)]);
        assert!(!state.is_power_up_active(PowerUpKind::Shield));
    }

    #[test]
    fn test_recollecting_extends_deadline() {
        let mut state = running_state(test_settings());
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.advance_time(ms(6000));
        state.activate_power_up(PowerUpKind::DoublePoints);
        state.advance_time(ms(6000));
        assert!(state.is_power_up_active(PowerUpKind::DoublePoints));
        state.advance_time(ms(4000));
        assert!(!state.is_power_up_active(PowerUpKind::DoublePoints));
    }

    #[test]
    fn test_speed_boost_restores_current_base_interval() {
        let mut state = running_state(test_settings());
        state.place_power_up(Point::new(11, 10), PowerUpKind::SpeedBoost);
        state.set_direction(Direction::Right);

        let events = state.tick();
        assert_eq!(state.tick_interval(), ms(50));
        assert!(events.contains(&GameEvent::SpeedChanged { interval: ms(50) }));

        state.food = Some(Point::new(12, 10));
        state.tick();
        assert_eq!(state.base_interval(), ms(95));
        assert_eq!(state.tick_interval(), Duration::from_micros(47_500));

        let events = state.advance_time(ms(10_000));
        assert!(events.contains(&GameEvent::PowerUpExpired(PowerUpKind::SpeedBoost)));
        assert!(events.contains(&GameEvent::SpeedChanged { interval: ms(95) }));
        assert_eq!(state.tick_interval(), ms(95));
    }

    #[test]
    fn test_uncollected_power_up_despawns() {
        let mut state = running_state(test_settings());
        state.place_power_up(Point::new(0, 0), PowerUpKind::SpeedBoost);
        let events = state.advance_time(ms(8000));
        assert_eq!(
            events,
            vec![GameEvent::PowerUpDespawned(PowerUp {
                position: Point::new(0, 0),
                kind: PowerUpKind::SpeedBoost
            })]
        );
        assert!(state.power_ups.is_empty());
    }

    #[test]
    fn test_power_ups_spawn_up_to_limit() {
        let mut state = running_state(GameSettings {
            power_up_spawn_probability: 1.0,
            ..test_settings()
        });
        state.set_direction(Direction::Up);
        for _ in 0..5 {
            state.tick();
        }
        assert_eq!(state.power_ups.len(), 2);
        assert_ne!(state.power_ups[0].position, state.power_ups[1].position);
    }

    #[test]
    fn test_effect_from_previous_run_is_dropped() {
        let mut state = running_state(test_settings());
        state.activate_power_up(PowerUpKind::Shield);
        let stale_run = state.run_id() - 1;
        let deadline = state.clock() + ms(1);
        state.effects.schedule(
            deadline,
            stale_run,
            DeferredEffect::ExpirePowerUp(PowerUpKind::Shield),
        );

        let events = state.advance_time(ms(10));

        assert!(events.is_empty());
        assert!(state.is_power_up_active(PowerUpKind::Shield));
    }

    #[test]
    fn test_restart_discards_pending_expiry() {
        let mut state = running_state(test_settings());
        state.activate_power_up(PowerUpKind::SpeedBoost);
        let first_run = state.run_id();

        state.restart();

        assert_ne!(state.run_id(), first_run);
        assert!(!state.is_power_up_active(PowerUpKind::SpeedBoost));
        assert!(state.advance_time(ms(20_000)).is_empty());
        assert_eq!(state.tick_interval(), ms(100));
    }

    #[test]
    fn test_pause_freezes_ticks_and_clock() {
        let mut state = running_state(GameSettings {
            time_limit_ms: Some(5000),
            ..test_settings()
        });
        state.set_direction(Direction::Right);
        assert!(state.pause());
        assert!(!state.set_direction(Direction::Up));
        assert!(state.tick().is_empty());
        state.advance_time(ms(10_000));
        assert_eq!(state.time_remaining(), Some(ms(5000)));
        assert_eq!(state.phase, GamePhase::Paused);

        assert!(state.resume());
        state.tick();
        assert_eq!(state.snake.head(), Point::new(11, 10));
    }

    #[test]
    fn test_reset_returns_to_idle_with_fresh_run() {
        let mut state = running_state(test_settings());
        state.set_direction(Direction::Right);
        state.tick();
        state.score = 7;
        state.reset();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.score, 0);
        assert_eq!(state.snake.head(), Point::new(10, 10));
        assert_eq!(state.snake.heading, None);
    }

    #[test]
    fn test_select_difficulty_only_between_runs() {
        let mut state = SnakeGameState::new(GameSettings::default(), SessionRng::new(1));
        assert!(state.select_difficulty(Difficulty::Hard));
        assert_eq!(state.tick_interval(), ms(80));
        state.start();
        assert!(!state.select_difficulty(Difficulty::Easy));
        assert_eq!(state.profile(), &Difficulty::Hard.profile());
    }

    #[test]
    fn test_initial_obstacles_avoid_snake_and_food() {
        let state = SnakeGameState::new(
            GameSettings {
                initial_obstacles: 30,
                ..test_settings()
            },
            SessionRng::new(8),
        );
        assert_eq!(state.obstacles.len(), 30);
        assert!(!state.obstacles.contains(&Point::new(10, 10)));
        assert!(!state.obstacles.contains(&Point::new(15, 15)));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = running_state(GameSettings {
            time_limit_ms: Some(3000),
            ..test_settings()
        });
        state.activate_power_up(PowerUpKind::Shield);
        state.advance_time(ms(1000));
        state.score = 3;

        let snapshot = state.snapshot(10);

        assert_eq!(snapshot.snake, vec![Point::new(10, 10)]);
        assert_eq!(snapshot.food, Some(Point::new(15, 15)));
        assert_eq!(snapshot.high_score, 10);
        assert_eq!(snapshot.time_remaining, Some(ms(2000)));
        assert_eq!(snapshot.active_power_ups, vec![(PowerUpKind::Shield, ms(9000))]);
        assert_eq!(snapshot.phase, GamePhase::Running);
        assert!(snapshot.is_power_up_active(PowerUpKind::Shield));
        assert_eq!(state.snapshot(1).high_score, 3);
    }

    #[test]
    fn test_long_run_keeps_invariants() {
        let mut state = running_state(GameSettings {
            power_up_spawn_probability: 0.3,
            initial_obstacles: 5,
            ..test_settings()
        });
        let cycle = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

        for step in 0..2000usize {
            if state.phase == GamePhase::Over {
                state.restart();
            }
            let previous_len = state.snake.len();
            let previous_heading = state.snake.heading;

            state.set_direction(cycle[(step / 3) % 4]);
            state.set_direction(cycle[(step / 3 + 2) % 4]);
            let was_fed = state.food;
            state.tick();
            state.advance_time(ms(100));

            let len = state.snake.len();
            assert!(len == previous_len || len == previous_len + 1);
            if len == previous_len + 1 {
                assert_eq!(Some(state.snake.head()), was_fed);
            }

            if let (Some(before), Some(after)) = (previous_heading, state.snake.heading) {
                assert!(!after.is_opposite(&before));
            }

            if state.phase == GamePhase::Running {
                if let Some(food) = state.food {
                    assert!(!state.snake.occupies(&food));
                    assert!(!state.obstacles.contains(&food));
                    assert!(!state.power_ups.iter().any(|p| p.position == food));
                }
                for (i, power_up) in state.power_ups.iter().enumerate() {
                    assert!(!state.obstacles.contains(&power_up.position));
                    assert!(!state.snake.occupies(&power_up.position));
                    assert!(
                        state.power_ups[i + 1..]
                            .iter()
                            .all(|other| other.position != power_up.position)
                    );
                }
                assert!(state.power_ups.len() <= 2);
            }
        }
    }
}
