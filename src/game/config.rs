use super::constants::*;
use super::error::GameError;
use super::types::Point;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodConfig {
  pub initial_count: usize,
  pub max_count: usize,
  pub radius: f64,
  /// Fraction of the field kept free of food along every edge.
  pub margin: f64,
  /// Weight of `|turn_delta|` against distance when bots pick the nearest pellet.
  pub nearest_turn_weight: f64,
}

impl Default for FoodConfig {
  fn default() -> Self {
    Self {
      initial_count: INITIAL_FOOD_COUNT,
      max_count: MAX_FOOD_COUNT,
      radius: FOOD_RADIUS,
      margin: FOOD_MARGIN,
      nearest_turn_weight: NEAREST_FOOD_TURN_WEIGHT,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
  pub initial_radius: f64,
  pub max_radius: f64,
  pub growth_coef: f64,
  pub initial_length: usize,
  pub max_turn_angle: f64,
  pub base_speed: f64,
  /// Speed gained or lost per second while the boost ramps.
  pub acceleration: f64,
  pub max_boosted_speed: f64,
}

impl Default for SnakeConfig {
  fn default() -> Self {
    Self {
      initial_radius: SNAKE_INITIAL_RADIUS,
      max_radius: SNAKE_MAX_RADIUS,
      growth_coef: SNAKE_GROWTH_COEF,
      initial_length: SNAKE_INITIAL_LENGTH,
      max_turn_angle: SNAKE_MAX_TURN_ANGLE,
      base_speed: SNAKE_BASE_SPEED,
      acceleration: SNAKE_ACCELERATION,
      max_boosted_speed: SNAKE_MAX_BOOSTED_SPEED,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotConfig {
  pub seed_positions: Vec<Point>,
  pub probe_distance: f64,
  pub retarget_timeout_ms: u64,
  pub respawn_attempts: usize,
  pub spawn_margin: f64,
}

impl Default for BotConfig {
  fn default() -> Self {
    Self {
      seed_positions: BOT_SEED_POSITIONS.iter().copied().map(Point::from).collect(),
      probe_distance: BOT_PROBE_DISTANCE,
      retarget_timeout_ms: BOT_RETARGET_TIMEOUT_MS,
      respawn_attempts: BOT_RESPAWN_ATTEMPTS,
      spawn_margin: BOT_SPAWN_MARGIN,
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
  pub field_size: f64,
  pub viewport_size: f64,
  pub tick_rate: u32,
  pub food: FoodConfig,
  pub snake: SnakeConfig,
  pub bots: BotConfig,
  pub collision_group_size: usize,
  pub id_wrap: u32,
  pub seed: Option<u64>,
  pub debug_overlays: bool,
}

impl Default for GameConfig {
  fn default() -> Self {
    Self {
      field_size: FIELD_SIZE,
      viewport_size: VIEWPORT_SIZE,
      tick_rate: TICK_RATE,
      food: FoodConfig::default(),
      snake: SnakeConfig::default(),
      bots: BotConfig::default(),
      collision_group_size: COLLISION_GROUP_SIZE,
      id_wrap: ID_WRAP,
      seed: None,
      debug_overlays: false,
    }
  }
}

fn env_value<T: FromStr>(key: &str) -> Option<T> {
  env::var(key)
    .ok()
    .and_then(|value| value.trim().parse::<T>().ok())
}

fn env_flag(key: &str) -> Option<bool> {
  env::var(key)
    .ok()
    .map(|value| matches!(value.trim(), "1" | "true" | "TRUE"))
}

impl GameConfig {
  /// Defaults, then the JSON file named by `SNAKE_CONFIG`, then single-value env overrides.
  pub fn from_env() -> Result<Self, GameError> {
    let mut config = match env::var("SNAKE_CONFIG") {
      Ok(path) => {
        let raw = std::fs::read_to_string(&path)
          .map_err(|err| GameError::InvalidConfig(format!("cannot read {path}: {err}")))?;
        Self::from_json(&raw)?
      }
      Err(_) => Self::default(),
    };

    if let Some(value) = env_value("SNAKE_FIELD_SIZE") {
      config.field_size = value;
    }
    if let Some(value) = env_value("SNAKE_VIEWPORT_SIZE") {
      config.viewport_size = value;
    }
    if let Some(value) = env_value("SNAKE_TICK_RATE") {
      config.tick_rate = value;
    }
    if let Some(value) = env_value("SNAKE_INITIAL_FOOD") {
      config.food.initial_count = value;
    }
    if let Some(value) = env_value("SNAKE_MAX_FOOD") {
      config.food.max_count = value;
    }
    if let Some(value) = env_value("SNAKE_SEED") {
      config.seed = Some(value);
    }
    if let Some(value) = env_flag("SNAKE_DEBUG_OVERLAYS") {
      config.debug_overlays = value;
    }

    config.validate()?;
    Ok(config)
  }

  pub fn from_json(raw: &str) -> Result<Self, GameError> {
    let config: Self =
      serde_json::from_str(raw).map_err(|err| GameError::InvalidConfig(err.to_string()))?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), GameError> {
    let fail = |message: &str| -> Result<(), GameError> {
      Err(GameError::InvalidConfig(message.to_string()))
    };
    if !(self.field_size.is_finite() && self.field_size > 0.0) {
      return fail("field_size must be positive");
    }
    if !(self.viewport_size.is_finite() && self.viewport_size > 0.0) {
      return fail("viewport_size must be positive");
    }
    if self.tick_rate == 0 {
      return fail("tick_rate must be positive");
    }
    if !(0.0..0.5).contains(&self.food.margin) || !(0.0..0.5).contains(&self.bots.spawn_margin) {
      return fail("margins must lie in [0, 0.5)");
    }
    if self.food.radius <= 0.0 || self.food.nearest_turn_weight < 0.0 {
      return fail("food radius must be positive and turn weight non-negative");
    }
    let snake = &self.snake;
    if snake.initial_radius <= 0.0 || snake.max_radius < snake.initial_radius {
      return fail("snake radii must satisfy 0 < initial_radius <= max_radius");
    }
    if snake.growth_coef < 1.0 {
      return fail("growth_coef must be at least 1");
    }
    if snake.initial_length == 0 {
      return fail("initial_length must be at least 1");
    }
    if snake.base_speed < 0.0 || snake.max_boosted_speed < snake.base_speed {
      return fail("speeds must satisfy 0 <= base_speed <= max_boosted_speed");
    }
    if snake.max_turn_angle < 0.0 || snake.acceleration < 0.0 {
      return fail("max_turn_angle and acceleration must be non-negative");
    }
    if self.collision_group_size == 0 {
      return fail("collision_group_size must be at least 1");
    }
    if self.id_wrap == 0 {
      return fail("id_wrap must be at least 1");
    }
    Ok(())
  }

  pub fn tick_seconds(&self) -> f64 {
    1.0 / self.tick_rate as f64
  }

  pub fn retarget_timeout_ticks(&self) -> u64 {
    (self.bots.retarget_timeout_ms * self.tick_rate as u64).div_ceil(1000)
  }

  pub fn field_center(&self) -> Point {
    Point::new(self.field_size / 2.0, self.field_size / 2.0)
  }

  pub fn contains(&self, point: Point) -> bool {
    (0.0..=self.field_size).contains(&point.x) && (0.0..=self.field_size).contains(&point.y)
  }
}
