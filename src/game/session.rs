use super::bot::{self, BotContext};
use super::collision::{coarse_boxes, find_first_collision, CollisionCache, CollisionKind};
use super::config::GameConfig;
use super::constants::{
  BOT_COLOR, BOT_HEAD_COLOR, BOT_SPAWN_CLEARANCE_TICKS, GAME_OVER_PREFIX, PLAYER_COLOR,
};
use super::error::GameError;
use super::food::FoodField;
use super::math::{angle_to, distance};
use super::registry::Registry;
use super::snake::{BotState, Snake, SnakeKind, SnakeSpawn};
use super::types::{
  BotDebugSnapshot, Color, DebugOverlay, Intent, Point, ProbeSnapshot, RenderState,
  SnakeSnapshot, TickResult, TurnDirection,
};
use crate::shared::names::{bot_name, sanitize_player_name};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
  pub snake_color: Option<Color>,
  pub player_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathCause {
  OutOfBounds,
  Collision { other: u32, kind: CollisionKind },
}

impl fmt::Display for DeathCause {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      DeathCause::OutOfBounds => write!(f, "left the field"),
      DeathCause::Collision {
        other,
        kind: CollisionKind::HeadOn,
      } => write!(f, "head-on collision with snake {other}"),
      DeathCause::Collision {
        other,
        kind: CollisionKind::HeadToBody { .. },
      } => write!(f, "crashed into snake {other}"),
    }
  }
}

/// One game: the player, the bots, the food and the per-tick collision cache.
#[derive(Debug)]
pub struct Session {
  id: Uuid,
  config: GameConfig,
  rng: StdRng,
  food: FoodField,
  snakes: Registry<Snake>,
  collisions: CollisionCache,
  player_id: Option<u32>,
  tick: u64,
  game_over: Option<String>,
  last_player_head: Point,
  pending_respawns: usize,
  bots_spawned: usize,
}

/// Session with the default configuration and an optional player color.
pub fn create_session(snake_color: Option<Color>) -> Result<Session, GameError> {
  Session::new(
    GameConfig::default(),
    SessionOptions {
      snake_color,
      player_name: None,
    },
  )
}

impl Session {
  pub fn new(config: GameConfig, options: SessionOptions) -> Result<Self, GameError> {
    config.validate()?;
    let rng = match config.seed {
      Some(seed) => StdRng::seed_from_u64(seed),
      None => StdRng::from_entropy(),
    };
    let center = config.field_center();

    let mut session = Self {
      id: Uuid::new_v4(),
      food: FoodField::new(config.food.clone(), config.field_size, config.id_wrap),
      snakes: Registry::with_id_wrap(config.id_wrap),
      collisions: CollisionCache::new(config.collision_group_size),
      rng,
      player_id: None,
      tick: 0,
      game_over: None,
      last_player_head: center,
      pending_respawns: 0,
      bots_spawned: 0,
      config,
    };

    let seeded = session.food.seed(session.config.food.initial_count, &mut session.rng);
    session.spawn_player(options, center);
    for position in session.config.bots.seed_positions.clone() {
      session.spawn_bot(position, 0.0);
    }

    tracing::info!(
      session_id = %session.id,
      food = seeded,
      snakes = session.snakes.len(),
      "session created"
    );
    Ok(session)
  }

  pub fn id(&self) -> Uuid {
    self.id
  }

  pub fn config(&self) -> &GameConfig {
    &self.config
  }

  pub fn tick_count(&self) -> u64 {
    self.tick
  }

  pub fn food(&self) -> &FoodField {
    &self.food
  }

  pub fn snakes(&self) -> &Registry<Snake> {
    &self.snakes
  }

  pub fn is_running(&self) -> bool {
    self.game_over.is_none()
  }

  pub fn game_over_message(&self) -> Option<&str> {
    self.game_over.as_deref()
  }

  pub fn player(&self) -> Result<&Snake, GameError> {
    self
      .player_id
      .and_then(|id| self.snakes.get(id))
      .ok_or(GameError::NoMainSnake)
  }

  fn player_mut(&mut self) -> Result<&mut Snake, GameError> {
    let id = self.player_id.ok_or(GameError::NoMainSnake)?;
    self.snakes.get_mut(id).ok_or(GameError::NoMainSnake)
  }

  /// Applies a decoded input intent to the player; it takes effect on the next tick.
  pub fn handle_intent(&mut self, intent: Intent) -> Result<(), GameError> {
    let player = self.player_mut()?;
    match intent {
      Intent::TurnLeft => player.set_turning(Some(TurnDirection::Left)),
      Intent::TurnRight => player.set_turning(Some(TurnDirection::Right)),
      Intent::TurnNone => player.set_turning(None),
      Intent::BoostOn => player.set_boost(true),
      Intent::BoostOff => player.set_boost(false),
    }
    Ok(())
  }

  pub fn camera_offset(&self) -> Point {
    let center = self.config.viewport_size / 2.0;
    let head = self
      .player()
      .map(Snake::head_point)
      .unwrap_or(self.last_player_head);
    Point::new(center - head.x, center - head.y)
  }

  fn spawn_player(&mut self, options: SessionOptions, position: Point) {
    let color = options
      .snake_color
      .unwrap_or(Color::from_tuple(PLAYER_COLOR));
    let name = sanitize_player_name(options.player_name.as_deref());
    let spawn = SnakeSpawn {
      start_pos: position,
      angle: 0.0,
      color,
      head_color: color,
    };
    let snake_config = self.config.snake;
    self.player_id = self
      .snakes
      .insert_with(|id| Snake::new(id, name, SnakeKind::Player, spawn, snake_config));
    self.last_player_head = position;
  }

  fn spawn_bot(&mut self, position: Point, angle: f64) -> Option<u32> {
    self.bots_spawned += 1;
    let name = bot_name(self.bots_spawned);
    let spawn = SnakeSpawn {
      start_pos: position,
      angle,
      color: Color::from_tuple(BOT_COLOR),
      head_color: Color::from_tuple(BOT_HEAD_COLOR),
    };
    let snake_config = self.config.snake;
    self.snakes.insert_with(|id| {
      Snake::new(id, name, SnakeKind::Bot(BotState::default()), spawn, snake_config)
    })
  }

  /// Runs one simulation step. After the player has died every call reports
  /// the same game-over result without simulating.
  pub fn tick(&mut self) -> TickResult {
    if let Some(message) = &self.game_over {
      return TickResult::game_over(message.clone());
    }

    self.collisions.invalidate();
    self.kill_out_of_bounds();
    if self.game_over.is_none() {
      self.resolve_collisions();
    }
    if let Some(message) = &self.game_over {
      self.tick += 1;
      return TickResult::game_over(message.clone());
    }

    self.respawn_pending_bots();
    self.update_snakes();
    self.tick += 1;
    TickResult::running()
  }

  fn kill_out_of_bounds(&mut self) {
    let outside: Vec<u32> = self
      .snakes
      .values()
      .filter(|snake| {
        snake
          .segments
          .iter()
          .any(|segment| !self.config.contains(segment.center()))
      })
      .map(|snake| snake.id)
      .collect();
    for id in outside {
      self.handle_death(id, DeathCause::OutOfBounds);
    }
  }

  /// Kills one snake per pass until no collision is left. Bounded by the
  /// number of snakes alive when it starts, since replacements spawn later.
  fn resolve_collisions(&mut self) -> usize {
    let bound = self.snakes.len();
    let mut deaths = 0;
    while deaths < bound {
      let Some(outcome) = find_first_collision(&mut self.collisions, &self.snakes) else {
        break;
      };
      tracing::debug!(
        loser = outcome.loser,
        winner = outcome.winner,
        kind = ?outcome.kind,
        "collision resolved"
      );
      self.handle_death(
        outcome.loser,
        DeathCause::Collision {
          other: outcome.winner,
          kind: outcome.kind,
        },
      );
      deaths += 1;
      if self.game_over.is_some() {
        break;
      }
    }
    deaths
  }

  fn handle_death(&mut self, snake_id: u32, cause: DeathCause) {
    let Some(mut snake) = self.snakes.remove(snake_id) else { return };
    snake.alive = false;
    tracing::debug!(snake_id, is_bot = snake.is_bot(), cause = %cause, "snake died");

    if Some(snake_id) == self.player_id {
      self.last_player_head = snake.head_point();
      let message = format!("{GAME_OVER_PREFIX}: {cause}");
      tracing::info!(
        session_id = %self.id,
        tick = self.tick,
        length = snake.len(),
        "{message}"
      );
      self.game_over = Some(message);
      return;
    }

    for segment in &snake.segments {
      self.food.spawn_at(segment.center(), true);
    }
    self.pending_respawns += 1;
  }

  fn respawn_pending_bots(&mut self) {
    while self.pending_respawns > 0 {
      self.pending_respawns -= 1;
      let (position, angle) = self.find_bot_spawn();
      let id = self.spawn_bot(position, angle);
      tracing::debug!(snake_id = ?id, x = position.x, y = position.y, "bot respawned");
    }
  }

  /// Random point clear of every coarse box and well away from the player,
  /// falling back to the inset field corner farthest from the player.
  fn find_bot_spawn(&mut self) -> (Point, f64) {
    let center = self.config.field_center();
    let player = self
      .player()
      .ok()
      .map(|snake| (snake.head_point(), snake.speed));
    let clearance = player
      .map(|(_, speed)| speed * self.config.tick_rate as f64 * BOT_SPAWN_CLEARANCE_TICKS)
      .unwrap_or(0.0);
    let low = self.config.field_size * self.config.bots.spawn_margin;
    let high = self.config.field_size - low;

    for _ in 0..self.config.bots.respawn_attempts {
      let candidate = Point::new(self.rng.gen_range(low..=high), self.rng.gen_range(low..=high));
      if self
        .collisions
        .point_in_any_box(&self.snakes, candidate, None)
      {
        continue;
      }
      if let Some((head, _)) = player {
        if distance(candidate, head) <= clearance {
          continue;
        }
      }
      return (candidate, angle_to(candidate, center));
    }

    let anchor = player.map(|(head, _)| head).unwrap_or(center);
    let fallback = [
      Point::new(low, low),
      Point::new(high, low),
      Point::new(low, high),
      Point::new(high, high),
    ]
    .into_iter()
    .max_by(|a, b| distance(*a, anchor).total_cmp(&distance(*b, anchor)))
    .unwrap_or(Point::new(low, low));
    tracing::warn!(x = fallback.x, y = fallback.y, "no clear bot spawn point, using field edge");
    (fallback, angle_to(fallback, center))
  }

  fn update_snakes(&mut self) {
    let dt = self.config.tick_seconds();
    let retarget_after = self.config.retarget_timeout_ticks();

    for id in self.snakes.ids() {
      let Some(head) = self.snakes.get(id).map(|snake| *snake.head()) else { continue };
      let eaten = self.food.consume(&head, &mut self.rng);

      let samples = match self.snakes.get(id) {
        Some(snake) if snake.is_bot() => {
          let snakes = &self.snakes;
          let collisions = &mut self.collisions;
          let config = &self.config;
          Some(bot::probe(snake, config.bots.probe_distance, |point| {
            collisions.point_in_any_box(snakes, point, Some(id)) || !config.contains(point)
          }))
        }
        _ => None,
      };

      let ctx = BotContext {
        food: &self.food,
        tick: self.tick,
        retarget_after,
        field_size: self.config.field_size,
      };
      let Some(snake) = self.snakes.get_mut(id) else { continue };
      match samples {
        Some(samples) => bot::update(snake, eaten, samples, &ctx, &mut self.rng, dt),
        None => snake.update(eaten, dt),
      }
      if Some(id) == self.player_id {
        self.last_player_head = snake.head_point();
      }
    }
  }

  pub fn render_state(&self) -> RenderState {
    let snakes = self
      .snakes
      .values()
      .map(|snake| SnakeSnapshot {
        id: snake.id,
        name: snake.name.clone(),
        is_player: Some(snake.id) == self.player_id,
        radius: snake.radius,
        segments: snake.segments.clone(),
      })
      .collect();

    RenderState {
      tick: self.tick,
      snakes,
      food: self.food.iter().map(|food| food.circle).collect(),
      camera_offset: self.camera_offset(),
      debug: self.config.debug_overlays.then(|| self.debug_overlay()),
    }
  }

  fn debug_overlay(&self) -> DebugOverlay {
    let collision_boxes = self
      .snakes
      .values()
      .flat_map(|snake| coarse_boxes(snake, self.config.collision_group_size))
      .collect();
    let bots = self
      .snakes
      .values()
      .filter_map(|snake| {
        let state = snake.bot()?;
        Some(BotDebugSnapshot {
          snake_id: snake.id,
          head: snake.head_point(),
          target: state
            .target_food
            .and_then(|id| self.food.get(id))
            .map(|food| food.center()),
          probes: state
            .last_probe
            .iter()
            .map(|sample| ProbeSnapshot {
              point: sample.point,
              blocked: sample.blocked,
            })
            .collect(),
        })
      })
      .collect();
    DebugOverlay {
      collision_boxes,
      bots,
    }
  }
}

#[cfg(test)]
mod tests;
