use super::bot::ProbeSample;
use super::config::SnakeConfig;
use super::constants::{FOLLOW_SLACK, FOLLOW_SPACING};
use super::math::{angle_to, clamp_magnitude, distance, normalize_angle, project};
use super::types::{Circle, Color, Point, TurnDirection};

/// Bot-only state. The target is held by food id and re-validated against the
/// live food field every time it is used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BotState {
    pub target_food: Option<u32>,
    pub target_since: Option<u64>,
    pub last_probe: Vec<ProbeSample>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SnakeKind {
    Player,
    Bot(BotState),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnakeSpawn {
    pub start_pos: Point,
    pub angle: f64,
    pub color: Color,
    pub head_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub id: u32,
    pub name: String,
    pub kind: SnakeKind,
    pub angle: f64,
    pub start_pos: Point,
    pub radius: f64,
    pub alive: bool,
    pub turning: Option<TurnDirection>,
    pub boost: bool,
    pub speed: f64,
    pub color: Color,
    pub segments: Vec<Circle>,
    config: SnakeConfig,
}

impl Snake {
    pub fn new(id: u32, name: String, kind: SnakeKind, spawn: SnakeSpawn, config: SnakeConfig) -> Self {
        let head = Circle::new(spawn.start_pos, config.initial_radius, spawn.head_color);
        let mut snake = Self {
            id,
            name,
            kind,
            angle: normalize_angle(spawn.angle),
            start_pos: spawn.start_pos,
            radius: config.initial_radius,
            alive: true,
            turning: None,
            boost: false,
            speed: config.base_speed,
            color: spawn.color,
            segments: Vec::with_capacity(config.initial_length),
            config,
        };
        snake.segments.push(head);

        // The opening body is laid out straight behind the head.
        let spacing = snake.spacing();
        let behind = snake.angle + 180.0;
        for _ in 1..config.initial_length {
            let position = project(snake.tail().center(), behind, spacing);
            snake.segments.push(Circle::new(position, snake.radius, snake.color));
        }
        snake.set_radius(snake.radius * config.growth_coef);
        snake
    }

    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    pub fn head(&self) -> &Circle {
        &self.segments[0]
    }

    pub fn head_point(&self) -> Point {
        self.head().center()
    }

    pub fn tail(&self) -> &Circle {
        &self.segments[self.segments.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_bot(&self) -> bool {
        matches!(self.kind, SnakeKind::Bot(_))
    }

    pub fn bot(&self) -> Option<&BotState> {
        match &self.kind {
            SnakeKind::Bot(state) => Some(state),
            SnakeKind::Player => None,
        }
    }

    pub fn bot_mut(&mut self) -> Option<&mut BotState> {
        match &mut self.kind {
            SnakeKind::Bot(state) => Some(state),
            SnakeKind::Player => None,
        }
    }

    /// Distance a lagging follower keeps from the segment ahead of it.
    pub fn spacing(&self) -> f64 {
        2.0 * self.radius * FOLLOW_SPACING
    }

    pub fn set_turning(&mut self, direction: Option<TurnDirection>) {
        self.turning = direction;
    }

    pub fn set_boost(&mut self, enabled: bool) {
        self.boost = enabled;
    }

    /// Turns by the held direction, or by `override_delta` clamped to the max
    /// turn rate. Returns the rotation actually applied.
    pub fn steer(&mut self, override_delta: Option<f64>) -> f64 {
        let max_turn = self.config.max_turn_angle;
        let delta = match override_delta {
            Some(delta) => clamp_magnitude(delta, max_turn),
            None => self
                .turning
                .map(|direction| max_turn * direction.sign())
                .unwrap_or(0.0),
        };
        self.angle = normalize_angle(self.angle + delta);
        delta
    }

    pub fn update_speed(&mut self, dt: f64) {
        let step = self.config.acceleration * dt;
        if self.boost {
            self.speed = (self.speed + step).min(self.config.max_boosted_speed);
        } else if self.speed > self.config.base_speed {
            self.speed = (self.speed - step).max(self.config.base_speed);
        }
    }

    /// Moves the head along the heading; every follower is pulled back to
    /// `spacing()` behind its predecessor once it lags more than half a radius.
    pub fn advance(&mut self) {
        let slack = FOLLOW_SLACK * self.radius;
        let spacing = self.spacing();
        let mut ahead: Option<Point> = None;

        for segment in self.segments.iter_mut() {
            match ahead {
                None => segment.set_center(project(segment.center(), self.angle, self.speed)),
                Some(leader) => {
                    let position = segment.center();
                    if distance(position, leader) > slack {
                        let bearing = angle_to(leader, position);
                        segment.set_center(project(leader, bearing, spacing));
                    }
                }
            }
            ahead = Some(segment.center());
        }
    }

    /// Appends `count` segments at the tail end and counts as one growth event.
    pub fn grow(&mut self, count: usize) {
        if count == 0 {
            return;
        }
        let tail = self.tail().center();
        for _ in 0..count {
            self.segments.push(Circle::new(tail, self.radius, self.color));
        }
        self.set_radius(self.radius * self.config.growth_coef);
    }

    fn set_radius(&mut self, radius: f64) {
        self.radius = radius.min(self.config.max_radius).max(self.radius);
        for segment in &mut self.segments {
            segment.radius = self.radius;
        }
    }

    /// Per-tick update of a player-driven snake.
    pub fn update(&mut self, food_count: usize, dt: f64) {
        self.update_speed(dt);
        self.steer(None);
        self.advance();
        self.grow(food_count);
    }

    /// Index of the first segment of `other` that this snake's head overlaps.
    /// On itself the head and its neighbour never count.
    pub fn find_collision(&self, other: &Snake, exclude_self: bool) -> Option<usize> {
        let same = self.id == other.id;
        if exclude_self && same {
            return None;
        }
        let head = self.head_point();
        let reach = self.radius + other.radius;
        other
            .segments
            .iter()
            .enumerate()
            .filter(|(index, _)| !(same && *index <= 1))
            .find(|(_, segment)| distance(segment.center(), head) < reach)
            .map(|(index, _)| index)
    }
}
