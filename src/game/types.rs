use super::error::GameError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Screen-space point: x grows right, y grows down.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

impl From<(f64, f64)> for Point {
  fn from((x, y): (f64, f64)) -> Self {
    Self { x, y }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
  pub r: u8,
  pub g: u8,
  pub b: u8,
}

impl Color {
  pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
    Self { r, g, b }
  }

  pub const fn from_tuple((r, g, b): (u8, u8, u8)) -> Self {
    Self { r, g, b }
  }

  pub fn random(rng: &mut impl Rng) -> Self {
    Self {
      r: rng.gen(),
      g: rng.gen(),
      b: rng.gen(),
    }
  }
}

impl fmt::Display for Color {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
  }
}

impl FromStr for Color {
  type Err = GameError;

  fn from_str(value: &str) -> Result<Self, Self::Err> {
    let invalid = || GameError::InvalidColor(value.to_string());
    let hex = value.trim().strip_prefix('#').ok_or_else(invalid)?;
    if hex.len() != 6 || !hex.is_ascii() {
      return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).map_err(|_| invalid());
    Ok(Self {
      r: channel(0..2)?,
      g: channel(2..4)?,
      b: channel(4..6)?,
    })
  }
}

/// Axis-aligned rectangle in field coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
  pub left: f64,
  pub top: f64,
  pub right: f64,
  pub bottom: f64,
}

impl Rect {
  pub fn union(&self, other: &Rect) -> Rect {
    Rect {
      left: self.left.min(other.left),
      top: self.top.min(other.top),
      right: self.right.max(other.right),
      bottom: self.bottom.max(other.bottom),
    }
  }

  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
  }

  pub fn intersects(&self, other: &Rect) -> bool {
    self.left <= other.right
      && other.left <= self.right
      && self.top <= other.bottom
      && other.top <= self.bottom
  }
}

/// The drawable unit shared by food pellets and snake segments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Circle {
  pub x: f64,
  pub y: f64,
  pub radius: f64,
  pub color: Color,
}

impl Circle {
  pub fn new(center: Point, radius: f64, color: Color) -> Self {
    Self {
      x: center.x,
      y: center.y,
      radius,
      color,
    }
  }

  pub fn center(&self) -> Point {
    Point { x: self.x, y: self.y }
  }

  pub fn set_center(&mut self, center: Point) {
    self.x = center.x;
    self.y = center.y;
  }

  pub fn bounds(&self) -> Rect {
    Rect {
      left: self.x - self.radius,
      top: self.y - self.radius,
      right: self.x + self.radius,
      bottom: self.y + self.radius,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnDirection {
  Left,
  Right,
}

impl TurnDirection {
  /// Right turns increase the heading (clockwise on screen).
  pub fn sign(self) -> f64 {
    match self {
      TurnDirection::Left => -1.0,
      TurnDirection::Right => 1.0,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
  TurnLeft,
  TurnRight,
  TurnNone,
  BoostOn,
  BoostOff,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickResult {
  pub still_running: bool,
  pub game_over_message: Option<String>,
}

impl TickResult {
  pub fn running() -> Self {
    Self {
      still_running: true,
      game_over_message: None,
    }
  }

  pub fn game_over(message: String) -> Self {
    Self {
      still_running: false,
      game_over_message: Some(message),
    }
  }
}

#[derive(Debug, Clone, Serialize)]
pub struct SnakeSnapshot {
  pub id: u32,
  pub name: String,
  pub is_player: bool,
  pub radius: f64,
  pub segments: Vec<Circle>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProbeSnapshot {
  pub point: Point,
  pub blocked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BotDebugSnapshot {
  pub snake_id: u32,
  pub head: Point,
  pub target: Option<Point>,
  pub probes: Vec<ProbeSnapshot>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DebugOverlay {
  pub collision_boxes: Vec<Rect>,
  pub bots: Vec<BotDebugSnapshot>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderState {
  pub tick: u64,
  pub snakes: Vec<SnakeSnapshot>,
  pub food: Vec<Circle>,
  pub camera_offset: Point,
  pub debug: Option<DebugOverlay>,
}
