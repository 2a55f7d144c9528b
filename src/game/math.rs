use super::types::Point;

pub fn distance(a: Point, b: Point) -> f64 {
  ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

pub fn sign(value: f64) -> f64 {
  if value > 0.0 {
    1.0
  } else if value < 0.0 {
    -1.0
  } else {
    0.0
  }
}

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize_angle(angle: f64) -> f64 {
  let wrapped = angle.rem_euclid(360.0);
  if wrapped >= 360.0 {
    0.0
  } else {
    wrapped
  }
}

/// Bearing of the ray from `origin` to `target` in degrees, clockwise from +x.
pub fn angle_to(origin: Point, target: Point) -> f64 {
  let dx = target.x - origin.x;
  let dy = target.y - origin.y;
  if dx == 0.0 {
    return if dy >= 0.0 { 90.0 } else { 270.0 };
  }
  let angle = (dy / dx).abs().atan().to_degrees();
  let angle = if dx < 0.0 {
    if dy >= 0.0 {
      180.0 - angle
    } else {
      180.0 + angle
    }
  } else if dy < 0.0 {
    360.0 - angle
  } else {
    angle
  };
  normalize_angle(angle)
}

/// Shortest signed rotation in `(-180, 180]` that turns `current_angle` to face `target`.
pub fn turn_delta(origin: Point, target: Point, current_angle: f64) -> f64 {
  let delta = (angle_to(origin, target) - current_angle).rem_euclid(360.0);
  if delta > 180.0 {
    delta - 360.0
  } else {
    delta
  }
}

pub fn project(origin: Point, angle: f64, distance: f64) -> Point {
  let radians = angle.to_radians();
  Point {
    x: origin.x + distance * radians.cos(),
    y: origin.y + distance * radians.sin(),
  }
}

/// Limits `value` to `[-max, max]` keeping its sign.
pub fn clamp_magnitude(value: f64, max: f64) -> f64 {
  sign(value) * value.abs().min(max.abs())
}
