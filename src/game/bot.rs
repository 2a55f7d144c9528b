use super::food::FoodField;
use super::math::{project, turn_delta};
use super::snake::{BotState, Snake};
use super::types::Point;
use rand::Rng;

/// Probe bearings relative to the heading: straight, then the right and left
/// diagonals, then the right and left flanks.
pub const PROBE_OFFSETS: [f64; 5] = [0.0, 45.0, -45.0, 90.0, -90.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSample {
    pub offset: f64,
    pub point: Point,
    pub blocked: bool,
}

pub struct BotContext<'a> {
    pub food: &'a FoodField,
    pub tick: u64,
    pub retarget_after: u64,
    pub field_size: f64,
}

pub fn probe(snake: &Snake, distance: f64, mut is_blocked: impl FnMut(Point) -> bool) -> Vec<ProbeSample> {
    let head = snake.head_point();
    PROBE_OFFSETS
        .iter()
        .map(|offset| {
            let point = project(head, snake.angle + offset, distance);
            ProbeSample {
                offset: *offset,
                point,
                blocked: is_blocked(point),
            }
        })
        .collect()
}

/// Turn demanded by the probe, or `None` when the way ahead is clear.
pub fn avoidance_turn(samples: &[ProbeSample]) -> Option<f64> {
    let blocked = |offset: f64| {
        samples
            .iter()
            .any(|sample| sample.offset == offset && sample.blocked)
    };
    if blocked(45.0) && blocked(90.0) {
        return Some(-90.0);
    }
    if blocked(-45.0) && blocked(-90.0) {
        return Some(90.0);
    }
    if !blocked(0.0) {
        return None;
    }
    let escape = PROBE_OFFSETS[1..]
        .iter()
        .copied()
        .find(|offset| !blocked(*offset))
        .unwrap_or(180.0);
    Some(escape)
}

pub fn needs_new_target(
    state: &BotState,
    food_eaten: usize,
    food: &FoodField,
    tick: u64,
    retarget_after: u64,
) -> bool {
    if food_eaten > 0 {
        return true;
    }
    match (state.target_food, state.target_since) {
        (Some(id), Some(since)) => !food.contains(id) || tick.saturating_sub(since) > retarget_after,
        _ => true,
    }
}

fn wander(head: Point, angle: f64, max_turn: f64, ctx: &BotContext<'_>, rng: &mut impl Rng) -> f64 {
    let inside = (0.0..=ctx.field_size).contains(&head.x) && (0.0..=ctx.field_size).contains(&head.y);
    if inside {
        rng.gen_range(-max_turn..=max_turn)
    } else {
        let center = Point::new(ctx.field_size / 2.0, ctx.field_size / 2.0);
        turn_delta(head, center, angle)
    }
}

/// Chooses this tick's turn for a bot: avoidance first, then the food target,
/// then wandering. Records the probe and any retargeting on the bot state.
pub fn plan_turn(
    snake: &mut Snake,
    food_eaten: usize,
    samples: Vec<ProbeSample>,
    ctx: &BotContext<'_>,
    rng: &mut impl Rng,
) -> f64 {
    let head = snake.head_point();
    let angle = snake.angle;
    let max_turn = snake.config().max_turn_angle;
    let snake_id = snake.id;
    let avoidance = avoidance_turn(&samples);
    let Some(state) = snake.bot_mut() else { return 0.0 };
    state.last_probe = samples;

    if state.target_food.is_some_and(|id| !ctx.food.contains(id)) {
        state.target_food = None;
        state.target_since = None;
    }
    if let Some(turn) = avoidance {
        return turn;
    }
    if needs_new_target(state, food_eaten, ctx.food, ctx.tick, ctx.retarget_after) {
        let choice = ctx.food.nearest(head, angle).map(|food| food.id);
        tracing::trace!(snake_id, target = ?choice, "bot retargeted");
        state.target_food = choice;
        state.target_since = choice.map(|_| ctx.tick);
    }

    match state.target_food.and_then(|id| ctx.food.get(id)) {
        Some(food) => turn_delta(head, food.center(), angle),
        None => wander(head, angle, max_turn, ctx, rng),
    }
}

pub fn update(
    snake: &mut Snake,
    food_eaten: usize,
    samples: Vec<ProbeSample>,
    ctx: &BotContext<'_>,
    rng: &mut impl Rng,
    dt: f64,
) {
    let turn = plan_turn(snake, food_eaten, samples, ctx, rng);
    snake.steer(Some(turn));
    snake.update_speed(dt);
    snake.advance();
    snake.grow(food_eaten);
}
