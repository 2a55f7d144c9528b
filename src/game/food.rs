use super::config::FoodConfig;
use super::constants::FOOD_COLOR;
use super::math::{distance, turn_delta};
use super::registry::Registry;
use super::types::{Circle, Color, Point};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Food {
    pub id: u32,
    pub circle: Circle,
}

impl Food {
    pub fn center(&self) -> Point {
        self.circle.center()
    }
}

/// Capacity-bounded food population spread over the square field.
#[derive(Debug, Clone)]
pub struct FoodField {
    pellets: Registry<Food>,
    config: FoodConfig,
    field_size: f64,
    color: Color,
}

fn touches(head: &Circle, food: &Circle) -> bool {
    let reach = head.radius + food.radius;
    if (head.x - food.x).abs() > reach || (head.y - food.y).abs() > reach {
        return false;
    }
    distance(head.center(), food.center()) < reach
}

impl FoodField {
    pub fn new(config: FoodConfig, field_size: f64, id_wrap: u32) -> Self {
        Self {
            pellets: Registry::with_id_wrap(id_wrap),
            config,
            field_size,
            color: Color::from_tuple(FOOD_COLOR),
        }
    }

    pub fn len(&self) -> usize {
        self.pellets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pellets.is_empty()
    }

    pub fn contains(&self, id: u32) -> bool {
        self.pellets.contains(id)
    }

    pub fn get(&self, id: u32) -> Option<&Food> {
        self.pellets.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Food> {
        self.pellets.values()
    }

    /// Inclusive coordinate range for random pellets, inset by the margin.
    fn spawn_bounds(&self) -> (f64, f64) {
        let low = self.field_size * self.config.margin;
        (low, self.field_size - low)
    }

    pub fn random_position(&self, rng: &mut impl Rng) -> Point {
        let (low, high) = self.spawn_bounds();
        Point::new(rng.gen_range(low..=high), rng.gen_range(low..=high))
    }

    /// Adds a pellet at `position`. Without `force` the call is a no-op once the
    /// population has reached `max_count`.
    pub fn spawn_at(&mut self, position: Point, force: bool) -> Option<u32> {
        if !force && self.pellets.len() >= self.config.max_count {
            tracing::trace!(population = self.pellets.len(), "food at capacity, pellet dropped");
            return None;
        }
        let radius = self.config.radius;
        let color = self.color;
        self.pellets.insert_with(|id| Food {
            id,
            circle: Circle::new(position, radius, color),
        })
    }

    pub fn spawn_random(&mut self, rng: &mut impl Rng, force: bool) -> Option<u32> {
        let position = self.random_position(rng);
        self.spawn_at(position, force)
    }

    /// Forced bulk spawn used for the opening population.
    pub fn seed(&mut self, count: usize, rng: &mut impl Rng) -> usize {
        let (low, high) = self.spawn_bounds();
        let radius = self.config.radius;
        let color = self.color;
        self.pellets
            .insert_many(count, |id| {
                let position = Point::new(rng.gen_range(low..=high), rng.gen_range(low..=high));
                Food {
                    id,
                    circle: Circle::new(position, radius, color),
                }
            })
            .len()
    }

    /// Removes every pellet under `head`, spawns one unforced replacement per
    /// pellet and returns how many were eaten.
    pub fn consume(&mut self, head: &Circle, rng: &mut impl Rng) -> usize {
        let before = self.pellets.len();
        self.pellets.retain(|_, food| !touches(head, &food.circle));
        let eaten = before - self.pellets.len();
        for _ in 0..eaten {
            self.spawn_random(rng, false);
        }
        eaten
    }

    /// Pellet minimising `|turn_delta| * weight + distance` as seen from `point`
    /// while heading along `current_angle`.
    pub fn nearest(&self, point: Point, current_angle: f64) -> Option<&Food> {
        let weight = self.config.nearest_turn_weight;
        self.pellets
            .values()
            .map(|food| {
                let center = food.center();
                let score =
                    turn_delta(point, center, current_angle).abs() * weight + distance(point, center);
                (food, score)
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(food, _)| food)
    }
}
