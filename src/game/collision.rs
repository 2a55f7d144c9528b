use super::math::turn_delta;
use super::registry::Registry;
use super::snake::Snake;
use super::types::{Circle, Point, Rect};
use std::collections::HashMap;

/// Union rectangles over consecutive runs of `group_size` segments, head first.
pub fn coarse_boxes(snake: &Snake, group_size: usize) -> Vec<Rect> {
    snake
        .segments
        .chunks(group_size.max(1))
        .filter_map(|group| {
            group
                .iter()
                .map(Circle::bounds)
                .reduce(|merged, next| merged.union(&next))
        })
        .collect()
}

/// Per-tick coarse boxes keyed by snake id, filled lazily on first query.
/// Must be invalidated before any collision work in a new tick.
#[derive(Debug, Clone)]
pub struct CollisionCache {
    group_size: usize,
    boxes: HashMap<u32, Vec<Rect>>,
}

impl CollisionCache {
    pub fn new(group_size: usize) -> Self {
        Self {
            group_size: group_size.max(1),
            boxes: HashMap::new(),
        }
    }

    pub fn invalidate(&mut self) {
        self.boxes.clear();
    }

    #[cfg(test)]
    fn is_cached(&self, snake_id: u32) -> bool {
        self.boxes.contains_key(&snake_id)
    }

    pub fn boxes_for(&mut self, snake: &Snake) -> &[Rect] {
        let group_size = self.group_size;
        self.boxes
            .entry(snake.id)
            .or_insert_with(|| coarse_boxes(snake, group_size))
    }

    /// Whether `point` falls inside the silhouette of any snake but `exclude`.
    pub fn point_in_any_box(
        &mut self,
        snakes: &Registry<Snake>,
        point: Point,
        exclude: Option<u32>,
    ) -> bool {
        for snake in snakes.values() {
            if Some(snake.id) == exclude || !snake.alive {
                continue;
            }
            if self.boxes_for(snake).iter().any(|rect| rect.contains(point)) {
                return true;
            }
        }
        false
    }

    /// Coarse pre-filter: overlapping circles always have overlapping bounds.
    pub fn may_collide(&mut self, head: &Circle, other: &Snake) -> bool {
        let head_bounds = head.bounds();
        self.boxes_for(other)
            .iter()
            .any(|rect| rect.intersects(&head_bounds))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    HeadOn,
    HeadToBody { segment: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionOutcome {
    pub loser: u32,
    pub winner: u32,
    pub kind: CollisionKind,
}

/// Decides who dies when `striker`'s head overlaps `struck` at `segment`.
///
/// Head-to-body kills the striker. Head-on kills whichever snake needed the
/// smaller turn to face the other's head; on a tie the striker dies.
pub fn resolve_pair(striker: &Snake, struck: &Snake, segment: usize) -> CollisionOutcome {
    if segment != 0 {
        return CollisionOutcome {
            loser: striker.id,
            winner: struck.id,
            kind: CollisionKind::HeadToBody { segment },
        };
    }

    let striker_turn = turn_delta(striker.head_point(), struck.head_point(), striker.angle).abs();
    let struck_turn = turn_delta(struck.head_point(), striker.head_point(), struck.angle).abs();
    let (loser, winner) = if striker_turn <= struck_turn {
        (striker.id, struck.id)
    } else {
        (struck.id, striker.id)
    };
    CollisionOutcome {
        loser,
        winner,
        kind: CollisionKind::HeadOn,
    }
}

/// First collision in ascending id order of strikers, then of struck snakes.
pub fn find_first_collision(
    cache: &mut CollisionCache,
    snakes: &Registry<Snake>,
) -> Option<CollisionOutcome> {
    for striker in snakes.values() {
        if !striker.alive {
            continue;
        }
        for struck in snakes.values() {
            if struck.id == striker.id || !struck.alive {
                continue;
            }
            if !cache.may_collide(striker.head(), struck) {
                continue;
            }
            if let Some(segment) = striker.find_collision(struck, true) {
                return Some(resolve_pair(striker, struck, segment));
            }
        }
    }
    None
}
