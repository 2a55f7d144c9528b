pub const FIELD_SIZE: f64 = 1500.0;
pub const VIEWPORT_SIZE: f64 = 800.0;
pub const TICK_RATE: u32 = 30;

pub const INITIAL_FOOD_COUNT: usize = 500;
pub const MAX_FOOD_COUNT: usize = 200;
pub const FOOD_RADIUS: f64 = 5.0;
pub const FOOD_MARGIN: f64 = 0.05;
pub const NEAREST_FOOD_TURN_WEIGHT: f64 = 1.0;

pub const SNAKE_INITIAL_RADIUS: f64 = 10.0;
pub const SNAKE_MAX_RADIUS: f64 = 25.0;
pub const SNAKE_GROWTH_COEF: f64 = 1.007;
pub const SNAKE_INITIAL_LENGTH: usize = 3;
pub const SNAKE_MAX_TURN_ANGLE: f64 = 10.0;
pub const SNAKE_BASE_SPEED: f64 = 5.0;
pub const SNAKE_ACCELERATION: f64 = 3.0;
pub const SNAKE_MAX_BOOSTED_SPEED: f64 = 10.0;
/// Followers are re-placed once they lag further than this fraction of the radius.
pub const FOLLOW_SLACK: f64 = 0.5;
/// Spacing between re-placed segments, as a fraction of the diameter.
pub const FOLLOW_SPACING: f64 = 0.7;

pub const BOT_SEED_POSITIONS: [(f64, f64); 4] =
  [(100.0, 100.0), (300.0, 300.0), (500.0, 500.0), (700.0, 700.0)];
pub const BOT_PROBE_DISTANCE: f64 = 50.0;
pub const BOT_RETARGET_TIMEOUT_MS: u64 = 1000;
pub const BOT_RESPAWN_ATTEMPTS: usize = 10;
pub const BOT_SPAWN_MARGIN: f64 = 0.1;
pub const BOT_SPAWN_CLEARANCE_TICKS: f64 = 3.0;

pub const COLLISION_GROUP_SIZE: usize = 5;
pub const ID_WRAP: u32 = 10_000;

pub const PLAYER_COLOR: (u8, u8, u8) = (255, 192, 203);
pub const BOT_COLOR: (u8, u8, u8) = (64, 255, 108);
pub const BOT_HEAD_COLOR: (u8, u8, u8) = (60, 255, 113);
pub const FOOD_COLOR: (u8, u8, u8) = (222, 205, 245);

pub const DEFAULT_PLAYER_NAME: &str = "Player";
pub const GAME_OVER_PREFIX: &str = "Game over";
