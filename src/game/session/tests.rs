use super::*;
use crate::game::constants::BOT_SEED_POSITIONS;
use crate::game::types::Circle;

fn quiet_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.seed = Some(7);
    config.food.initial_count = 0;
    config.bots.seed_positions = Vec::new();
    config
}

fn make_session(config: GameConfig) -> Session {
    Session::new(config, SessionOptions::default()).expect("session")
}

fn shift_snake(session: &mut Session, id: u32, dx: f64, dy: f64) {
    let snake = session.snakes.get_mut(id).expect("snake");
    for segment in &mut snake.segments {
        segment.x += dx;
        segment.y += dy;
    }
}

fn segment_center(session: &Session, id: u32, index: usize) -> Point {
    session.snakes.get(id).expect("snake").segments[index].center()
}

fn player_id(session: &Session) -> u32 {
    session.player().expect("player").id
}

#[test]
fn default_session_seeds_food_player_and_bots() {
    let session = create_session(Some(Color::rgb(1, 2, 3))).expect("session");

    // Initial seeding ignores the running cap.
    assert_eq!(session.food().len(), 500);
    assert_eq!(session.snakes().len(), 5);
    assert!(session.is_running());
    assert_eq!(session.tick_count(), 0);

    let player = session.player().expect("player");
    assert_eq!(player.head_point(), Point::new(750.0, 750.0));
    assert_eq!(player.segments[0].color, Color::rgb(1, 2, 3));
    assert_eq!(player.name, "Player");

    let bots: Vec<(String, Point)> = session
        .snakes()
        .values()
        .filter(|snake| snake.is_bot())
        .map(|snake| (snake.name.clone(), snake.head_point()))
        .collect();
    let expected: Vec<(String, Point)> = BOT_SEED_POSITIONS
        .iter()
        .enumerate()
        .map(|(index, position)| (format!("Bot-{}", index + 1), Point::from(*position)))
        .collect();
    assert_eq!(bots, expected);
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = quiet_config();
    config.tick_rate = 0;
    assert!(matches!(
        Session::new(config, SessionOptions::default()),
        Err(GameError::InvalidConfig(_))
    ));
}

#[test]
fn intents_steer_and_boost_the_player() {
    let mut session = make_session(quiet_config());
    session.handle_intent(Intent::TurnRight).expect("turn");
    session.handle_intent(Intent::BoostOn).expect("boost");

    let result = session.tick();

    assert_eq!(result, TickResult::running());
    let player = session.player().expect("player");
    assert_eq!(player.turning, Some(TurnDirection::Right));
    assert!(player.boost);
    assert!((player.angle - 10.0).abs() < 1e-9);
    assert!(player.speed > 5.0);

    session.handle_intent(Intent::TurnNone).expect("release");
    session.tick();
    let player = session.player().expect("player");
    assert_eq!(player.turning, None);
    assert!((player.angle - 10.0).abs() < 1e-9);
}

#[test]
fn player_leaving_the_field_ends_the_game_for_good() {
    let mut session = make_session(quiet_config());
    let id = player_id(&session);
    shift_snake(&mut session, id, -800.0, 0.0);

    let first = session.tick();
    assert!(!first.still_running);
    assert_eq!(
        first.game_over_message.as_deref(),
        Some("Game over: left the field")
    );
    assert!(!session.is_running());
    let ticks = session.tick_count();

    let again = session.tick();
    assert_eq!(again, first);
    assert_eq!(session.tick_count(), ticks);
    assert_eq!(session.player().err(), Some(GameError::NoMainSnake));
    assert_eq!(
        session.handle_intent(Intent::BoostOn),
        Err(GameError::NoMainSnake)
    );
}

#[test]
fn camera_follows_the_player_and_freezes_after_death() {
    let mut session = make_session(quiet_config());
    assert_eq!(session.camera_offset(), Point::new(-350.0, -350.0));

    session.tick();
    let head = session.player().expect("player").head_point();
    let offset = session.camera_offset();
    assert!((offset.x - (400.0 - head.x)).abs() < 1e-9);
    assert!((offset.y - (400.0 - head.y)).abs() < 1e-9);

    let id = player_id(&session);
    let last_head = segment_center(&session, id, 0);
    shift_snake(&mut session, id, 0.0, 2000.0);
    session.tick();
    let frozen = session.camera_offset();
    assert!((frozen.x - (400.0 - last_head.x)).abs() < 1e-9);
    assert!((frozen.y - (400.0 - (last_head.y + 2000.0))).abs() < 1e-9);
}

#[test]
fn bots_outside_the_field_turn_into_food_and_are_replaced() {
    let mut session = make_session(quiet_config());
    let bot = session.spawn_bot(Point::new(300.0, 300.0), 0.0).expect("bot");
    shift_snake(&mut session, bot, -400.0, 0.0);
    let remains: Vec<Point> = session
        .snakes
        .get(bot)
        .expect("bot")
        .segments
        .iter()
        .map(Circle::center)
        .collect();

    let result = session.tick();

    assert!(result.still_running);
    assert!(!session.snakes().contains(bot));
    assert_eq!(session.snakes().len(), 2);
    assert_eq!(session.food().len(), remains.len());
    for point in &remains {
        assert!(session.food().iter().any(|food| food.center() == *point));
    }

    let replacement = session
        .snakes()
        .values()
        .find(|snake| snake.is_bot())
        .expect("replacement bot");
    assert_ne!(replacement.id, bot);
    assert_eq!(replacement.name, "Bot-2");
    let player_head = session.player().expect("player").head_point();
    assert!(distance(replacement.head_point(), player_head) > 430.0);
}

#[test]
fn bot_remains_become_food_even_above_capacity() {
    let mut config = quiet_config();
    config.food.max_count = 0;
    let mut session = make_session(config);
    let bot = session.spawn_bot(Point::new(300.0, 300.0), 0.0).expect("bot");
    let length = session.snakes.get(bot).expect("bot").len();

    session.handle_death(bot, DeathCause::OutOfBounds);

    assert_eq!(session.food().len(), length);
    assert_eq!(session.pending_respawns, 1);
    assert!(session.is_running());
}

#[test]
fn head_on_tie_kills_the_lower_id_in_every_run() {
    let run = || {
        let mut session = make_session(quiet_config());
        let left = session.spawn_bot(Point::new(400.0, 400.0), 0.0).expect("left");
        let right = session.spawn_bot(Point::new(415.0, 400.0), 180.0).expect("right");
        session.tick();
        (
            left,
            right,
            session.snakes().contains(left),
            session.snakes().contains(right),
        )
    };

    let first = run();
    assert_eq!(first, run());
    let (left, right, left_alive, right_alive) = first;
    assert!(left < right);
    assert!(!left_alive);
    assert!(right_alive);
}

#[test]
fn one_death_can_clear_a_dependent_collision() {
    let mut session = make_session(quiet_config());
    let struck = session.spawn_bot(Point::new(500.0, 500.0), 90.0).expect("struck");
    let striker_head = segment_center(&session, struck, 2);
    let striker = session.spawn_bot(striker_head, 0.0).expect("striker");
    let below_striker_tail = {
        let tail = segment_center(&session, striker, 2);
        Point::new(tail.x, tail.y + 18.0)
    };
    let follower = session.spawn_bot(below_striker_tail, 90.0).expect("follower");

    session.collisions.invalidate();
    let deaths = session.resolve_collisions();

    assert_eq!(deaths, 1);
    assert!(!session.snakes().contains(striker));
    assert!(session.snakes().contains(struck));
    assert!(session.snakes().contains(follower));
    assert_eq!(session.pending_respawns, 1);
}

#[test]
fn independent_collisions_all_resolve_in_one_tick() {
    let mut session = make_session(quiet_config());
    let first_struck = session.spawn_bot(Point::new(300.0, 300.0), 90.0).expect("bot");
    let first_striker = session
        .spawn_bot(segment_center(&session, first_struck, 2), 0.0)
        .expect("bot");
    let second_struck = session.spawn_bot(Point::new(1100.0, 300.0), 90.0).expect("bot");
    let second_striker = session
        .spawn_bot(segment_center(&session, second_struck, 2), 0.0)
        .expect("bot");
    let before = session.snakes().len();

    session.tick();

    assert!(!session.snakes().contains(first_striker));
    assert!(!session.snakes().contains(second_striker));
    assert!(session.snakes().contains(first_struck));
    assert!(session.snakes().contains(second_struck));
    // Both dead bots were replaced after the collision pass.
    assert_eq!(session.snakes().len(), before);
    assert_eq!(session.pending_respawns, 0);
}

#[test]
fn player_grows_after_eating() {
    let mut session = make_session(quiet_config());
    let pellet = session
        .food
        .spawn_at(Point::new(760.0, 750.0), false)
        .expect("pellet");

    session.tick();

    let player = session.player().expect("player");
    assert_eq!(player.len(), 4);
    assert!(player.radius > 10.07);
    assert!(!session.food().contains(pellet));
    // The eaten pellet is replaced while under the cap.
    assert_eq!(session.food().len(), 1);
}

fn retarget_session(tick: u64) -> (Session, u32, u32, u32) {
    let mut session = make_session(quiet_config());
    let ahead = session
        .food
        .spawn_at(Point::new(600.0, 400.0), false)
        .expect("ahead");
    let aside = session
        .food
        .spawn_at(Point::new(400.0, 700.0), false)
        .expect("aside");
    let bot = session.spawn_bot(Point::new(400.0, 400.0), 0.0).expect("bot");
    let state = session
        .snakes
        .get_mut(bot)
        .and_then(Snake::bot_mut)
        .expect("bot state");
    state.target_food = Some(aside);
    state.target_since = Some(0);
    session.tick = tick;
    (session, bot, ahead, aside)
}

#[test]
fn bot_keeps_its_target_until_the_timeout() {
    let (mut session, bot, _, aside) = retarget_session(30);
    session.tick();
    let state = session.snakes().get(bot).and_then(Snake::bot).expect("bot state");
    assert_eq!(state.target_food, Some(aside));
    assert_eq!(state.target_since, Some(0));
}

#[test]
fn bot_retargets_once_the_timeout_passes() {
    let (mut session, bot, ahead, _) = retarget_session(31);
    session.tick();
    let state = session.snakes().get(bot).and_then(Snake::bot).expect("bot state");
    assert_eq!(state.target_food, Some(ahead));
    assert_eq!(state.target_since, Some(31));
    assert_eq!(state.last_probe.len(), 5);
}

#[test]
fn render_state_includes_debug_overlay_when_enabled() {
    let mut config = quiet_config();
    config.debug_overlays = true;
    let mut session = make_session(config);
    session.spawn_bot(Point::new(300.0, 300.0), 0.0).expect("bot");
    let pellet = session
        .food
        .spawn_at(Point::new(500.0, 300.0), false)
        .expect("pellet");
    session.tick();

    let state = session.render_state();
    assert_eq!(state.tick, 1);
    assert_eq!(state.snakes.len(), 2);
    assert_eq!(state.snakes.iter().filter(|snake| snake.is_player).count(), 1);
    assert_eq!(state.food.len(), 1);

    let overlay = state.debug.as_ref().expect("debug overlay");
    assert_eq!(overlay.collision_boxes.len(), 2);
    assert_eq!(overlay.bots.len(), 1);
    assert_eq!(overlay.bots[0].probes.len(), 5);
    assert_eq!(
        overlay.bots[0].target,
        session.food().get(pellet).map(|food| food.center())
    );
    assert!(serde_json::to_string(&state).is_ok());

    let plain = make_session(quiet_config());
    assert!(plain.render_state().debug.is_none());
}

#[test]
fn seeded_sessions_replay_identically() {
    let mut config = GameConfig::default();
    config.seed = Some(42);
    let mut first = make_session(config.clone());
    let mut second = make_session(config);
    let script = [Intent::TurnLeft, Intent::BoostOn, Intent::TurnNone, Intent::BoostOff];

    for step in 0..120 {
        if step % 30 == 0 {
            let intent = script[(step / 30) % script.len()];
            let _ = first.handle_intent(intent);
            let _ = second.handle_intent(intent);
        }
        assert_eq!(first.tick(), second.tick());
    }

    let first_state = serde_json::to_value(first.render_state()).expect("json");
    let second_state = serde_json::to_value(second.render_state()).expect("json");
    assert_eq!(first_state, second_state);
}

#[test]
fn respawn_falls_back_to_the_corner_farthest_from_the_player() {
    let mut config = quiet_config();
    config.bots.respawn_attempts = 0;
    let mut session = make_session(config);
    let id = player_id(&session);
    shift_snake(&mut session, id, -300.0, -300.0);

    let (position, angle) = session.find_bot_spawn();

    assert_eq!(position, Point::new(1350.0, 1350.0));
    assert!((angle - 225.0).abs() < 1e-9);
}

#[test]
fn respawn_rejects_points_inside_a_snake_silhouette() {
    let mut config = quiet_config();
    // Every candidate lands inside the player's head box, and a still player
    // needs no clearance.
    config.bots.spawn_margin = 0.49;
    config.snake.initial_radius = 25.0;
    config.snake.max_radius = 25.0;
    config.snake.base_speed = 0.0;
    let mut session = make_session(config);
    let corners = [
        Point::new(735.0, 735.0),
        Point::new(765.0, 735.0),
        Point::new(735.0, 765.0),
        Point::new(765.0, 765.0),
    ];

    session.collisions.invalidate();
    let (position, _) = session.find_bot_spawn();

    assert!(corners
        .iter()
        .any(|corner| (corner.x - position.x).abs() < 1e-9 && (corner.y - position.y).abs() < 1e-9));
}
