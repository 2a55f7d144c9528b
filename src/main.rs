use anyhow::Context;
use snake_arena::game::config::GameConfig;
use snake_arena::game::session::{Session, SessionOptions};
use snake_arena::game::types::{Color, Intent};
use std::env;
use std::io::BufRead;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

const INPUT_QUEUE: usize = 64;

/// Runner settings that sit outside the simulation config.
#[derive(Debug, Default)]
struct RunnerOptions {
  max_ticks: Option<u64>,
  dump_state: bool,
  player_name: Option<String>,
  player_color: Option<Color>,
}

impl RunnerOptions {
  fn from_env() -> anyhow::Result<Self> {
    let max_ticks = match env::var("SNAKE_MAX_TICKS") {
      Ok(raw) => Some(
        raw
          .trim()
          .parse::<u64>()
          .with_context(|| format!("SNAKE_MAX_TICKS is not a tick count: {raw}"))?,
      ),
      Err(_) => None,
    };
    let dump_state = env::var("SNAKE_DUMP_STATE")
      .map(|value| matches!(value.trim(), "1" | "true" | "TRUE"))
      .unwrap_or(false);
    let player_color = match env::var("SNAKE_PLAYER_COLOR") {
      Ok(raw) if raw.trim().eq_ignore_ascii_case("random") => {
        Some(Color::random(&mut rand::thread_rng()))
      }
      Ok(raw) => Some(raw.trim().parse::<Color>()?),
      Err(_) => None,
    };
    Ok(Self {
      max_ticks,
      dump_state,
      player_name: env::var("SNAKE_PLAYER_NAME").ok(),
      player_color,
    })
  }
}

/// Blocking reader for the input thread. Sends non-blank lines until EOF, a
/// read error, or the runner dropping its receiver.
fn forward_lines(input: impl BufRead, sender: mpsc::Sender<String>) {
  for line in input.lines() {
    match line {
      Ok(raw) if raw.trim().is_empty() => {}
      Ok(raw) => {
        if sender.blocking_send(raw).is_err() {
          break;
        }
      }
      Err(err) => {
        tracing::warn!("stdin closed: {err}");
        break;
      }
    }
  }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let config = GameConfig::from_env()?;
  let runner = RunnerOptions::from_env()?;
  let tick_duration = Duration::from_secs_f64(config.tick_seconds());

  let mut session = Session::new(
    config,
    SessionOptions {
      snake_color: runner.player_color,
      player_name: runner.player_name.clone(),
    },
  )?;
  tracing::info!(session_id = %session.id(), ?runner, "headless session started");

  // A detached thread owns stdin so a pending read never holds up shutdown.
  let (input_tx, mut input_rx) = mpsc::channel::<String>(INPUT_QUEUE);
  std::thread::spawn(move || forward_lines(std::io::stdin().lock(), input_tx));
  let mut stdin_open = true;
  let mut interval = tokio::time::interval(tick_duration);
  interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

  loop {
    tokio::select! {
      _ = interval.tick() => {
        let result = session.tick();
        if let Some(message) = result.game_over_message {
          tracing::info!(tick = session.tick_count(), "{message}");
          break;
        }
        if runner.max_ticks.is_some_and(|max| session.tick_count() >= max) {
          tracing::info!(tick = session.tick_count(), "tick limit reached");
          break;
        }
      }
      line = input_rx.recv(), if stdin_open => {
        match line {
          Some(raw) => match raw.parse::<Intent>() {
            Ok(intent) => {
              if let Err(err) = session.handle_intent(intent) {
                tracing::warn!(?intent, "intent rejected: {err}");
              }
            }
            Err(err) => tracing::warn!("ignoring input: {err}"),
          },
          None => stdin_open = false,
        }
      }
    }
  }

  if runner.dump_state {
    println!("{}", serde_json::to_string_pretty(&session.render_state())?);
  }
  let player_length = session.player().map(|player| player.len()).unwrap_or(0);
  tracing::info!(
    ticks = session.tick_count(),
    running = session.is_running(),
    player_length,
    food = session.food().len(),
    "session finished"
  );
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Cursor;

  #[test]
  fn forwarded_lines_skip_blanks_and_end_at_eof() {
    let (sender, mut receiver) = mpsc::channel(8);
    forward_lines(Cursor::new("turn_left\n\n   \nboost_on\n"), sender);
    assert_eq!(receiver.blocking_recv().as_deref(), Some("turn_left"));
    assert_eq!(receiver.blocking_recv().as_deref(), Some("boost_on"));
    assert_eq!(receiver.blocking_recv(), None);
  }

  #[test]
  fn reader_stops_once_the_runner_is_gone() {
    let (sender, receiver) = mpsc::channel(1);
    drop(receiver);
    forward_lines(Cursor::new("turn_left\nturn_right\n"), sender);
  }
}
