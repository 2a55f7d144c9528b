use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
  #[error("invalid turning direction {0:?}, expected left, right or none")]
  InvalidDirection(String),
  #[error("unknown intent {0:?}")]
  InvalidIntent(String),
  #[error("invalid color {0:?}, expected #rrggbb")]
  InvalidColor(String),
  #[error("main snake not found")]
  NoMainSnake,
  #[error("invalid config: {0}")]
  InvalidConfig(String),
}
