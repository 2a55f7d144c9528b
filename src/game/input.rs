use super::error::GameError;
use super::types::{Intent, TurnDirection};
use std::str::FromStr;

/// Decodes a held turning direction; `none` or an empty value releases it.
pub fn parse_turning(value: &str) -> Result<Option<TurnDirection>, GameError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "left" => Ok(Some(TurnDirection::Left)),
        "right" => Ok(Some(TurnDirection::Right)),
        "" | "none" => Ok(None),
        _ => Err(GameError::InvalidDirection(value.to_string())),
    }
}

impl FromStr for Intent {
    type Err = GameError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        if let Some(direction) = normalized.strip_prefix("turn_") {
            return Ok(match parse_turning(direction) {
                Ok(Some(TurnDirection::Left)) => Intent::TurnLeft,
                Ok(Some(TurnDirection::Right)) => Intent::TurnRight,
                Ok(None) => Intent::TurnNone,
                Err(_) => return Err(GameError::InvalidIntent(value.to_string())),
            });
        }
        match normalized.as_str() {
            "boost_on" => Ok(Intent::BoostOn),
            "boost_off" => Ok(Intent::BoostOff),
            _ => Err(GameError::InvalidIntent(value.to_string())),
        }
    }
}
