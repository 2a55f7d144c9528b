use crate::game::constants::DEFAULT_PLAYER_NAME;

pub const MAX_NAME_LENGTH: usize = 20;

/// Collapses whitespace runs and truncates to `MAX_NAME_LENGTH` characters,
/// falling back to the default player name when nothing is left.
pub fn sanitize_player_name(raw: Option<&str>) -> String {
  let collapsed = raw
    .map(|name| name.split_whitespace().collect::<Vec<_>>().join(" "))
    .unwrap_or_default();
  if collapsed.is_empty() {
    return DEFAULT_PLAYER_NAME.to_string();
  }
  collapsed.chars().take(MAX_NAME_LENGTH).collect()
}

pub fn bot_name(index: usize) -> String {
  format!("Bot-{index}")
}
