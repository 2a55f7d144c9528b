pub mod game;
pub mod shared;
