pub mod bot;
pub mod collision;
pub mod config;
pub mod constants;
pub mod error;
pub mod food;
pub mod input;
pub mod math;
pub mod registry;
pub mod session;
pub mod snake;
pub mod types;
