pub mod config;
pub mod game_state;
pub mod message;
pub mod night_events;
