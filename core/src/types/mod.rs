//! Data types shared by the service and its clients.

pub mod api;
mod player;

// Re-export all types
pub use api::*;
pub use player::{NewPlayer, Player, PlayerOrder, Profession, Race};
