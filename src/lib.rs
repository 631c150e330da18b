pub mod army;
pub mod board;
pub mod combat;
pub mod connectivity;
pub mod constants;
pub mod error;
pub mod events;
pub mod game;
pub mod game_config;
pub mod link;
pub mod odds;
pub mod player;
pub mod selection;
pub mod squad;
pub mod territory;
pub mod unit;
