pub mod config;
pub mod errors;
pub mod server;
pub mod simulation;
pub mod state;
