//! axum server for the Goji game.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
