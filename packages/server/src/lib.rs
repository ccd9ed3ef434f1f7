//! Goji game server library.
//!
//! A real-time, multi-player five-letter word race. Players join a room over
//! WebSocket, the owner starts a round, and everyone guesses the same hidden
//! word against a shared clock.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
