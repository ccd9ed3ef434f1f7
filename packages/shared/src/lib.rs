//! Utilities shared by the Goji packages.

pub mod logger;
pub mod time;
