//! Shotgun Duel - turn-based shotgun roulette engine
//!
//! Two players take turns firing a shotgun loaded with a random mix of live
//! and blank rounds, at the opponent or at themselves, helped by single-use
//! items. The crate holds the rules engine, a room registry for concurrent
//! matches and a parallel simulator.

pub mod core;
pub mod error;
pub mod game;
pub mod session;
pub mod simulation;

pub use error::{DuelError, Result};
