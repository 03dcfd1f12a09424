//! Duel rules: turn queue, item resolution, the engine and its controllers

pub mod action;
pub mod controller;
pub mod dealer;
pub mod duel_loop;
pub mod item_resolver;
pub mod logger;
pub mod random_controller;
pub mod scene;
pub mod turn_result;

pub use action::{Action, ShotDirection};
pub use controller::{DuelController, DuelView};
pub use dealer::{Dealer, Slot, UsedItem, RUN_LENGTH};
pub use duel_loop::{DuelEndReason, DuelLoop, DuelOutcome};
pub use item_resolver::{use_item, ItemContext, ItemOutcome};
pub use logger::{DuelLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use random_controller::RandomController;
pub use scene::{DuelEngine, DuelSnapshot, DuelState};
pub use turn_result::{AdrenalineGrant, Rejection, TurnResult};
