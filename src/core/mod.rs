//! Core duel types: identities, items, inventories, players, the shotgun, configuration

pub mod config;
pub mod inventory;
pub mod items;
pub mod player;
pub mod shotgun;
pub mod types;

pub use config::{DuelConfig, ItemWeight, MagazineConfig};
pub use inventory::{Inventory, MAX_ITEMS};
pub use items::ItemKind;
pub use player::{PlayerState, MAX_HP};
pub use shotgun::{Round, Shotgun};
pub use types::{ChatId, PlayerName, Seat};
