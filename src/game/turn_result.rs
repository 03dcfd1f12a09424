//! Per-turn output of the engine
//!
//! `TurnResult` is everything the transport layer needs to render a turn:
//! hit points, inventories, the disclosed magazine, narrative lines for both
//! players and who moves next.

use crate::core::{ChatId, ItemKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A recoverable refusal. The duel state is left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rejection {
    /// The claimed player does not own the current turn
    OutOfTurn,
    /// The acting player holds none of this item
    NoSuchItem(ItemKind),
    /// An item was already used in this turn
    ItemLimitReached,
    /// The target is still tied up
    AlreadyRestrained,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::OutOfTurn => write!(f, "Please, wait your turn"),
            Rejection::NoSuchItem(item) => write!(f, "You don't have {}", item.emoji()),
            Rejection::ItemLimitReached => write!(f, "❌Only 1 item per turn"),
            Rejection::AlreadyRestrained => write!(f, "You cannot re-link a linked player"),
        }
    }
}

/// A borrowed-inventory window that was just opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdrenalineGrant {
    /// Identifies this grant so a late timer cannot close a newer one
    pub id: u64,
    /// Player acting with the opponent's items
    pub holder: ChatId,
    pub window_ms: u64,
}

impl AdrenalineGrant {
    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Snapshot of one resolved request
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
    pub first_player_hp: String,
    pub second_player_hp: String,
    pub first_player_items: Vec<String>,
    pub second_player_items: Vec<String>,
    /// Sorted magazine contents, when disclosed
    pub rounds: Option<String>,
    pub active_player_action_result: String,
    pub passive_player_action_result: Option<String>,
    pub is_game_ended: bool,
    /// The turn passed to the other player
    pub give_turn: bool,
    /// Player who opens the duel (start only)
    pub on_start_first_id: Option<ChatId>,
    /// Parity of whoever moves next
    pub next_turn: Option<u8>,
    pub rejection: Option<Rejection>,
    pub adrenaline: Option<AdrenalineGrant>,
}

impl TurnResult {
    /// A refusal that only informs the requesting player
    pub fn rejected(rejection: Rejection) -> Self {
        TurnResult {
            active_player_action_result: rejection.to_string(),
            rejection: Some(rejection),
            ..TurnResult::default()
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }
}
