//! Player actions

use crate::core::ItemKind;
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the shotgun is pointed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShotDirection {
    /// Shoot yourself: a blank keeps the turn
    Myself,
    /// Shoot the opponent: always hands the turn over
    Opponent,
}

/// One thing the active player can do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Shoot(ShotDirection),
    UseItem(ItemKind),
}

impl Action {
    pub const SHOOT_SELF: Action = Action::Shoot(ShotDirection::Myself);
    pub const SHOOT_OPPONENT: Action = Action::Shoot(ShotDirection::Opponent);

    /// Parse a transport token ("me", "him", 🔽, 🔼, an item token or emoji)
    pub fn parse_token(token: &str) -> Result<Action> {
        token.parse()
    }
}

impl FromStr for Action {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "me" | "self" | "🔽" => Ok(Action::SHOOT_SELF),
            "him" | "opponent" | "🔼" => Ok(Action::SHOOT_OPPONENT),
            other => other
                .parse::<ItemKind>()
                .map(Action::UseItem)
                .map_err(|_| DuelError::InvalidAction(other.to_string())),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Shoot(ShotDirection::Myself) => write!(f, "me"),
            Action::Shoot(ShotDirection::Opponent) => write!(f, "him"),
            Action::UseItem(item) => write!(f, "{item}"),
        }
    }
}

impl From<ItemKind> for Action {
    fn from(item: ItemKind) -> Self {
        Action::UseItem(item)
    }
}
