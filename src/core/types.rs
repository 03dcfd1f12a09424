//! Strongly-typed wrappers for duel concepts
//!
//! Player identities travel through the engine as distinct newtypes so a chat id
//! can never be confused with a room id or a queue position.

use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest display name accepted at seating time
pub const MAX_NAME_LEN: usize = 25;

/// Stable numeric chat identifier of a player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChatId(i64);

impl ChatId {
    pub const fn new(id: i64) -> Self {
        ChatId(id)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        ChatId(id)
    }
}

/// Player display name, trimmed and 1-25 characters long
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    /// Validate and build a name; surrounding whitespace is stripped first
    pub fn new(s: impl AsRef<str>) -> Result<Self> {
        let trimmed = s.as_ref().trim();
        let len = trimmed.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(DuelError::InvalidPlayerName(format!(
                "'{trimmed}' must be between 1 and {MAX_NAME_LEN} characters"
            )));
        }
        Ok(PlayerName(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which of the two chairs a player sits in
///
/// The seat doubles as the turn parity: slots owned by the first seat carry
/// parity 0, slots owned by the second seat carry parity 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    First,
    Second,
}

impl Seat {
    pub fn from_parity(parity: u8) -> Self {
        if parity % 2 == 0 {
            Seat::First
        } else {
            Seat::Second
        }
    }

    pub fn parity(&self) -> u8 {
        match self {
            Seat::First => 0,
            Seat::Second => 1,
        }
    }

    pub fn other(&self) -> Seat {
        match self {
            Seat::First => Seat::Second,
            Seat::Second => Seat::First,
        }
    }
}
