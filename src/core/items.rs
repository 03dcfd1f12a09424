//! Item kinds
//!
//! The nine single-use items a player can carry. Every kind has a stable
//! lowercase token (used by the transport layer) and an emoji (used for
//! rendering inventories and keyboards).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single-use item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Handsaw,
    Beer,
    Smoke,
    Handcuff,
    MagnifyingGlass,
    Phone,
    Pills,
    Adrenaline,
    Inverter,
}

impl ItemKind {
    /// Number of item kinds
    pub const COUNT: usize = 9;

    /// Every kind, in inventory order
    pub const ALL: [ItemKind; ItemKind::COUNT] = [
        ItemKind::Handsaw,
        ItemKind::Beer,
        ItemKind::Smoke,
        ItemKind::Handcuff,
        ItemKind::MagnifyingGlass,
        ItemKind::Phone,
        ItemKind::Pills,
        ItemKind::Adrenaline,
        ItemKind::Inverter,
    ];

    /// Slot of this kind in an inventory counter array
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn token(&self) -> &'static str {
        match self {
            ItemKind::Handsaw => "handsaw",
            ItemKind::Beer => "beer",
            ItemKind::Smoke => "smoke",
            ItemKind::Handcuff => "handcuff",
            ItemKind::MagnifyingGlass => "magnifying_glass",
            ItemKind::Phone => "phone",
            ItemKind::Pills => "pills",
            ItemKind::Adrenaline => "adrenaline",
            ItemKind::Inverter => "inverter",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ItemKind::Handsaw => "🪚",
            ItemKind::Beer => "🍺",
            ItemKind::Smoke => "🚬",
            ItemKind::Handcuff => "🔗",
            ItemKind::MagnifyingGlass => "🔍",
            ItemKind::Phone => "📞",
            ItemKind::Pills => "💊",
            ItemKind::Adrenaline => "💉",
            ItemKind::Inverter => "🔀",
        }
    }

    /// Repeatable items never count toward the one-item-per-turn limit
    pub fn is_repeatable(&self) -> bool {
        matches!(self, ItemKind::Adrenaline)
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

impl FromStr for ItemKind {
    type Err = String;

    /// Accepts the token, the bare emoji, or a rendered `"<emoji>x<count>"` button
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        ItemKind::ALL
            .iter()
            .copied()
            .find(|kind| {
                s.eq_ignore_ascii_case(kind.token())
                    || s == kind.emoji()
                    || s.strip_prefix(kind.emoji())
                        .is_some_and(|rest| rest.starts_with('x'))
            })
            .ok_or_else(|| format!("unknown item '{s}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_order() {
        for (i, kind) in ItemKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn test_parse_tokens_and_emoji() {
        assert_eq!("beer".parse::<ItemKind>().unwrap(), ItemKind::Beer);
        assert_eq!(
            "magnifying_glass".parse::<ItemKind>().unwrap(),
            ItemKind::MagnifyingGlass
        );
        assert_eq!("🔗".parse::<ItemKind>().unwrap(), ItemKind::Handcuff);
        assert_eq!("🪚x2".parse::<ItemKind>().unwrap(), ItemKind::Handsaw);
        assert!("grenade".parse::<ItemKind>().is_err());
    }

    #[test]
    fn test_only_adrenaline_is_repeatable() {
        let repeatable: Vec<_> = ItemKind::ALL.iter().filter(|k| k.is_repeatable()).collect();
        assert_eq!(repeatable, vec![&ItemKind::Adrenaline]);
    }
}
