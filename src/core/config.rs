//! Duel configuration
//!
//! Every tunable constant of a duel lives here: hit point range, magazine
//! statistics, item spawn weights, item count pools and effect timings. The
//! defaults reproduce the classic rules; a JSON file can override any subset.

use crate::core::ItemKind;
use crate::{DuelError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Statistics used when the shotgun is recharged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MagazineConfig {
    pub mean_rounds: f64,
    pub std_dev_rounds: f64,
    pub mean_live_rounds: f64,
    pub std_dev_live_rounds: f64,
    pub min_rounds: usize,
    pub max_rounds: usize,
}

impl Default for MagazineConfig {
    fn default() -> Self {
        MagazineConfig {
            mean_rounds: 5.0,
            std_dev_rounds: 1.5,
            mean_live_rounds: 2.5,
            std_dev_live_rounds: 1.5,
            min_rounds: 2,
            max_rounds: 8,
        }
    }
}

/// Relative spawn weight of one item kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemWeight {
    pub item: ItemKind,
    pub weight: u32,
}

/// Complete rule set for a duel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuelConfig {
    /// Lowest starting hp (inclusive)
    pub min_hp: i32,
    /// Highest starting hp (inclusive)
    pub max_hp: i32,
    pub magazine: MagazineConfig,
    /// Weighted table for random item distribution
    pub item_weights: Vec<ItemWeight>,
    /// Pool the per-player item count is drawn from at duel start
    pub start_item_counts: Vec<usize>,
    /// Pool the per-player item count is drawn from on every recharge
    pub recharge_item_counts: Vec<usize>,
    /// How long a borrowed inventory stays usable
    pub adrenaline_window_ms: u64,
    /// Chance (in percent) that pills heal instead of hurt
    pub pills_heal_percent: u32,
    pub pills_heal_amount: i32,
    pub pills_damage: i32,
    /// Restrained counter applied by handcuffs
    pub restrained_turns: u8,
}

impl Default for DuelConfig {
    fn default() -> Self {
        let weighted = |item, weight| ItemWeight { item, weight };
        DuelConfig {
            min_hp: 3,
            max_hp: 6,
            magazine: MagazineConfig::default(),
            item_weights: vec![
                weighted(ItemKind::Handsaw, 1),
                weighted(ItemKind::Beer, 1),
                weighted(ItemKind::Pills, 1),
                weighted(ItemKind::Phone, 1),
                weighted(ItemKind::Adrenaline, 0),
                weighted(ItemKind::Handcuff, 1),
                weighted(ItemKind::Smoke, 1),
                weighted(ItemKind::MagnifyingGlass, 1),
                weighted(ItemKind::Inverter, 1),
            ],
            start_item_counts: vec![1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 3, 4],
            recharge_item_counts: vec![1, 1, 1, 1, 2, 2, 2, 3, 3, 4],
            adrenaline_window_ms: 5000,
            pills_heal_percent: 40,
            pills_heal_amount: 2,
            pills_damage: 1,
            restrained_turns: 3,
        }
    }
}

impl DuelConfig {
    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DuelConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&json)
    }

    /// Save this config as pretty JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn adrenaline_window(&self) -> Duration {
        Duration::from_millis(self.adrenaline_window_ms)
    }

    /// Weight of an item in the distribution table (0 if absent)
    pub fn weight_of(&self, item: ItemKind) -> u32 {
        self.item_weights
            .iter()
            .filter(|w| w.item == item)
            .map(|w| w.weight)
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_hp < 1 || self.max_hp > crate::core::MAX_HP || self.min_hp > self.max_hp {
            return Err(DuelError::Config(format!(
                "hp range {}..={} must lie within 1..={}",
                self.min_hp,
                self.max_hp,
                crate::core::MAX_HP
            )));
        }

        let m = &self.magazine;
        if m.min_rounds < 2 || m.min_rounds > m.max_rounds {
            return Err(DuelError::Config(format!(
                "magazine size {}..={} must hold at least 2 rounds",
                m.min_rounds, m.max_rounds
            )));
        }
        for (label, value) in [
            ("mean_rounds", m.mean_rounds),
            ("std_dev_rounds", m.std_dev_rounds),
            ("mean_live_rounds", m.mean_live_rounds),
            ("std_dev_live_rounds", m.std_dev_live_rounds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DuelError::Config(format!(
                    "{label} must be a non-negative number, got {value}"
                )));
            }
        }

        if self.item_weights.iter().all(|w| w.weight == 0) {
            return Err(DuelError::Config(
                "at least one item must have a positive weight".to_string(),
            ));
        }
        if self.start_item_counts.is_empty() || self.recharge_item_counts.is_empty() {
            return Err(DuelError::Config(
                "item count pools must not be empty".to_string(),
            ));
        }
        if self.pills_heal_percent > 100 {
            return Err(DuelError::Config(format!(
                "pills_heal_percent must be at most 100, got {}",
                self.pills_heal_percent
            )));
        }
        if self.restrained_turns == 0 {
            return Err(DuelError::Config(
                "restrained_turns must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = DuelConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.adrenaline_window(), Duration::from_secs(5));
        assert_eq!(config.weight_of(ItemKind::Adrenaline), 0);
        assert_eq!(config.weight_of(ItemKind::Beer), 1);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config = DuelConfig::from_json_str(r#"{ "min_hp": 2, "adrenaline_window_ms": 1500 }"#)
            .unwrap();
        assert_eq!(config.min_hp, 2);
        assert_eq!(config.max_hp, 6);
        assert_eq!(config.adrenaline_window(), Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_configs_rejected() {
        assert!(DuelConfig::from_json_str(r#"{ "min_hp": 5, "max_hp": 4 }"#).is_err());
        assert!(DuelConfig::from_json_str(r#"{ "magazine": { "min_rounds": 1 } }"#).is_err());
        assert!(DuelConfig::from_json_str(r#"{ "pills_heal_percent": 150 }"#).is_err());
        assert!(DuelConfig::from_json_str(r#"{ "start_item_counts": [] }"#).is_err());
        assert!(DuelConfig::from_json_str("not json").is_err());
    }
}
