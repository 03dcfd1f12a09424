//! The shotgun and its magazine
//!
//! Rounds are kept as a stack: the last element of `rounds` is the next one
//! to be fired. A recharge replaces the whole magazine with a fresh random
//! load that always holds at least one live and one blank round.

use crate::core::{MagazineConfig, PlayerState};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single shell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Round {
    Live,
    Blank,
}

impl Round {
    pub fn emoji(&self) -> &'static str {
        match self {
            Round::Live => "💥",
            Round::Blank => "🫧",
        }
    }

    /// The opposite kind (used by the inverter)
    pub fn flipped(&self) -> Round {
        match self {
            Round::Live => Round::Blank,
            Round::Blank => Round::Live,
        }
    }
}

impl fmt::Display for Round {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.emoji())
    }
}

/// Magazine plus the damage multiplier of the next shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shotgun {
    rounds: Vec<Round>,
    damage: i32,
    config: MagazineConfig,
}

impl Shotgun {
    pub fn new(config: MagazineConfig) -> Self {
        Shotgun {
            rounds: Vec::new(),
            damage: 1,
            config,
        }
    }

    /// Build a shotgun with a known load (last element fires first)
    pub fn with_rounds(rounds: Vec<Round>) -> Self {
        Shotgun {
            rounds,
            damage: 1,
            config: MagazineConfig::default(),
        }
    }

    /// Draw from Normal(mean, std_dev), truncated toward zero
    fn sample_count<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> i64 {
        let z: f64 = rng.sample(StandardNormal);
        (mean + std_dev * z) as i64
    }

    /// Replace the magazine with a fresh random load.
    ///
    /// Overwrites any remaining rounds; the engine only calls this when empty.
    /// Returns the sorted disclosure of the new load.
    pub fn recharge<R: Rng>(&mut self, rng: &mut R) -> String {
        let cfg = &self.config;
        let total = Self::sample_count(rng, cfg.mean_rounds, cfg.std_dev_rounds)
            .clamp(cfg.min_rounds as i64, cfg.max_rounds as i64);
        let live = Self::sample_count(rng, cfg.mean_live_rounds, cfg.std_dev_live_rounds)
            .clamp(1, total - 1);

        let mut rounds: Vec<Round> = std::iter::repeat(Round::Live)
            .take(live as usize)
            .chain(std::iter::repeat(Round::Blank).take((total - live) as usize))
            .collect();
        rounds.shuffle(rng);

        self.rounds = rounds;
        self.sorted_disclosure()
    }

    /// Fire the top round at `target`.
    ///
    /// A live round deals the current damage. The multiplier goes back to 1
    /// whatever was drawn. An empty magazine reads as a blank and changes nothing.
    pub fn shot(&mut self, target: &mut PlayerState) -> Round {
        let Some(round) = self.rounds.pop() else {
            return Round::Blank;
        };
        if round == Round::Live {
            target.take_damage(self.damage);
        }
        self.damage = 1;
        round
    }

    pub fn needs_recharge(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Eject the top round without firing it
    pub fn shake_out(&mut self) -> Option<Round> {
        self.rounds.pop()
    }

    /// Look at the top round; an empty magazine reads as a blank
    pub fn inspect(&self) -> Round {
        self.rounds.last().copied().unwrap_or(Round::Blank)
    }

    /// Round at `position` counted from the top (0 = next to fire)
    pub fn peek_from_top(&self, position: usize) -> Option<Round> {
        self.rounds.iter().rev().nth(position).copied()
    }

    /// Flip every remaining round in place
    pub fn invert(&mut self) {
        for round in &mut self.rounds {
            *round = round.flipped();
        }
    }

    /// Double the damage of the next shot
    pub fn double_damage(&mut self) {
        self.damage *= 2;
    }

    pub fn damage(&self) -> i32 {
        self.damage
    }

    pub fn remaining(&self) -> usize {
        self.rounds.len()
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn live_count(&self) -> usize {
        self.rounds.iter().filter(|&&r| r == Round::Live).count()
    }

    /// Remaining rounds as a sorted, comma separated list
    pub fn sorted_disclosure(&self) -> String {
        let mut sorted = self.rounds.clone();
        sorted.sort();
        sorted
            .iter()
            .map(|r| r.emoji())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for Shotgun {
    fn default() -> Self {
        Shotgun::new(MagazineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChatId, PlayerName};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    fn target() -> PlayerState {
        let mut p = PlayerState::new(PlayerName::new("Target").unwrap(), ChatId::new(7));
        p.set_hp(6);
        p
    }

    #[test]
    fn test_recharge_bounds() {
        let mut rng = ChaCha12Rng::seed_from_u64(11);
        let mut gun = Shotgun::default();
        for _ in 0..2000 {
            gun.recharge(&mut rng);
            let total = gun.remaining();
            let live = gun.live_count();
            assert!((2..=8).contains(&total), "total {total}");
            assert!(live >= 1 && live < total, "live {live} of {total}");
        }
    }

    #[test]
    fn test_shot_pops_top_and_damages() {
        let mut gun = Shotgun::with_rounds(vec![Round::Blank, Round::Live]);
        let mut t = target();

        assert_eq!(gun.shot(&mut t), Round::Live);
        assert_eq!(t.hp, 5);
        assert_eq!(gun.remaining(), 1);

        assert_eq!(gun.shot(&mut t), Round::Blank);
        assert_eq!(t.hp, 5);
        assert!(gun.needs_recharge());
    }

    #[test]
    fn test_shot_on_empty_is_blank() {
        let mut gun = Shotgun::with_rounds(vec![]);
        let mut t = target();
        assert_eq!(gun.shot(&mut t), Round::Blank);
        assert_eq!(t.hp, 6);
        assert_eq!(gun.remaining(), 0);
    }

    #[test]
    fn test_damage_resets_after_any_shot() {
        let mut gun = Shotgun::with_rounds(vec![Round::Live, Round::Blank]);
        let mut t = target();

        gun.double_damage();
        assert_eq!(gun.damage(), 2);
        assert_eq!(gun.shot(&mut t), Round::Blank);
        assert_eq!(gun.damage(), 1);
        assert_eq!(gun.shot(&mut t), Round::Live);
        assert_eq!(t.hp, 5);
    }

    #[test]
    fn test_inspect_and_shake_out() {
        let mut gun = Shotgun::with_rounds(vec![Round::Live, Round::Blank, Round::Live]);
        assert_eq!(gun.inspect(), Round::Live);
        assert_eq!(gun.remaining(), 3);

        assert_eq!(gun.shake_out(), Some(Round::Live));
        assert_eq!(gun.remaining(), 2);
        assert_eq!(gun.inspect(), Round::Blank);
    }

    #[test]
    fn test_peek_from_top() {
        let gun = Shotgun::with_rounds(vec![Round::Live, Round::Blank, Round::Blank]);
        assert_eq!(gun.peek_from_top(0), Some(Round::Blank));
        assert_eq!(gun.peek_from_top(2), Some(Round::Live));
        assert_eq!(gun.peek_from_top(3), None);
    }

    #[test]
    fn test_double_invert_restores_order() {
        let original = vec![Round::Live, Round::Blank, Round::Blank, Round::Live];
        let mut gun = Shotgun::with_rounds(original.clone());
        gun.invert();
        assert_eq!(
            gun.rounds(),
            &[Round::Blank, Round::Live, Round::Live, Round::Blank]
        );
        gun.invert();
        assert_eq!(gun.rounds(), original.as_slice());
    }

    #[test]
    fn test_sorted_disclosure() {
        let gun = Shotgun::with_rounds(vec![Round::Blank, Round::Live, Round::Blank]);
        assert_eq!(gun.sorted_disclosure(), "💥, 🫧, 🫧");
    }
}
