//! Item resolution
//!
//! Applies one item for the acting player. Every item shares the same
//! preamble: the actor must hold the item, handcuffs need a free target, and
//! the turn must still have room for an item. Only then is the item spent and
//! its effect applied to the shotgun, the dealer or the players.

use crate::core::{DuelConfig, ItemKind, PlayerState, Round, Shotgun};
use crate::game::{Dealer, Rejection};
use crate::{DuelError, Result};
use rand::Rng;

const ORDINALS: [&str; 8] = [
    "FIRST", "SECOND", "THIRD", "FOURTH", "FIFTH", "SIXTH", "SEVENTH", "EIGHTH",
];

/// Everything an item may touch
pub struct ItemContext<'a, R: Rng> {
    pub player: &'a mut PlayerState,
    pub target: &'a mut PlayerState,
    pub dealer: &'a mut Dealer,
    pub shotgun: &'a mut Shotgun,
    pub config: &'a DuelConfig,
    pub rng: &'a mut R,
}

/// What happened when an item was used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemOutcome {
    /// Line shown to the acting player
    pub active: String,
    /// Line shown to the other player (None when nothing happened)
    pub passive: Option<String>,
    pub rejection: Option<Rejection>,
    /// The actor now holds the target's inventory
    pub adrenaline_started: bool,
}

impl ItemOutcome {
    fn applied(active: String, passive: String) -> Self {
        ItemOutcome {
            active,
            passive: Some(passive),
            rejection: None,
            adrenaline_started: false,
        }
    }

    fn rejected(rejection: Rejection) -> Self {
        ItemOutcome {
            active: rejection.to_string(),
            passive: None,
            rejection: Some(rejection),
            adrenaline_started: false,
        }
    }
}

fn round_banner(round: Round) -> &'static str {
    match round {
        Round::Live => "💥LIVE💥",
        Round::Blank => "🫧BLANK🫧",
    }
}

fn ordinal(position: usize) -> String {
    ORDINALS
        .get(position)
        .map(|word| word.to_string())
        .unwrap_or_else(|| format!("#{}", position + 1))
}

/// Use `item` on behalf of `ctx.player`.
///
/// Refusals come back as outcomes with a `rejection` and leave every piece of
/// state untouched. An `Err` means the engine called this with an empty
/// magazine, which normal flow never allows.
pub fn use_item<R: Rng>(item: ItemKind, ctx: ItemContext<'_, R>) -> Result<ItemOutcome> {
    let ItemContext {
        player,
        target,
        dealer,
        shotgun,
        config,
        rng,
    } = ctx;

    if player.item_count(item) == 0 {
        return Ok(ItemOutcome::rejected(Rejection::NoSuchItem(item)));
    }
    if item == ItemKind::Handcuff && target.is_restrained() {
        return Ok(ItemOutcome::rejected(Rejection::AlreadyRestrained));
    }
    if matches!(item, ItemKind::Beer | ItemKind::Phone) && shotgun.needs_recharge() {
        return Err(DuelError::EmptyMagazine);
    }

    let borrowed = player.has_adrenaline();
    if borrowed && item == ItemKind::Adrenaline {
        return Ok(ItemOutcome::rejected(Rejection::ItemLimitReached));
    }
    if !dealer.record_item_use(item, borrowed) {
        return Ok(ItemOutcome::rejected(Rejection::ItemLimitReached));
    }

    player.delete_item(item);
    let name = player.name.clone();

    let outcome = match item {
        ItemKind::Handsaw => {
            shotgun.double_damage();
            ItemOutcome::applied(
                "🧨Careful, the weapon now deals x2 damage".to_string(),
                format!("{name} uses🪚"),
            )
        }
        ItemKind::Beer => {
            let round = shotgun.shake_out().ok_or(DuelError::EmptyMagazine)?;
            ItemOutcome::applied(
                format!("⤴️ The {round} flew out of the shotgun"),
                format!("{name} uses 🍺. The ⤴️{round} flew out of the shotgun"),
            )
        }
        ItemKind::Smoke => {
            player.heal(1);
            ItemOutcome::applied(
                format!("🚬You now have {} hp", player.hp),
                format!("{name} uses 🚬"),
            )
        }
        ItemKind::Handcuff => {
            target.restrain(config.restrained_turns);
            dealer.extend_slot();
            ItemOutcome::applied(
                format!("🔗{} is tied for 1 turn", target.name),
                format!("🔗 {name} has tied you up"),
            )
        }
        ItemKind::MagnifyingGlass => ItemOutcome::applied(
            format!("🔍 You see the {} inside", shotgun.inspect()),
            format!("{name} uses 🔍. Very interesting..."),
        ),
        ItemKind::Phone => {
            let position = rng.gen_range(0..shotgun.remaining());
            let round = shotgun
                .peek_from_top(position)
                .ok_or(DuelError::EmptyMagazine)?;
            ItemOutcome::applied(
                format!(
                    "📞 ...The {} bullet\nis {}...",
                    ordinal(position),
                    round_banner(round)
                ),
                format!("📞{name} calling an unknown number..."),
            )
        }
        ItemKind::Pills => {
            if rng.gen_range(1..=100) <= config.pills_heal_percent {
                player.heal(config.pills_heal_amount);
                ItemOutcome::applied(
                    format!(
                        "💊You're trying spoiled pills. They're working. You are being healed for {}⚡️",
                        config.pills_heal_amount
                    ),
                    format!(
                        "💊{name} tries the spoiled pills. Lucky. Restored {}⚡️.",
                        config.pills_heal_amount
                    ),
                )
            } else {
                player.take_damage(config.pills_damage);
                ItemOutcome::applied(
                    format!(
                        "💊🤢You're trying spoiled pills. It was a bad pack. You lose {}⚡️",
                        config.pills_damage
                    ),
                    format!(
                        "💊🤢{name} tries the spoiled pills. It was a bad pack. Lose {}⚡️",
                        config.pills_damage
                    ),
                )
            }
        }
        ItemKind::Inverter => {
            shotgun.invert();
            ItemOutcome::applied(
                "🔀You start the inverter. ALL the live bullets became blank bullets. ALL the blank have become live.".to_string(),
                format!("🔀{name} start the inverter. ALL the live bullets became blank bullets. ALL the blank have become live."),
            )
        }
        ItemKind::Adrenaline => {
            let stolen = target.take_inventory();
            player.borrow_inventory(stolen);
            let seconds = config.adrenaline_window().as_secs_f64();
            let mut outcome = ItemOutcome::applied(
                format!(
                    "💉You grab {}'s items. Use one within {seconds}s",
                    target.name
                ),
                format!("💉{name} injects adrenaline and reaches for your items"),
            );
            outcome.adrenaline_started = true;
            outcome
        }
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ChatId, PlayerName, Seat};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    struct Table {
        player: PlayerState,
        target: PlayerState,
        dealer: Dealer,
        shotgun: Shotgun,
        config: DuelConfig,
        rng: ChaCha12Rng,
    }

    impl Table {
        fn new(rounds: Vec<Round>) -> Self {
            let mut player = PlayerState::new(PlayerName::new("Alice").unwrap(), ChatId::new(1));
            let mut target = PlayerState::new(PlayerName::new("Bob").unwrap(), ChatId::new(2));
            player.set_hp(4);
            target.set_hp(4);
            Table {
                player,
                target,
                dealer: Dealer::with_opener(ChatId::new(1), ChatId::new(2), Seat::First),
                shotgun: Shotgun::with_rounds(rounds),
                config: DuelConfig::default(),
                rng: ChaCha12Rng::seed_from_u64(9),
            }
        }

        fn use_item(&mut self, item: ItemKind) -> ItemOutcome {
            use_item(
                item,
                ItemContext {
                    player: &mut self.player,
                    target: &mut self.target,
                    dealer: &mut self.dealer,
                    shotgun: &mut self.shotgun,
                    config: &self.config,
                    rng: &mut self.rng,
                },
            )
            .unwrap()
        }
    }

    #[test]
    fn test_missing_item_is_rejected() {
        let mut table = Table::new(vec![Round::Live]);
        let outcome = table.use_item(ItemKind::Beer);
        assert_eq!(outcome.rejection, Some(Rejection::NoSuchItem(ItemKind::Beer)));
        assert_eq!(table.shotgun.remaining(), 1);
        assert!(table.dealer.current_slot().used_items.is_empty());
    }

    #[test]
    fn test_magnifying_glass_reveals_top() {
        let mut table = Table::new(vec![Round::Live, Round::Blank, Round::Live]);
        table.player.add_item(ItemKind::MagnifyingGlass);

        let outcome = table.use_item(ItemKind::MagnifyingGlass);
        assert_eq!(outcome.active, "🔍 You see the 💥 inside");
        assert_eq!(table.shotgun.remaining(), 3);
        assert_eq!(table.player.item_count(ItemKind::MagnifyingGlass), 0);
    }

    #[test]
    fn test_beer_ejects_round() {
        let mut table = Table::new(vec![Round::Live, Round::Blank]);
        table.player.add_item(ItemKind::Beer);

        let outcome = table.use_item(ItemKind::Beer);
        assert!(outcome.active.contains("🫧"));
        assert_eq!(table.shotgun.rounds(), &[Round::Live]);
    }

    #[test]
    fn test_smoke_heals_up_to_max() {
        let mut table = Table::new(vec![Round::Live]);
        table.player.add_item(ItemKind::Smoke);
        table.player.add_item(ItemKind::Smoke);

        table.use_item(ItemKind::Smoke);
        assert_eq!(table.player.hp, 4);

        table.dealer.end_slot("next");
        table.dealer.end_slot("back");
        table.player.take_damage(2);
        let outcome = table.use_item(ItemKind::Smoke);
        assert_eq!(table.player.hp, 3);
        assert_eq!(outcome.active, "🚬You now have 3 hp");
    }

    #[test]
    fn test_one_item_per_turn() {
        let mut table = Table::new(vec![Round::Live, Round::Blank]);
        table.player.add_item(ItemKind::Handsaw);
        table.player.add_item(ItemKind::Beer);

        assert!(table.use_item(ItemKind::Handsaw).rejection.is_none());
        let second = table.use_item(ItemKind::Beer);
        assert_eq!(second.rejection, Some(Rejection::ItemLimitReached));
        assert_eq!(table.player.item_count(ItemKind::Beer), 1);
        assert_eq!(table.shotgun.remaining(), 2);
    }

    #[test]
    fn test_handcuff_restrains_and_extends() {
        let mut table = Table::new(vec![Round::Live]);
        table.player.add_item(ItemKind::Handcuff);

        let outcome = table.use_item(ItemKind::Handcuff);
        assert!(outcome.rejection.is_none());
        assert_eq!(table.target.restrained(), 3);

        table.dealer.end_slot("shot");
        assert_eq!(table.dealer.current_player_id(), ChatId::new(1));
    }

    #[test]
    fn test_handcuff_on_restrained_target_keeps_item() {
        let mut table = Table::new(vec![Round::Live]);
        table.player.add_item(ItemKind::Handcuff);
        table.target.restrain(1);

        let outcome = table.use_item(ItemKind::Handcuff);
        assert_eq!(outcome.rejection, Some(Rejection::AlreadyRestrained));
        assert_eq!(table.player.item_count(ItemKind::Handcuff), 1);
        assert!(table.dealer.current_slot().used_items.is_empty());
    }

    #[test]
    fn test_phone_names_a_position() {
        let mut table = Table::new(vec![Round::Blank, Round::Blank, Round::Blank]);
        table.player.add_item(ItemKind::Phone);

        let outcome = table.use_item(ItemKind::Phone);
        assert!(outcome.active.contains("BLANK"));
        assert!(["FIRST", "SECOND", "THIRD"]
            .iter()
            .any(|word| outcome.active.contains(word)));
        assert_eq!(table.shotgun.remaining(), 3);
    }

    #[test]
    fn test_inverter_flips_magazine() {
        let mut table = Table::new(vec![Round::Live, Round::Blank]);
        table.player.add_item(ItemKind::Inverter);
        table.use_item(ItemKind::Inverter);
        assert_eq!(table.shotgun.rounds(), &[Round::Blank, Round::Live]);
    }

    #[test]
    fn test_adrenaline_borrows_target_items() {
        let mut table = Table::new(vec![Round::Live, Round::Blank]);
        table.player.add_item(ItemKind::Adrenaline);
        table.player.add_item(ItemKind::Smoke);
        table.target.add_item(ItemKind::Beer);

        let outcome = table.use_item(ItemKind::Adrenaline);
        assert!(outcome.adrenaline_started);
        assert!(table.player.has_adrenaline());
        assert_eq!(table.player.item_count(ItemKind::Beer), 1);
        assert!(table.target.own_inventory().is_empty());

        // the borrowed action ignores the per-turn limit
        let beer = table.use_item(ItemKind::Beer);
        assert!(beer.rejection.is_none());
        assert_eq!(table.shotgun.remaining(), 1);

        let leftover = table.player.return_inventory().unwrap();
        table.target.restore_inventory(leftover);
        assert_eq!(table.target.own_inventory().count(ItemKind::Beer), 0);
        assert_eq!(table.player.item_count(ItemKind::Smoke), 1);
    }

    #[test]
    fn test_empty_magazine_is_a_contract_violation() {
        let mut table = Table::new(vec![]);
        table.player.add_item(ItemKind::Beer);
        let result = use_item(
            ItemKind::Beer,
            ItemContext {
                player: &mut table.player,
                target: &mut table.target,
                dealer: &mut table.dealer,
                shotgun: &mut table.shotgun,
                config: &table.config,
                rng: &mut table.rng,
            },
        );
        assert!(matches!(result, Err(DuelError::EmptyMagazine)));
        assert_eq!(table.player.item_count(ItemKind::Beer), 1);
    }
}
