//! Duel engine
//!
//! `DuelEngine` owns everything one match needs: both seats, the shotgun, the
//! dealer, the rule set and a seeded RNG. Callers drive it with `start` and
//! `make_turn`; each call returns a `TurnResult` describing what happened.

use crate::core::{ChatId, DuelConfig, PlayerName, PlayerState, Round, Seat, Shotgun};
use crate::game::item_resolver::{self, ItemContext};
use crate::game::logger::DuelLogger;
use crate::game::{Action, AdrenalineGrant, Dealer, Rejection, ShotDirection, TurnResult};
use crate::{DuelError, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// Log a verbose line unless verbose logging is compiled out
macro_rules! log_if_verbose {
    ($logger:expr, $($arg:tt)*) => {
        #[cfg(feature = "verbose-logging")]
        {
            $logger.verbose(&format!($($arg)*));
        }
        #[cfg(not(feature = "verbose-logging"))]
        {
            let _ = &$logger;
        }
    };
}

/// Lifecycle of a duel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DuelState {
    NotStarted,
    InProgress,
    Ended,
}

/// Serializable picture of a match, for inspection and debugging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DuelSnapshot {
    pub state: DuelState,
    pub score: i32,
    pub first_player: Option<PlayerState>,
    pub second_player: Option<PlayerState>,
    pub shotgun: Shotgun,
    pub dealer: Option<Dealer>,
    pub active_grant: Option<AdrenalineGrant>,
}

impl DuelSnapshot {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Narrative produced by one resolved action
struct ActionOutcome {
    active: String,
    passive: Option<String>,
    rejection: Option<Rejection>,
    adrenaline: Option<AdrenalineGrant>,
}

/// The turn resolver for one match
pub struct DuelEngine {
    config: DuelConfig,
    seats: [Option<PlayerState>; 2],
    shotgun: Shotgun,
    dealer: Option<Dealer>,
    state: DuelState,
    /// +1 per first-seat win, -1 per second-seat win
    score: i32,
    rng: ChaCha12Rng,
    logger: DuelLogger,
    next_grant_id: u64,
    active_grant: Option<AdrenalineGrant>,
}

fn seat_index(seat: Seat) -> usize {
    seat.parity() as usize
}

/// Both seated players in seat order
fn both_mut(seats: &mut [Option<PlayerState>; 2]) -> Result<(&mut PlayerState, &mut PlayerState)> {
    match seats {
        [Some(first), Some(second)] => Ok((first, second)),
        _ => Err(DuelError::SeatsIncomplete),
    }
}

/// (active, passive) for the seat that owns the turn
fn by_seat<'a>(
    first: &'a mut PlayerState,
    second: &'a mut PlayerState,
    seat: Seat,
) -> (&'a mut PlayerState, &'a mut PlayerState) {
    match seat {
        Seat::First => (first, second),
        Seat::Second => (second, first),
    }
}

/// Hand a borrowed inventory back to its owner
fn end_adrenaline(holder: &mut PlayerState, owner: &mut PlayerState) -> bool {
    match holder.return_inventory() {
        Some(inventory) => {
            owner.restore_inventory(inventory);
            true
        }
        None => false,
    }
}

fn hp_line(player: &PlayerState) -> String {
    format!("{} : {}\n", player.name, "⚡️".repeat(player.hp.max(0) as usize))
}

/// `count` weighted draws into the player's own inventory, stopping once it is full
fn distribute(
    player: &mut PlayerState,
    count: usize,
    config: &DuelConfig,
    rng: &mut ChaCha12Rng,
) -> Result<Vec<String>> {
    let table = WeightedIndex::new(config.item_weights.iter().map(|w| w.weight))
        .map_err(|e| DuelError::Config(format!("item weights: {e}")))?;
    for _ in 0..count {
        let item = config.item_weights[table.sample(rng)].item;
        if !player.add_item(item) {
            break;
        }
    }
    Ok(player.items_emoji())
}

fn draw_count(pool: &[usize], rng: &mut ChaCha12Rng) -> usize {
    pool.choose(rng).copied().unwrap_or(0)
}

impl DuelEngine {
    /// Create an engine with a deterministic RNG, rejecting an invalid rule set
    pub fn new(config: DuelConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config, seed))
    }

    /// Create an engine from a rule set that already passed `validate`
    pub(crate) fn from_validated(config: DuelConfig, seed: u64) -> Self {
        DuelEngine {
            shotgun: Shotgun::new(config.magazine.clone()),
            config,
            seats: [None, None],
            dealer: None,
            state: DuelState::NotStarted,
            score: 0,
            rng: ChaCha12Rng::seed_from_u64(seed),
            logger: DuelLogger::new(),
            next_grant_id: 0,
            active_grant: None,
        }
    }

    /// Create an engine with the default rules
    pub fn with_seed(seed: u64) -> Self {
        Self::from_validated(DuelConfig::default(), seed)
    }

    /// Put a player in a seat, replacing whoever sat there
    pub fn seat_player(&mut self, name: &str, chat_id: ChatId, seat: Seat) -> Result<()> {
        let name = PlayerName::new(name)?;
        self.seats[seat_index(seat)] = Some(PlayerState::new(name, chat_id));
        Ok(())
    }

    /// Begin a duel (or a rematch)
    ///
    /// Both players get the same random hp, empty inventories and a fresh draw
    /// of items. The shotgun is reloaded and a coin flip picks the opener.
    pub fn start(&mut self) -> Result<TurnResult> {
        let DuelEngine {
            config,
            seats,
            shotgun,
            dealer,
            rng,
            logger,
            ..
        } = &mut *self;
        let (first, second) = both_mut(seats)?;

        let new_dealer = Dealer::new(first.chat_id, second.chat_id, rng);
        let hp = rng.gen_range(config.min_hp..=config.max_hp);
        for player in [&mut *first, &mut *second] {
            player.set_hp(hp);
            player.flush_inventory();
            player.release();
        }

        let opener = match new_dealer.opener() {
            Seat::First => &*first,
            Seat::Second => &*second,
        };
        let announcement = format!("🪙{} is going first", opener.name);
        let opener_id = opener.chat_id;

        *shotgun = Shotgun::new(config.magazine.clone());
        let rounds = shotgun.recharge(rng);

        let n = draw_count(&config.start_item_counts, rng);
        let first_items = distribute(first, n, config, rng)?;
        let second_items = distribute(second, n, config, rng)?;

        logger.minimal(&format!(
            "Duel started: {} vs {} with {} hp",
            first.name, second.name, hp
        ));
        logger.normal(&announcement);
        log_if_verbose!(logger, "Magazine: {}", rounds);

        let result = TurnResult {
            first_player_hp: hp_line(first),
            second_player_hp: hp_line(second),
            first_player_items: first_items,
            second_player_items: second_items,
            rounds: Some(rounds),
            active_player_action_result: announcement.clone(),
            passive_player_action_result: Some(announcement),
            on_start_first_id: Some(opener_id),
            next_turn: Some(new_dealer.current_parity()),
            ..TurnResult::default()
        };

        *dealer = Some(new_dealer);
        self.state = DuelState::InProgress;
        self.active_grant = None;
        Ok(result)
    }

    /// Resolve one action claimed by `claimed_player`
    pub fn make_turn(&mut self, action: Action, claimed_player: ChatId) -> Result<TurnResult> {
        if self.state != DuelState::InProgress {
            return Err(DuelError::NotInProgress);
        }
        let dealer = self.dealer.as_ref().ok_or(DuelError::NotInProgress)?;
        let seat = dealer.current_seat();

        if dealer.current_player_id() != claimed_player {
            let mut result = TurnResult::rejected(Rejection::OutOfTurn);
            result.next_turn = Some(seat.parity());
            return Ok(result);
        }

        let outcome = self.resolve_action(action, seat)?;
        self.finish_turn(outcome, seat)
    }

    /// Parse a transport token ("me", "🔼", "beer", "🍺x2") and resolve it
    pub fn make_turn_token(&mut self, token: &str, claimed_player: ChatId) -> Result<TurnResult> {
        let action = Action::parse_token(token)?;
        self.make_turn(action, claimed_player)
    }

    fn resolve_action(&mut self, action: Action, seat: Seat) -> Result<ActionOutcome> {
        let DuelEngine {
            config,
            seats,
            shotgun,
            dealer,
            rng,
            logger,
            next_grant_id,
            active_grant,
            ..
        } = &mut *self;
        let dealer = dealer.as_mut().ok_or(DuelError::NotInProgress)?;
        let (first, second) = both_mut(seats)?;
        let (player, target) = by_seat(first, second, seat);
        let under_adrenaline = player.has_adrenaline();

        let outcome = match action {
            Action::Shoot(direction) => {
                if under_adrenaline && end_adrenaline(player, target) {
                    *active_grant = None;
                }
                let name = player.name.clone();
                let (round, active, passive) = match direction {
                    ShotDirection::Myself => {
                        let round = shotgun.shot(player);
                        if round == Round::Blank {
                            dealer.extend_slot();
                        }
                        (round, round.to_string(), format!("{name} {round} itself!"))
                    }
                    ShotDirection::Opponent => {
                        let round = shotgun.shot(target);
                        (
                            round,
                            format!("You shot by {round}"),
                            format!("{name} {round} to you"),
                        )
                    }
                };
                let aimed_at = match direction {
                    ShotDirection::Myself => "themself".to_string(),
                    ShotDirection::Opponent => target.name.to_string(),
                };
                logger.event("shot", &format!("{name} shoots {aimed_at}: {round}"));

                for p in [&mut *player, &mut *target] {
                    if p.tick_restraint() {
                        log_if_verbose!(logger, "{} stays tied for one more turn", p.name);
                    }
                }
                dealer.end_slot(round.emoji());
                log_if_verbose!(
                    logger,
                    "Queue moved to slot {} (parity {})",
                    dealer.move_counter(),
                    dealer.current_parity()
                );

                ActionOutcome {
                    active,
                    passive: Some(passive),
                    rejection: None,
                    adrenaline: None,
                }
            }
            Action::UseItem(item) => {
                let resolved = item_resolver::use_item(
                    item,
                    ItemContext {
                        player: &mut *player,
                        target: &mut *target,
                        dealer: &mut *dealer,
                        shotgun: &mut *shotgun,
                        config: &*config,
                        rng: &mut *rng,
                    },
                );
                if under_adrenaline && end_adrenaline(player, target) {
                    *active_grant = None;
                    log_if_verbose!(logger, "{} hands the borrowed items back", player.name);
                }
                let resolved = resolved?;

                let adrenaline = if resolved.adrenaline_started {
                    *next_grant_id += 1;
                    let grant = AdrenalineGrant {
                        id: *next_grant_id,
                        holder: player.chat_id,
                        window_ms: config.adrenaline_window_ms,
                    };
                    *active_grant = Some(grant);
                    Some(grant)
                } else {
                    None
                };

                match &resolved.rejection {
                    Some(rejection) => logger.event(
                        "rejected",
                        &format!("{} tried {}: {}", player.name, item.emoji(), rejection),
                    ),
                    None => logger.event(
                        "item",
                        &format!("{} used {}", player.name, item.emoji()),
                    ),
                }

                ActionOutcome {
                    active: resolved.active,
                    passive: resolved.passive,
                    rejection: resolved.rejection,
                    adrenaline,
                }
            }
        };
        Ok(outcome)
    }

    /// Evaluate the end of a turn: victory, reload or plain continuation
    fn finish_turn(&mut self, outcome: ActionOutcome, seat_before: Seat) -> Result<TurnResult> {
        let DuelEngine {
            config,
            seats,
            shotgun,
            dealer,
            rng,
            logger,
            state,
            score,
            active_grant,
            ..
        } = &mut *self;
        let dealer = dealer.as_mut().ok_or(DuelError::NotInProgress)?;
        let (first, second) = both_mut(seats)?;

        let mut result = TurnResult {
            active_player_action_result: outcome.active,
            passive_player_action_result: outcome.passive,
            rejection: outcome.rejection,
            adrenaline: outcome.adrenaline,
            ..TurnResult::default()
        };

        let winner = if !first.is_alive() {
            Some(Seat::Second)
        } else if !second.is_alive() {
            Some(Seat::First)
        } else {
            None
        };

        if let Some(winner) = winner {
            // nobody keeps borrowed items past the end of a duel
            if !end_adrenaline(first, second) {
                end_adrenaline(second, first);
            }
            *active_grant = None;
            *state = DuelState::Ended;
            *score += match winner {
                Seat::First => 1,
                Seat::Second => -1,
            };

            let winner_name = match winner {
                Seat::First => &first.name,
                Seat::Second => &second.name,
            };
            let announcement = format!("{winner_name} has won!\n");
            logger.minimal(&format!("{winner_name} has won! (score {})", score));

            result.active_player_action_result = announcement.clone();
            result.passive_player_action_result = Some(announcement);
            result.is_game_ended = true;
            result.first_player_hp = hp_line(first);
            result.second_player_hp = hp_line(second);
            result.first_player_items = first.items_emoji();
            result.second_player_items = second.items_emoji();
        } else if shotgun.needs_recharge() {
            let rounds = shotgun.recharge(rng);
            let n = draw_count(&config.recharge_item_counts, rng);
            result.first_player_items = distribute(first, n, config, rng)?;
            result.second_player_items = distribute(second, n, config, rng)?;
            first.release();
            second.release();

            logger.event("recharge", &format!("New round: {rounds}"));
            result.rounds = Some(rounds);
            result.give_turn = dealer.current_seat() != seat_before;
            result.first_player_hp = hp_line(first);
            result.second_player_hp = hp_line(second);
        } else {
            log_if_verbose!(logger, "Magazine: {:?}", shotgun.rounds());
            result.give_turn = dealer.current_seat() != seat_before;
            result.first_player_hp = hp_line(first);
            result.second_player_hp = hp_line(second);
            result.first_player_items = first.items_emoji();
            result.second_player_items = second.items_emoji();
            result.rounds = Some(shotgun.sorted_disclosure());
        }

        result.next_turn = Some(dealer.current_parity());
        Ok(result)
    }

    /// Draw `count` random items for the player in `seat`.
    ///
    /// Returns the player's inventory afterwards. Draws past a full inventory
    /// are dropped.
    pub fn distribute_items(&mut self, seat: Seat, count: usize) -> Result<Vec<String>> {
        let player = self.seats[seat_index(seat)]
            .as_mut()
            .ok_or(DuelError::SeatsIncomplete)?;
        distribute(player, count, &self.config, &mut self.rng)
    }

    /// Close an adrenaline window that ran out.
    ///
    /// Returns false when `grant_id` is no longer the open grant, i.e. the
    /// borrowed action was already taken or a newer grant replaced it.
    pub fn expire_adrenaline(&mut self, grant_id: u64) -> bool {
        let Some(grant) = self.active_grant else {
            return false;
        };
        if grant.id != grant_id {
            return false;
        }
        self.active_grant = None;

        let Ok((first, second)) = both_mut(&mut self.seats) else {
            return false;
        };
        let (holder, owner) = if first.chat_id == grant.holder {
            (first, second)
        } else {
            (second, first)
        };
        let returned = end_adrenaline(holder, owner);
        if returned {
            self.logger.event(
                "adrenaline",
                &format!("{}'s adrenaline wore off", holder.name),
            );
        }
        returned
    }

    /// Name of the player who owns the current turn
    pub fn active_player_name(&self) -> Option<&PlayerName> {
        let seat = self.dealer.as_ref()?.current_seat();
        self.player(seat).map(|p| &p.name)
    }

    pub fn player(&self, seat: Seat) -> Option<&PlayerState> {
        self.seats[seat_index(seat)].as_ref()
    }

    pub fn player_mut(&mut self, seat: Seat) -> Option<&mut PlayerState> {
        self.seats[seat_index(seat)].as_mut()
    }

    /// Seat occupied by `chat_id`, if any
    pub fn seat_of(&self, chat_id: ChatId) -> Option<Seat> {
        [Seat::First, Seat::Second]
            .into_iter()
            .find(|&seat| self.player(seat).is_some_and(|p| p.chat_id == chat_id))
    }

    pub fn hp(&self, seat: Seat) -> Option<i32> {
        self.player(seat).map(|p| p.hp)
    }

    /// Emoji list of the items the player in `seat` can currently spend
    pub fn items(&self, seat: Seat) -> Vec<String> {
        self.player(seat)
            .map(PlayerState::items_emoji)
            .unwrap_or_default()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn state(&self) -> DuelState {
        self.state
    }

    pub fn is_game_ended(&self) -> bool {
        self.state == DuelState::Ended
    }

    pub fn shotgun(&self) -> &Shotgun {
        &self.shotgun
    }

    /// Replace the loaded shotgun (scripted scenarios)
    pub fn set_shotgun(&mut self, shotgun: Shotgun) {
        self.shotgun = shotgun;
    }

    pub fn dealer(&self) -> Option<&Dealer> {
        self.dealer.as_ref()
    }

    pub fn config(&self) -> &DuelConfig {
        &self.config
    }

    pub fn active_grant(&self) -> Option<AdrenalineGrant> {
        self.active_grant
    }

    pub fn logger(&self) -> &DuelLogger {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut DuelLogger {
        &mut self.logger
    }

    pub fn snapshot(&self) -> DuelSnapshot {
        DuelSnapshot {
            state: self.state,
            score: self.score,
            first_player: self.seats[0].clone(),
            second_player: self.seats[1].clone(),
            shotgun: self.shotgun.clone(),
            dealer: self.dealer.clone(),
            active_grant: self.active_grant,
        }
    }
}

impl std::fmt::Debug for DuelEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuelEngine")
            .field("state", &self.state)
            .field("score", &self.score)
            .field("rounds_left", &self.shotgun.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ItemKind;

    const ALICE: ChatId = ChatId::new(1);
    const BOB: ChatId = ChatId::new(2);

    fn started(seed: u64) -> DuelEngine {
        let mut engine = DuelEngine::with_seed(seed);
        engine.logger_mut().enable_capture();
        engine.seat_player("Alice", ALICE, Seat::First).unwrap();
        engine.seat_player("Bob", BOB, Seat::Second).unwrap();
        engine.start().unwrap();
        engine
    }

    fn current(engine: &DuelEngine) -> ChatId {
        engine.dealer().unwrap().current_player_id()
    }

    #[test]
    fn test_start_requires_both_seats() {
        let mut engine = DuelEngine::with_seed(1);
        engine.seat_player("Alice", ALICE, Seat::First).unwrap();
        assert!(matches!(engine.start(), Err(DuelError::SeatsIncomplete)));
        assert_eq!(engine.state(), DuelState::NotStarted);
    }

    #[test]
    fn test_invalid_name_is_refused() {
        let mut engine = DuelEngine::with_seed(1);
        let long = "x".repeat(26);
        assert!(matches!(
            engine.seat_player(&long, ALICE, Seat::First),
            Err(DuelError::InvalidPlayerName(_))
        ));
        assert!(engine.seat_player("   ", ALICE, Seat::First).is_err());
    }

    #[test]
    fn test_invalid_rule_set_is_refused() {
        let mut config = DuelConfig::default();
        config.magazine.min_rounds = 1;
        config.magazine.max_rounds = 1;
        assert!(matches!(
            DuelEngine::new(config, 1),
            Err(DuelError::Config(_))
        ));

        let mut config = DuelConfig::default();
        config.min_hp = 6;
        config.max_hp = 3;
        assert!(matches!(
            DuelEngine::new(config, 1),
            Err(DuelError::Config(_))
        ));

        assert!(DuelEngine::new(DuelConfig::default(), 1).is_ok());
    }

    #[test]
    fn test_start_sets_shared_hp() {
        let mut engine = DuelEngine::with_seed(5);
        engine.seat_player("Alice", ALICE, Seat::First).unwrap();
        engine.seat_player("Bob", BOB, Seat::Second).unwrap();
        let result = engine.start().unwrap();

        let hp = engine.hp(Seat::First).unwrap();
        assert!((3..=6).contains(&hp));
        assert_eq!(engine.hp(Seat::Second), Some(hp));
        assert_eq!(result.on_start_first_id, Some(current(&engine)));
        assert!(result.active_player_action_result.starts_with("🪙"));
        assert!(!result.give_turn);
        assert_eq!(engine.state(), DuelState::InProgress);
        assert!(!engine.shotgun().needs_recharge());
    }

    #[test]
    fn test_make_turn_before_start() {
        let mut engine = DuelEngine::with_seed(1);
        assert!(matches!(
            engine.make_turn(Action::SHOOT_SELF, ALICE),
            Err(DuelError::NotInProgress)
        ));
    }

    #[test]
    fn test_out_of_turn_changes_nothing() {
        let mut engine = started(2);
        let waiting = if current(&engine) == ALICE { BOB } else { ALICE };
        let remaining = engine.shotgun().remaining();

        let result = engine.make_turn(Action::SHOOT_OPPONENT, waiting).unwrap();
        assert_eq!(result.rejection, Some(Rejection::OutOfTurn));
        assert_eq!(result.active_player_action_result, "Please, wait your turn");
        assert_eq!(engine.shotgun().remaining(), remaining);
        assert_ne!(current(&engine), waiting);
    }

    #[test]
    fn test_opponent_shot_hands_turn_over() {
        let mut engine = started(4);
        engine.set_shotgun(Shotgun::with_rounds(vec![Round::Live, Round::Blank, Round::Blank]));
        let shooter = current(&engine);

        let result = engine.make_turn(Action::SHOOT_OPPONENT, shooter).unwrap();
        assert!(result.give_turn);
        assert_eq!(result.active_player_action_result, "You shot by 🫧");
        assert_ne!(current(&engine), shooter);
        assert_eq!(result.rounds.as_deref(), Some("💥, 🫧"));
    }

    #[test]
    fn test_self_live_hands_turn_over() {
        let mut engine = started(4);
        engine.set_shotgun(Shotgun::with_rounds(vec![Round::Blank, Round::Live]));
        let shooter = current(&engine);
        let seat = engine.seat_of(shooter).unwrap();
        let hp = engine.hp(seat).unwrap();

        let result = engine.make_turn(Action::SHOOT_SELF, shooter).unwrap();
        assert_eq!(engine.hp(seat), Some(hp - 1));
        assert!(result.give_turn);
    }

    #[test]
    fn test_empty_magazine_triggers_recharge() {
        let mut engine = started(6);
        engine.set_shotgun(Shotgun::with_rounds(vec![Round::Blank]));
        let shooter = current(&engine);
        engine.player_mut(Seat::First).unwrap().restrain(3);

        let result = engine.make_turn(Action::SHOOT_OPPONENT, shooter).unwrap();
        assert!(result.rounds.is_some());
        assert!(!engine.shotgun().needs_recharge());
        assert!(!engine.player(Seat::First).unwrap().is_restrained());
        assert!(!result.is_game_ended);
    }

    #[test]
    fn test_victory_updates_score() {
        let mut engine = started(8);
        let shooter = current(&engine);
        let victim = engine.seat_of(shooter).unwrap().other();
        engine.player_mut(victim).unwrap().hp = 1;
        engine.set_shotgun(Shotgun::with_rounds(vec![Round::Live, Round::Live]));

        let result = engine.make_turn(Action::SHOOT_OPPONENT, shooter).unwrap();
        assert!(result.is_game_ended);
        assert!(result.active_player_action_result.ends_with("has won!\n"));
        assert_eq!(engine.state(), DuelState::Ended);
        let expected = if victim == Seat::Second { 1 } else { -1 };
        assert_eq!(engine.score(), expected);
        assert!(matches!(
            engine.make_turn(Action::SHOOT_SELF, shooter),
            Err(DuelError::NotInProgress)
        ));
    }

    #[test]
    fn test_token_turns() {
        let mut engine = started(10);
        let shooter = current(&engine);
        assert!(matches!(
            engine.make_turn_token("jump", shooter),
            Err(DuelError::InvalidAction(_))
        ));
        assert!(engine.make_turn_token("🔼", shooter).is_ok());
    }

    #[test]
    fn test_rejected_item_keeps_turn() {
        let mut engine = started(12);
        let actor = current(&engine);
        let seat = engine.seat_of(actor).unwrap();
        engine.player_mut(seat).unwrap().flush_inventory();

        let result = engine
            .make_turn(Action::UseItem(ItemKind::Beer), actor)
            .unwrap();
        assert_eq!(result.rejection, Some(Rejection::NoSuchItem(ItemKind::Beer)));
        assert!(!result.give_turn);
        assert_eq!(current(&engine), actor);
    }

    #[test]
    fn test_adrenaline_expiry_returns_items() {
        let mut engine = started(14);
        let actor = current(&engine);
        let seat = engine.seat_of(actor).unwrap();
        engine.player_mut(seat).unwrap().add_item(ItemKind::Adrenaline);
        engine.player_mut(seat.other()).unwrap().flush_inventory();
        engine.player_mut(seat.other()).unwrap().add_item(ItemKind::Phone);

        let result = engine
            .make_turn(Action::UseItem(ItemKind::Adrenaline), actor)
            .unwrap();
        let grant = result.adrenaline.unwrap();
        assert_eq!(grant.holder, actor);
        assert_eq!(engine.items(seat), vec!["📞x1".to_string()]);

        assert!(!engine.expire_adrenaline(grant.id + 1));
        assert!(engine.expire_adrenaline(grant.id));
        assert!(!engine.expire_adrenaline(grant.id));
        assert_eq!(engine.items(seat.other()), vec!["📞x1".to_string()]);
        assert!(engine.active_grant().is_none());
    }

    #[test]
    fn test_engine_logs_events() {
        let mut engine = started(16);
        let shooter = current(&engine);
        engine.make_turn(Action::SHOOT_OPPONENT, shooter).unwrap();
        let logs = engine.logger().logs();
        assert!(logs.iter().any(|e| e.level == crate::game::VerbosityLevel::Minimal));
        assert!(logs.iter().any(|e| e.category.as_deref() == Some("shot")));
    }

    #[test]
    fn test_snapshot_serializes() {
        let engine = started(18);
        let json = engine.snapshot().to_json().unwrap();
        assert!(json.contains("InProgress"));
    }
}
