//! Duel controller trait and read-only duel view
//!
//! The duel loop asks a controller for an action whenever its player owns the
//! turn. Controllers only see a `DuelView`, never the engine itself.

use crate::core::{ChatId, Inventory, ItemKind, PlayerState, Seat};
use crate::game::{Action, DuelEngine, DuelState};

/// Read-only view of a duel from one seat
pub struct DuelView<'a> {
    engine: &'a DuelEngine,
    seat: Seat,
}

impl<'a> DuelView<'a> {
    pub fn new(engine: &'a DuelEngine, seat: Seat) -> Self {
        DuelView { engine, seat }
    }

    pub fn seat(&self) -> Seat {
        self.seat
    }

    fn me(&self) -> Option<&'a PlayerState> {
        self.engine.player(self.seat)
    }

    fn opponent(&self) -> Option<&'a PlayerState> {
        self.engine.player(self.seat.other())
    }

    pub fn chat_id(&self) -> Option<ChatId> {
        self.me().map(|p| p.chat_id)
    }

    pub fn hp(&self) -> i32 {
        self.me().map(|p| p.hp).unwrap_or(0)
    }

    pub fn opponent_hp(&self) -> i32 {
        self.opponent().map(|p| p.hp).unwrap_or(0)
    }

    /// Items this player can spend right now (borrowed ones under adrenaline)
    pub fn items(&self) -> Option<&'a Inventory> {
        self.me().map(PlayerState::inventory)
    }

    pub fn has_adrenaline(&self) -> bool {
        self.me().is_some_and(PlayerState::has_adrenaline)
    }

    pub fn opponent_restrained(&self) -> bool {
        self.opponent().is_some_and(PlayerState::is_restrained)
    }

    pub fn rounds_left(&self) -> usize {
        self.engine.shotgun().remaining()
    }

    pub fn is_my_turn(&self) -> bool {
        match (self.engine.dealer(), self.chat_id()) {
            (Some(dealer), Some(id)) => dealer.current_player_id() == id,
            _ => false,
        }
    }

    /// Actions the engine would accept from this seat right now
    pub fn legal_actions(&self) -> Vec<Action> {
        if !self.is_my_turn() || self.engine.state() != DuelState::InProgress {
            return Vec::new();
        }
        let mut actions = vec![Action::SHOOT_OPPONENT, Action::SHOOT_SELF];

        let (Some(items), Some(dealer)) = (self.items(), self.engine.dealer()) else {
            return actions;
        };
        let borrowed = self.has_adrenaline();
        let used = &dealer.current_slot().used_items;
        let limit_spent = used.iter().any(|u| u.is_limited());

        for (item, _) in items.held() {
            let allowed = match item {
                ItemKind::Handcuff if self.opponent_restrained() => false,
                ItemKind::Adrenaline => {
                    !borrowed && !used.iter().any(|u| u.item == item && !u.borrowed)
                }
                _ => borrowed || !limit_spent,
            };
            if allowed {
                actions.push(Action::UseItem(item));
            }
        }
        actions
    }
}

/// Decision maker for one seat
pub trait DuelController {
    /// The chat id this controller plays for
    fn chat_id(&self) -> ChatId;

    /// Pick one of `available`, or None to leave the turn to the caller
    fn choose_action(&mut self, view: &DuelView, available: &[Action]) -> Option<Action>;

    /// Called once when the duel is decided
    fn on_game_end(&mut self, _view: &DuelView, _won: bool) {}
}
