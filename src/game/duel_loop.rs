//! Controller-driven duel loop
//!
//! Runs one started duel to completion by repeatedly asking the controller
//! that owns the turn for an action.

use crate::core::{ChatId, Seat};
use crate::game::controller::{DuelController, DuelView};
use crate::game::{Action, DuelEngine};
use crate::{DuelError, Result};

/// Reason the duel loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuelEndReason {
    /// A player was shot (or poisoned) down to 0 hp
    Victory(Seat),
    /// The action limit was reached first
    ActionLimit,
    /// The controller on turn declined to act
    Abandoned,
}

/// Outcome of a completed duel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuelOutcome {
    pub winner: Option<Seat>,
    pub actions_taken: u32,
    pub end_reason: DuelEndReason,
}

/// Drives a `DuelEngine` with two controllers
pub struct DuelLoop<'a> {
    pub engine: &'a mut DuelEngine,
    max_actions: u32,
}

impl<'a> DuelLoop<'a> {
    pub fn new(engine: &'a mut DuelEngine) -> Self {
        DuelLoop {
            engine,
            max_actions: 2000,
        }
    }

    /// Set the number of actions after which the duel is abandoned
    pub fn with_max_actions(mut self, max_actions: u32) -> Self {
        self.max_actions = max_actions;
        self
    }

    fn seat_for(&self, chat_id: ChatId) -> Result<Seat> {
        self.engine
            .seat_of(chat_id)
            .ok_or(DuelError::NotInRoom(chat_id.as_i64()))
    }

    /// Play until someone wins or the action limit is hit
    pub fn run_duel(
        &mut self,
        first: &mut dyn DuelController,
        second: &mut dyn DuelController,
    ) -> Result<DuelOutcome> {
        if self.seat_for(first.chat_id())? != Seat::First
            || self.seat_for(second.chat_id())? != Seat::Second
        {
            return Err(DuelError::ControllerMismatch);
        }

        let mut actions_taken = 0;
        let end_reason = loop {
            if let Some(reason) = self.check_end(actions_taken) {
                break reason;
            }

            let dealer = self.engine.dealer().ok_or(DuelError::NotInProgress)?;
            let seat = dealer.current_seat();
            let controller: &mut dyn DuelController = match seat {
                Seat::First => &mut *first,
                Seat::Second => &mut *second,
            };

            let view = DuelView::new(self.engine, seat);
            let available = view.legal_actions();
            let Some(action) = controller.choose_action(&view, &available) else {
                break DuelEndReason::Abandoned;
            };
            self.play(action, controller.chat_id())?;
            actions_taken += 1;
        };

        let winner = match end_reason {
            DuelEndReason::Victory(seat) => Some(seat),
            _ => None,
        };
        {
            let view = DuelView::new(self.engine, Seat::First);
            first.on_game_end(&view, winner == Some(Seat::First));
        }
        {
            let view = DuelView::new(self.engine, Seat::Second);
            second.on_game_end(&view, winner == Some(Seat::Second));
        }

        Ok(DuelOutcome {
            winner,
            actions_taken,
            end_reason,
        })
    }

    fn play(&mut self, action: Action, chat_id: ChatId) -> Result<()> {
        let result = self.engine.make_turn(action, chat_id)?;
        if let Some(rejection) = result.rejection {
            self.engine
                .logger()
                .verbose(&format!("{action} was refused: {rejection}"));
        }
        Ok(())
    }

    fn check_end(&self, actions_taken: u32) -> Option<DuelEndReason> {
        if self.engine.is_game_ended() {
            let winner = [Seat::First, Seat::Second]
                .into_iter()
                .find(|&seat| self.engine.hp(seat).is_some_and(|hp| hp > 0));
            return Some(winner.map_or(DuelEndReason::Abandoned, DuelEndReason::Victory));
        }
        if actions_taken >= self.max_actions {
            return Some(DuelEndReason::ActionLimit);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::RandomController;

    fn started(seed: u64) -> DuelEngine {
        let mut engine = DuelEngine::with_seed(seed);
        engine.logger_mut().enable_capture();
        engine.seat_player("Alice", ChatId::new(1), Seat::First).unwrap();
        engine.seat_player("Bob", ChatId::new(2), Seat::Second).unwrap();
        engine.start().unwrap();
        engine
    }

    #[test]
    fn test_random_duel_finishes() {
        let mut engine = started(3);
        let mut alice = RandomController::with_seed(ChatId::new(1), 1);
        let mut bob = RandomController::with_seed(ChatId::new(2), 2);

        let outcome = DuelLoop::new(&mut engine)
            .run_duel(&mut alice, &mut bob)
            .unwrap();
        assert!(outcome.actions_taken > 0);
        if let DuelEndReason::Victory(seat) = outcome.end_reason {
            assert!(engine.hp(seat).unwrap() > 0);
            assert!(engine.hp(seat.other()).unwrap() <= 0);
        }
    }

    #[test]
    fn test_action_limit() {
        let mut engine = started(3);
        let mut alice = RandomController::with_seed(ChatId::new(1), 1);
        let mut bob = RandomController::with_seed(ChatId::new(2), 2);

        let outcome = DuelLoop::new(&mut engine)
            .with_max_actions(0)
            .run_duel(&mut alice, &mut bob)
            .unwrap();
        assert_eq!(outcome.end_reason, DuelEndReason::ActionLimit);
        assert_eq!(outcome.winner, None);
    }

    #[test]
    fn test_swapped_controllers_rejected() {
        let mut engine = started(3);
        let mut alice = RandomController::with_seed(ChatId::new(1), 1);
        let mut bob = RandomController::with_seed(ChatId::new(2), 2);
        assert!(matches!(
            DuelLoop::new(&mut engine).run_duel(&mut bob, &mut alice),
            Err(DuelError::ControllerMismatch)
        ));
    }
}
