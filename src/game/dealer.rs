//! Turn ownership queue
//!
//! The dealer pre-generates an alternating sequence of turn slots and keeps a
//! cursor on the current one. Ending a slot moves the cursor forward, which is
//! the only way the active player changes. Extending a slot inserts a copy of
//! it right after the cursor, so the same player acts again once the current
//! slot ends.

use crate::core::{ChatId, ItemKind, Seat};
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Slots generated per player in one run of the queue
pub const RUN_LENGTH: usize = 100;

/// An item recorded against a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsedItem {
    pub item: ItemKind,
    /// Spent from a borrowed (adrenaline) inventory
    pub borrowed: bool,
}

impl UsedItem {
    /// Whether this use occupies the one-item-per-turn allowance
    pub fn is_limited(&self) -> bool {
        !self.borrowed && !self.item.is_repeatable()
    }
}

/// One queued turn occupancy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub player_id: ChatId,
    /// 0 for the first seat, 1 for the second
    pub parity: u8,
    pub used_items: SmallVec<[UsedItem; 2]>,
    /// Outcome text stamped when the slot ends
    pub result: String,
}

impl Slot {
    fn new(player_id: ChatId, parity: u8) -> Self {
        Slot {
            player_id,
            parity,
            used_items: SmallVec::new(),
            result: String::new(),
        }
    }
}

/// Manages whose turn it is and which items were used in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    first_player: ChatId,
    second_player: ChatId,
    move_counter: usize,
    queue: Vec<Slot>,
}

impl Dealer {
    /// Build the queue, flipping a coin for who opens
    pub fn new<R: Rng>(first_player: ChatId, second_player: ChatId, rng: &mut R) -> Self {
        let opener = if rng.gen_bool(0.5) {
            Seat::First
        } else {
            Seat::Second
        };
        Self::with_opener(first_player, second_player, opener)
    }

    /// Build the queue with a fixed opening seat
    pub fn with_opener(first_player: ChatId, second_player: ChatId, opener: Seat) -> Self {
        let mut dealer = Dealer {
            first_player,
            second_player,
            move_counter: 0,
            queue: Vec::with_capacity(RUN_LENGTH * 2),
        };
        dealer.append_run(opener);
        dealer
    }

    fn player_for(&self, seat: Seat) -> ChatId {
        match seat {
            Seat::First => self.first_player,
            Seat::Second => self.second_player,
        }
    }

    /// Append `RUN_LENGTH` alternating pairs starting with `lead`
    fn append_run(&mut self, lead: Seat) {
        for _ in 0..RUN_LENGTH {
            for seat in [lead, lead.other()] {
                let slot = Slot::new(self.player_for(seat), seat.parity());
                self.queue.push(slot);
            }
        }
    }

    /// Grow the queue before the cursor can reach its end
    fn ensure_capacity(&mut self) {
        if self.move_counter + 2 < self.queue.len() {
            return;
        }
        let lead = self
            .queue
            .last()
            .map(|slot| Seat::from_parity(slot.parity).other())
            .unwrap_or(Seat::First);
        self.append_run(lead);
    }

    fn current(&self) -> &Slot {
        &self.queue[self.move_counter]
    }

    fn current_mut(&mut self) -> &mut Slot {
        &mut self.queue[self.move_counter]
    }

    /// Parity of the slot under the cursor
    pub fn current_parity(&self) -> u8 {
        self.current().parity
    }

    pub fn current_seat(&self) -> Seat {
        Seat::from_parity(self.current_parity())
    }

    /// Player recorded as the owner of the current slot
    pub fn current_player_id(&self) -> ChatId {
        self.current().player_id
    }

    pub fn current_slot(&self) -> &Slot {
        self.current()
    }

    pub fn move_counter(&self) -> usize {
        self.move_counter
    }

    /// Seat that opens the duel
    pub fn opener(&self) -> Seat {
        Seat::from_parity(self.queue[0].parity)
    }

    /// Record an item use against the current slot.
    ///
    /// Returns false, changing nothing, when a limited item was already used in
    /// this slot. Repeatable items skip the limit but only one of each kind may
    /// be recorded per slot. Borrowed uses are always accepted.
    pub fn record_item_use(&mut self, item: ItemKind, borrowed: bool) -> bool {
        let entry = UsedItem { item, borrowed };
        let used = &mut self.current_mut().used_items;

        let allowed = if borrowed {
            true
        } else if item.is_repeatable() {
            !used.iter().any(|u| !u.borrowed && u.item == item)
        } else {
            !used.iter().any(UsedItem::is_limited)
        };

        if allowed {
            used.push(entry);
        }
        allowed
    }

    /// Stamp the result on the current slot and hand the cursor on
    pub fn end_slot(&mut self, result: impl Into<String>) {
        self.current_mut().result = result.into();
        self.move_counter += 1;
        self.ensure_capacity();
    }

    /// Give the current owner another slot right after this one
    pub fn extend_slot(&mut self) {
        let mut repeat = self.current().clone();
        repeat.used_items.clear();
        repeat.result.clear();
        self.queue.insert(self.move_counter + 1, repeat);
    }

    /// Slots that have already ended, oldest first
    pub fn history(&self) -> &[Slot] {
        &self.queue[..self.move_counter]
    }
}
