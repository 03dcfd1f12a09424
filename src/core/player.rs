//! Player representation

use crate::core::{ChatId, Inventory, ItemKind, PlayerName};
use serde::{Deserialize, Serialize};

/// Highest hit point value a player can hold
pub const MAX_HP: i32 = 6;

/// Restrained counter value meaning "tied for exactly one upcoming turn"
const RESTRAINED_ONE_TURN: u8 = 2;

/// A seated player with hit points, items and status effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Display name
    pub name: PlayerName,

    /// Chat identifier used for turn ownership checks
    pub chat_id: ChatId,

    /// Current hit points. May drop below zero; alive means hp > 0.
    pub hp: i32,

    /// Healing cap, set together with hp at duel start
    pub max_hp: i32,

    /// Own items
    inventory: Inventory,

    /// Turns left before handcuffs can be applied again (0 = free)
    restrained: u8,

    /// Opponent's inventory, held while an adrenaline effect is active
    borrowed: Option<Inventory>,
}

impl PlayerState {
    pub fn new(name: PlayerName, chat_id: ChatId) -> Self {
        PlayerState {
            name,
            chat_id,
            hp: 1,
            max_hp: 1,
            inventory: Inventory::new(),
            restrained: 0,
            borrowed: None,
        }
    }

    /// Set both current and maximum hp
    pub fn set_hp(&mut self, hp: i32) {
        let hp = hp.clamp(0, MAX_HP);
        self.hp = hp;
        self.max_hp = hp;
    }

    /// Heal by `amount`, capped at max_hp
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.hp -= damage;
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Replace the inventory with an empty one and drop any borrowed items
    pub fn flush_inventory(&mut self) {
        self.inventory = Inventory::new();
        self.borrowed = None;
    }

    /// The inventory actions are spent from: borrowed under adrenaline, own otherwise
    pub fn inventory(&self) -> &Inventory {
        self.borrowed.as_ref().unwrap_or(&self.inventory)
    }

    fn inventory_mut(&mut self) -> &mut Inventory {
        self.borrowed.as_mut().unwrap_or(&mut self.inventory)
    }

    /// The player's own inventory, regardless of any borrowed one
    pub fn own_inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Add to the own inventory. Returns false when it is full.
    pub fn add_item(&mut self, item: ItemKind) -> bool {
        self.inventory.add(item)
    }

    /// Spend one item from the active inventory
    pub fn delete_item(&mut self, item: ItemKind) -> bool {
        self.inventory_mut().remove(item)
    }

    pub fn item_count(&self, item: ItemKind) -> u8 {
        self.inventory().count(item)
    }

    /// Emoji list of the active inventory
    pub fn items_emoji(&self) -> Vec<String> {
        self.inventory().emoji_list()
    }

    pub fn restrained(&self) -> u8 {
        self.restrained
    }

    pub fn is_restrained(&self) -> bool {
        self.restrained > 0
    }

    pub fn restrain(&mut self, turns: u8) {
        self.restrained = turns;
    }

    pub fn release(&mut self) {
        self.restrained = 0;
    }

    /// Count the restraint down by one shot.
    ///
    /// Returns true if the player was in the "tied for one upcoming turn" state.
    pub fn tick_restraint(&mut self) -> bool {
        let was_one_turn = self.restrained == RESTRAINED_ONE_TURN;
        self.restrained = self.restrained.saturating_sub(1);
        was_one_turn
    }

    pub fn has_adrenaline(&self) -> bool {
        self.borrowed.is_some()
    }

    /// Start acting with someone else's inventory
    pub fn borrow_inventory(&mut self, inventory: Inventory) {
        self.borrowed = Some(inventory);
    }

    /// Stop the adrenaline effect, handing back whatever is left of the borrowed items
    pub fn return_inventory(&mut self) -> Option<Inventory> {
        self.borrowed.take()
    }

    /// Give the player an inventory taken from them by an opponent's adrenaline
    pub fn restore_inventory(&mut self, inventory: Inventory) {
        self.inventory = inventory;
    }

    /// Take the own inventory away, leaving an empty one
    pub fn take_inventory(&mut self) -> Inventory {
        std::mem::take(&mut self.inventory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(name: &str) -> PlayerState {
        PlayerState::new(PlayerName::new(name).unwrap(), ChatId::new(1))
    }

    #[test]
    fn test_player_creation() {
        let p = player("Alice");
        assert_eq!(p.name.as_str(), "Alice");
        assert_eq!(p.hp, 1);
        assert!(p.is_alive());
        assert!(!p.is_restrained());
        assert!(!p.has_adrenaline());
    }

    #[test]
    fn test_hp_changes() {
        let mut p = player("Bob");
        p.set_hp(4);
        assert_eq!((p.hp, p.max_hp), (4, 4));

        p.take_damage(2);
        assert_eq!(p.hp, 2);
        p.heal(5);
        assert_eq!(p.hp, 4);

        p.take_damage(6);
        assert_eq!(p.hp, -2);
        assert!(!p.is_alive());
    }

    #[test]
    fn test_set_hp_is_clamped() {
        let mut p = player("Carol");
        p.set_hp(9);
        assert_eq!(p.max_hp, MAX_HP);
    }

    #[test]
    fn test_restraint_ticks() {
        let mut p = player("Dave");
        p.restrain(3);
        assert!(!p.tick_restraint());
        assert!(p.tick_restraint());
        assert!(!p.tick_restraint());
        assert_eq!(p.restrained(), 0);
        assert!(!p.tick_restraint());
        assert_eq!(p.restrained(), 0);
    }

    #[test]
    fn test_borrowed_inventory_is_active() {
        let mut p = player("Eve");
        p.add_item(ItemKind::Beer);

        let mut other = Inventory::new();
        other.add(ItemKind::Handsaw);
        p.borrow_inventory(other);

        assert_eq!(p.item_count(ItemKind::Beer), 0);
        assert_eq!(p.item_count(ItemKind::Handsaw), 1);
        assert!(p.delete_item(ItemKind::Handsaw));

        let returned = p.return_inventory().unwrap();
        assert_eq!(returned.count(ItemKind::Handsaw), 0);
        assert_eq!(p.item_count(ItemKind::Beer), 1);
    }
}
