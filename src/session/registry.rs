//! Room registry
//!
//! Maps room ids to matches and players to the room they sit in. A player can
//! only be registered in one room: seating them anywhere drops the room they
//! were in before.

use crate::core::{ChatId, DuelConfig, Seat};
use crate::game::DuelEngine;
use crate::session::MatchHandle;
use crate::{DuelError, Result};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;
use rustc_hash::FxHashMap;
use std::ops::RangeInclusive;

/// Range random room ids are drawn from
pub const ROOM_ID_RANGE: RangeInclusive<u32> = 100_000..=999_999;

/// Rooms and the players registered in them
pub struct SessionRegistry {
    rooms: FxHashMap<u32, MatchHandle>,
    players: FxHashMap<ChatId, u32>,
    config: DuelConfig,
    rng: ChaCha12Rng,
}

impl SessionRegistry {
    /// Create an empty registry; every room it opens plays by `config`
    pub fn new(config: DuelConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(SessionRegistry {
            rooms: FxHashMap::default(),
            players: FxHashMap::default(),
            config,
            rng: ChaCha12Rng::seed_from_u64(seed),
        })
    }

    /// Create a room under `room_id`. Does nothing if it already exists.
    pub fn create_room(&mut self, room_id: u32) -> MatchHandle {
        if let Some(handle) = self.rooms.get(&room_id) {
            return handle.clone();
        }
        let engine = DuelEngine::from_validated(self.config.clone(), self.rng.gen());
        let handle = MatchHandle::new(engine);
        self.rooms.insert(room_id, handle.clone());
        handle
    }

    /// Create a room under a fresh random six-digit id
    pub fn create_random_room(&mut self) -> u32 {
        loop {
            let room_id = self.rng.gen_range(ROOM_ID_RANGE);
            if !self.rooms.contains_key(&room_id) {
                self.create_room(room_id);
                return room_id;
            }
        }
    }

    pub fn room(&self, room_id: u32) -> Result<MatchHandle> {
        self.rooms
            .get(&room_id)
            .cloned()
            .ok_or(DuelError::RoomNotFound(room_id))
    }

    pub fn check_room(&self, room_id: u32) -> Option<MatchHandle> {
        self.rooms.get(&room_id).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Seat a player in the first free seat of `room_id`.
    ///
    /// Any room the player was registered in before is dropped first, even
    /// when it is `room_id` itself. A room with both seats taken refuses the
    /// player and leaves their current registration alone.
    pub async fn seat_player(&mut self, name: &str, chat_id: ChatId, room_id: u32) -> Result<Seat> {
        let handle = self.room(room_id)?;
        let full = handle
            .with_engine(|engine| {
                engine.player(Seat::First).is_some() && engine.player(Seat::Second).is_some()
            })
            .await;
        if full && self.players.get(&chat_id) != Some(&room_id) {
            return Err(DuelError::RoomFull(room_id));
        }

        self.evict_player(chat_id).await;
        let handle = self.room(room_id)?;

        let seat = handle
            .with_engine(|engine| {
                let seat = if engine.player(Seat::First).is_none() {
                    Seat::First
                } else {
                    Seat::Second
                };
                engine.seat_player(name, chat_id, seat).map(|_| seat)
            })
            .await?;

        self.players.insert(chat_id, room_id);
        Ok(seat)
    }

    /// Drop the player's room and unregister everyone seated in it
    pub async fn evict_player(&mut self, chat_id: ChatId) {
        let Some(room_id) = self.players.remove(&chat_id) else {
            return;
        };
        self.players.retain(|_, seated_in| *seated_in != room_id);
        if let Some(handle) = self.rooms.remove(&room_id) {
            handle.shutdown().await;
        }
    }

    pub fn room_id_by_player(&self, chat_id: ChatId) -> Result<u32> {
        self.players
            .get(&chat_id)
            .copied()
            .ok_or(DuelError::NotInRoom(chat_id.as_i64()))
    }

    /// Chat ids of both seats in the player's room
    pub async fn players_of(&self, chat_id: ChatId) -> Result<(ChatId, ChatId)> {
        let room_id = self.room_id_by_player(chat_id)?;
        let handle = self.room(room_id)?;
        handle
            .with_engine(|engine| {
                match (engine.player(Seat::First), engine.player(Seat::Second)) {
                    (Some(first), Some(second)) => Ok((first.chat_id, second.chat_id)),
                    _ => Err(DuelError::SeatsIncomplete),
                }
            })
            .await
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("rooms", &self.rooms.len())
            .field("players", &self.players.len())
            .finish()
    }
}
