//! The user record: identity, balance and win/loss statistics.
//!
//! Fields that carry invariants are private. Outside this crate the
//! record is read-only; every mutation goes through the ledger
//! operations on `Session` so `most_played_game` is always recomputed.

use crate::types::{Credits, GameId};
use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GameTally {
    pub wins: u64,
    pub losses: u64,
}

impl GameTally {
    pub fn plays(&self) -> u64 {
        self.wins + self.losses
    }
}

/// Per-game tallies in first-played order.
///
/// Persisted as a JSON object keyed by game id. Entry order is kept on
/// both sides so tie-breaking in `most_played_game` survives a reload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameStatsMap {
    entries: Vec<(GameId, GameTally)>,
}

impl GameStatsMap {
    pub fn get(&self, game: GameId) -> Option<&GameTally> {
        self.entries.iter().find(|(g, _)| *g == game).map(|(_, t)| t)
    }

    pub fn iter(&self) -> impl Iterator<Item = (GameId, &GameTally)> {
        self.entries.iter().map(|(g, t)| (*g, t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn entry(&mut self, game: GameId) -> &mut GameTally {
        let idx = match self.entries.iter().position(|(g, _)| *g == game) {
            Some(idx) => idx,
            None => {
                self.entries.push((game, GameTally::default()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }
}

impl Serialize for GameStatsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (game, tally) in &self.entries {
            map.serialize_entry(game, tally)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for GameStatsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GameStatsVisitor;

        impl<'de> Visitor<'de> for GameStatsVisitor {
            type Value = GameStatsMap;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of game id to {wins, losses}")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut stats = GameStatsMap::default();
                while let Some((game, tally)) = access.next_entry::<GameId, GameTally>()? {
                    *stats.entry(game) = tally;
                }
                Ok(stats)
            }
        }

        deserializer.deserialize_map(GameStatsVisitor)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    wins: u64,
    losses: u64,
    most_played_game: Option<GameId>,
    credits_earned: Credits,
    credits_lost: Credits,
    #[serde(default)]
    game_stats: GameStatsMap,
}

impl UserStats {
    pub fn wins(&self) -> u64 { self.wins }
    pub fn losses(&self) -> u64 { self.losses }
    pub fn most_played_game(&self) -> Option<GameId> { self.most_played_game }
    pub fn credits_earned(&self) -> Credits { self.credits_earned }
    pub fn credits_lost(&self) -> Credits { self.credits_lost }
    pub fn game_stats(&self) -> &GameStatsMap { &self.game_stats }

    pub(crate) fn add_win(&mut self, game: GameId, amount: Credits) {
        self.wins += 1;
        self.credits_earned += amount;
        self.game_stats.entry(game).wins += 1;
    }

    pub(crate) fn add_loss(&mut self, game: GameId, amount: Credits) {
        self.losses += 1;
        self.credits_lost += amount;
        self.game_stats.entry(game).losses += 1;
    }

    /// Strictly greatest plays wins; ties keep the first-played game.
    pub(crate) fn recompute_most_played(&mut self) {
        let mut best: Option<(GameId, u64)> = None;
        for (game, tally) in self.game_stats.iter() {
            let plays = tally.plays();
            if plays > best.map_or(0, |(_, p)| p) {
                best = Some((game, plays));
            }
        }
        self.most_played_game = best.map(|(game, _)| game);
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    name: String,
    #[serde(default)]
    profile_picture: String,
    #[serde(alias = "creditsAvaliable")]
    credits_available: Credits,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    stats: Option<UserStats>,
}

impl UserRecord {
    /// A freshly logged-in user: zero balance, zeroed stats.
    pub fn new(name: impl Into<String>, profile_picture: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            profile_picture: profile_picture.into(),
            credits_available: 0.0,
            stats: Some(UserStats::default()),
        }
    }

    /// The nameless pre-seeded record a fresh store starts with.
    pub fn guest(balance: Credits) -> Self {
        Self {
            name: String::new(),
            profile_picture: String::new(),
            credits_available: balance.max(0.0),
            stats: None,
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn profile_picture(&self) -> &str { &self.profile_picture }
    pub fn credits_available(&self) -> Credits { self.credits_available }
    pub fn stats(&self) -> Option<&UserStats> { self.stats.as_ref() }

    pub(crate) fn add_credits(&mut self, amount: Credits) {
        self.credits_available += amount;
    }

    pub(crate) fn remove_credits(&mut self, amount: Credits) {
        self.credits_available = (self.credits_available - amount).max(0.0);
    }

    pub(crate) fn stats_mut(&mut self) -> &mut UserStats {
        self.stats.get_or_insert_with(UserStats::default)
    }
}
