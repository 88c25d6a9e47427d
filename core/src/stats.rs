//! Statistics report for the user dashboard.

use crate::{
    types::{Credits, GameId},
    user::UserRecord,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameBreakdown {
    pub game:   GameId,
    pub wins:   u64,
    pub losses: u64,
    pub total:  u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatsReport {
    pub name:             String,
    pub balance:          Credits,
    pub wins:             u64,
    pub losses:           u64,
    pub plays:            u64,
    /// wins / (wins + losses); 0 before the first round.
    pub win_ratio:        f64,
    pub credits_earned:   Credits,
    pub credits_lost:     Credits,
    pub net:              Credits,
    pub most_played_game: Option<GameId>,
    /// In first-played order.
    pub per_game:         Vec<GameBreakdown>,
}

impl StatsReport {
    /// `None` when the record has no statistics yet.
    pub fn from_record(user: &UserRecord) -> Option<Self> {
        let stats = user.stats()?;
        let plays = stats.wins() + stats.losses();
        let win_ratio = if plays == 0 {
            0.0
        } else {
            stats.wins() as f64 / plays as f64
        };

        let per_game = stats
            .game_stats()
            .iter()
            .map(|(game, tally)| GameBreakdown {
                game,
                wins: tally.wins,
                losses: tally.losses,
                total: tally.plays(),
            })
            .collect();

        Some(Self {
            name: user.name().to_string(),
            balance: user.credits_available(),
            wins: stats.wins(),
            losses: stats.losses(),
            plays,
            win_ratio,
            credits_earned: stats.credits_earned(),
            credits_lost: stats.credits_lost(),
            net: stats.credits_earned() - stats.credits_lost(),
            most_played_game: stats.most_played_game(),
            per_game,
        })
    }

    pub fn most_played_label(&self) -> String {
        self.most_played_game
            .map_or_else(|| "none yet".to_string(), |g| g.to_string())
    }
}
