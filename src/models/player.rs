//! Player data structure.

use crate::models::team::TeamId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in match events and lookups).
pub type PlayerId = Uuid;

/// A squad member of a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub team_id: TeamId,
    pub name: String,
    /// Recomputed from match events, never incremented in place.
    pub goals: u32,
    pub assists: u32,
}

impl Player {
    /// Create a new player with the given name. Goals and assists start at zero.
    pub fn new(team_id: TeamId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_id,
            name: name.into(),
            goals: 0,
            assists: 0,
        }
    }

    pub fn reset_stats(&mut self) {
        self.goals = 0;
        self.assists = 0;
    }
}
