//! Team, TeamStats and Group data structures.

use crate::models::tournament::TournamentId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team.
pub type TeamId = Uuid;

/// Unique identifier for a group.
pub type GroupId = Uuid;

/// Aggregate table statistics of a team.
///
/// `goal_difference` and `points` are only ever written by [`TeamStats::from_results`],
/// so `goal_difference == goals_for - goals_against` and `points == wins * 3 + draws` hold.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

/// Raw counters accumulated while folding over played matches.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MatchTally {
    pub games_played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
}

impl MatchTally {
    /// Record one played match from this team's point of view.
    pub fn record(&mut self, scored: u32, conceded: u32) {
        self.games_played = self.games_played.saturating_add(1);
        self.goals_for = self.goals_for.saturating_add(scored);
        self.goals_against = self.goals_against.saturating_add(conceded);
        match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => self.wins += 1,
            std::cmp::Ordering::Less => self.losses += 1,
            std::cmp::Ordering::Equal => self.draws += 1,
        }
    }
}

impl TeamStats {
    pub fn from_results(tally: MatchTally) -> Self {
        Self {
            games_played: tally.games_played,
            wins: tally.wins,
            draws: tally.draws,
            losses: tally.losses,
            goals_for: tally.goals_for,
            goals_against: tally.goals_against,
            goal_difference: i64::from(tally.goals_for) - i64::from(tally.goals_against),
            points: tally.wins * 3 + tally.draws,
        }
    }
}

/// A team taking part in one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub tournament_id: TournamentId,
    pub name: String,
    pub group_id: Option<GroupId>,
    /// 1-based rank within its group or league; None until computed.
    pub position: Option<u32>,
    pub stats: TeamStats,
}

impl Team {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>, group_id: Option<GroupId>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
            group_id,
            position: None,
            stats: TeamStats::default(),
        }
    }
}

/// A group of the group stage, labelled "A", "B", ...
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub tournament_id: TournamentId,
    pub name: String,
}

impl Group {
    pub fn new(tournament_id: TournamentId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
            name: name.into(),
        }
    }
}
