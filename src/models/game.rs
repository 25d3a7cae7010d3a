//! Matches, knockout ties, match events, and the stage/round labels they carry.

use crate::models::player::PlayerId;
use crate::models::team::TeamId;
use crate::models::tournament::{TournamentError, TournamentId};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Unique identifier for a two-legged knockout tie.
pub type TieId = Uuid;

/// Unique identifier for a match event row.
pub type EventId = Uuid;

/// Most goals one side can score, or one event can credit, in a single match.
pub const MAX_GOALS: u32 = 999;

/// Top-level phase of a tournament; every match belongs to one.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    LeagueStage,
    GroupStage,
    KnockoutStage,
}

/// Knockout round, named by the number of teams still in it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum KnockoutRound {
    #[serde(rename = "FINAL")]
    Final,
    #[serde(rename = "SEMI_FINALS")]
    SemiFinals,
    #[serde(rename = "QUARTER_FINALS")]
    QuarterFinals,
    #[serde(rename = "ROUND_OF_16")]
    RoundOf16,
    #[serde(rename = "ROUND_OF_32")]
    RoundOf32,
    #[serde(rename = "ROUND_OF_64")]
    RoundOf64,
}

impl KnockoutRound {
    /// Round played by `teams_count` teams: 2 → final, 4 → semi-finals, ... 64 → round of 64.
    pub fn for_team_count(teams_count: usize) -> Result<Self, TournamentError> {
        match teams_count {
            2 => Ok(KnockoutRound::Final),
            4 => Ok(KnockoutRound::SemiFinals),
            8 => Ok(KnockoutRound::QuarterFinals),
            16 => Ok(KnockoutRound::RoundOf16),
            32 => Ok(KnockoutRound::RoundOf32),
            64 => Ok(KnockoutRound::RoundOf64),
            n => Err(TournamentError::UnsupportedKnockoutRound(n)),
        }
    }

    pub fn teams_count(self) -> usize {
        match self {
            KnockoutRound::Final => 2,
            KnockoutRound::SemiFinals => 4,
            KnockoutRound::QuarterFinals => 8,
            KnockoutRound::RoundOf16 => 16,
            KnockoutRound::RoundOf32 => 32,
            KnockoutRound::RoundOf64 => 64,
        }
    }

    pub fn is_final(self) -> bool {
        self == KnockoutRound::Final
    }
}

impl fmt::Display for KnockoutRound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            KnockoutRound::Final => "final",
            KnockoutRound::SemiFinals => "semi-finals",
            KnockoutRound::QuarterFinals => "quarter-finals",
            KnockoutRound::RoundOf16 => "round of 16",
            KnockoutRound::RoundOf32 => "round of 32",
            KnockoutRound::RoundOf64 => "round of 64",
        };
        f.write_str(label)
    }
}

/// Groups the two legs of a two-legged knockout pairing.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct KnockoutTie {
    pub id: TieId,
    pub tournament_id: TournamentId,
}

impl KnockoutTie {
    pub fn new(tournament_id: TournamentId) -> Self {
        Self {
            id: Uuid::new_v4(),
            tournament_id,
        }
    }
}

/// Final score of a played match. Both sides are always set together.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home, away }
    }

    pub fn is_draw(&self) -> bool {
        self.home == self.away
    }
}

/// A match that has been scheduled but not yet stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchDraft {
    pub tournament_id: TournamentId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub match_day: u32,
    pub stage: Stage,
    pub knockout_round: Option<KnockoutRound>,
    pub knockout_tie_id: Option<TieId>,
    pub leg_number: Option<u8>,
}

impl MatchDraft {
    /// Turn the draft into a stored match with the given creation order.
    pub fn into_match(self, sequence: u64) -> GameMatch {
        GameMatch {
            id: Uuid::new_v4(),
            tournament_id: self.tournament_id,
            home_team_id: self.home_team_id,
            away_team_id: self.away_team_id,
            match_day: self.match_day,
            stage: self.stage,
            knockout_round: self.knockout_round,
            knockout_tie_id: self.knockout_tie_id,
            leg_number: self.leg_number,
            score: None,
            sequence,
        }
    }
}

/// A stored match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub tournament_id: TournamentId,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    /// Scheduling order within the tournament.
    pub match_day: u32,
    pub stage: Stage,
    pub knockout_round: Option<KnockoutRound>,
    pub knockout_tie_id: Option<TieId>,
    pub leg_number: Option<u8>,
    /// None if not yet played.
    pub score: Option<Score>,
    /// Creation order; breaks ties between matches on the same match day.
    pub sequence: u64,
}

impl GameMatch {
    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    /// Winner by score, None if unplayed or drawn.
    pub fn winner(&self) -> Option<TeamId> {
        let score = self.score?;
        match score.home.cmp(&score.away) {
            std::cmp::Ordering::Greater => Some(self.home_team_id),
            std::cmp::Ordering::Less => Some(self.away_team_id),
            std::cmp::Ordering::Equal => None,
        }
    }

    /// Goals scored by `team` in this match (0 if it did not take part or the match is unplayed).
    pub fn goals_for(&self, team: TeamId) -> u32 {
        match self.score {
            Some(s) if team == self.home_team_id => s.home,
            Some(s) if team == self.away_team_id => s.away,
            _ => 0,
        }
    }
}

/// Kind of a recorded match event.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Goal,
    Assist,
}

/// Goals or assists by one player in one match, stored as one row with a count.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    pub id: EventId,
    pub match_id: MatchId,
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub kind: EventType,
    /// Always > 0.
    pub amount: u32,
}

/// Event as submitted with a match report.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub player_id: PlayerId,
    #[serde(rename = "type")]
    pub kind: EventType,
    pub amount: u32,
}

impl EventInput {
    pub fn goals(player_id: PlayerId, amount: u32) -> Self {
        Self {
            player_id,
            kind: EventType::Goal,
            amount,
        }
    }

    pub fn assists(player_id: PlayerId, amount: u32) -> Self {
        Self {
            player_id,
            kind: EventType::Assist,
            amount,
        }
    }
}
