//! Tournament, its configuration, and the error type shared by every operation.

use crate::models::game::{KnockoutRound, MatchId, Stage, TieId};
use crate::models::player::PlayerId;
use crate::models::team::{GroupId, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;
use uuid::Uuid;

/// Classification of a [`TournamentError`], as seen by the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    /// Bad input or configuration; rejected before any mutation.
    Input,
    /// Referenced tournament/match/team/player does not exist (or belongs elsewhere).
    NotFound,
    /// Stored data contradicts itself. Retrying will not help.
    Internal,
    /// Storage wrote fewer rows than requested.
    Creation,
}

impl ErrorKind {
    /// Status code the web layer answers with for this kind of error.
    pub fn status(self) -> u16 {
        match self {
            ErrorKind::Input => 400,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal | ErrorKind::Creation => 500,
        }
    }
}

/// Errors that can occur during tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Number of teams for knockout rounds must be a power of two (e.g. 2, 4, 8, 16, ...), got {0}")]
    InvalidKnockoutTeamCount(usize),

    #[error("Unsupported number of teams for a knockout round: {0}")]
    UnsupportedKnockoutRound(usize),

    #[error("Number of teams for the knockout stage must be a power of two: {per_group} per group x {groups} groups")]
    InvalidQualifierCount { per_group: u32, groups: usize },

    #[error("Need at least 2 teams to build a schedule, got {0}")]
    NotEnoughTeams(usize),

    #[error("Invalid tournament configuration: {0}")]
    InvalidConfig(String),

    #[error("Matches in the {0} cannot end in a draw")]
    DrawNotAllowed(KnockoutRound),

    #[error("Two-legged tie cannot end level on aggregate ({0}-{1})")]
    AggregateDraw(u32, u32),

    #[error("Invalid score: {0}")]
    InvalidScore(String),

    #[error("Invalid match event: {0}")]
    InvalidEvent(String),

    #[error("Invalid player name")]
    InvalidPlayerName,

    #[error("No existing matches found to determine next match day")]
    NoExistingMatches,

    #[error("No teams/groups available to generate knockout matches")]
    NoQualifiers,

    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    #[error("Match not found in tournament: {0}")]
    MatchNotFound(MatchId),

    #[error("Team not found in tournament: {0}")]
    TeamNotFound(TeamId),

    #[error("Group not found in tournament: {0}")]
    GroupNotFound(GroupId),

    #[error("Player not found in tournament: {0}")]
    PlayerNotFound(PlayerId),

    #[error("Invalid number of matches ({matches}) found for knockout tie {tie}")]
    InconsistentTie { tie: TieId, matches: usize },

    #[error("Two-legged knockout match {0} has no knockout tie")]
    MissingTie(MatchId),

    #[error("Tournament is missing required configuration: {0}")]
    MissingConfig(&'static str),

    #[error("Number of advancing teams for the next knockout round must be a power of two, got {0}")]
    InvalidAdvancingCount(usize),

    #[error("Failed to generate initial knockout matches")]
    PairingFailed,

    #[error("Tournament {0} is in a stage its type does not have: {1:?}")]
    InvalidStage(TournamentId, Stage),

    #[error("Creating {entity} failed: {created} of {requested} created")]
    CreationFailed {
        entity: &'static str,
        requested: usize,
        created: usize,
    },

    #[error("Tournament already exists: {0}")]
    DuplicateTournament(TournamentId),

    #[error("Store lock error")]
    LockPoisoned,

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TournamentError {
    pub fn kind(&self) -> ErrorKind {
        use TournamentError::*;
        match self {
            InvalidKnockoutTeamCount(_)
            | UnsupportedKnockoutRound(_)
            | InvalidQualifierCount { .. }
            | NotEnoughTeams(_)
            | InvalidConfig(_)
            | DrawNotAllowed(_)
            | AggregateDraw(..)
            | InvalidScore(_)
            | InvalidEvent(_)
            | InvalidPlayerName
            | NoExistingMatches
            | NoQualifiers => ErrorKind::Input,
            TournamentNotFound(_)
            | MatchNotFound(_)
            | TeamNotFound(_)
            | GroupNotFound(_)
            | PlayerNotFound(_) => ErrorKind::NotFound,
            InconsistentTie { .. }
            | MissingTie(_)
            | MissingConfig(_)
            | InvalidAdvancingCount(_)
            | PairingFailed
            | InvalidStage(..)
            | LockPoisoned
            | Json(_) => ErrorKind::Internal,
            CreationFailed { .. } | DuplicateTournament(_) => ErrorKind::Creation,
        }
    }
}

/// Fail with [`TournamentError::CreationFailed`] unless every requested row was written.
pub fn ensure_created(
    entity: &'static str,
    requested: usize,
    created: usize,
) -> Result<(), TournamentError> {
    if created != requested {
        return Err(TournamentError::CreationFailed {
            entity,
            requested,
            created,
        });
    }
    Ok(())
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Format of the tournament.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentType {
    /// Round-robin league, one table.
    League,
    /// Round-robin groups feeding a knockout bracket.
    GroupAndKnockout,
    /// Single-elimination from the first match.
    Cup,
}

impl TournamentType {
    /// Stage a freshly created tournament of this type starts in.
    pub fn initial_stage(self) -> Stage {
        match self {
            TournamentType::League => Stage::LeagueStage,
            TournamentType::GroupAndKnockout => Stage::GroupStage,
            TournamentType::Cup => Stage::KnockoutStage,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TournamentStatus {
    #[default]
    InProgress,
    Completed,
}

/// Number of legs played per knockout tie (the final is always one match).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KnockoutLegs {
    Single,
    Double,
}

impl KnockoutLegs {
    pub fn from_count(count: u8) -> Option<Self> {
        match count {
            1 => Some(KnockoutLegs::Single),
            2 => Some(KnockoutLegs::Double),
            _ => None,
        }
    }
}

/// A stored tournament row. Teams, matches etc. live next to it in
/// [`TournamentData`](crate::store::TournamentData).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub owner: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub stage: Stage,
    pub status: TournamentStatus,
    pub teams_count: u32,
    /// Round-robin legs: 1 = everyone meets once, 2 = home and away.
    pub matches_per_team: u32,
    /// Zero unless the tournament has groups.
    pub teams_per_group: u32,
    pub groups_count: u32,
    pub top_teams_advancing: u32,
    /// Zero for leagues.
    pub knockout_legs: u8,
    /// Knockout round currently being played; set by stage progression.
    pub knockout_round: Option<KnockoutRound>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament row from a validated config, normalising the
    /// fields that do not apply to its type.
    pub fn from_config(config: &TournamentConfig, now: DateTime<Utc>) -> Self {
        let grouped = config.kind == TournamentType::GroupAndKnockout;
        Self {
            id: Uuid::new_v4(),
            owner: config.owner.clone(),
            name: config.name.trim().to_string(),
            kind: config.kind,
            stage: config.kind.initial_stage(),
            status: TournamentStatus::InProgress,
            teams_count: config.teams_count,
            matches_per_team: config.matches_per_team,
            teams_per_group: if grouped { config.teams_per_group } else { 0 },
            groups_count: if grouped { config.groups_count } else { 0 },
            top_teams_advancing: if grouped {
                config.teams_advancing_per_group
            } else {
                0
            },
            knockout_legs: if config.kind == TournamentType::League {
                0
            } else {
                config.knockout_legs
            },
            knockout_round: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Knockout legs of an existing tournament; a missing value is a data-integrity problem.
    pub fn legs(&self) -> Result<KnockoutLegs, TournamentError> {
        KnockoutLegs::from_count(self.knockout_legs)
            .ok_or(TournamentError::MissingConfig("knockout_legs"))
    }

    pub fn is_completed(&self) -> bool {
        self.status == TournamentStatus::Completed
    }
}

/// Summary row for listing a user's tournaments.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub stage: Stage,
    pub status: TournamentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            kind: t.kind,
            stage: t.stage,
            status: t.status,
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Request to create a tournament.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(rename = "type")]
    pub kind: TournamentType,
    pub teams_count: u32,
    #[serde(default = "default_matches_per_team")]
    pub matches_per_team: u32,
    #[serde(default)]
    pub teams_per_group: u32,
    #[serde(default)]
    pub groups_count: u32,
    #[serde(default)]
    pub teams_advancing_per_group: u32,
    #[serde(default = "default_knockout_legs")]
    pub knockout_legs: u8,
    /// Team names for LEAGUE and CUP tournaments, in seeding order.
    #[serde(default)]
    pub selected_teams: Vec<String>,
    /// Group label to team names, for GROUP_AND_KNOCKOUT tournaments.
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<String>>,
}

fn default_matches_per_team() -> u32 {
    1
}

fn default_knockout_legs() -> u8 {
    1
}

/// Largest bracket that has a round name.
pub const MAX_KNOCKOUT_TEAMS: usize = 64;

impl TournamentConfig {
    /// Team names in the order they will be created (group label order for grouped tournaments).
    pub fn team_names(&self) -> Vec<&str> {
        match self.kind {
            TournamentType::GroupAndKnockout => self
                .groups
                .values()
                .flat_map(|teams| teams.iter().map(String::as_str))
                .collect(),
            _ => self.selected_teams.iter().map(String::as_str).collect(),
        }
    }

    /// Check the configuration before anything is created.
    pub fn validate(&self) -> Result<(), TournamentError> {
        let invalid = |msg: String| Err(TournamentError::InvalidConfig(msg));

        if self.name.trim().is_empty() {
            return invalid("tournament name is empty".into());
        }

        let names = self.team_names();
        if names.len() < 2 {
            return Err(TournamentError::NotEnoughTeams(names.len()));
        }
        if names.len() != self.teams_count as usize {
            return invalid(format!(
                "teams count is {} but {} teams were given",
                self.teams_count,
                names.len()
            ));
        }
        let mut seen = HashSet::new();
        for name in &names {
            let name = name.trim();
            if name.is_empty() {
                return invalid("team name is empty".into());
            }
            if !seen.insert(name.to_lowercase()) {
                return invalid(format!("duplicate team name: {name}"));
            }
        }

        match self.kind {
            TournamentType::League => self.validate_round_robin_legs(),
            TournamentType::Cup => {
                self.validate_knockout_legs()?;
                let count = names.len();
                if !count.is_power_of_two() || count > MAX_KNOCKOUT_TEAMS {
                    return Err(TournamentError::InvalidKnockoutTeamCount(count));
                }
                Ok(())
            }
            TournamentType::GroupAndKnockout => {
                self.validate_round_robin_legs()?;
                self.validate_knockout_legs()?;
                self.validate_groups()
            }
        }
    }

    fn validate_round_robin_legs(&self) -> Result<(), TournamentError> {
        if !(1..=2).contains(&self.matches_per_team) {
            return Err(TournamentError::InvalidConfig(format!(
                "matches per team must be 1 or 2, got {}",
                self.matches_per_team
            )));
        }
        Ok(())
    }

    fn validate_knockout_legs(&self) -> Result<(), TournamentError> {
        if KnockoutLegs::from_count(self.knockout_legs).is_none() {
            return Err(TournamentError::InvalidConfig(format!(
                "knockout legs must be 1 or 2, got {}",
                self.knockout_legs
            )));
        }
        Ok(())
    }

    fn validate_groups(&self) -> Result<(), TournamentError> {
        let groups = self.groups.len();
        if groups == 0 {
            return Err(TournamentError::InvalidConfig("no groups given".into()));
        }
        let mut labels = HashSet::new();
        for label in self.groups.keys().map(|l| l.trim()) {
            if label.is_empty() {
                return Err(TournamentError::InvalidConfig("group label is empty".into()));
            }
            if !labels.insert(label.to_lowercase()) {
                return Err(TournamentError::InvalidConfig(format!(
                    "duplicate group label: {label}"
                )));
            }
        }
        if groups != self.groups_count as usize {
            return Err(TournamentError::InvalidConfig(format!(
                "groups count is {} but {} groups were given",
                self.groups_count, groups
            )));
        }
        if groups > 1 && groups % 2 != 0 {
            return Err(TournamentError::InvalidConfig(format!(
                "groups are paired for the knockout stage, {groups} groups cannot be paired"
            )));
        }
        let smallest = self.groups.values().map(Vec::len).min().unwrap_or(0);
        if smallest < 2 {
            return Err(TournamentError::InvalidConfig(
                "every group needs at least 2 teams".into(),
            ));
        }
        let advancing = self.teams_advancing_per_group as usize;
        if advancing == 0 || advancing > smallest {
            return Err(TournamentError::InvalidConfig(format!(
                "{advancing} teams cannot advance from groups of {smallest}"
            )));
        }
        let qualifiers = advancing * groups;
        if qualifiers < 2 || !qualifiers.is_power_of_two() || qualifiers > MAX_KNOCKOUT_TEAMS {
            return Err(TournamentError::InvalidQualifierCount {
                per_group: self.teams_advancing_per_group,
                groups,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn league(teams: &[&str]) -> TournamentConfig {
        TournamentConfig {
            name: "Sunday League".into(),
            owner: "alice".into(),
            kind: TournamentType::League,
            teams_count: teams.len() as u32,
            matches_per_team: 2,
            teams_per_group: 4,
            groups_count: 2,
            teams_advancing_per_group: 2,
            knockout_legs: 2,
            selected_teams: teams.iter().map(|t| t.to_string()).collect(),
            groups: BTreeMap::new(),
        }
    }

    #[test]
    fn league_config_normalises_group_and_knockout_fields() {
        let config = league(&["A", "B", "C"]);
        config.validate().unwrap();
        let t = Tournament::from_config(&config, Utc::now());
        assert_eq!(t.stage, Stage::LeagueStage);
        assert_eq!(t.groups_count, 0);
        assert_eq!(t.top_teams_advancing, 0);
        assert_eq!(t.knockout_legs, 0);
        assert!(matches!(t.legs(), Err(TournamentError::MissingConfig(_))));
    }

    #[test]
    fn duplicate_team_names_are_rejected() {
        let config = league(&["Rovers", "rovers"]);
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Input);
    }

    #[test]
    fn cup_requires_power_of_two() {
        let mut config = league(&["A", "B", "C"]);
        config.kind = TournamentType::Cup;
        assert!(matches!(
            config.validate(),
            Err(TournamentError::InvalidKnockoutTeamCount(3))
        ));
    }

    #[test]
    fn qualifiers_must_form_a_bracket() {
        let mut config = league(&[]);
        config.kind = TournamentType::GroupAndKnockout;
        config.selected_teams.clear();
        config.groups.insert("A".into(), vec!["1".into(), "2".into(), "3".into()]);
        config.groups.insert("B".into(), vec!["4".into(), "5".into(), "6".into()]);
        config.teams_count = 6;
        config.teams_advancing_per_group = 3;
        assert!(matches!(
            config.validate(),
            Err(TournamentError::InvalidQualifierCount { per_group: 3, groups: 2 })
        ));
        config.teams_advancing_per_group = 2;
        config.validate().unwrap();
    }

    #[test]
    fn group_labels_must_be_distinct_after_trimming() {
        let mut config = league(&[]);
        config.kind = TournamentType::GroupAndKnockout;
        config.teams_count = 4;
        config.groups.insert("A".into(), vec!["1".into(), "2".into()]);
        config.groups.insert(" A".into(), vec!["3".into(), "4".into()]);
        assert!(matches!(config.validate(), Err(TournamentError::InvalidConfig(_))));

        config.groups.remove(" A");
        config.groups.insert("  ".into(), vec!["3".into(), "4".into()]);
        assert!(matches!(config.validate(), Err(TournamentError::InvalidConfig(_))));

        config.groups.remove("  ");
        config.groups.insert("B".into(), vec!["3".into(), "4".into()]);
        config.teams_advancing_per_group = 1;
        config.validate().unwrap();
    }

    #[test]
    fn error_kinds_map_to_status_codes() {
        assert_eq!(TournamentError::NoQualifiers.kind().status(), 400);
        assert_eq!(TournamentError::InvalidScore(String::new()).kind(), ErrorKind::Input);
        assert_eq!(TournamentError::MatchNotFound(Uuid::nil()).kind().status(), 404);
        assert_eq!(TournamentError::PairingFailed.kind().status(), 500);
        assert_eq!(
            ensure_created("matches", 3, 2).unwrap_err().kind(),
            ErrorKind::Creation
        );
    }
}
