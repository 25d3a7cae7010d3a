//! Data structures for the football tournament: teams, players, matches, tournament state.

mod game;
mod player;
mod team;
mod tournament;

pub use game::{
    EventId, EventInput, EventType, GameMatch, KnockoutRound, KnockoutTie, MatchDraft, MatchEvent,
    MatchId, Score, Stage, TieId, MAX_GOALS,
};
pub use player::{Player, PlayerId};
pub use team::{Group, GroupId, MatchTally, Team, TeamId, TeamStats};
pub use tournament::{
    ensure_created, ErrorKind, KnockoutLegs, Tournament, TournamentConfig, TournamentError,
    TournamentId, TournamentStatus, TournamentSummary, TournamentType, MAX_KNOCKOUT_TEAMS,
};
