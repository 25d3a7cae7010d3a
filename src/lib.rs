//! Football tournament engine: leagues, group stages and knockout cups,
//! with scheduling, result reporting, statistics and stage progression.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_player, create_tournament, delete_tournament, draw_groups, evaluate_stage_progression,
    submit_match_report, tournaments_by_owner, MatchReport, Progression, ReportOutcome, TieOutcome,
};
pub use models::{
    ErrorKind, EventInput, EventType, GameMatch, KnockoutRound, MatchId, Player, PlayerId, Stage,
    Team, TeamId, Tournament, TournamentConfig, TournamentError, TournamentId, TournamentStatus,
    TournamentType,
};
pub use store::{MemoryStore, TournamentData, TournamentStore};
