//! Tournament business logic: setup, scheduling, knockout progression, reports and stats.

mod fixtures;
mod knockout;
mod pairing;
mod progression;
mod report;
mod round_robin;
mod setup;
mod stats;
mod tie_resolver;

pub use fixtures::{
    generate_initial_fixtures, generate_initial_knockout_from_groups, generate_next_knockout_round,
    persist_fixtures, schedule_initial_fixtures,
};
pub use knockout::{
    build_bracket, build_knockout_legs, build_knockout_round, determine_knockout_round, needs_tie,
    FixtureBatch,
};
pub use pairing::{
    group_tables, pair_across_groups, pair_group_winners, pair_qualifiers, pair_within_group,
    GroupTable, PairingPolicy,
};
pub use progression::{evaluate_stage_progression, Progression};
pub use report::{
    apply_match_report, replace_match_events, submit_match_report, MatchReport, ReportOutcome,
};
pub use round_robin::{match_days_per_leg, round_robin_schedule};
pub use setup::{
    add_player, build_tournament, create_tournament, delete_tournament, draw_groups,
    tournaments_by_owner, MAX_GROUPS,
};
pub use stats::{compare_standings, rank_teams, recompute_player_stats, recompute_team_stats};
pub use tie_resolver::{advancing_teams, tie_winner, validate_and_resolve_tie, TieOutcome};
