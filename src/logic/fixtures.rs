//! Fixture orchestration: picks the scheduler for the tournament type and stage,
//! and stores what it produces.

use crate::logic::knockout::{
    build_bracket, build_knockout_round, determine_knockout_round, FixtureBatch,
};
use crate::logic::pairing::{group_tables, pair_qualifiers};
use crate::logic::round_robin::round_robin_schedule;
use crate::logic::tie_resolver::advancing_teams;
use crate::models::{
    ensure_created, Group, KnockoutRound, Stage, Team, TeamId, Tournament, TournamentError,
    TournamentType,
};
use crate::store::TournamentData;

/// Schedule the opening fixtures of a new tournament.
///
/// Leagues get one round-robin, grouped tournaments one round-robin per group
/// (groups share match days), cups their first knockout round on match day 1.
/// Returns the knockout round that was scheduled, if any.
pub fn schedule_initial_fixtures(
    tournament: &Tournament,
    teams: &[Team],
    groups: &[Group],
) -> Result<(Option<KnockoutRound>, FixtureBatch), TournamentError> {
    match tournament.kind {
        TournamentType::League => {
            let all = team_ids(teams.iter());
            let matches = round_robin_schedule(
                tournament.id,
                &all,
                tournament.matches_per_team,
                Stage::LeagueStage,
            )?;
            Ok((None, FixtureBatch::from_matches(matches)))
        }
        TournamentType::GroupAndKnockout => {
            let mut matches = Vec::new();
            for group in groups {
                let members = team_ids(teams.iter().filter(|t| t.group_id == Some(group.id)));
                matches.extend(round_robin_schedule(
                    tournament.id,
                    &members,
                    tournament.matches_per_team,
                    Stage::GroupStage,
                )?);
            }
            Ok((None, FixtureBatch::from_matches(matches)))
        }
        TournamentType::Cup => {
            let all = team_ids(teams.iter());
            let (round, batch) = build_bracket(tournament.id, &all, 1, tournament.legs()?)?;
            Ok((Some(round), batch))
        }
    }
}

fn team_ids<'a>(teams: impl Iterator<Item = &'a Team>) -> Vec<TeamId> {
    teams.map(|t| t.id).collect()
}

/// Write ties then matches; any row that could not be written fails the whole operation.
pub fn persist_fixtures(data: &mut TournamentData, batch: FixtureBatch) -> Result<(), TournamentError> {
    let (ties, matches) = (batch.ties.len(), batch.matches.len());
    ensure_created("knockout ties", ties, data.insert_ties(batch.ties))?;
    ensure_created("matches", matches, data.insert_matches(batch.matches))?;
    Ok(())
}

/// Schedule and store the opening fixtures for a tournament whose teams and groups exist.
pub fn generate_initial_fixtures(data: &mut TournamentData) -> Result<FixtureBatch, TournamentError> {
    let (round, batch) = schedule_initial_fixtures(&data.tournament, &data.teams, &data.groups)?;
    if batch.is_empty() {
        return Err(TournamentError::NotEnoughTeams(data.teams.len()));
    }
    data.tournament.knockout_round = round;
    persist_fixtures(data, batch.clone())?;
    log::info!(
        "Generated {} initial fixtures for tournament {}",
        batch.matches.len(),
        data.id()
    );
    Ok(batch)
}

/// First knockout round from the final group tables. Sets the tournament's knockout round.
pub fn generate_initial_knockout_from_groups(
    data: &mut TournamentData,
) -> Result<FixtureBatch, TournamentError> {
    let groups = group_tables(data);
    let per_group = data.tournament.top_teams_advancing;
    let qualifiers = per_group as usize * groups.len();
    if qualifiers == 0 {
        return Err(TournamentError::NoQualifiers);
    }
    if !qualifiers.is_power_of_two() {
        return Err(TournamentError::InvalidQualifierCount {
            per_group,
            groups: groups.len(),
        });
    }

    let round = determine_knockout_round(qualifiers)?;
    let legs = data.tournament.legs()?;
    let match_day = data.next_match_day()?;
    let pairs = pair_qualifiers(&groups, per_group)?;
    if pairs.is_empty() {
        return Err(TournamentError::PairingFailed);
    }

    let batch = build_knockout_round(data.id(), &pairs, match_day, legs, round);
    data.tournament.knockout_round = Some(round);
    persist_fixtures(data, batch.clone())?;
    log::info!(
        "Tournament {}: {} qualifiers drawn into the {round} from match day {match_day}",
        data.id(),
        qualifiers
    );
    Ok(batch)
}

/// Next knockout round from the winners of the current one. Sets the tournament's knockout round.
pub fn generate_next_knockout_round(data: &mut TournamentData) -> Result<FixtureBatch, TournamentError> {
    let previous = data
        .tournament
        .knockout_round
        .ok_or(TournamentError::MissingConfig("knockout_round"))?;
    let legs = data.tournament.legs()?;
    let advancing = advancing_teams(data, previous, legs)?;
    if advancing.len() < 2 || !advancing.len().is_power_of_two() {
        return Err(TournamentError::InvalidAdvancingCount(advancing.len()));
    }

    let match_day = data.next_match_day()?;
    let (round, batch) = build_bracket(data.id(), &advancing, match_day, legs)?;
    data.tournament.knockout_round = Some(round);
    persist_fixtures(data, batch.clone())?;
    log::info!(
        "Tournament {}: {} teams advance from the {previous} to the {round}",
        data.id(),
        advancing.len()
    );
    Ok(batch)
}
