//! Stage transitions: group stage → knockout, round → round, and completion.

use crate::logic::fixtures::{generate_initial_knockout_from_groups, generate_next_knockout_round};
use crate::models::{
    GameMatch, KnockoutRound, Stage, TournamentError, TournamentStatus, TournamentType,
};
use crate::store::TournamentData;

/// What a progression check did.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Progression {
    /// Matches of the current stage/round are still to be played.
    Unchanged,
    /// Group stage finished; the first knockout round was drawn.
    KnockoutStarted(KnockoutRound),
    /// A knockout round finished; the next one was drawn.
    NextRound(KnockoutRound),
    /// The last match was played.
    Completed,
}

fn all_played<'a>(mut matches: impl Iterator<Item = &'a GameMatch>) -> bool {
    let mut any = false;
    let done = matches.all(|m| {
        any = true;
        m.is_played()
    });
    any && done
}

/// Advance the tournament if the current stage or round is fully played.
///
/// Calling it again without new results is a no-op: the group stage is left exactly
/// once because the stage field flips before the knockout draw, and a new round's
/// matches are unplayed when it is created.
pub fn evaluate_stage_progression(data: &mut TournamentData) -> Result<Progression, TournamentError> {
    if data.tournament.is_completed() {
        return Ok(Progression::Unchanged);
    }

    match (data.tournament.kind, data.tournament.stage) {
        (TournamentType::League, Stage::LeagueStage) => {
            if !all_played(data.matches_in_stage(Stage::LeagueStage)) {
                return Ok(Progression::Unchanged);
            }
            complete(data);
            Ok(Progression::Completed)
        }
        (TournamentType::GroupAndKnockout, Stage::GroupStage) => {
            if !all_played(data.matches_in_stage(Stage::GroupStage)) {
                return Ok(Progression::Unchanged);
            }
            data.tournament.stage = Stage::KnockoutStage;
            generate_initial_knockout_from_groups(data)?;
            let round = data
                .tournament
                .knockout_round
                .ok_or(TournamentError::MissingConfig("knockout_round"))?;
            log::info!("Tournament {}: group stage complete, {round} drawn", data.id());
            Ok(Progression::KnockoutStarted(round))
        }
        (TournamentType::GroupAndKnockout | TournamentType::Cup, Stage::KnockoutStage) => {
            advance_knockout(data)
        }
        (_, stage) => Err(TournamentError::InvalidStage(data.id(), stage)),
    }
}

fn advance_knockout(data: &mut TournamentData) -> Result<Progression, TournamentError> {
    let round = data
        .tournament
        .knockout_round
        .ok_or(TournamentError::MissingConfig("knockout_round"))?;
    if !all_played(data.matches_in_round(round)) {
        return Ok(Progression::Unchanged);
    }
    if round.is_final() {
        complete(data);
        return Ok(Progression::Completed);
    }

    generate_next_knockout_round(data)?;
    let next = data
        .tournament
        .knockout_round
        .ok_or(TournamentError::MissingConfig("knockout_round"))?;
    Ok(Progression::NextRound(next))
}

fn complete(data: &mut TournamentData) {
    data.tournament.status = TournamentStatus::Completed;
    log::info!("Tournament {} completed", data.id());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_stage_is_not_complete() {
        assert!(!all_played(std::iter::empty()));
    }
}
