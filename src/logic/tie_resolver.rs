//! Knockout outcomes: which reports are allowed, and who goes through.

use crate::models::{
    GameMatch, KnockoutLegs, KnockoutRound, MatchId, Score, Stage, TeamId, TieId, TournamentError,
};
use crate::store::TournamentData;

/// What a knockout report means for its tie.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TieOutcome {
    /// Not a knockout match; anything goes.
    NotKnockout,
    /// First of two legs reported, the other is still to be played.
    AwaitingOtherLeg,
    /// The tie is decided.
    Decided { winner: TeamId },
}

/// Check a proposed score for `match_id` against the knockout rules, without writing it.
///
/// - the final and single-leg matches cannot be drawn;
/// - a two-legged tie cannot be level on aggregate once both legs are in.
pub fn validate_and_resolve_tie(
    data: &TournamentData,
    match_id: MatchId,
    home_score: u32,
    away_score: u32,
) -> Result<TieOutcome, TournamentError> {
    let m = data.match_by_id(match_id)?;
    if m.stage != Stage::KnockoutStage {
        return Ok(TieOutcome::NotKnockout);
    }
    let round = m
        .knockout_round
        .ok_or(TournamentError::MissingConfig("knockout_round"))?;
    let score = Score::new(home_score, away_score);

    if round.is_final() || data.tournament.legs()? == KnockoutLegs::Single {
        if score.is_draw() {
            return Err(TournamentError::DrawNotAllowed(round));
        }
        let winner = if home_score > away_score {
            m.home_team_id
        } else {
            m.away_team_id
        };
        return Ok(TieOutcome::Decided { winner });
    }

    let tie_id = m.knockout_tie_id.ok_or(TournamentError::MissingTie(m.id))?;
    let legs = data.tie_matches(tie_id);
    if legs.len() > 2 {
        return Err(TournamentError::InconsistentTie {
            tie: tie_id,
            matches: legs.len(),
        });
    }

    let Some(other) = legs.iter().find(|l| l.id != m.id) else {
        return Ok(TieOutcome::AwaitingOtherLeg);
    };
    let Some(other_score) = other.score else {
        return Ok(TieOutcome::AwaitingOtherLeg);
    };

    // side A is this leg's home team, which is the away side of the other leg
    let overflow =
        || TournamentError::InvalidScore(format!("aggregate of tie {tie_id} is out of range"));
    let aggregate_a = home_score.checked_add(other_score.away).ok_or_else(overflow)?;
    let aggregate_b = away_score.checked_add(other_score.home).ok_or_else(overflow)?;
    if aggregate_a == aggregate_b {
        log::warn!("rejecting report for match {match_id}: aggregate {aggregate_a}-{aggregate_b}");
        return Err(TournamentError::AggregateDraw(aggregate_a, aggregate_b));
    }
    let winner = if aggregate_a > aggregate_b {
        m.home_team_id
    } else {
        m.away_team_id
    };
    Ok(TieOutcome::Decided { winner })
}

/// Winner of a two-legged tie on aggregate, None until both legs are played or if level.
pub fn tie_winner(tie_id: TieId, legs: &[&GameMatch]) -> Result<Option<TeamId>, TournamentError> {
    let [a, b] = legs else {
        return Err(TournamentError::InconsistentTie {
            tie: tie_id,
            matches: legs.len(),
        });
    };
    let (first, second) = if a.leg_number <= b.leg_number {
        (a, b)
    } else {
        (b, a)
    };
    if !first.is_played() || !second.is_played() {
        return Ok(None);
    }

    let team_a = first.home_team_id;
    let team_b = first.away_team_id;
    let aggregate_a = first.goals_for(team_a).saturating_add(second.goals_for(team_a));
    let aggregate_b = first.goals_for(team_b).saturating_add(second.goals_for(team_b));
    Ok(match aggregate_a.cmp(&aggregate_b) {
        std::cmp::Ordering::Greater => Some(team_a),
        std::cmp::Ordering::Less => Some(team_b),
        std::cmp::Ordering::Equal => None,
    })
}

/// Teams that won their match (one leg) or tie (two legs) in `round`, in bracket order,
/// so that winners 2i and 2i+1 meet in the next round.
pub fn advancing_teams(
    data: &TournamentData,
    round: KnockoutRound,
    legs: KnockoutLegs,
) -> Result<Vec<TeamId>, TournamentError> {
    let mut round_matches: Vec<&GameMatch> =
        data.matches_in_round(round).filter(|m| m.is_played()).collect();
    round_matches.sort_by_key(|m| (m.match_day, m.sequence));

    let mut advancing = Vec::new();
    match legs {
        KnockoutLegs::Single => {
            advancing.extend(round_matches.iter().filter_map(|m| m.winner()));
        }
        KnockoutLegs::Double => {
            let mut seen: Vec<TieId> = Vec::new();
            for m in &round_matches {
                let Some(tie_id) = m.knockout_tie_id else { continue };
                if seen.contains(&tie_id) {
                    continue;
                }
                seen.push(tie_id);
                let tie_legs: Vec<&GameMatch> = round_matches
                    .iter()
                    .copied()
                    .filter(|l| l.knockout_tie_id == Some(tie_id))
                    .collect();
                if tie_legs.len() != 2 {
                    return Err(TournamentError::InconsistentTie {
                        tie: tie_id,
                        matches: tie_legs.len(),
                    });
                }
                advancing.extend(tie_winner(tie_id, &tie_legs)?);
            }
        }
    }
    Ok(advancing)
}
