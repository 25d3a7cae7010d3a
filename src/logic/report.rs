//! Match report submission: score, events, stats and stage progression as one unit.

use crate::logic::progression::{evaluate_stage_progression, Progression};
use crate::logic::stats::{recompute_player_stats, recompute_team_stats};
use crate::logic::tie_resolver::{validate_and_resolve_tie, TieOutcome};
use crate::models::{
    ensure_created, EventInput, MatchEvent, MatchId, Score, TournamentError, TournamentId,
    MAX_GOALS,
};
use crate::store::{TournamentData, TournamentStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

/// Result of one match as submitted by the organiser.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub match_id: MatchId,
    pub home_score: u32,
    pub away_score: u32,
    #[serde(default)]
    pub events: Vec<EventInput>,
}

impl MatchReport {
    /// Reject scores and event amounts no match can produce.
    pub fn validate(&self) -> Result<(), TournamentError> {
        if self.home_score > MAX_GOALS || self.away_score > MAX_GOALS {
            return Err(TournamentError::InvalidScore(format!(
                "{}-{} is above {MAX_GOALS} goals",
                self.home_score, self.away_score
            )));
        }
        if let Some(event) = self.events.iter().find(|e| e.amount > MAX_GOALS) {
            return Err(TournamentError::InvalidEvent(format!(
                "amount {} is above {MAX_GOALS}",
                event.amount
            )));
        }
        Ok(())
    }
}

/// What submitting a report changed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ReportOutcome {
    pub tie: TieOutcome,
    pub progression: Progression,
}

/// Replace the events of `match_id` with `events`. Zero-amount events are dropped.
/// Every player must belong to one of the two teams in the match.
pub fn replace_match_events(
    data: &mut TournamentData,
    match_id: MatchId,
    events: &[EventInput],
) -> Result<usize, TournamentError> {
    let m = data.match_by_id(match_id)?;
    let sides: HashSet<_> = [m.home_team_id, m.away_team_id].into_iter().collect();

    let mut rows = Vec::new();
    for event in events.iter().filter(|e| e.amount > 0) {
        let player = data.player(event.player_id).map_err(|_| {
            TournamentError::InvalidEvent(format!("unknown player {}", event.player_id))
        })?;
        if !sides.contains(&player.team_id) {
            return Err(TournamentError::InvalidEvent(format!(
                "player {} did not play in match {match_id}",
                player.name
            )));
        }
        rows.push(MatchEvent {
            id: Uuid::new_v4(),
            match_id,
            player_id: event.player_id,
            kind: event.kind,
            amount: event.amount,
        });
    }

    let removed = data.delete_events_for_match(match_id);
    let requested = rows.len();
    let created = data.insert_events(rows);
    ensure_created("match events", requested, created)?;
    log::debug!("match {match_id}: replaced {removed} events with {created}");
    Ok(created)
}

/// Apply a report inside an open transaction: validate against the knockout rules,
/// record the score, replace events, rebuild stats, then advance the stage if it is finished.
pub fn apply_match_report(
    data: &mut TournamentData,
    report: &MatchReport,
) -> Result<ReportOutcome, TournamentError> {
    report.validate()?;
    let tie = validate_and_resolve_tie(data, report.match_id, report.home_score, report.away_score)?;

    data.match_mut(report.match_id)?.score = Some(Score::new(report.home_score, report.away_score));
    replace_match_events(data, report.match_id, &report.events)?;
    recompute_player_stats(data);
    recompute_team_stats(data);
    let progression = evaluate_stage_progression(data)?;

    log::info!(
        "Tournament {}: match {} reported {}-{} ({progression:?})",
        data.id(),
        report.match_id,
        report.home_score,
        report.away_score
    );
    Ok(ReportOutcome { tie, progression })
}

/// Submit a match report atomically: either every step is applied or none is.
/// Returns the updated tournament.
pub fn submit_match_report<S: TournamentStore>(
    store: &S,
    tournament_id: TournamentId,
    report: &MatchReport,
) -> Result<(ReportOutcome, TournamentData), TournamentError> {
    let outcome = store
        .transaction(tournament_id, |tx| apply_match_report(tx, report))
        .map_err(|e| {
            log::warn!("Rejected report for match {}: {e}", report.match_id);
            e
        })?;
    Ok((outcome, store.load(tournament_id)?))
}
