//! Knockout brackets: round naming, leg generation and tie records.

use crate::models::{
    KnockoutLegs, KnockoutRound, KnockoutTie, MatchDraft, Stage, TeamId, TournamentError,
    TournamentId,
};

/// Knockout ties and matches produced together, ready to be stored.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FixtureBatch {
    pub ties: Vec<KnockoutTie>,
    pub matches: Vec<MatchDraft>,
}

impl FixtureBatch {
    pub fn from_matches(matches: Vec<MatchDraft>) -> Self {
        Self {
            ties: Vec::new(),
            matches,
        }
    }

    pub fn append(&mut self, mut other: FixtureBatch) {
        self.ties.append(&mut other.ties);
        self.matches.append(&mut other.matches);
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }
}

/// Round for a bracket of `teams_count` teams. Counts that are not a nonzero power of two,
/// or larger than a round of 64, are rejected.
pub fn determine_knockout_round(teams_count: usize) -> Result<KnockoutRound, TournamentError> {
    if !teams_count.is_power_of_two() {
        return Err(TournamentError::InvalidKnockoutTeamCount(teams_count));
    }
    KnockoutRound::for_team_count(teams_count)
}

/// Only two-legged rounds before the final get a tie record.
pub fn needs_tie(legs: KnockoutLegs, round: KnockoutRound) -> bool {
    legs == KnockoutLegs::Double && !round.is_final()
}

/// First leg, and for two-legged ties the return leg one match day later with sides swapped.
pub fn build_knockout_legs(
    tournament_id: TournamentId,
    team_a: TeamId,
    team_b: TeamId,
    match_day: u32,
    legs: KnockoutLegs,
    round: KnockoutRound,
) -> FixtureBatch {
    let tie = needs_tie(legs, round).then(|| KnockoutTie::new(tournament_id));
    let tie_id = tie.as_ref().map(|t| t.id);

    let leg = |home, away, match_day, leg_number| MatchDraft {
        tournament_id,
        home_team_id: home,
        away_team_id: away,
        match_day,
        stage: Stage::KnockoutStage,
        knockout_round: Some(round),
        knockout_tie_id: tie_id,
        leg_number: Some(leg_number),
    };

    let mut matches = vec![leg(team_a, team_b, match_day, 1)];
    if tie.is_some() {
        matches.push(leg(team_b, team_a, match_day + 1, 2));
    }

    FixtureBatch {
        ties: tie.into_iter().collect(),
        matches,
    }
}

/// One round from explicit pairs, all starting on the same match day.
pub fn build_knockout_round(
    tournament_id: TournamentId,
    pairs: &[(TeamId, TeamId)],
    match_day: u32,
    legs: KnockoutLegs,
    round: KnockoutRound,
) -> FixtureBatch {
    let mut batch = FixtureBatch::default();
    for &(a, b) in pairs {
        log::debug!("{round}: {a} vs {b} on match day {match_day}");
        batch.append(build_knockout_legs(tournament_id, a, b, match_day, legs, round));
    }
    batch
}

/// Bracket from a seeded list: team[2i] meets team[2i+1]. The round is named after the list size.
pub fn build_bracket(
    tournament_id: TournamentId,
    teams: &[TeamId],
    match_day: u32,
    legs: KnockoutLegs,
) -> Result<(KnockoutRound, FixtureBatch), TournamentError> {
    let round = determine_knockout_round(teams.len())?;
    let pairs: Vec<(TeamId, TeamId)> = teams.chunks_exact(2).map(|c| (c[0], c[1])).collect();
    Ok((
        round,
        build_knockout_round(tournament_id, &pairs, match_day, legs, round),
    ))
}
