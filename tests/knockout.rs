//! Integration tests for knockout brackets, two-legged ties and group-to-knockout progression.

use football_tournament::logic::{
    create_tournament, submit_match_report, MatchReport, Progression, TieOutcome,
};
use football_tournament::{
    ErrorKind, GameMatch, KnockoutRound, MatchId, MemoryStore, Stage, TeamId, TournamentConfig,
    TournamentData, TournamentError, TournamentId, TournamentStatus, TournamentStore,
    TournamentType,
};
use std::collections::BTreeMap;

fn cup(n: usize, legs: u8) -> TournamentConfig {
    TournamentConfig {
        name: "County Cup".into(),
        owner: "alice".into(),
        kind: TournamentType::Cup,
        teams_count: n as u32,
        matches_per_team: 1,
        teams_per_group: 0,
        groups_count: 0,
        teams_advancing_per_group: 0,
        knockout_legs: legs,
        selected_teams: (1..=n).map(|i| format!("Team {i}")).collect(),
        groups: BTreeMap::new(),
    }
}

fn groups_of_four() -> TournamentConfig {
    let mut groups = BTreeMap::new();
    for label in ["A", "B"] {
        groups.insert(
            label.to_string(),
            (1..=4).map(|i| format!("{label}{i}")).collect(),
        );
    }
    TournamentConfig {
        name: "Summer Cup".into(),
        owner: "alice".into(),
        kind: TournamentType::GroupAndKnockout,
        teams_count: 8,
        matches_per_team: 1,
        teams_per_group: 4,
        groups_count: 2,
        teams_advancing_per_group: 2,
        knockout_legs: 1,
        selected_teams: Vec::new(),
        groups,
    }
}

fn report(match_id: MatchId, home: u32, away: u32) -> MatchReport {
    MatchReport {
        match_id,
        home_score: home,
        away_score: away,
        events: Vec::new(),
    }
}

fn unplayed(data: &TournamentData) -> Vec<GameMatch> {
    data.fixtures()
        .into_iter()
        .filter(|m| !m.is_played())
        .cloned()
        .collect()
}

fn team_by_name(data: &TournamentData, name: &str) -> TeamId {
    data.teams
        .iter()
        .find(|t| t.name == name)
        .map(|t| t.id)
        .unwrap()
}

/// Play every open match with a home win; returns the last progression.
fn home_wins(store: &MemoryStore, id: TournamentId) -> Progression {
    let mut last = Progression::Unchanged;
    for m in unplayed(&store.load(id).unwrap()) {
        last = submit_match_report(store, id, &report(m.id, 1, 0))
            .unwrap()
            .0
            .progression;
    }
    last
}

#[test]
fn eight_team_cup_runs_to_completion() {
    let store = MemoryStore::new();
    let data = create_tournament(&store, &cup(8, 1)).unwrap();
    let id = data.id();
    assert_eq!(data.tournament.stage, Stage::KnockoutStage);
    assert_eq!(data.tournament.knockout_round, Some(KnockoutRound::QuarterFinals));
    assert_eq!(data.matches.len(), 4);
    assert!(data.matches.iter().all(|m| m.match_day == 1));
    let quarter_homes: Vec<TeamId> = data.fixtures().iter().map(|m| m.home_team_id).collect();

    assert_eq!(
        home_wins(&store, id),
        Progression::NextRound(KnockoutRound::SemiFinals)
    );
    let data = store.load(id).unwrap();
    let semis: Vec<&GameMatch> = data.matches_in_round(KnockoutRound::SemiFinals).collect();
    assert_eq!(semis.len(), 2);
    assert!(semis.iter().all(|m| m.match_day == 2));
    // winners 2i and 2i+1 meet
    assert_eq!(
        (semis[0].home_team_id, semis[0].away_team_id),
        (quarter_homes[0], quarter_homes[1])
    );
    assert_eq!(
        (semis[1].home_team_id, semis[1].away_team_id),
        (quarter_homes[2], quarter_homes[3])
    );

    assert_eq!(
        home_wins(&store, id),
        Progression::NextRound(KnockoutRound::Final)
    );
    let data = store.load(id).unwrap();
    assert_eq!(data.matches_in_round(KnockoutRound::Final).count(), 1);

    assert_eq!(home_wins(&store, id), Progression::Completed);
    let data = store.load(id).unwrap();
    assert_eq!(data.tournament.status, TournamentStatus::Completed);
    assert_eq!(data.matches.len(), 7);
}

#[test]
fn single_leg_knockout_match_cannot_be_drawn() {
    let store = MemoryStore::new();
    let data = create_tournament(&store, &cup(4, 1)).unwrap();
    let id = data.id();
    let m = data.fixtures()[0].clone();

    let err = submit_match_report(&store, id, &report(m.id, 2, 2)).unwrap_err();
    assert!(matches!(err, TournamentError::DrawNotAllowed(KnockoutRound::SemiFinals)));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(!store.load(id).unwrap().match_by_id(m.id).unwrap().is_played());

    let (outcome, _) = submit_match_report(&store, id, &report(m.id, 3, 2)).unwrap();
    assert_eq!(
        outcome.tie,
        TieOutcome::Decided {
            winner: m.home_team_id
        }
    );
}

#[test]
fn two_legged_ties_are_decided_on_aggregate() {
    let store = MemoryStore::new();
    let data = create_tournament(&store, &cup(4, 2)).unwrap();
    let id = data.id();
    assert_eq!(data.ties.len(), 2);
    assert_eq!(data.matches.len(), 4);

    let fixtures: Vec<GameMatch> = data.fixtures().into_iter().cloned().collect();
    // day 1: both first legs, day 2: both return legs
    let (first_a, first_b) = (&fixtures[0], &fixtures[1]);
    let return_a = fixtures
        .iter()
        .find(|m| m.knockout_tie_id == first_a.knockout_tie_id && m.leg_number == Some(2))
        .unwrap();
    let return_b = fixtures
        .iter()
        .find(|m| m.knockout_tie_id == first_b.knockout_tie_id && m.leg_number == Some(2))
        .unwrap();
    assert_eq!(return_a.match_day, 2);
    assert_eq!(return_a.home_team_id, first_a.away_team_id);

    let team_a = first_a.home_team_id;
    let (outcome, _) = submit_match_report(&store, id, &report(first_a.id, 2, 1)).unwrap();
    assert_eq!(outcome.tie, TieOutcome::AwaitingOtherLeg);
    // return leg: home 0 - 3 away, aggregate 5-1 to the first leg's home side
    let (outcome, _) = submit_match_report(&store, id, &report(return_a.id, 0, 3)).unwrap();
    assert_eq!(outcome.tie, TieOutcome::Decided { winner: team_a });

    submit_match_report(&store, id, &report(first_b.id, 2, 1)).unwrap();
    let err = submit_match_report(&store, id, &report(return_b.id, 1, 0)).unwrap_err();
    assert!(matches!(err, TournamentError::AggregateDraw(2, 2)));
    assert!(!store
        .load(id)
        .unwrap()
        .match_by_id(return_b.id)
        .unwrap()
        .is_played());

    let (outcome, data) = submit_match_report(&store, id, &report(return_b.id, 2, 0)).unwrap();
    assert_eq!(
        outcome.tie,
        TieOutcome::Decided {
            winner: first_b.away_team_id
        }
    );
    assert_eq!(outcome.progression, Progression::NextRound(KnockoutRound::Final));

    let finals: Vec<&GameMatch> = data.matches_in_round(KnockoutRound::Final).collect();
    assert_eq!(finals.len(), 1);
    let last = finals[0];
    assert_eq!(
        (last.home_team_id, last.away_team_id),
        (team_a, first_b.away_team_id)
    );
    assert_eq!(last.knockout_tie_id, None);
    assert_eq!(last.match_day, 3);
    assert_eq!(data.ties.len(), 2);
}

#[test]
fn group_stage_feeds_cross_paired_knockout() {
    let store = MemoryStore::new();
    let data = create_tournament(&store, &groups_of_four()).unwrap();
    let id = data.id();
    assert_eq!(data.groups.len(), 2);
    assert_eq!(data.matches.len(), 12);
    assert!(data.matches.iter().all(|m| m.stage == Stage::GroupStage));

    // lower-numbered team wins every group match, so A1 > A2 > A3 > A4
    let mut last = Progression::Unchanged;
    for m in unplayed(&data) {
        let home_name = &data.team(m.home_team_id).unwrap().name;
        let away_name = &data.team(m.away_team_id).unwrap().name;
        let (home, away) = if home_name < away_name { (1, 0) } else { (0, 1) };
        last = submit_match_report(&store, id, &report(m.id, home, away))
            .unwrap()
            .0
            .progression;
    }
    assert_eq!(last, Progression::KnockoutStarted(KnockoutRound::SemiFinals));

    let data = store.load(id).unwrap();
    assert_eq!(data.tournament.stage, Stage::KnockoutStage);
    for (name, position) in [("A1", 1), ("A2", 2), ("B1", 1), ("B4", 4)] {
        let team = data.team(team_by_name(&data, name)).unwrap();
        assert_eq!(team.position, Some(position), "{name}");
    }

    let semis: Vec<(TeamId, TeamId)> = data
        .matches_in_round(KnockoutRound::SemiFinals)
        .map(|m| (m.home_team_id, m.away_team_id))
        .collect();
    assert_eq!(
        semis,
        vec![
            (team_by_name(&data, "A1"), team_by_name(&data, "B2")),
            (team_by_name(&data, "A2"), team_by_name(&data, "B1")),
        ]
    );
    // three group match days, knockout starts on the fourth
    assert!(data
        .matches_in_round(KnockoutRound::SemiFinals)
        .all(|m| m.match_day == 4));

    let group_a = data.groups.iter().find(|g| g.name == "A").unwrap().id;
    let table: Vec<&str> = data
        .group_standings(group_a)
        .into_iter()
        .map(|t| t.name.as_str())
        .collect();
    assert_eq!(table, vec!["A1", "A2", "A3", "A4"]);

    // correcting a group result once the bracket exists does not redraw it
    let group_match = data
        .matches_in_stage(Stage::GroupStage)
        .next()
        .unwrap()
        .clone();
    let (outcome, data) =
        submit_match_report(&store, id, &report(group_match.id, 5, 5)).unwrap();
    assert_eq!(outcome.progression, Progression::Unchanged);
    assert_eq!(outcome.tie, TieOutcome::NotKnockout);
    let redrawn: Vec<(TeamId, TeamId)> = data
        .matches_in_round(KnockoutRound::SemiFinals)
        .map(|m| (m.home_team_id, m.away_team_id))
        .collect();
    assert_eq!(redrawn, semis);
    assert_eq!(data.matches.len(), 14);

    assert_eq!(
        home_wins(&store, id),
        Progression::NextRound(KnockoutRound::Final)
    );
    assert_eq!(home_wins(&store, id), Progression::Completed);
}

#[test]
fn oversized_scores_are_rejected_and_the_store_stays_usable() {
    let store = MemoryStore::new();
    let data = create_tournament(&store, &cup(4, 2)).unwrap();
    let id = data.id();
    let first = data.fixtures()[0].clone();
    let return_leg = data
        .matches
        .iter()
        .find(|m| m.knockout_tie_id == first.knockout_tie_id && m.id != first.id)
        .unwrap()
        .clone();

    let err = submit_match_report(&store, id, &report(first.id, 0, u32::MAX)).unwrap_err();
    assert!(matches!(err, TournamentError::InvalidScore(_)));
    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(!store.load(id).unwrap().match_by_id(first.id).unwrap().is_played());

    let (outcome, _) = submit_match_report(&store, id, &report(return_leg.id, 1, 0)).unwrap();
    assert_eq!(outcome.tie, TieOutcome::AwaitingOtherLeg);

    let other = create_tournament(&store, &cup(2, 1)).unwrap();
    let final_id = other.matches[0].id;
    assert!(submit_match_report(&store, other.id(), &report(final_id, 2, 1)).is_ok());
}

#[test]
fn completed_tournament_stays_completed() {
    let store = MemoryStore::new();
    let id = create_tournament(&store, &cup(2, 1)).unwrap().id();
    assert_eq!(home_wins(&store, id), Progression::Completed);

    // correcting the final's score is allowed but does not reopen anything
    let final_id = store.load(id).unwrap().matches[0].id;
    let (outcome, data) = submit_match_report(&store, id, &report(final_id, 0, 2)).unwrap();
    assert_eq!(outcome.progression, Progression::Unchanged);
    assert_eq!(data.tournament.status, TournamentStatus::Completed);
    assert_eq!(data.matches.len(), 1);
}
