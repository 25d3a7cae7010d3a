//! Setup: create tournaments with their groups, teams and opening fixtures; squads; deletion.

use crate::logic::fixtures::generate_initial_fixtures;
use crate::models::{
    ensure_created, Group, Player, Team, TeamId, Tournament, TournamentConfig, TournamentError,
    TournamentId, TournamentSummary, TournamentType,
};
use crate::store::{TournamentData, TournamentStore};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;

/// Most groups a draw can label (A..Z).
pub const MAX_GROUPS: usize = 26;

/// Build a complete new tournament without storing it: rows for the tournament,
/// its groups and teams, and the opening fixtures.
pub fn build_tournament(
    config: &TournamentConfig,
    now: DateTime<Utc>,
) -> Result<TournamentData, TournamentError> {
    config.validate()?;
    let mut data = TournamentData::new(Tournament::from_config(config, now));
    let id = data.id();

    let teams: Vec<Team> = match config.kind {
        TournamentType::GroupAndKnockout => {
            let groups: Vec<Group> = config
                .groups
                .keys()
                .map(|name| Group::new(id, name.trim()))
                .collect();
            let requested = groups.len();
            let created = data.insert_groups(groups.clone());
            ensure_created("groups", requested, created)?;

            groups
                .iter()
                .zip(config.groups.values())
                .flat_map(|(group, names)| {
                    names
                        .iter()
                        .map(move |name| Team::new(id, name.trim(), Some(group.id)))
                })
                .collect()
        }
        TournamentType::League | TournamentType::Cup => config
            .selected_teams
            .iter()
            .map(|name| Team::new(id, name.trim(), None))
            .collect(),
    };
    let requested = teams.len();
    let created = data.insert_teams(teams);
    ensure_created("teams", requested, created)?;

    generate_initial_fixtures(&mut data)?;
    Ok(data)
}

/// Create and store a tournament. Nothing is stored if any step fails.
pub fn create_tournament<S: TournamentStore>(
    store: &S,
    config: &TournamentConfig,
) -> Result<TournamentData, TournamentError> {
    let data = build_tournament(config, Utc::now())?;
    store.insert(data.clone())?;
    log::info!(
        "Created {:?} tournament {} ({}) with {} teams and {} matches",
        data.tournament.kind,
        data.tournament.name,
        data.id(),
        data.teams.len(),
        data.matches.len()
    );
    Ok(data)
}

/// Randomly deal `teams` into `groups_count` groups labelled A, B, C, ...
///
/// 1. Shuffle the team list.
/// 2. Team i goes to group (i mod groups_count), so group sizes differ by at most one.
pub fn draw_groups<R: Rng + ?Sized>(
    teams: &[String],
    groups_count: usize,
    rng: &mut R,
) -> Result<BTreeMap<String, Vec<String>>, TournamentError> {
    if groups_count == 0 || groups_count > MAX_GROUPS {
        return Err(TournamentError::InvalidConfig(format!(
            "cannot draw {groups_count} groups"
        )));
    }
    if teams.len() < groups_count * 2 {
        return Err(TournamentError::NotEnoughTeams(teams.len()));
    }

    let mut shuffled = teams.to_vec();
    shuffled.shuffle(rng);

    let label = |i: usize| char::from(b'A' + i as u8).to_string();
    let mut groups: BTreeMap<String, Vec<String>> =
        (0..groups_count).map(|i| (label(i), Vec::new())).collect();
    for (i, team) in shuffled.into_iter().enumerate() {
        groups.entry(label(i % groups_count)).or_default().push(team);
    }
    Ok(groups)
}

/// Add a player to a team's squad.
pub fn add_player<S: TournamentStore>(
    store: &S,
    tournament_id: TournamentId,
    team_id: TeamId,
    name: &str,
) -> Result<Player, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidPlayerName);
    }
    store.transaction(tournament_id, |tx| {
        tx.team(team_id)?;
        let player = Player::new(team_id, name);
        ensure_created("players", 1, tx.insert_players(vec![player.clone()]))?;
        Ok(player)
    })
}

/// Delete a tournament and everything belonging to it.
pub fn delete_tournament<S: TournamentStore>(
    store: &S,
    tournament_id: TournamentId,
) -> Result<(), TournamentError> {
    let removed = store.delete(tournament_id)?;
    log::info!(
        "Deleted tournament {}: {} events, {} matches, {} ties, {} players, {} teams, {} groups",
        tournament_id,
        removed.events.len(),
        removed.matches.len(),
        removed.ties.len(),
        removed.players.len(),
        removed.teams.len(),
        removed.groups.len()
    );
    Ok(())
}

/// Tournaments owned by `owner`, most recently updated first.
pub fn tournaments_by_owner<S: TournamentStore>(
    store: &S,
    owner: &str,
) -> Result<Vec<TournamentSummary>, TournamentError> {
    store.list_by_owner(owner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn draw_deals_teams_round_robin_into_labelled_groups() {
        let teams: Vec<String> = (1..=8).map(|i| format!("Team {i}")).collect();
        let mut rng = StdRng::seed_from_u64(7);
        let groups = draw_groups(&teams, 2, &mut rng).unwrap();
        assert_eq!(groups.keys().collect::<Vec<_>>(), vec!["A", "B"]);
        assert!(groups.values().all(|g| g.len() == 4));
        let mut drawn: Vec<&String> = groups.values().flatten().collect();
        drawn.sort();
        let mut expected: Vec<&String> = teams.iter().collect();
        expected.sort();
        assert_eq!(drawn, expected);
    }

    #[test]
    fn draw_rejects_too_few_teams() {
        let teams: Vec<String> = vec!["A".into(), "B".into(), "C".into()];
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            draw_groups(&teams, 2, &mut rng),
            Err(TournamentError::NotEnoughTeams(3))
        ));
        assert!(draw_groups(&teams, 0, &mut rng).is_err());
    }
}
