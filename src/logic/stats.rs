//! Player and team statistics, rebuilt from scratch from every played match.
//!
//! Nothing here is incremental: stats are reset and folded again over the
//! current match and event set, so editing an old report cannot leave stale totals.

use crate::models::{EventType, MatchTally, PlayerId, Team, TeamId, TeamStats, TournamentType};
use crate::store::TournamentData;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

/// Reset every player's goals/assists, then sum event amounts per (player, type).
pub fn recompute_player_stats(data: &mut TournamentData) {
    let match_ids: HashSet<_> = data.matches.iter().map(|m| m.id).collect();
    let mut totals: HashMap<(PlayerId, EventType), u32> = HashMap::new();
    for event in data.events.iter().filter(|e| match_ids.contains(&e.match_id)) {
        let total = totals.entry((event.player_id, event.kind)).or_default();
        *total = total.saturating_add(event.amount);
    }

    for player in &mut data.players {
        player.reset_stats();
        player.goals = totals
            .get(&(player.id, EventType::Goal))
            .copied()
            .unwrap_or(0);
        player.assists = totals
            .get(&(player.id, EventType::Assist))
            .copied()
            .unwrap_or(0);
    }
    log::debug!("recomputed stats for {} players", data.players.len());
}

/// Reset every team, fold over all played matches, then assign table positions.
pub fn recompute_team_stats(data: &mut TournamentData) {
    let mut tallies: HashMap<TeamId, MatchTally> = HashMap::new();
    for m in data.played_matches() {
        let Some(score) = m.score else { continue };
        tallies
            .entry(m.home_team_id)
            .or_default()
            .record(score.home, score.away);
        tallies
            .entry(m.away_team_id)
            .or_default()
            .record(score.away, score.home);
    }

    for team in &mut data.teams {
        let tally = tallies.get(&team.id).copied().unwrap_or_default();
        team.stats = TeamStats::from_results(tally);
    }

    assign_positions(data);
}

/// Table order: points, then goal difference, then goals scored. Equal teams keep
/// their existing relative order.
pub fn compare_standings(a: &TeamStats, b: &TeamStats) -> Ordering {
    b.points
        .cmp(&a.points)
        .then(b.goal_difference.cmp(&a.goal_difference))
        .then(b.goals_for.cmp(&a.goals_for))
}

/// Ids of `teams` in table order.
pub fn rank_teams(teams: &[&Team]) -> Vec<TeamId> {
    let mut ranked: Vec<&Team> = teams.to_vec();
    ranked.sort_by(|a, b| compare_standings(&a.stats, &b.stats));
    ranked.iter().map(|t| t.id).collect()
}

/// One ranked list for a league, one per group for group tournaments; cups have no table.
fn assign_positions(data: &mut TournamentData) {
    let tables: Vec<Vec<TeamId>> = match data.tournament.kind {
        TournamentType::League => vec![rank_teams(&data.teams.iter().collect::<Vec<_>>())],
        TournamentType::GroupAndKnockout => data
            .groups
            .iter()
            .map(|g| rank_teams(&data.group_teams(g.id).collect::<Vec<_>>()))
            .collect(),
        TournamentType::Cup => return,
    };

    let positions: HashMap<TeamId, u32> = tables
        .iter()
        .flat_map(|table| {
            table
                .iter()
                .enumerate()
                .map(|(i, id)| (*id, i as u32 + 1))
        })
        .collect();
    for team in &mut data.teams {
        team.position = positions.get(&team.id).copied();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn team(points: u32, gd: i64, gf: u32) -> Team {
        let mut t = Team::new(Uuid::nil(), "T", None);
        t.stats.points = points;
        t.stats.goal_difference = gd;
        t.stats.goals_for = gf;
        t
    }

    #[test]
    fn ranking_uses_points_then_goal_difference_then_goals() {
        let a = team(6, 1, 3);
        let b = team(6, 2, 2);
        let c = team(6, 2, 5);
        let d = team(9, -1, 1);
        let ranked = rank_teams(&[&a, &b, &c, &d]);
        assert_eq!(ranked, vec![d.id, c.id, b.id, a.id]);
    }

    #[test]
    fn equal_teams_keep_encountered_order() {
        let a = team(3, 0, 1);
        let b = team(3, 0, 1);
        assert_eq!(rank_teams(&[&a, &b]), vec![a.id, b.id]);
        assert_eq!(rank_teams(&[&b, &a]), vec![b.id, a.id]);
    }
}
