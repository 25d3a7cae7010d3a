//! Pairing group qualifiers into the first knockout round.

use crate::models::{GroupId, Team, TeamId, TournamentError};
use crate::store::TournamentData;

/// A group's teams with their current table positions.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GroupTable {
    pub group_id: GroupId,
    pub name: String,
    pub teams: Vec<(TeamId, Option<u32>)>,
}

impl GroupTable {
    pub fn new(group_id: GroupId, name: impl Into<String>, teams: &[&Team]) -> Self {
        Self {
            group_id,
            name: name.into(),
            teams: teams.iter().map(|t| (t.id, t.position)).collect(),
        }
    }

    /// Team ranked at `position` (1-based), if positions have been computed.
    pub fn at_position(&self, position: u32) -> Option<TeamId> {
        self.teams
            .iter()
            .find(|(_, p)| *p == Some(position))
            .map(|(id, _)| *id)
    }
}

/// Group tables in group creation order.
pub fn group_tables(data: &TournamentData) -> Vec<GroupTable> {
    data.groups
        .iter()
        .map(|g| {
            let teams: Vec<&Team> = data.group_teams(g.id).collect();
            GroupTable::new(g.id, g.name.clone(), &teams)
        })
        .collect()
}

/// How qualifiers from the groups meet in the first knockout round.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PairingPolicy {
    /// One team per group: winner of group i vs winner of group i+1.
    Sequential,
    /// Several per group: rank j of group X vs rank (q+1-j) of group Y.
    Cross,
    /// One group: best vs worst qualifier, tapering to the middle.
    SingleGroup,
}

impl PairingPolicy {
    pub fn select(qualifiers_per_group: u32, groups_count: usize) -> Option<Self> {
        match (qualifiers_per_group, groups_count) {
            (_, 0) | (0, _) => None,
            (_, 1) => Some(PairingPolicy::SingleGroup),
            (1, _) => Some(PairingPolicy::Sequential),
            _ => Some(PairingPolicy::Cross),
        }
    }
}

/// Pairs for the first knockout round. Slots without a ranked team are skipped.
pub fn pair_qualifiers(
    groups: &[GroupTable],
    qualifiers_per_group: u32,
) -> Result<Vec<(TeamId, TeamId)>, TournamentError> {
    let policy = PairingPolicy::select(qualifiers_per_group, groups.len())
        .ok_or(TournamentError::NoQualifiers)?;
    log::debug!(
        "pairing {} qualifiers from {} groups ({policy:?})",
        qualifiers_per_group as usize * groups.len(),
        groups.len()
    );
    let pairs = match policy {
        PairingPolicy::Sequential => pair_group_winners(groups),
        PairingPolicy::Cross => pair_across_groups(groups, qualifiers_per_group),
        PairingPolicy::SingleGroup => pair_within_group(&groups[0], qualifiers_per_group),
    };
    Ok(pairs)
}

/// A1 vs B1, C1 vs D1, ...
pub fn pair_group_winners(groups: &[GroupTable]) -> Vec<(TeamId, TeamId)> {
    groups
        .chunks(2)
        .filter_map(|pair| match pair {
            [x, y] => resolve(x, 1, y, 1),
            _ => None,
        })
        .collect()
}

/// A1 vs B(q), A2 vs B(q-1), ..., then C1 vs D(q), ...
pub fn pair_across_groups(groups: &[GroupTable], qualifiers_per_group: u32) -> Vec<(TeamId, TeamId)> {
    let mut pairs = Vec::new();
    for pair in groups.chunks(2) {
        let [x, y] = pair else { continue };
        for j in 1..=qualifiers_per_group {
            pairs.extend(resolve(x, j, y, qualifiers_per_group + 1 - j));
        }
    }
    pairs
}

/// 1st vs q-th, 2nd vs (q-1)-th, ... inside one group.
pub fn pair_within_group(group: &GroupTable, qualifiers: u32) -> Vec<(TeamId, TeamId)> {
    (0..qualifiers / 2)
        .filter_map(|i| resolve(group, i + 1, group, qualifiers - i))
        .collect()
}

fn resolve(x: &GroupTable, rank_x: u32, y: &GroupTable, rank_y: u32) -> Option<(TeamId, TeamId)> {
    match (x.at_position(rank_x), y.at_position(rank_y)) {
        (Some(a), Some(b)) => Some((a, b)),
        _ => {
            log::warn!(
                "skipping pairing {}{} vs {}{}: position not resolved",
                x.name,
                rank_x,
                y.name,
                rank_y
            );
            None
        }
    }
}
