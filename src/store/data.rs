//! All rows belonging to one tournament, with the point reads, filtered reads,
//! batch inserts and updates the engine needs.

use crate::models::{
    GameMatch, Group, GroupId, KnockoutRound, KnockoutTie, MatchDraft, MatchEvent, MatchId, Player,
    PlayerId, Stage, Team, TeamId, TieId, Tournament, TournamentError, TournamentId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// One tournament and everything hanging off it.
///
/// Vectors keep creation order; matches additionally carry an explicit
/// `sequence` so ordering never depends on how rows were stored.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TournamentData {
    pub tournament: Tournament,
    pub groups: Vec<Group>,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub matches: Vec<GameMatch>,
    pub ties: Vec<KnockoutTie>,
    pub events: Vec<MatchEvent>,
}

impl TournamentData {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            groups: Vec::new(),
            teams: Vec::new(),
            players: Vec::new(),
            matches: Vec::new(),
            ties: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn id(&self) -> TournamentId {
        self.tournament.id
    }

    // Point reads.

    pub fn team(&self, id: TeamId) -> Result<&Team, TournamentError> {
        self.teams
            .iter()
            .find(|t| t.id == id)
            .ok_or(TournamentError::TeamNotFound(id))
    }

    pub fn group(&self, id: GroupId) -> Result<&Group, TournamentError> {
        self.groups
            .iter()
            .find(|g| g.id == id)
            .ok_or(TournamentError::GroupNotFound(id))
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, TournamentError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(TournamentError::PlayerNotFound(id))
    }

    pub fn match_by_id(&self, id: MatchId) -> Result<&GameMatch, TournamentError> {
        self.matches
            .iter()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    pub fn match_mut(&mut self, id: MatchId) -> Result<&mut GameMatch, TournamentError> {
        self.matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(TournamentError::MatchNotFound(id))
    }

    // Filtered reads.

    pub fn group_teams(&self, group_id: GroupId) -> impl Iterator<Item = &Team> + '_ {
        self.teams
            .iter()
            .filter(move |t| t.group_id == Some(group_id))
    }

    pub fn matches_in_stage(&self, stage: Stage) -> impl Iterator<Item = &GameMatch> + '_ {
        self.matches.iter().filter(move |m| m.stage == stage)
    }

    pub fn matches_in_round(&self, round: KnockoutRound) -> impl Iterator<Item = &GameMatch> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.stage == Stage::KnockoutStage && m.knockout_round == Some(round))
    }

    pub fn tie_matches(&self, tie_id: TieId) -> Vec<&GameMatch> {
        self.matches
            .iter()
            .filter(|m| m.knockout_tie_id == Some(tie_id))
            .collect()
    }

    pub fn events_for_match(&self, match_id: MatchId) -> impl Iterator<Item = &MatchEvent> + '_ {
        self.events.iter().filter(move |e| e.match_id == match_id)
    }

    pub fn played_matches(&self) -> impl Iterator<Item = &GameMatch> + '_ {
        self.matches.iter().filter(|m| m.is_played())
    }

    /// One past the highest match day scheduled so far.
    pub fn next_match_day(&self) -> Result<u32, TournamentError> {
        self.matches
            .iter()
            .map(|m| m.match_day)
            .max()
            .map(|day| day + 1)
            .ok_or(TournamentError::NoExistingMatches)
    }

    // Batch inserts. Each returns how many rows were actually written.

    pub fn insert_groups(&mut self, groups: Vec<Group>) -> usize {
        let tournament_id = self.id();
        let before = self.groups.len();
        for group in groups {
            if group.tournament_id == tournament_id && self.group(group.id).is_err() {
                self.groups.push(group);
            }
        }
        self.groups.len() - before
    }

    /// Teams must belong to this tournament and, if grouped, to an existing group.
    pub fn insert_teams(&mut self, teams: Vec<Team>) -> usize {
        let tournament_id = self.id();
        let before = self.teams.len();
        for team in teams {
            let group_ok = team.group_id.map_or(true, |g| self.group(g).is_ok());
            if team.tournament_id == tournament_id && group_ok && self.team(team.id).is_err() {
                self.teams.push(team);
            }
        }
        self.teams.len() - before
    }

    pub fn insert_players(&mut self, players: Vec<Player>) -> usize {
        let before = self.players.len();
        for player in players {
            if self.team(player.team_id).is_ok() && self.player(player.id).is_err() {
                self.players.push(player);
            }
        }
        self.players.len() - before
    }

    pub fn insert_ties(&mut self, ties: Vec<KnockoutTie>) -> usize {
        let tournament_id = self.id();
        let before = self.ties.len();
        for tie in ties {
            if tie.tournament_id == tournament_id && !self.ties.iter().any(|t| t.id == tie.id) {
                self.ties.push(tie);
            }
        }
        self.ties.len() - before
    }

    /// Drafts referencing another tournament, an unknown team or an unknown tie are not written.
    pub fn insert_matches(&mut self, drafts: Vec<MatchDraft>) -> usize {
        let tournament_id = self.id();
        let team_ids: HashSet<TeamId> = self.teams.iter().map(|t| t.id).collect();
        let tie_ids: HashSet<TieId> = self.ties.iter().map(|t| t.id).collect();
        let mut sequence = self.next_sequence();
        let before = self.matches.len();
        for draft in drafts {
            let valid = draft.tournament_id == tournament_id
                && draft.home_team_id != draft.away_team_id
                && team_ids.contains(&draft.home_team_id)
                && team_ids.contains(&draft.away_team_id)
                && draft.knockout_tie_id.map_or(true, |t| tie_ids.contains(&t));
            if valid {
                self.matches.push(draft.into_match(sequence));
                sequence += 1;
            }
        }
        self.matches.len() - before
    }

    pub fn insert_events(&mut self, events: Vec<MatchEvent>) -> usize {
        let before = self.events.len();
        for event in events {
            if event.amount > 0 && self.match_by_id(event.match_id).is_ok() {
                self.events.push(event);
            }
        }
        self.events.len() - before
    }

    pub fn delete_events_for_match(&mut self, match_id: MatchId) -> usize {
        let before = self.events.len();
        self.events.retain(|e| e.match_id != match_id);
        before - self.events.len()
    }

    fn next_sequence(&self) -> u64 {
        self.matches
            .iter()
            .map(|m| m.sequence + 1)
            .max()
            .unwrap_or(0)
    }

    // Views for the caller.

    /// All matches in schedule order: match day, then creation order.
    pub fn fixtures(&self) -> Vec<&GameMatch> {
        let mut matches: Vec<&GameMatch> = self.matches.iter().collect();
        matches.sort_by_key(|m| (m.match_day, m.sequence));
        matches
    }

    /// Every team ordered by table position; unranked teams last, in creation order.
    pub fn standings(&self) -> Vec<&Team> {
        sort_by_position(self.teams.iter().collect())
    }

    pub fn group_standings(&self, group_id: GroupId) -> Vec<&Team> {
        sort_by_position(self.group_teams(group_id).collect())
    }

    /// Players by goals, then assists.
    pub fn top_scorers(&self, limit: usize) -> Vec<&Player> {
        let mut players: Vec<&Player> = self.players.iter().collect();
        players.sort_by(|a, b| b.goals.cmp(&a.goals).then(b.assists.cmp(&a.assists)));
        players.truncate(limit);
        players
    }
}

fn sort_by_position(mut teams: Vec<&Team>) -> Vec<&Team> {
    teams.sort_by_key(|t| t.position.unwrap_or(u32::MAX));
    teams
}
