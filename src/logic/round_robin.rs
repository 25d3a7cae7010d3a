//! Round-robin schedule via the circle method.

use crate::models::{MatchDraft, Stage, TeamId, TournamentError, TournamentId};

/// Position in the rotation: a real team, or the bye that makes an odd field even.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Slot {
    Team(TeamId),
    Bye,
}

/// Number of match days per leg: N-1 for an even field, N for an odd one (one team rests each day).
pub fn match_days_per_leg(teams_count: usize) -> u32 {
    if teams_count % 2 == 0 {
        teams_count.saturating_sub(1) as u32
    } else {
        teams_count as u32
    }
}

/// Schedule every pairing of `teams` once per leg, each team playing at most once per match day.
///
/// 1. Pad an odd field with a bye; whoever meets the bye sits the day out.
/// 2. On each match day pair slot i with slot (len-1-i).
/// 3. Keep slot 0 fixed and rotate the rest one step (last moves to position 1).
/// 4. The second leg replays the first with home/away swapped and match days reversed,
///    numbered on from the first leg.
pub fn round_robin_schedule(
    tournament_id: TournamentId,
    teams: &[TeamId],
    legs: u32,
    stage: Stage,
) -> Result<Vec<MatchDraft>, TournamentError> {
    if teams.len() < 2 {
        return Err(TournamentError::NotEnoughTeams(teams.len()));
    }
    if !(1..=2).contains(&legs) {
        return Err(TournamentError::InvalidConfig(format!(
            "round-robin legs must be 1 or 2, got {legs}"
        )));
    }

    let match_days = match_days_per_leg(teams.len());
    let mut slots: Vec<Slot> = teams.iter().copied().map(Slot::Team).collect();
    if slots.len() % 2 != 0 {
        slots.push(Slot::Bye);
    }

    let mut first_leg: Vec<Vec<(TeamId, TeamId)>> = Vec::with_capacity(match_days as usize);
    for _ in 0..match_days {
        let half = slots.len() / 2;
        let day: Vec<(TeamId, TeamId)> = (0..half)
            .filter_map(|i| match (slots[i], slots[slots.len() - 1 - i]) {
                (Slot::Team(home), Slot::Team(away)) => Some((home, away)),
                _ => None,
            })
            .collect();
        first_leg.push(day);

        if slots.len() > 2 {
            if let Some(last) = slots.pop() {
                slots.insert(1, last);
            }
        }
    }

    let draft = |home, away, match_day, leg| MatchDraft {
        tournament_id,
        home_team_id: home,
        away_team_id: away,
        match_day,
        stage,
        knockout_round: None,
        knockout_tie_id: None,
        leg_number: Some(leg),
    };

    let mut matches = Vec::new();
    for (d, day) in first_leg.iter().enumerate() {
        let match_day = d as u32 + 1;
        log::debug!("{stage:?} match day {match_day}: {} matches", day.len());
        matches.extend(day.iter().map(|&(home, away)| draft(home, away, match_day, 1)));
    }

    for leg in 1..legs {
        for (d, day) in first_leg.iter().enumerate().rev() {
            let match_day = leg * match_days + (match_days - d as u32);
            matches.extend(day.iter().map(|&(home, away)| draft(away, home, match_day, 2)));
        }
    }

    Ok(matches)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use uuid::Uuid;

    fn teams(n: usize) -> Vec<TeamId> {
        (0..n).map(|_| Uuid::new_v4()).collect()
    }

    #[test]
    fn two_teams_play_once_per_leg() {
        let t = teams(2);
        let matches = round_robin_schedule(Uuid::nil(), &t, 2, Stage::LeagueStage).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!((matches[0].home_team_id, matches[0].match_day), (t[0], 1));
        assert_eq!((matches[1].home_team_id, matches[1].match_day), (t[1], 2));
    }

    #[test]
    fn odd_field_rests_one_team_per_day() {
        let t = teams(5);
        let matches = round_robin_schedule(Uuid::nil(), &t, 1, Stage::GroupStage).unwrap();
        assert_eq!(matches.len(), 10);
        let mut per_day: HashMap<u32, HashSet<TeamId>> = HashMap::new();
        for m in &matches {
            let day = per_day.entry(m.match_day).or_default();
            assert!(day.insert(m.home_team_id));
            assert!(day.insert(m.away_team_id));
        }
        assert_eq!(per_day.len(), 5);
        assert!(per_day.values().all(|d| d.len() == 4));
    }

    #[test]
    fn first_team_never_rotates() {
        let t = teams(4);
        let matches = round_robin_schedule(Uuid::nil(), &t, 1, Stage::LeagueStage).unwrap();
        // slot 0 is always home on its match
        for day in 1..=3 {
            assert!(matches
                .iter()
                .any(|m| m.match_day == day && m.home_team_id == t[0]));
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            round_robin_schedule(Uuid::nil(), &teams(1), 1, Stage::LeagueStage),
            Err(TournamentError::NotEnoughTeams(1))
        ));
        assert!(matches!(
            round_robin_schedule(Uuid::nil(), &teams(4), 3, Stage::LeagueStage),
            Err(TournamentError::InvalidConfig(_))
        ));
    }
}
