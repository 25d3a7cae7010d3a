//! Storage boundary: the engine reads and writes tournaments through [`TournamentStore`].

mod data;
mod memory;

pub use data::TournamentData;
pub use memory::MemoryStore;

use crate::models::{TournamentError, TournamentId, TournamentSummary};

/// Persistence collaborator.
///
/// `transaction` must apply the closure all-or-nothing and must not let two
/// transactions on the same tournament interleave.
pub trait TournamentStore {
    /// Store a newly created tournament with all its rows.
    fn insert(&self, data: TournamentData) -> Result<(), TournamentError>;

    /// Snapshot of one tournament.
    fn load(&self, id: TournamentId) -> Result<TournamentData, TournamentError>;

    /// Run `f` against the tournament; commit on `Ok`, discard every change on `Err`.
    fn transaction<T, F>(&self, id: TournamentId, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut TournamentData) -> Result<T, TournamentError>;

    /// Remove the tournament and everything belonging to it. Returns what was removed.
    fn delete(&self, id: TournamentId) -> Result<TournamentData, TournamentError>;

    /// Tournaments created by `owner`, most recently updated first.
    fn list_by_owner(&self, owner: &str) -> Result<Vec<TournamentSummary>, TournamentError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Tournament, TournamentConfig, TournamentType};
    use chrono::Utc;

    fn data(owner: &str) -> TournamentData {
        let config = TournamentConfig {
            name: "Cup".into(),
            owner: owner.into(),
            kind: TournamentType::Cup,
            teams_count: 2,
            matches_per_team: 1,
            teams_per_group: 0,
            groups_count: 0,
            teams_advancing_per_group: 0,
            knockout_legs: 1,
            selected_teams: vec!["A".into(), "B".into()],
            groups: Default::default(),
        };
        TournamentData::new(Tournament::from_config(&config, Utc::now()))
    }

    #[test]
    fn failed_transaction_leaves_state_untouched() {
        let store = MemoryStore::new();
        let d = data("alice");
        let id = d.id();
        store.insert(d).unwrap();

        let result: Result<(), _> = store.transaction(id, |tx| {
            tx.tournament.name = "Renamed".into();
            Err(TournamentError::NoQualifiers)
        });
        assert!(result.is_err());
        assert_eq!(store.load(id).unwrap().tournament.name, "Cup");

        store
            .transaction(id, |tx| {
                tx.tournament.name = "Renamed".into();
                Ok(())
            })
            .unwrap();
        assert_eq!(store.load(id).unwrap().tournament.name, "Renamed");
    }

    #[test]
    fn json_round_trip_and_owner_listing() {
        let store = MemoryStore::new();
        store.insert(data("alice")).unwrap();
        store.insert(data("bob")).unwrap();

        let restored = MemoryStore::from_json(&store.to_json().unwrap()).unwrap();
        assert_eq!(restored.len(), 2);
        assert_eq!(restored.list_by_owner("alice").unwrap().len(), 1);
        assert!(restored.list_by_owner("carol").unwrap().is_empty());
    }

    #[test]
    fn duplicate_insert_is_a_creation_failure() {
        let store = MemoryStore::new();
        let d = data("alice");
        store.insert(d.clone()).unwrap();
        let err = store.insert(d).unwrap_err();
        assert_eq!(err.kind(), crate::models::ErrorKind::Creation);
    }
}
