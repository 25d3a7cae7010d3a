//! In-memory store: many tournaments by id behind one lock.

use crate::models::{TournamentError, TournamentId, TournamentSummary};
use crate::store::{TournamentData, TournamentStore};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::RwLock;

/// Holds every tournament in memory. A transaction holds the write lock for its
/// whole read-modify-write sequence, so report submissions never interleave.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, TournamentData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tournaments.
    pub fn len(&self) -> usize {
        self.tournaments.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Serialize every tournament as a JSON array.
    pub fn to_json(&self) -> Result<String, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let mut all: Vec<&TournamentData> = g.values().collect();
        all.sort_by_key(|d| d.tournament.created_at);
        Ok(serde_json::to_string_pretty(&all)?)
    }

    /// Load a store from the output of [`MemoryStore::to_json`].
    pub fn from_json(json: &str) -> Result<Self, TournamentError> {
        let all: Vec<TournamentData> = serde_json::from_str(json)?;
        let tournaments = all.into_iter().map(|d| (d.id(), d)).collect();
        Ok(Self {
            tournaments: RwLock::new(tournaments),
        })
    }
}

impl TournamentStore for MemoryStore {
    fn insert(&self, data: TournamentData) -> Result<(), TournamentError> {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let id = data.id();
        if g.contains_key(&id) {
            return Err(TournamentError::DuplicateTournament(id));
        }
        g.insert(id, data);
        Ok(())
    }

    fn load(&self, id: TournamentId) -> Result<TournamentData, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::LockPoisoned)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    fn transaction<T, F>(&self, id: TournamentId, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut TournamentData) -> Result<T, TournamentError>,
    {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let mut working = g
            .get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))?;

        let out = f(&mut working)?;

        working.tournament.updated_at = Utc::now();
        g.insert(id, working);
        Ok(out)
    }

    fn delete(&self, id: TournamentId) -> Result<TournamentData, TournamentError> {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        g.remove(&id).ok_or(TournamentError::TournamentNotFound(id))
    }

    fn list_by_owner(&self, owner: &str) -> Result<Vec<TournamentSummary>, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let mut list: Vec<TournamentSummary> = g
            .values()
            .filter(|d| d.tournament.owner == owner)
            .map(|d| TournamentSummary::from(&d.tournament))
            .collect();
        list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(list)
    }
}
