use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::moneymatch::Match;
use crate::moneymatch::MatchId;

/// In-memory stand-in for the match records persisted by the ledger.
#[derive(Debug, Default)]
pub struct Matches(HashMap<MatchId, Match>);

impl Matches {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, id: MatchId) -> Option<&Match> {
        self.0.get(&id)
    }

    /// Stores a new match, handing it back if the id is already taken.
    pub fn insert(&mut self, new_match: Match) -> Result<(), Match> {
        match self.0.entry(new_match.id()) {
            Entry::Occupied(_) => Err(new_match),
            Entry::Vacant(entry) => {
                entry.insert(new_match);
                Ok(())
            }
        }
    }

    /// Overwrites the stored snapshot with the same id.
    pub fn replace(&mut self, next: Match) {
        self.0.insert(next.id(), next);
    }

    pub fn remove(&mut self, id: MatchId) -> Option<Match> {
        self.0.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Match> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
