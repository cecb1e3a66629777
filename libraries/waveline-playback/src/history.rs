//! Played track tracking
//!
//! Records the ids advanced past in the current queue session. Collaborators
//! read it for history and analytics; queue ordering never depends on it.

use crate::types::TrackId;
use std::collections::VecDeque;

/// Bounded, duplicate-free record of played track ids
///
/// Most recent id at the back. When full, the oldest id is discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayedTracks {
    ids: VecDeque<TrackId>,
    max_size: usize,
}

impl PlayedTracks {
    /// Create an empty record with the given bound
    pub fn new(max_size: usize) -> Self {
        Self {
            ids: VecDeque::new(),
            max_size,
        }
    }

    /// Record a played id
    ///
    /// An id already present moves to the most-recent position.
    pub fn push(&mut self, id: TrackId) {
        if self.max_size == 0 {
            return;
        }
        if let Some(pos) = self.ids.iter().position(|played| *played == id) {
            self.ids.remove(pos);
        }
        if self.ids.len() >= self.max_size {
            self.ids.pop_front();
        }
        self.ids.push_back(id);
    }

    pub fn contains(&self, id: TrackId) -> bool {
        self.ids.contains(&id)
    }

    /// Most recently played id
    pub fn last(&self) -> Option<TrackId> {
        self.ids.back().copied()
    }

    /// All played ids, oldest first
    pub fn iter(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Change the bound, discarding the oldest ids if needed
    pub fn set_max_size(&mut self, max_size: usize) {
        self.max_size = max_size;
        while self.ids.len() > max_size {
            self.ids.pop_front();
        }
    }
}

impl Default for PlayedTracks {
    fn default() -> Self {
        Self::new(500)
    }
}
