//! Index-based playback queue
//!
//! Holds the play order, a pointer to the current track and the order the
//! tracks arrived in:
//!
//! ```text
//! tracks:          [A, B, (C), F, D, E]   <- play order, C is current
//! original_order:  [A, B, C, D, E, F]     <- restored when shuffle is turned off
//! ```
//!
//! Navigation never removes tracks; it only moves `current_index`.
//! Invariants kept by every method:
//! - `current_index` is `Some(i)` with `i < tracks.len()` iff `tracks` is non-empty
//! - `original_order` holds exactly the same tracks as `tracks`

use crate::shuffle::shuffle_after;
use crate::types::{Track, TrackId};
use rand::Rng;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Queue {
    /// Tracks in play order
    tracks: Vec<Track>,

    /// Order before any shuffle
    original_order: Vec<Track>,

    /// Position of the current track in `tracks`
    current_index: Option<usize>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a new track list, pointing at the first track
    pub fn replace(&mut self, tracks: Vec<Track>) {
        self.original_order.clone_from(&tracks);
        self.current_index = if tracks.is_empty() { None } else { Some(0) };
        self.tracks = tracks;
    }

    /// Append tracks to the end of the play order and the original order
    ///
    /// The index is untouched unless the queue was empty, in which case it
    /// starts at the first appended track.
    pub fn append(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        self.original_order.extend(tracks.iter().cloned());
        self.tracks.extend(tracks);
        if self.current_index.is_none() {
            self.current_index = Some(0);
        }
    }

    /// Point the queue at `id`
    ///
    /// Returns false (and leaves the index alone) if the id is not queued.
    pub fn select(&mut self, id: TrackId) -> bool {
        match self.position_of(id) {
            Some(pos) => {
                self.current_index = Some(pos);
                true
            }
            None => false,
        }
    }

    /// Move to the next position, wrapping to the start if `wrap` is set
    ///
    /// Returns the new index, or `None` if nothing moved.
    pub fn advance(&mut self, wrap: bool) -> Option<usize> {
        let current = self.current_index?;
        let next = if current + 1 < self.tracks.len() {
            current + 1
        } else if wrap {
            0
        } else {
            return None;
        };
        self.current_index = Some(next);
        Some(next)
    }

    /// Move to the previous position, wrapping to the end if `wrap` is set
    pub fn retreat(&mut self, wrap: bool) -> Option<usize> {
        let current = self.current_index?;
        let previous = if current > 0 {
            current - 1
        } else if wrap {
            self.tracks.len() - 1
        } else {
            return None;
        };
        self.current_index = Some(previous);
        Some(previous)
    }

    /// Remove the track with `id` from both orders
    ///
    /// Removing before the current position shifts the index down so it keeps
    /// pointing at the same track. Removing the current track leaves the index
    /// on whatever slid into its slot (clamped when the tail was removed).
    pub fn remove(&mut self, id: TrackId) -> Option<Track> {
        let pos = self.position_of(id)?;
        let track = self.tracks.remove(pos);

        if let Some(original_pos) = self.original_order.iter().position(|t| t.id == id) {
            self.original_order.remove(original_pos);
        }

        self.current_index = match self.current_index {
            _ if self.tracks.is_empty() => None,
            Some(current) if pos < current => Some(current - 1),
            Some(current) => Some(current.min(self.tracks.len() - 1)),
            None => None,
        };

        Some(track)
    }

    /// Relocate the track at `from` to `to` in the play order
    ///
    /// The original order is untouched. The index follows the splice so it
    /// keeps pointing at the same track. Out-of-range positions are ignored.
    pub fn move_track(&mut self, from: usize, to: usize) -> bool {
        let len = self.tracks.len();
        if from >= len || to >= len {
            return false;
        }
        if from == to {
            return true;
        }

        let track = self.tracks.remove(from);
        self.tracks.insert(to, track);

        if let Some(current) = self.current_index {
            self.current_index = Some(if current == from {
                to
            } else if from < current && current <= to {
                current - 1
            } else if to <= current && current < from {
                current + 1
            } else {
                current
            });
        }

        true
    }

    /// Shuffle everything after the current track
    ///
    /// The play order at this moment becomes the order restored later, so
    /// moves made before shuffling survive a shuffle round trip.
    pub fn shuffle_upcoming<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.original_order.clone_from(&self.tracks);
        if let Some(current) = self.current_index {
            shuffle_after(&mut self.tracks, current, rng);
        }
    }

    /// Restore the original order and re-locate `current_id` in it
    ///
    /// If the id cannot be found the previous index is kept.
    pub fn restore_original_order(&mut self, current_id: Option<TrackId>) {
        self.tracks.clone_from(&self.original_order);

        if let Some(pos) = current_id.and_then(|id| self.position_of(id)) {
            self.current_index = Some(pos);
        }
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.original_order.clear();
        self.current_index = None;
    }

    pub fn position_of(&self, id: TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| t.id == id)
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn find(&self, id: TrackId) -> Option<&Track> {
        self.tracks.iter().find(|t| t.id == id)
    }

    /// Track at the current index
    pub fn current(&self) -> Option<&Track> {
        self.current_index.and_then(|i| self.tracks.get(i))
    }

    /// Tracks after the current one, in play order
    pub fn upcoming(&self) -> &[Track] {
        match self.current_index {
            Some(current) => &self.tracks[current + 1..],
            None => &[],
        }
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    pub fn original_order(&self) -> &[Track] {
        &self.original_order
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
