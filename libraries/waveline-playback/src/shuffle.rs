//! Partial shuffle for the playback queue
//!
//! Only the tracks after the current one are permuted. The current track stays
//! pinned and everything before it is left alone.

use crate::types::Track;
use rand::seq::SliceRandom;
use rand::Rng;

/// Uniformly shuffle every track after `pivot` (Fisher-Yates)
///
/// Out-of-range pivots leave the slice untouched.
pub fn shuffle_after<R: Rng + ?Sized>(tracks: &mut [Track], pivot: usize, rng: &mut R) {
    if let Some(upcoming) = tracks.get_mut(pivot + 1..) {
        upcoming.shuffle(rng);
    }
}
