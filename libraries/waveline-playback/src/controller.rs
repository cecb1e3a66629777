//! Playback queue controller
//!
//! [`PlayerState`] is the whole playback state: queue plus transport. Every
//! transition is a method taking `&mut self` and returning the events it
//! produced; the store applies them to a private copy and swaps it in, so no
//! reader ever sees a half-applied transition.
//!
//! Navigation past either end is a no-op rather than an error. This is UI
//! state: staying put is better than interrupting playback.

use crate::config::PlaybackConfig;
use crate::error::PlaybackError;
use crate::events::PlaybackEvent;
use crate::history::PlayedTracks;
use crate::queue::Queue;
use crate::types::{CollectionId, PlaybackStatus, RepeatMode, Track, TrackId};
use rand::Rng;
use tracing::debug;

/// A transition request, applied atomically by the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ReplaceQueue {
        tracks: Vec<Track>,
        collection: CollectionId,
    },
    SetCurrentTrack(TrackId),
    SetIsPlaying(bool),
    PlayNext,
    PlayPrevious,
    ToggleShuffle,
    SetRepeatMode(RepeatMode),
    AddToQueue(Vec<Track>),
    RemoveFromQueue(TrackId),
    MoveTrack {
        from: usize,
        to: usize,
    },
    ClearQueue,
    ClearPlayedTracks,
    /// Media layer finished loading the given track
    TrackLoaded(TrackId),
    /// Media layer rejected load or play
    PlaybackFailed(PlaybackError),
    /// Session ended: clear queue and played history
    Logout,
}

/// Complete playback state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    queue: Queue,

    /// "Now playing" id; may name a track that is not in the queue
    current_track_id: Option<TrackId>,

    is_playing: bool,

    /// True from a track switch until the media layer confirms load
    is_changing_track: bool,

    repeat: RepeatMode,

    shuffle_enabled: bool,

    played: PlayedTracks,

    /// Collection that owns the queue (toggle vs replace)
    active_collection: Option<CollectionId>,
}

impl PlayerState {
    /// Create an empty state
    pub fn new(config: &PlaybackConfig) -> Self {
        Self {
            queue: Queue::new(),
            current_track_id: None,
            is_playing: false,
            is_changing_track: false,
            repeat: config.repeat,
            shuffle_enabled: false,
            played: PlayedTracks::new(config.history_size),
            active_collection: None,
        }
    }

    /// Apply one command
    pub fn apply<R: Rng + ?Sized>(&mut self, command: Command, rng: &mut R) -> Vec<PlaybackEvent> {
        match command {
            Command::ReplaceQueue { tracks, collection } => self.replace_queue(tracks, collection),
            Command::SetCurrentTrack(id) => self.set_current_track(id),
            Command::SetIsPlaying(playing) => self.set_is_playing(playing),
            Command::PlayNext => self.play_next(),
            Command::PlayPrevious => self.play_previous(),
            Command::ToggleShuffle => self.toggle_shuffle(rng),
            Command::SetRepeatMode(mode) => self.set_repeat_mode(mode),
            Command::AddToQueue(tracks) => self.add_to_queue(tracks),
            Command::RemoveFromQueue(id) => self.remove_from_queue(id),
            Command::MoveTrack { from, to } => self.move_track(from, to),
            Command::ClearQueue => self.clear_queue(),
            Command::ClearPlayedTracks => self.clear_played_tracks(),
            Command::TrackLoaded(id) => self.track_loaded(id),
            Command::PlaybackFailed(error) => self.playback_failed(error),
            Command::Logout => self.logout(),
        }
    }

    // ===== Transitions =====

    /// Install a new collection, discarding tracks and played history
    ///
    /// Always resets the index, even when the collection is already active.
    /// Does not start playback.
    pub fn replace_queue(
        &mut self,
        tracks: Vec<Track>,
        collection: CollectionId,
    ) -> Vec<PlaybackEvent> {
        let mut events = Vec::new();

        self.queue.replace(tracks);
        self.played.clear();
        if self.shuffle_enabled {
            self.shuffle_enabled = false;
            events.push(PlaybackEvent::ShuffleChanged { enabled: false });
        }

        debug!(collection = %collection, length = self.queue.len(), "Queue replaced");

        events.insert(
            0,
            PlaybackEvent::QueueReplaced {
                collection: collection.clone(),
                length: self.queue.len(),
            },
        );
        self.active_collection = Some(collection);
        events
    }

    /// Make `id` the current track
    ///
    /// Unknown ids are accepted: the index stays put but the id is still
    /// recorded, which is how ad hoc single-track playback is expressed.
    pub fn set_current_track(&mut self, id: TrackId) -> Vec<PlaybackEvent> {
        let previous_track_id = self.current_track_id;

        if !self.queue.select(id) {
            debug!(track_id = %id, "Current track is not in the queue");
        }
        self.current_track_id = Some(id);
        self.is_changing_track = true;

        vec![PlaybackEvent::TrackChanged {
            track_id: id,
            previous_track_id,
        }]
    }

    pub fn set_is_playing(&mut self, playing: bool) -> Vec<PlaybackEvent> {
        if self.is_playing == playing {
            return Vec::new();
        }
        self.is_playing = playing;
        vec![PlaybackEvent::PlayingChanged {
            is_playing: playing,
        }]
    }

    /// Advance to the next track
    ///
    /// At the end of the queue this wraps only with repeat all; otherwise it
    /// stays on the last track and leaves the transport alone.
    pub fn play_next(&mut self) -> Vec<PlaybackEvent> {
        let Some(indexed) = self.queue.current().map(|t| t.id) else {
            return Vec::new();
        };
        let leaving = self
            .current_track_id
            .filter(|id| self.queue.position_of(*id).is_some())
            .unwrap_or(indexed);

        match self.queue.advance(self.repeat == RepeatMode::All) {
            Some(_) => {
                self.played.push(leaving);
                self.switch_to_queue_current()
            }
            None => {
                debug!(track_id = %leaving, "End of queue, staying on last track");
                Vec::new()
            }
        }
    }

    /// Step back to the previous track
    ///
    /// Does not record history. At the first track without repeat all this is
    /// strictly a no-op (no restart of the current track).
    pub fn play_previous(&mut self) -> Vec<PlaybackEvent> {
        match self.queue.retreat(self.repeat == RepeatMode::All) {
            Some(_) => self.switch_to_queue_current(),
            None => Vec::new(),
        }
    }

    /// Flip shuffle
    ///
    /// Enabling pins the current track and shuffles only what comes after it.
    /// Disabling restores the pre-shuffle order and finds the current track in it.
    pub fn toggle_shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<PlaybackEvent> {
        self.shuffle_enabled = !self.shuffle_enabled;

        if self.shuffle_enabled {
            self.queue.shuffle_upcoming(rng);
        } else {
            let current = self
                .current_track_id
                .or_else(|| self.queue.current().map(|t| t.id));
            self.queue.restore_original_order(current);
        }

        debug!(enabled = self.shuffle_enabled, "Shuffle toggled");

        let mut events = vec![PlaybackEvent::ShuffleChanged {
            enabled: self.shuffle_enabled,
        }];
        if !self.queue.is_empty() {
            events.push(PlaybackEvent::QueueChanged {
                length: self.queue.len(),
            });
        }
        events
    }

    pub fn set_repeat_mode(&mut self, mode: RepeatMode) -> Vec<PlaybackEvent> {
        if self.repeat == mode {
            return Vec::new();
        }
        self.repeat = mode;
        vec![PlaybackEvent::RepeatChanged { mode }]
    }

    /// Append tracks; the current index is not affected
    pub fn add_to_queue(&mut self, tracks: Vec<Track>) -> Vec<PlaybackEvent> {
        if tracks.is_empty() {
            return Vec::new();
        }
        self.queue.append(tracks);
        vec![PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        }]
    }

    /// Remove a track from both orders
    ///
    /// Removing the current track does not hand off to a neighbour; callers
    /// follow up with [`set_current_track`](Self::set_current_track) if needed.
    pub fn remove_from_queue(&mut self, id: TrackId) -> Vec<PlaybackEvent> {
        match self.queue.remove(id) {
            Some(_) => vec![PlaybackEvent::QueueChanged {
                length: self.queue.len(),
            }],
            None => Vec::new(),
        }
    }

    /// Relocate one entry of the play order
    pub fn move_track(&mut self, from: usize, to: usize) -> Vec<PlaybackEvent> {
        if from != to && self.queue.move_track(from, to) {
            vec![PlaybackEvent::QueueChanged {
                length: self.queue.len(),
            }]
        } else {
            Vec::new()
        }
    }

    /// Back to `Empty`; played history is kept
    pub fn clear_queue(&mut self) -> Vec<PlaybackEvent> {
        let mut events = vec![PlaybackEvent::QueueCleared];
        if self.is_playing {
            events.push(PlaybackEvent::PlayingChanged { is_playing: false });
        }

        self.queue.clear();
        self.current_track_id = None;
        self.is_playing = false;
        self.is_changing_track = false;
        self.active_collection = None;
        events
    }

    pub fn clear_played_tracks(&mut self) -> Vec<PlaybackEvent> {
        self.played.clear();
        Vec::new()
    }

    /// Media layer loaded `id`; ends the `Changing` state if it is still current
    pub fn track_loaded(&mut self, id: TrackId) -> Vec<PlaybackEvent> {
        if !self.is_changing_track || self.current_track_id != Some(id) {
            debug!(track_id = %id, "Ignoring stale load confirmation");
            return Vec::new();
        }
        self.is_changing_track = false;
        vec![PlaybackEvent::TrackLoaded { track_id: id }]
    }

    /// Media layer failed: show paused, keep the track selected
    pub fn playback_failed(&mut self, error: PlaybackError) -> Vec<PlaybackEvent> {
        let mut events = self.set_is_playing(false);
        self.is_changing_track = false;
        events.push(PlaybackEvent::Error {
            track_id: Some(error.track_id()),
            message: error.to_string(),
        });
        events
    }

    pub fn logout(&mut self) -> Vec<PlaybackEvent> {
        self.played.clear();
        self.clear_queue()
    }

    fn switch_to_queue_current(&mut self) -> Vec<PlaybackEvent> {
        match self.queue.current().map(|t| t.id) {
            Some(id) => self.set_current_track(id),
            None => Vec::new(),
        }
    }

    // ===== Inspection =====

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn tracks(&self) -> &[Track] {
        self.queue.tracks()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.queue.current_index()
    }

    pub fn current_track_id(&self) -> Option<TrackId> {
        self.current_track_id
    }

    /// The "now playing" track, if it is in the queue
    pub fn current_track(&self) -> Option<&Track> {
        self.current_track_id.and_then(|id| self.queue.find(id))
    }

    /// Tracks after the current index, in play order
    pub fn upcoming(&self) -> &[Track] {
        self.queue.upcoming()
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_changing_track(&self) -> bool {
        self.is_changing_track
    }

    pub fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    pub fn shuffle_enabled(&self) -> bool {
        self.shuffle_enabled
    }

    pub fn played_tracks(&self) -> &PlayedTracks {
        &self.played
    }

    pub fn active_collection(&self) -> Option<&CollectionId> {
        self.active_collection.as_ref()
    }

    pub fn status(&self) -> PlaybackStatus {
        if self.queue.is_empty() {
            PlaybackStatus::Empty
        } else if self.is_changing_track {
            PlaybackStatus::Changing
        } else if self.is_playing {
            PlaybackStatus::Playing
        } else {
            PlaybackStatus::Paused
        }
    }

    /// Whether `play_next` would move
    pub fn has_next(&self) -> bool {
        match self.queue.current_index() {
            Some(i) => i + 1 < self.queue.len() || self.repeat == RepeatMode::All,
            None => false,
        }
    }

    /// Whether `play_previous` would move
    pub fn has_previous(&self) -> bool {
        match self.queue.current_index() {
            Some(i) => i > 0 || self.repeat == RepeatMode::All,
            None => false,
        }
    }
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(&PlaybackConfig::default())
    }
}
