//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Track identifier
///
/// Backend ids are integers; uniqueness is only guaranteed within a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackId(i64);

impl TrackId {
    /// Create a new track ID
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the inner integer
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for TrackId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for TrackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical playable unit
///
/// Every producer of queue content goes through the normalizer to build one
/// of these. Serializes with camelCase keys so a serialized track normalizes
/// back to itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique identifier within a queue
    pub id: TrackId,

    /// Track title
    pub name: String,

    /// Artist display name
    pub artist_name: String,

    /// Cover artwork URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_photo_url: Option<String>,

    /// Duration in whole seconds
    pub duration_seconds: u64,

    /// Streamable audio URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

/// Kind of collection owning the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollectionKind {
    /// Album track list
    Album,

    /// User or editorial playlist
    Playlist,

    /// Flat music list (search results, charts)
    MusicList,

    /// Synthetic per-section collection for ad hoc queues (never fetched)
    Section,
}

impl CollectionKind {
    /// Whether tracks for this kind can be requested from the backend
    pub fn is_fetchable(self) -> bool {
        !matches!(self, CollectionKind::Section)
    }

    fn as_str(self) -> &'static str {
        match self {
            CollectionKind::Album => "album",
            CollectionKind::Playlist => "playlist",
            CollectionKind::MusicList => "music_list",
            CollectionKind::Section => "section",
        }
    }
}

/// Opaque identifier of the collection that owns the queue
///
/// Used to decide between toggling playback and replacing the queue.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionId {
    pub kind: CollectionKind,
    pub key: String,
}

impl CollectionId {
    pub fn new(kind: CollectionKind, key: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.into(),
        }
    }

    pub fn album(key: impl Into<String>) -> Self {
        Self::new(CollectionKind::Album, key)
    }

    pub fn playlist(key: impl Into<String>) -> Self {
        Self::new(CollectionKind::Playlist, key)
    }

    pub fn music_list(key: impl Into<String>) -> Self {
        Self::new(CollectionKind::MusicList, key)
    }

    pub fn section(key: impl Into<String>) -> Self {
        Self::new(CollectionKind::Section, key)
    }
}

impl fmt::Display for CollectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind.as_str(), self.key)
    }
}

/// Repeat mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Stay on the last track when the queue ends
    #[default]
    #[serde(rename = "none", alias = "off")]
    Off,

    /// Loop entire queue
    All,

    /// Loop current track only (enforced by the media layer on "ended")
    One,
}

impl FromStr for RepeatMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(RepeatMode::Off),
            "all" => Ok(RepeatMode::All),
            "one" => Ok(RepeatMode::One),
            other => Err(format!("unknown repeat mode '{}' (expected none, all or one)", other)),
        }
    }
}

impl fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RepeatMode::Off => "none",
            RepeatMode::All => "all",
            RepeatMode::One => "one",
        };
        f.write_str(name)
    }
}

/// Playback status derived from a state snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackStatus {
    /// No tracks queued
    Empty,

    /// Tracks queued, transport paused
    Paused,

    /// Tracks queued, transport playing
    Playing,

    /// A track switch is waiting for the media layer to confirm load
    Changing,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_id_display() {
        assert_eq!(CollectionId::playlist("42").to_string(), "playlist:42");
        assert_eq!(CollectionId::music_list("top").to_string(), "music_list:top");
    }

    #[test]
    fn section_is_not_fetchable() {
        assert!(!CollectionKind::Section.is_fetchable());
        assert!(CollectionKind::Album.is_fetchable());
    }

    #[test]
    fn repeat_mode_parsing() {
        assert_eq!("none".parse::<RepeatMode>().unwrap(), RepeatMode::Off);
        assert_eq!("OFF".parse::<RepeatMode>().unwrap(), RepeatMode::Off);
        assert_eq!("all".parse::<RepeatMode>().unwrap(), RepeatMode::All);
        assert_eq!(" one ".parse::<RepeatMode>().unwrap(), RepeatMode::One);
        assert!("twice".parse::<RepeatMode>().is_err());
    }

    #[test]
    fn repeat_mode_serializes_as_none() {
        let json = serde_json::to_string(&RepeatMode::Off).unwrap();
        assert_eq!(json, "\"none\"");

        let parsed: RepeatMode = serde_json::from_str("\"off\"").unwrap();
        assert_eq!(parsed, RepeatMode::Off);
    }

    #[test]
    fn track_serializes_camel_case() {
        let track = Track {
            id: TrackId::new(7),
            name: "Song".to_string(),
            artist_name: "Artist".to_string(),
            cover_photo_url: None,
            duration_seconds: 200,
            audio_url: Some("https://cdn.example.com/7.mp3".to_string()),
        };

        let value = serde_json::to_value(&track).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["artistName"], "Artist");
        assert_eq!(value["durationSeconds"], 200);
        assert!(value.get("coverPhotoUrl").is_none());
    }
}
