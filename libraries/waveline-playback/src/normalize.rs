//! Track descriptor normalization
//!
//! Backend rows come in two shapes:
//! - join rows (album tracks, playlist tracks) that nest the track under a
//!   `musicDetails` object and carry their own row id at the top level
//! - flat rows (music lists, search results)
//!
//! Nested fields win over flat ones. Missing fields become empty values; only
//! an unresolvable id is an error.

use crate::error::NormalizationError;
use crate::types::{Track, TrackId};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::warn;

const NESTED_KEYS: &[&str] = &["musicDetails", "music_details", "music"];

// Nested details carry the track id as `id`; at the top level of a join row
// `id` is the row id, so `musicId` is checked first there.
const NESTED_ID_KEYS: &[&str] = &["id", "musicId", "music_id"];
const FLAT_ID_KEYS: &[&str] = &["musicId", "music_id", "id"];

const NAME_KEYS: &[&str] = &["name", "title"];
const ARTIST_KEYS: &[&str] = &["artistName", "artist_name", "artist"];
const COVER_KEYS: &[&str] = &["coverPhotoUrl", "coverPhoto", "cover_photo_url", "coverUrl"];
const DURATION_KEYS: &[&str] = &["durationSeconds", "duration", "duration_seconds"];
const AUDIO_KEYS: &[&str] = &["audioUrl", "musicUrl", "audio_url", "url"];

/// Normalize one backend record into a canonical [`Track`]
///
/// Empty strings count as absent, so an empty cover or audio URL becomes
/// `None`. Idempotent over its own output: a serialized result normalizes
/// back to an equal `Track`. A hand-built `Track` holding `Some("")` does not
/// survive the trip unchanged.
pub fn normalize_track(record: &Value) -> Result<Track, NormalizationError> {
    let flat = record.as_object().ok_or(NormalizationError::NotAnObject)?;
    let nested = NESTED_KEYS
        .iter()
        .find_map(|key| flat.get(*key).and_then(Value::as_object));

    let id = resolve_id(nested, flat)?;

    let sources: Vec<&Map<String, Value>> = nested.into_iter().chain(Some(flat)).collect();

    Ok(Track {
        id,
        name: lookup(&sources, NAME_KEYS).and_then(as_text).unwrap_or_default(),
        artist_name: lookup(&sources, ARTIST_KEYS)
            .and_then(artist_text)
            .unwrap_or_default(),
        cover_photo_url: lookup(&sources, COVER_KEYS).and_then(as_text),
        duration_seconds: lookup(&sources, DURATION_KEYS)
            .and_then(as_seconds)
            .unwrap_or(0),
        audio_url: lookup(&sources, AUDIO_KEYS).and_then(as_text),
    })
}

/// Normalize a whole collection
///
/// Unusable records and repeated ids are dropped with a warning; the rest keep
/// their backend order.
pub fn normalize_collection(records: &[Value]) -> Vec<Track> {
    let mut seen = HashSet::with_capacity(records.len());
    let mut tracks = Vec::with_capacity(records.len());

    for (position, record) in records.iter().enumerate() {
        match normalize_track(record) {
            Ok(track) => {
                if seen.insert(track.id) {
                    tracks.push(track);
                } else {
                    warn!(position, track_id = %track.id, "Dropping duplicate track in collection");
                }
            }
            Err(e) => {
                warn!(position, error = %e, "Dropping unusable track record");
            }
        }
    }

    tracks
}

fn resolve_id(
    nested: Option<&Map<String, Value>>,
    flat: &Map<String, Value>,
) -> Result<TrackId, NormalizationError> {
    let candidate = nested
        .and_then(|details| first_present(details, NESTED_ID_KEYS))
        .or_else(|| first_present(flat, FLAT_ID_KEYS))
        .ok_or(NormalizationError::MissingId)?;

    coerce_id(candidate).map(TrackId::new)
}

fn coerce_id(value: &Value) -> Result<i64, NormalizationError> {
    let invalid = || NormalizationError::InvalidId(value.to_string());

    match value {
        Value::Number(n) => {
            if let Some(id) = n.as_i64() {
                return Ok(id);
            }
            match n.as_f64() {
                Some(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(f as i64),
                _ => Err(invalid()),
            }
        }
        Value::String(s) => s.trim().parse::<i64>().map_err(|_| invalid()),
        _ => Err(invalid()),
    }
}

fn first_present<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|key| map.get(*key).filter(|v| !v.is_null()))
}

fn lookup<'a>(sources: &[&'a Map<String, Value>], keys: &[&str]) -> Option<&'a Value> {
    sources.iter().find_map(|map| first_present(map, keys))
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn artist_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(artist) => first_present(artist, &["name", "artistName"]).and_then(as_text),
        other => as_text(other),
    }
}

fn as_seconds(value: &Value) -> Option<u64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !seconds.is_finite() {
        return None;
    }
    Some(seconds.max(0.0).floor() as u64)
}
