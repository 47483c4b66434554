//! Core data models for release-title parsing.
//!
//! This module contains the parsed result records, the lightweight
//! quality/language value types, and the contracts for the external
//! collaborators (audio-tag reader, quality classifier, language
//! classifier) that get attached to a parse result.

use serde::Serialize;
use std::path::Path;
use thiserror::Error;

// ============================================================================
// Classifier Value Types
// ============================================================================

/// Resolved audio quality for a release, produced by the external quality
/// classifier. The parsing engine never interprets this value; it only
/// carries it on the result record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Quality {
    #[default]
    Unknown,
    /// Constant-bitrate MP3, bitrate in kbps.
    Mp3(u16),
    Mp3Vbr,
    Aac,
    Ogg,
    Wma,
    Alac,
    Flac,
    Wav,
}

/// Release language, produced by the external language classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    Unknown,
    English,
    French,
    Spanish,
    German,
    Italian,
    Dutch,
    Japanese,
    Russian,
    Polish,
    Portuguese,
    Swedish,
    Norwegian,
    Finnish,
    Danish,
}

// ============================================================================
// Parsed Result Records
// ============================================================================

/// Lightweight descriptor derived from a parsed artist name, consumed by
/// downstream catalog matching. A year of 0 means "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ArtistTitleInfo {
    pub title: String,
    pub year: i32,
}

/// Result of parsing a track-style title or reading embedded audio tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedTrackInfo {
    pub title: Option<String>,
    pub artist_title: String,
    pub artist_title_info: ArtistTitleInfo,
    pub track_numbers: Vec<u32>,
    pub disc_number: u32,
    pub album_title: Option<String>,
    pub language: Language,
    pub quality: Quality,
    pub artist_mb_id: Option<String>,
    pub release_mb_id: Option<String>,
    pub track_mb_id: Option<String>,
}

/// Result of parsing an album-style release title.
///
/// `release_date` holds the release year as a string; `"0"` means no year
/// was captured. `discography_start`/`discography_end` are 0 when absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedAlbumInfo {
    pub artist_name: String,
    pub album_title: String,
    pub artist_title_info: ArtistTitleInfo,
    pub release_date: String,
    pub release_version: String,
    pub release_group: Option<String>,
    pub release_hash: Option<String>,
    pub discography: bool,
    pub discography_start: i32,
    pub discography_end: i32,
    pub language: Language,
    pub quality: Quality,
}

// ============================================================================
// Internal Errors
// ============================================================================

/// Error raised while reconstructing a cascade match. An invalid date on an
/// otherwise-successful rule aborts the whole cascade for that title rather
/// than falling through to a laxer rule.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid date capture '{value}' in release title")]
    InvalidDate { value: String },
}

// ============================================================================
// External Collaborator Contracts
// ============================================================================

/// A single codec stream reported by the audio-tag reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioCodec {
    pub description: String,
    pub bitrate_kbps: u32,
    pub sample_rate_hz: u32,
    pub channels: u32,
    pub bits_per_sample: u32,
}

/// Embedded metadata read from a media file by the external tag reader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioTags {
    pub track_number: u32,
    pub title: Option<String>,
    pub disc_number: u32,
    pub album: Option<String>,
    pub album_artist: Option<String>,
    pub performer: Option<String>,
    pub year: u32,
    pub artist_mb_id: Option<String>,
    pub release_mb_id: Option<String>,
    pub track_mb_id: Option<String>,
    pub codecs: Vec<AudioCodec>,
}

/// External quality classifier. Receives the pre-normalization title (the
/// normalizer deliberately strips the tokens this classifier keys on) and,
/// for audio files, the codec description/bitrate/bit-depth.
pub trait QualityClassifier: Send + Sync {
    fn classify_quality(
        &self,
        title: &str,
        codec: Option<&str>,
        bitrate_kbps: u32,
        bits_per_sample: u32,
    ) -> Quality;
}

/// External language classifier, keyed on the extension-stripped title.
pub trait LanguageClassifier: Send + Sync {
    fn classify_language(&self, title: &str) -> Language;
}

/// External audio-tag reader. Returns `None` when the file cannot be read
/// as a tagged media file; the caller falls back to name-based parsing.
pub trait AudioTagReader: Send + Sync {
    fn read_tags(&self, path: &Path) -> Option<AudioTags>;
}
