//! Lidarr custom-script event, as passed through environment variables.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::exit::ExitCode;

/// Environment variable carrying the event type.
pub const EVENT_TYPE_VAR: &str = "lidarr_eventtype";

/// Errors reading the event from the environment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EventError {
    /// `lidarr_eventtype` is not set: the hook was not started by Lidarr.
    #[error("lidarr_eventtype is not set; not invoked by Lidarr")]
    NotInvoked,

    /// A numeric identifier could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidValue { name: &'static str, value: String },
}

impl EventError {
    /// Both cases mean the hook was not invoked correctly.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::UnknownEvent
    }
}

/// Type of event Lidarr is reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventType {
    /// Connection test from the Lidarr UI.
    Test,
    /// An album finished downloading and was imported.
    AlbumDownload,
    /// Anything this hook does not handle (Grab, Rename, ...).
    Other(String),
}

impl EventType {
    fn parse(value: &str) -> Self {
        match value {
            "Test" => Self::Test,
            "AlbumDownload" => Self::AlbumDownload,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Test => "Test",
            Self::AlbumDownload => "AlbumDownload",
            Self::Other(s) => s,
        }
    }
}

/// Artist details from the event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistInfo {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub path: Option<PathBuf>,
    pub mbid: Option<String>,
    pub artist_type: Option<String>,
}

/// Album details from the event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlbumInfo {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub mbid: Option<String>,
    pub release_mbid: Option<String>,
    pub release_date: Option<String>,
}

/// A Lidarr event read from `lidarr_*` variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LidarrEvent {
    pub event_type: EventType,
    pub artist: ArtistInfo,
    pub album: AlbumInfo,
    pub download_client: Option<String>,
    pub download_id: Option<String>,
    /// Track paths Lidarr added for this download.
    pub added_track_paths: Vec<PathBuf>,
    /// Paths Lidarr deleted (upgrades).
    pub deleted_paths: Vec<PathBuf>,
}

impl LidarrEvent {
    /// Reads the event from the process environment.
    pub fn from_env() -> Result<Self, EventError> {
        Self::from_vars(std::env::vars())
    }

    /// Reads the event from key/value pairs. Unknown keys are ignored.
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, EventError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .filter(|(k, _)| k.starts_with("lidarr_"))
            .collect();

        let event_type = vars
            .get(EVENT_TYPE_VAR)
            .map(|v| EventType::parse(v.trim()))
            .ok_or(EventError::NotInvoked)?;

        // Only an album download uses the ids; other events must not fail on them
        let id = |name: &'static str| match event_type {
            EventType::AlbumDownload => parse_id(&vars, name),
            _ => Ok(None),
        };

        let text = |name: &str| {
            vars.get(name)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let artist_id = id("lidarr_artist_id")?;
        let album_id = id("lidarr_album_id")?;

        Ok(Self {
            event_type,
            artist: ArtistInfo {
                id: artist_id,
                name: text("lidarr_artist_name"),
                path: text("lidarr_artist_path").map(PathBuf::from),
                mbid: text("lidarr_artist_mbid"),
                artist_type: text("lidarr_artist_type"),
            },
            album: AlbumInfo {
                id: album_id,
                title: text("lidarr_album_title"),
                mbid: text("lidarr_album_mbid"),
                release_mbid: text("lidarr_albumrelease_mbid"),
                release_date: text("lidarr_album_releasedate"),
            },
            download_client: text("lidarr_download_client"),
            download_id: text("lidarr_download_id"),
            added_track_paths: split_paths(vars.get("lidarr_addedtrackpaths")),
            deleted_paths: split_paths(vars.get("lidarr_deletedpaths")),
        })
    }

    /// Folder holding the album, taken from the first added track.
    pub fn album_folder(&self) -> Option<PathBuf> {
        self.added_track_paths
            .first()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
    }
}

fn parse_id(
    vars: &HashMap<String, String>,
    name: &'static str,
) -> Result<Option<i64>, EventError> {
    match vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(value) => value
            .parse::<i64>()
            .map(Some)
            .map_err(|_| EventError::InvalidValue {
                name,
                value: value.to_string(),
            }),
    }
}

fn split_paths(value: Option<&String>) -> Vec<PathBuf> {
    value
        .map(|v| {
            v.split('|')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from)
                .collect()
        })
        .unwrap_or_default()
}
