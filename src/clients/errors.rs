use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    #[error("Yandex Music API error ({status}): {name}: {message}")]
    Api {
        status: StatusCode,
        name: String,
        message: String,
    },

    #[error("Yandex Music API unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Track '{track}' has no album to insert it with")]
    MissingAlbum { track: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failures that leave no way to carry on with the run.
///
/// Each one maps to its own process exit code.
#[derive(Error, Debug)]
pub enum Fatal {
    #[error("Failed to fetch liked tracks: {0}")]
    LikedTracks(#[source] Error),

    #[error("Failed to fetch full versions of liked tracks: {0}")]
    ResolveTracks(#[source] Error),

    #[error("Failed to fetch playlists: {0}")]
    ListPlaylists(#[source] Error),
}

impl Fatal {
    pub fn exit_code(&self) -> u8 {
        match self {
            Fatal::LikedTracks(_) => 1,
            Fatal::ResolveTracks(_) => 2,
            Fatal::ListPlaylists(_) => 3,
        }
    }
}
