use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer};

// The service sends ids either as numbers or as strings depending on the endpoint
fn id_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(text) => text,
        Id::Number(number) => number.to_string(),
    })
}

fn optional_id_string<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    #[derive(Deserialize)]
    struct Wrapped(#[serde(deserialize_with = "id_string")] String);

    Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(id)| id))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Artist {
    // A missing name is a valid state, not the same thing as an empty one
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Album {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
}

/// Full track record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Track {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub albums: Vec<Album>,
}

impl Track {
    /// Name of the first artist, if it has a non-empty one. Other artists are ignored.
    pub fn first_artist_name(&self) -> Option<&str> {
        self.artists
            .first()
            .and_then(|artist| artist.name.as_deref())
            .filter(|name| !name.is_empty())
    }

    pub fn first_album_id(&self) -> Option<&str> {
        self.albums.first().map(|album| album.id.as_str())
    }
}

/// Short track reference, as found in likes and playlist listings.
///
/// Playlist listings usually embed the full track record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackRef {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    #[serde(default, deserialize_with = "optional_id_string")]
    pub album_id: Option<String>,
    #[serde(default)]
    pub track: Option<Track>,
}

impl TrackRef {
    /// Id in the `track:album` form accepted by the tracks endpoint.
    pub fn qualified_id(&self) -> String {
        match &self.album_id {
            Some(album_id) => format!("{}:{album_id}", self.id),
            None => self.id.clone(),
        }
    }
}

impl From<&Track> for TrackRef {
    fn from(track: &Track) -> Self {
        TrackRef {
            id: track.id.clone(),
            album_id: track.first_album_id().map(str::to_string),
            track: Some(track.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Service-assigned identity of the playlist within its owner's account
    pub kind: u64,
    #[serde(default)]
    pub title: String,
    /// Owner uid
    #[serde(default)]
    pub uid: Option<u64>,
    /// Bumped by the service on every change, required to modify the playlist
    #[serde(default = "initial_revision")]
    pub revision: u64,
    #[serde(default)]
    pub track_count: u64,
    #[serde(default)]
    pub tracks: Vec<TrackRef>,
}

fn initial_revision() -> u64 {
    1
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    pub fn as_str(self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(format!(
                "unknown visibility '{other}', expected 'public' or 'private'"
            )),
        }
    }
}
