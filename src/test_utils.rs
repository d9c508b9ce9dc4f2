use std::{collections::HashSet, sync::Mutex};

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::clients::{
    MusicService,
    entities::{Album, Artist, Playlist, Track, TrackRef, Visibility},
    errors::{Error, Result},
};

pub fn track(id: &str, title: &str, artist: Option<&str>) -> Track {
    Track {
        id: id.into(),
        title: title.into(),
        artists: vec![Artist {
            name: artist.map(str::to_string),
        }],
        albums: vec![Album {
            id: format!("album-{id}"),
        }],
    }
}

pub fn playlist(kind: u64, title: &str) -> Playlist {
    Playlist {
        kind,
        title: title.into(),
        uid: Some(1),
        revision: 1,
        track_count: 0,
        tracks: Vec::new(),
    }
}

pub fn service_error() -> Error {
    Error::Api {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        name: "internal-error".into(),
        message: "Something went wrong".into(),
    }
}

/// Remote side of the fake, inspectable by tests.
#[derive(Debug, Default)]
pub struct FakeState {
    pub liked: Vec<Track>,
    pub playlists: Vec<Playlist>,
    pub fail_create: HashSet<String>,
    pub fail_insert: HashSet<u64>,
    pub fail_fetch: HashSet<u64>,
    pub fail_delete: HashSet<u64>,
    pub refuse_delete: HashSet<u64>,
    pub created: usize,
    pub inserted: usize,
    pub deleted: Vec<u64>,
}

impl FakeState {
    pub fn playlist(&self, title: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.title == title)
    }

    pub fn titles_in(&self, title: &str) -> Vec<String> {
        self.playlist(title)
            .map(|p| {
                p.tracks
                    .iter()
                    .filter_map(|r| r.track.as_ref().map(|t| t.title.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// In-memory music service that keeps playlist revisions like the real one.
#[derive(Debug, Default)]
pub struct FakeMusicService {
    pub state: Mutex<FakeState>,
}

impl FakeMusicService {
    pub fn new(liked: Vec<Track>, playlists: Vec<Playlist>) -> Self {
        FakeMusicService {
            state: Mutex::new(FakeState {
                liked,
                playlists,
                ..FakeState::default()
            }),
        }
    }

    /// Adds a track to an existing playlist without going through `insert_track`.
    pub fn seed(&self, title: &str, track: &Track) {
        let mut state = self.state.lock().unwrap();
        let playlist = state
            .playlists
            .iter_mut()
            .find(|p| p.title == title)
            .unwrap();
        playlist.tracks.push(TrackRef::from(track));
        playlist.track_count += 1;
    }
}

#[async_trait]
impl MusicService for FakeMusicService {
    async fn liked_tracks(&self) -> Result<Vec<TrackRef>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .liked
            .iter()
            .map(|t| TrackRef {
                track: None,
                ..TrackRef::from(t)
            })
            .collect())
    }

    async fn resolve_tracks(&self, refs: &[TrackRef]) -> Result<Vec<Track>> {
        let state = self.state.lock().unwrap();
        Ok(refs
            .iter()
            .filter_map(|r| state.liked.iter().find(|t| t.id == r.id).cloned())
            .collect())
    }

    async fn list_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.state.lock().unwrap().playlists.clone())
    }

    async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<TrackRef>> {
        let state = self.state.lock().unwrap();
        if state.fail_fetch.contains(&playlist.kind) {
            return Err(service_error());
        }
        state
            .playlists
            .iter()
            .find(|p| p.kind == playlist.kind)
            .map(|p| p.tracks.clone())
            .ok_or_else(service_error)
    }

    async fn resolve_track(&self, track: &TrackRef) -> Result<Track> {
        if let Some(full) = &track.track {
            return Ok(full.clone());
        }
        let state = self.state.lock().unwrap();
        state
            .liked
            .iter()
            .find(|t| t.id == track.id)
            .cloned()
            .ok_or_else(service_error)
    }

    async fn create_playlist(&self, title: &str, _visibility: Visibility) -> Result<Playlist> {
        let mut state = self.state.lock().unwrap();
        if state.fail_create.contains(title) {
            return Err(service_error());
        }
        let kind = 1000 + state.created as u64;
        let created = playlist(kind, title);
        state.playlists.push(created.clone());
        state.created += 1;
        Ok(created)
    }

    async fn insert_track(
        &self,
        playlist: &Playlist,
        track_id: &str,
        album_id: &str,
    ) -> Result<Playlist> {
        let mut state = self.state.lock().unwrap();
        if state.fail_insert.contains(&playlist.kind) {
            return Err(service_error());
        }
        let track = state.liked.iter().find(|t| t.id == track_id).cloned();
        let stored = state
            .playlists
            .iter_mut()
            .find(|p| p.kind == playlist.kind)
            .ok_or_else(service_error)?;
        // The service rejects changes made against an outdated revision
        if stored.revision != playlist.revision {
            return Err(Error::Api {
                status: StatusCode::PRECONDITION_FAILED,
                name: "wrong-revision".into(),
                message: format!(
                    "expected revision {}, got {}",
                    stored.revision, playlist.revision
                ),
            });
        }
        stored.tracks.insert(
            0,
            TrackRef {
                id: track_id.into(),
                album_id: Some(album_id.into()),
                track,
            },
        );
        stored.revision += 1;
        stored.track_count += 1;
        let updated = stored.clone();
        state.inserted += 1;
        Ok(updated)
    }

    async fn delete_playlist(&self, kind: u64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if state.fail_delete.contains(&kind) {
            return Err(service_error());
        }
        if state.refuse_delete.contains(&kind) {
            return Ok(false);
        }
        state.playlists.retain(|p| p.kind != kind);
        state.deleted.push(kind);
        Ok(true)
    }
}
