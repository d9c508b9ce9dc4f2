use async_trait::async_trait;

use crate::clients::{
    entities::{Playlist, Track, TrackRef, Visibility},
    errors::Result,
};

/// Remote music-service capabilities the sorter and cleaner rely on.
///
/// Every call may fail on its own; callers decide whether a failure is fatal.
/// Implemented by `YandexMusicClient` in production and by mocks in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MusicService: Send + Sync {
    /// References to the user's liked tracks, in the order the service returns them.
    async fn liked_tracks(&self) -> Result<Vec<TrackRef>>;

    /// Resolves a batch of references to full track records.
    async fn resolve_tracks(&self, refs: &[TrackRef]) -> Result<Vec<Track>>;

    async fn list_playlists(&self) -> Result<Vec<Playlist>>;

    /// Current contents of a playlist.
    async fn playlist_tracks(&self, playlist: &Playlist) -> Result<Vec<TrackRef>>;

    async fn resolve_track(&self, track: &TrackRef) -> Result<Track>;

    async fn create_playlist(&self, title: &str, visibility: Visibility) -> Result<Playlist>;

    /// Inserts a track at the top of the playlist and returns the updated playlist.
    async fn insert_track(
        &self,
        playlist: &Playlist,
        track_id: &str,
        album_id: &str,
    ) -> Result<Playlist>;

    /// Returns whether the service reported the deletion as done.
    async fn delete_playlist(&self, kind: u64) -> Result<bool>;
}
