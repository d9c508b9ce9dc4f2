use std::collections::HashMap;

use log::{debug, info, warn};

use crate::{
    clients::{
        MusicService,
        entities::{Playlist, Track, Visibility},
        errors::{Error, Fatal},
    },
    report::Tally,
};

pub const DEFAULT_PREFIX: &str = "(YMS) - ";
pub const DEFAULT_UNKNOWN_LABEL: &str = "Неизвестные исполнители";

/// How target playlists are named and created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOptions {
    pub prefix: String,
    /// Used in place of the artist name when the first artist has none
    pub unknown_label: String,
    pub visibility: Visibility,
}

impl Default for SortOptions {
    fn default() -> Self {
        SortOptions {
            prefix: DEFAULT_PREFIX.to_string(),
            unknown_label: DEFAULT_UNKNOWN_LABEL.to_string(),
            visibility: Visibility::default(),
        }
    }
}

impl SortOptions {
    pub fn artist_label<'a>(&'a self, track: &'a Track) -> &'a str {
        track
            .first_artist_name()
            .unwrap_or(self.unknown_label.as_str())
    }

    pub fn target_title(&self, track: &Track) -> String {
        format!("{}{}", self.prefix, self.artist_label(track))
    }
}

/// What happened to a single liked track.
#[derive(Debug)]
pub enum TrackOutcome {
    /// Target playlist did not exist, it was created with the track in it
    Created,
    /// Track was inserted into an existing target playlist
    Added,
    /// Target playlist already holds a track with the same title
    AlreadyPresent,
    CreateFailed(Error),
    FetchFailed(Error),
    InsertFailed(Error),
}

impl TrackOutcome {
    pub fn succeeded(&self) -> bool {
        matches!(self, TrackOutcome::Created | TrackOutcome::Added)
    }
}

// Liked tracks are identified by title: a later duplicate replaces the earlier
// record but keeps the earlier position
fn unique_by_title(tracks: Vec<Track>) -> Vec<Track> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<Track> = Vec::with_capacity(tracks.len());
    for track in tracks {
        match positions.get(&track.title) {
            Some(&position) => unique[position] = track,
            None => {
                positions.insert(track.title.clone(), unique.len());
                unique.push(track);
            }
        }
    }
    unique
}

// With duplicate titles the last listed playlist wins
fn index_by_title(playlists: Vec<Playlist>) -> HashMap<String, Playlist> {
    playlists
        .into_iter()
        .map(|playlist| (playlist.title.clone(), playlist))
        .collect()
}

/// Sorts liked tracks into per-artist playlists.
pub struct Sorter<'a, S: MusicService + ?Sized> {
    service: &'a S,
    options: &'a SortOptions,
}

impl<'a, S: MusicService + ?Sized> Sorter<'a, S> {
    pub fn new(service: &'a S, options: &'a SortOptions) -> Self {
        Sorter { service, options }
    }

    pub async fn sort(&self) -> Result<Tally, Fatal> {
        info!("Starting sort process ...");
        debug!("Fetching liked tracks ...");
        let refs = self
            .service
            .liked_tracks()
            .await
            .map_err(Fatal::LikedTracks)?;
        let tracks = self
            .service
            .resolve_tracks(&refs)
            .await
            .map_err(Fatal::ResolveTracks)?;
        let fetched = tracks.len();
        let tracks = unique_by_title(tracks);
        debug!(
            "Fetched {fetched} liked tracks, {} with distinct titles",
            tracks.len()
        );

        debug!("Fetching playlists ...");
        let playlists = self
            .service
            .list_playlists()
            .await
            .map_err(Fatal::ListPlaylists)?;
        debug!("Fetched {} playlists", playlists.len());

        Ok(self.reconcile(&tracks, playlists).await)
    }

    /// Places every track into its target playlist, in order.
    ///
    /// Later tracks see the playlists created or updated by earlier ones.
    pub async fn reconcile(&self, tracks: &[Track], playlists: Vec<Playlist>) -> Tally {
        let mut playlists = index_by_title(playlists);
        let mut tally = Tally::new();

        for track in tracks {
            let outcome = self.place(track, &mut playlists).await;
            self.log_outcome(track, &outcome);
            tally.record(outcome.succeeded());
        }
        tally
    }

    async fn place(
        &self,
        track: &Track,
        playlists: &mut HashMap<String, Playlist>,
    ) -> TrackOutcome {
        let title = self.options.target_title(track);

        if let Some(playlist) = playlists.get(&title).cloned() {
            match self.contains_title(&playlist, &track.title).await {
                Err(e) => TrackOutcome::FetchFailed(e),
                Ok(true) => TrackOutcome::AlreadyPresent,
                Ok(false) => match self.insert(&playlist, track).await {
                    Ok(updated) => {
                        playlists.insert(title, updated);
                        TrackOutcome::Added
                    }
                    Err(e) => TrackOutcome::InsertFailed(e),
                },
            }
        } else {
            // Without a created playlist there is nothing to insert into
            let created = match self
                .service
                .create_playlist(&title, self.options.visibility)
                .await
            {
                Ok(created) => created,
                Err(e) => return TrackOutcome::CreateFailed(e),
            };
            debug!("Created playlist '{title}' (kind {})", created.kind);

            match self.insert(&created, track).await {
                Ok(updated) => {
                    playlists.insert(title, updated);
                    TrackOutcome::Created
                }
                Err(e) => {
                    playlists.insert(title, created);
                    TrackOutcome::InsertFailed(e)
                }
            }
        }
    }

    // Membership is checked by title, so every contained track has to be resolved
    async fn contains_title(&self, playlist: &Playlist, title: &str) -> Result<bool, Error> {
        debug!(
            "Fetching {} tracks of playlist '{}' (kind {})",
            playlist.track_count, playlist.title, playlist.kind
        );
        let refs = self.service.playlist_tracks(playlist).await?;
        let mut titles = Vec::with_capacity(refs.len());
        for track_ref in &refs {
            titles.push(self.service.resolve_track(track_ref).await?.title);
        }
        Ok(titles.iter().any(|t| t == title))
    }

    async fn insert(&self, playlist: &Playlist, track: &Track) -> Result<Playlist, Error> {
        let album_id = track.first_album_id().ok_or_else(|| Error::MissingAlbum {
            track: track.title.clone(),
        })?;
        self.service
            .insert_track(playlist, &track.id, album_id)
            .await
    }

    fn log_outcome(&self, track: &Track, outcome: &TrackOutcome) {
        let artist = self.options.artist_label(track);
        let playlist = self.options.target_title(track);
        let name = &track.title;
        match outcome {
            TrackOutcome::Created | TrackOutcome::Added => {
                info!("Track '{artist} - {name}' added to '{playlist}'");
            }
            TrackOutcome::AlreadyPresent => {
                info!("Track '{artist} - {name}' skipped, already in '{playlist}'");
            }
            TrackOutcome::CreateFailed(e) => {
                warn!(
                    "Failed to create playlist '{playlist}'. Track '{artist} - {name}' will not be added: {e}"
                );
            }
            TrackOutcome::FetchFailed(e) => {
                warn!(
                    "Failed to fetch tracks of playlist '{playlist}'. Track '{artist} - {name}' will not be added: {e}"
                );
            }
            TrackOutcome::InsertFailed(e) => {
                warn!("Failed to add track '{artist} - {name}' to '{playlist}': {e}");
            }
        }
    }
}
