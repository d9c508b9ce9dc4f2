use log::{debug, info, warn};

use crate::{
    clients::{
        MusicService,
        entities::Playlist,
        errors::{Error, Fatal},
    },
    report::Tally,
};

/// What happened to a single playlist in delete mode.
#[derive(Debug)]
pub enum PlaylistOutcome {
    Deleted,
    /// Title does not start with the prefix, not counted
    Skipped,
    /// The service answered without deleting the playlist
    Refused,
    Failed(Error),
}

impl PlaylistOutcome {
    /// `None` for playlists that were left alone on purpose.
    pub fn succeeded(&self) -> Option<bool> {
        match self {
            PlaylistOutcome::Deleted => Some(true),
            PlaylistOutcome::Skipped => None,
            PlaylistOutcome::Refused | PlaylistOutcome::Failed(_) => Some(false),
        }
    }
}

/// Deletes every playlist whose title starts with a prefix.
pub struct Cleaner<'a, S: MusicService + ?Sized> {
    service: &'a S,
    prefix: &'a str,
}

impl<'a, S: MusicService + ?Sized> Cleaner<'a, S> {
    pub fn new(service: &'a S, prefix: &'a str) -> Self {
        Cleaner { service, prefix }
    }

    pub async fn clean(&self) -> Result<Tally, Fatal> {
        info!("Deleting playlists starting with '{}' ...", self.prefix);
        let playlists = self
            .service
            .list_playlists()
            .await
            .map_err(Fatal::ListPlaylists)?;
        debug!("Fetched {} playlists", playlists.len());

        let mut tally = Tally::new();
        for playlist in &playlists {
            let outcome = self.delete(playlist).await;
            log_outcome(playlist, &outcome);
            if let Some(succeeded) = outcome.succeeded() {
                tally.record(succeeded);
            }
        }
        Ok(tally)
    }

    // Single attempt, no retries
    async fn delete(&self, playlist: &Playlist) -> PlaylistOutcome {
        // Case-sensitive
        if !playlist.title.starts_with(self.prefix) {
            return PlaylistOutcome::Skipped;
        }
        match self.service.delete_playlist(playlist.kind).await {
            Ok(true) => PlaylistOutcome::Deleted,
            Ok(false) => PlaylistOutcome::Refused,
            Err(e) => PlaylistOutcome::Failed(e),
        }
    }
}

fn log_outcome(playlist: &Playlist, outcome: &PlaylistOutcome) {
    let title = &playlist.title;
    match outcome {
        PlaylistOutcome::Deleted => info!("Playlist '{title}' deleted"),
        PlaylistOutcome::Skipped => info!("Playlist '{title}' skipped"),
        PlaylistOutcome::Refused => warn!("Failed to delete playlist '{title}'"),
        PlaylistOutcome::Failed(e) => warn!("Failed to delete playlist '{title}': {e}"),
    }
}
