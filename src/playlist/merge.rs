use anyhow::{Context, Result};
use tracing::{debug, info};

use super::interleave::{Source, interleave, validate_limit};
use crate::client::ClientError;
use crate::models::{Track, TrackUri};

/// Spotify accepts at most this many URIs per add-items request
pub const MAX_TRACKS_PER_REQUEST: usize = 100;

/// The playlist operations the commands need from the music service
#[cfg_attr(test, mockall::automock)]
pub trait PlaylistService {
    /// Id of the user the credentials belong to
    fn current_user_id(&self) -> Result<String, ClientError>;

    /// Track URIs of a playlist in playlist order, stopping after `limit` URIs
    fn playlist_track_uris(
        &self,
        playlist_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TrackUri>, ClientError>;

    /// All tracks of a playlist with their names and artists
    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ClientError>;

    /// Create an empty playlist and return its id
    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, ClientError>;

    /// Append tracks to a playlist and return the new snapshot id
    fn add_tracks(&self, playlist_id: &str, uris: &[TrackUri]) -> Result<String, ClientError>;
}

#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub first_playlist: String,
    pub second_playlist: String,
    pub name: String,
    pub first_limit: Option<i64>,
    pub second_limit: Option<i64>,
    /// Build the merged list without creating anything
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    /// `None` on a dry run
    pub playlist_id: Option<String>,
    pub tracks: Vec<TrackUri>,
}

/// Fetch both sources, interleave them and store the result as a new private playlist
pub fn merge_playlists<S: PlaylistService>(
    service: &S,
    request: &MergeRequest,
) -> Result<MergeOutcome> {
    // Reject bad limits before touching the network
    let first_cap = validate_limit(request.first_limit, Source::First)?;
    let second_cap = validate_limit(request.second_limit, Source::Second)?;

    info!(
        "Fetching up to {} tracks from playlist 1: {}",
        describe_cap(first_cap),
        request.first_playlist
    );
    let first = service
        .playlist_track_uris(&request.first_playlist, first_cap)
        .with_context(|| format!("Failed to read playlist '{}'", request.first_playlist))?;

    info!(
        "Fetching up to {} tracks from playlist 2: {}",
        describe_cap(second_cap),
        request.second_playlist
    );
    let second = service
        .playlist_track_uris(&request.second_playlist, second_cap)
        .with_context(|| format!("Failed to read playlist '{}'", request.second_playlist))?;

    debug!("Playlist 1 tracks: {}, playlist 2 tracks: {}", first.len(), second.len());

    let merged = interleave(&first, &second, request.first_limit, request.second_limit)?;
    info!("Total merged tracks: {}", merged.len());

    if request.dry_run {
        return Ok(MergeOutcome {
            playlist_id: None,
            tracks: merged,
        });
    }

    let user_id = service
        .current_user_id()
        .context("Failed to look up the current user")?;
    debug!("Current user: {user_id}");

    let playlist_id = service
        .create_playlist(&user_id, &request.name, false)
        .with_context(|| format!("Failed to create playlist '{}'", request.name))?;
    info!("Created playlist '{}' (ID: {playlist_id})", request.name);

    for (index, batch) in merged.chunks(MAX_TRACKS_PER_REQUEST).enumerate() {
        let start = index * MAX_TRACKS_PER_REQUEST;
        service
            .add_tracks(&playlist_id, batch)
            .with_context(|| format!("Failed to add tracks {start}..{}", start + batch.len()))?;
        debug!("Added tracks {}-{}", start, start + batch.len() - 1);
    }

    Ok(MergeOutcome {
        playlist_id: Some(playlist_id),
        tracks: merged,
    })
}

fn describe_cap(cap: Option<usize>) -> String {
    cap.map_or_else(|| "all".to_string(), |n| n.to_string())
}
