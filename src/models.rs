use serde::{Deserialize, Serialize};

/// Opaque track identifier, a Spotify URI in practice
pub type TrackUri = String;

/// Track structure with the fields requested from the Spotify Web API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artists: Vec<Artist>,
    #[serde(default)]
    pub uri: Option<TrackUri>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artist {
    pub name: String,
}

impl Track {
    /// Name of the first credited artist, if any
    pub fn first_artist(&self) -> Option<&str> {
        self.artists.first().map(|artist| artist.name.as_str())
    }
}

/// One page of `GET /playlists/{id}/tracks`
#[derive(Debug, Deserialize)]
pub struct PlaylistTracksPage {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlaylistItem {
    /// `null` for removed or unavailable items
    pub track: Option<Track>,
}

/// Response structure for `GET /me`
#[derive(Debug, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub display_name: Option<String>,
}

/// Request body for `POST /users/{user_id}/playlists`
#[derive(Debug, Serialize)]
pub struct CreatePlaylistRequest<'a> {
    pub name: &'a str,
    pub public: bool,
}

/// Response structure for `POST /users/{user_id}/playlists`
#[derive(Debug, Deserialize)]
pub struct CreatedPlaylist {
    pub id: String,
}

/// Request body for `POST /playlists/{id}/tracks`
#[derive(Debug, Serialize)]
pub struct AddTracksRequest<'a> {
    pub uris: &'a [TrackUri],
}

/// Response structure for `POST /playlists/{id}/tracks`
#[derive(Debug, Deserialize)]
pub struct SnapshotResponse {
    pub snapshot_id: String,
}

/// Response structure for the accounts token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

/// Error body returned by the Web API on non-2xx responses
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
}

/// Error body returned by the accounts service
#[derive(Debug, Deserialize)]
pub struct AuthErrorResponse {
    pub error: String,
    pub error_description: Option<String>,
}
