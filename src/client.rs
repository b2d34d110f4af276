use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use thiserror::Error;
use tracing::{debug, warn};
use ureq::{Agent, AgentBuilder, Response};
use urlencoding::encode;

use crate::config::{Config, Credentials};
use crate::models::{
    AddTracksRequest, AuthErrorResponse, CreatePlaylistRequest, CreatedPlaylist, CurrentUser,
    ErrorResponse, PlaylistTracksPage, SnapshotResponse, TokenResponse, Track, TrackUri,
};
use crate::playlist::PlaylistService;

const SPOTIFY_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";

/// Largest page size the playlist items endpoint allows
const PAGE_SIZE: usize = 100;

const URI_FIELDS: &str = "items(track(uri)),next";
const TRACK_FIELDS: &str = "items(track(name,uri,artists(name))),next";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Transport(Box<ureq::Transport>),
    #[error("Spotify API returned {status}: {message}")]
    Api { status: u16, message: String },
    #[error("Failed to parse JSON response: {0}")]
    Decode(#[source] std::io::Error),
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl From<ureq::Error> for ClientError {
    fn from(error: ureq::Error) -> Self {
        match error {
            ureq::Error::Status(status, response) => {
                let body = response.into_string().unwrap_or_default();
                api_error(status, &body)
            }
            ureq::Error::Transport(transport) => ClientError::Transport(Box::new(transport)),
        }
    }
}

/// Build an API error from a non-2xx status and its body
pub fn api_error(status: u16, body: &str) -> ClientError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no error details".to_string(),
        Err(_) => body.trim().to_string(),
    };
    ClientError::Api { status, message }
}

/// Blocking Spotify Web API client authenticated with a bearer token
pub struct SpotifyClient {
    agent: Agent,
    base_url: String,
    access_token: String,
}

impl SpotifyClient {
    /// Create a client, exchanging a refresh token for an access token when needed
    pub fn connect(config: Config) -> Result<Self, ClientError> {
        let agent = AgentBuilder::new()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("playlist-tricks/", env!("CARGO_PKG_VERSION")))
            .build();

        let access_token = match config.credentials {
            Credentials::AccessToken(token) => token,
            Credentials::RefreshToken {
                client_id,
                client_secret,
                refresh_token,
            } => refresh_access_token(&agent, &client_id, &client_secret, &refresh_token)?,
        };

        Ok(SpotifyClient {
            agent,
            base_url: config.api_base_url,
            access_token,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    fn get(&self, url: &str) -> ureq::Request {
        debug!("GET {url}");
        self.agent
            .get(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
    }

    fn post(&self, url: &str) -> ureq::Request {
        debug!("POST {url}");
        self.agent
            .post(url)
            .set("Authorization", &format!("Bearer {}", self.access_token))
    }

    /// Fetch the first playlist items page, or the page behind a `next` link
    fn fetch_playlist_page(
        &self,
        playlist_id: &str,
        fields: &str,
        next: Option<&str>,
    ) -> Result<PlaylistTracksPage, ClientError> {
        let response = match next {
            // `next` already carries the fields and offset parameters
            Some(next) => self.get(next).call()?,
            None => self
                .get(&self.url(&format!("playlists/{}/tracks", encode(playlist_id))))
                .query("fields", fields)
                .query("limit", &PAGE_SIZE.to_string())
                .call()?,
        };
        decode(response)
    }
}

/// Walk playlist items pages, handing every track to `visit` until it returns false.
///
/// `fetch_page` receives `None` for the first page and the previous page's
/// `next` link after that. Unavailable (`null`) items are skipped.
pub fn walk_playlist_pages<P, V>(
    playlist_id: &str,
    mut fetch_page: P,
    mut visit: V,
) -> Result<(), ClientError>
where
    P: FnMut(Option<&str>) -> Result<PlaylistTracksPage, ClientError>,
    V: FnMut(Track) -> bool,
{
    let mut page = fetch_page(None)?;

    loop {
        for item in page.items {
            match item.track {
                Some(track) => {
                    if !visit(track) {
                        return Ok(());
                    }
                }
                None => warn!("Skipping unavailable item in playlist {playlist_id}"),
            }
        }

        match page.next {
            Some(next) => page = fetch_page(Some(next.as_str()))?,
            None => return Ok(()),
        }
    }
}

/// Collect track URIs in playlist order, stopping once `limit` URIs are held
pub fn collect_track_uris<P>(
    playlist_id: &str,
    limit: Option<usize>,
    fetch_page: P,
) -> Result<Vec<TrackUri>, ClientError>
where
    P: FnMut(Option<&str>) -> Result<PlaylistTracksPage, ClientError>,
{
    let mut uris = Vec::new();
    if limit == Some(0) {
        return Ok(uris);
    }

    walk_playlist_pages(playlist_id, fetch_page, |track| {
        match track.uri {
            Some(uri) => uris.push(uri),
            None => warn!("Skipping track without URI in playlist {playlist_id}"),
        }
        limit.is_none_or(|limit| uris.len() < limit)
    })?;

    Ok(uris)
}

impl PlaylistService for SpotifyClient {
    fn current_user_id(&self) -> Result<String, ClientError> {
        let user: CurrentUser = decode(self.get(&self.url("me")).call()?)?;
        debug!(
            "Authenticated as {} ({})",
            user.id,
            user.display_name.as_deref().unwrap_or("no display name")
        );
        Ok(user.id)
    }

    fn playlist_track_uris(
        &self,
        playlist_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<TrackUri>, ClientError> {
        collect_track_uris(playlist_id, limit, |next| {
            self.fetch_playlist_page(playlist_id, URI_FIELDS, next)
        })
    }

    fn playlist_tracks(&self, playlist_id: &str) -> Result<Vec<Track>, ClientError> {
        let mut tracks = Vec::new();
        walk_playlist_pages(
            playlist_id,
            |next| self.fetch_playlist_page(playlist_id, TRACK_FIELDS, next),
            |track| {
                tracks.push(track);
                true
            },
        )?;
        Ok(tracks)
    }

    fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        public: bool,
    ) -> Result<String, ClientError> {
        let response = self
            .post(&self.url(&format!("users/{}/playlists", encode(user_id))))
            .send_json(CreatePlaylistRequest { name, public })?;
        let created: CreatedPlaylist = decode(response)?;
        Ok(created.id)
    }

    fn add_tracks(&self, playlist_id: &str, uris: &[TrackUri]) -> Result<String, ClientError> {
        let response = self
            .post(&self.url(&format!("playlists/{}/tracks", encode(playlist_id))))
            .send_json(AddTracksRequest { uris })?;
        let snapshot: SnapshotResponse = decode(response)?;
        Ok(snapshot.snapshot_id)
    }
}

/// Exchange a refresh token for a fresh access token
fn refresh_access_token(
    agent: &Agent,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<String, ClientError> {
    let basic = STANDARD.encode(format!("{client_id}:{client_secret}"));

    debug!("POST {SPOTIFY_TOKEN_URL}");
    let result = agent
        .post(SPOTIFY_TOKEN_URL)
        .set("Authorization", &format!("Basic {basic}"))
        .send_form(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
        ]);

    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(status, response)) => {
            let body = response.into_string().unwrap_or_default();
            return Err(auth_error(status, &body));
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ClientError::Transport(Box::new(transport)));
        }
    };

    let token: TokenResponse = decode(response)?;
    debug!("Access token obtained, expires in {}s", token.expires_in);
    Ok(token.access_token)
}

/// Build an auth error from a rejected token request
pub fn auth_error(status: u16, body: &str) -> ClientError {
    match serde_json::from_str::<AuthErrorResponse>(body) {
        Ok(parsed) => ClientError::Auth(match parsed.error_description {
            Some(description) => format!("{} ({description})", parsed.error),
            None => parsed.error,
        }),
        Err(_) => ClientError::Auth(format!("token endpoint returned {status}")),
    }
}

fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response.into_json().map_err(ClientError::Decode)
}
