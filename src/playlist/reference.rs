use regex::Regex;
use thiserror::Error;

/// Bare id, `spotify:playlist:<id>` URI, or open.spotify.com link (optionally localised)
const PLAYLIST_REF_PATTERN: &str = r"^(?:spotify:playlist:([A-Za-z0-9]+)|https?://open\.spotify\.com/(?:intl-[a-z-]+/)?playlist/([A-Za-z0-9]+)/?(?:[?#].*)?|([A-Za-z0-9]+))$";

#[derive(Debug, Error, PartialEq)]
pub enum ReferenceError {
    #[error("Not a playlist id, URI or URL: '{0}'")]
    InvalidPlaylistRef(String),
    #[error("Failed to build playlist reference pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Extract a playlist id from a bare id, a `spotify:playlist:` URI or an
/// open.spotify.com URL
pub fn parse_playlist_id(input: &str) -> Result<String, ReferenceError> {
    let re = Regex::new(PLAYLIST_REF_PATTERN)?;

    re.captures(input.trim())
        .and_then(|captures| (1..=3).find_map(|group| captures.get(group)))
        .map(|id| id.as_str().to_string())
        .ok_or_else(|| ReferenceError::InvalidPlaylistRef(input.to_string()))
}
