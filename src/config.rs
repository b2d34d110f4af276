use anyhow::{Result, anyhow};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// How the client obtains its bearer token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Exchanged once for an access token when the client connects
    RefreshToken {
        client_id: String,
        client_secret: String,
        refresh_token: String,
    },
    /// A pre-issued access token, used as is
    AccessToken(String),
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub credentials: Credentials,
}

impl Config {
    /// Build a configuration from any key/value lookup.
    ///
    /// Refresh-token credentials win over `SPOTIFY_ACCESS_TOKEN` when both are set.
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let credentials = match (
            var("SPOTIFY_CLIENT_ID"),
            var("SPOTIFY_CLIENT_SECRET"),
            var("SPOTIFY_REFRESH_TOKEN"),
        ) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                Credentials::RefreshToken {
                    client_id,
                    client_secret,
                    refresh_token,
                }
            }
            _ => match var("SPOTIFY_ACCESS_TOKEN") {
                Some(token) => Credentials::AccessToken(token),
                None => {
                    return Err(anyhow!(
                        "No Spotify credentials found: set SPOTIFY_CLIENT_ID, SPOTIFY_CLIENT_SECRET \
                         and SPOTIFY_REFRESH_TOKEN, or SPOTIFY_ACCESS_TOKEN"
                    ));
                }
            },
        };

        let api_base_url = var("SPOTIFY_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());

        Ok(Config {
            api_base_url,
            credentials,
        })
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}
