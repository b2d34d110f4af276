use crate::config::{Config, Credentials, DEFAULT_API_BASE_URL};
use std::collections::HashMap;

#[cfg(test)]
mod tests {
    use super::*;

    fn load(vars: &[(&str, &str)]) -> anyhow::Result<Config> {
        let env: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_refresh_token_credentials() {
        let config = load(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SPOTIFY_REFRESH_TOKEN", "refresh"),
        ])
        .unwrap();

        assert_eq!(
            config.credentials,
            Credentials::RefreshToken {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                refresh_token: "refresh".to_string(),
            }
        );
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
    }

    #[test]
    fn test_refresh_token_wins_over_access_token() {
        let config = load(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_CLIENT_SECRET", "secret"),
            ("SPOTIFY_REFRESH_TOKEN", "refresh"),
            ("SPOTIFY_ACCESS_TOKEN", "token"),
        ])
        .unwrap();

        assert!(matches!(config.credentials, Credentials::RefreshToken { .. }));
    }

    #[test]
    fn test_access_token_used_when_refresh_set_is_incomplete() {
        let config = load(&[
            ("SPOTIFY_CLIENT_ID", "id"),
            ("SPOTIFY_ACCESS_TOKEN", "token"),
        ])
        .unwrap();

        assert_eq!(
            config.credentials,
            Credentials::AccessToken("token".to_string())
        );
    }

    #[test]
    fn test_missing_credentials_is_an_error() {
        assert!(load(&[]).is_err());
        // Blank values count as unset
        assert!(load(&[("SPOTIFY_ACCESS_TOKEN", "  ")]).is_err());
    }

    #[test]
    fn test_custom_base_url_drops_trailing_slash() {
        let config = load(&[
            ("SPOTIFY_ACCESS_TOKEN", "token"),
            ("SPOTIFY_API_BASE_URL", "http://localhost:8080/v1/"),
        ])
        .unwrap();

        assert_eq!(config.api_base_url, "http://localhost:8080/v1");
    }
}
