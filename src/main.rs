use anyhow::Result;
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use tracing::info;

mod client;
mod config;
mod models;
mod playlist;

#[cfg(test)]
mod config_tests;

use crate::client::SpotifyClient;
use crate::config::load_config;
use crate::playlist::{
    MergeRequest, PlaylistService, display_lines, merge_playlists, parse_playlist_id,
};

const DEFAULT_PER_SOURCE_LIMIT: i64 = 100;

#[derive(Parser)]
#[command(name = "playlist-tricks")]
#[command(about = "Small convenience tools for managing Spotify playlists.")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Merge two playlists into a new one with an interleaving pattern.
    Merge(MergeArgs),
    /// Print track titles and first artist for a playlist.
    Titles(TitlesArgs),
}

#[derive(Args)]
struct MergeArgs {
    /// Source playlist 1 (id, URI or URL), taken in order
    #[arg(long)]
    src1: String,

    /// Source playlist 2 (id, URI or URL), taken in reverse order
    #[arg(long)]
    src2: String,

    /// Name of the new playlist. If omitted, a default based on the current date is used.
    #[arg(long)]
    name: Option<String>,

    /// Max number of tracks to take from each source playlist
    #[arg(long, default_value_t = DEFAULT_PER_SOURCE_LIMIT, allow_negative_numbers = true)]
    per_src_limit: i64,

    /// Max number of tracks from playlist 1, overrides --per-src-limit
    #[arg(long, allow_negative_numbers = true)]
    src1_limit: Option<i64>,

    /// Max number of tracks from playlist 2, overrides --per-src-limit
    #[arg(long, allow_negative_numbers = true)]
    src2_limit: Option<i64>,

    /// Take every track from both playlists unless a per-source limit is given
    #[arg(long, conflicts_with = "per_src_limit")]
    no_limit: bool,

    /// Print the merged track list instead of creating the playlist
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

#[derive(Args)]
struct TitlesArgs {
    /// Playlist (id, URI or URL) to print titles from
    #[arg(long)]
    playlist: String,
}

impl MergeArgs {
    fn limits(&self) -> (Option<i64>, Option<i64>) {
        let shared = (!self.no_limit).then_some(self.per_src_limit);
        (self.src1_limit.or(shared), self.src2_limit.or(shared))
    }

    fn into_request(self) -> Result<MergeRequest> {
        let (first_limit, second_limit) = self.limits();
        Ok(MergeRequest {
            first_playlist: parse_playlist_id(&self.src1)?,
            second_playlist: parse_playlist_id(&self.src2)?,
            name: self.name.unwrap_or_else(default_playlist_name),
            first_limit,
            second_limit,
            dry_run: self.debug,
        })
    }
}

fn default_playlist_name() -> String {
    format!("Mixed playlist {}", Local::now().format("%Y-%m-%d"))
}

fn main() -> Result<()> {
    // Diagnostics go to stderr so command output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Merge(args) => {
            // Parse arguments before authenticating so bad input fails fast
            let request = args.into_request()?;
            let client = connect()?;
            run_merge(&client, &request)
        }
        Command::Titles(args) => {
            let playlist_id = parse_playlist_id(&args.playlist)?;
            let client = connect()?;
            run_titles(&client, &playlist_id)
        }
    }
}

fn connect() -> Result<SpotifyClient> {
    let config = load_config()?;
    info!("Connecting to {}", config.api_base_url);
    Ok(SpotifyClient::connect(config)?)
}

fn run_merge<S: PlaylistService>(service: &S, request: &MergeRequest) -> Result<()> {
    let outcome = merge_playlists(service, request)?;

    match outcome.playlist_id {
        Some(playlist_id) => {
            info!("Playlist ID: {playlist_id}");
            println!(
                "created playlist '{}' with {} tracks.",
                request.name,
                outcome.tracks.len()
            );
        }
        None => {
            println!(
                "DEBUG MODE: playlist '{}' would contain {} tracks:",
                request.name,
                outcome.tracks.len()
            );
            for (i, uri) in outcome.tracks.iter().enumerate() {
                println!("  {}. {uri}", i + 1);
            }
        }
    }

    Ok(())
}

fn run_titles<S: PlaylistService>(service: &S, playlist_id: &str) -> Result<()> {
    let tracks = service.playlist_tracks(playlist_id)?;
    for line in display_lines(&tracks) {
        println!("{line}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["playlist-tricks"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn merge_args(args: &[&str]) -> MergeArgs {
        match parse(args).command {
            Command::Merge(merge) => merge,
            Command::Titles(_) => panic!("expected merge subcommand"),
        }
    }

    #[test]
    fn test_default_limits_apply_to_both_sources() {
        let args = merge_args(&["merge", "--src1", "a", "--src2", "b"]);
        assert_eq!(args.limits(), (Some(100), Some(100)));
    }

    #[test]
    fn test_per_source_limits_override_shared_limit() {
        let args = merge_args(&[
            "merge", "--src1", "a", "--src2", "b", "--per-src-limit", "20", "--src2-limit", "5",
        ]);
        assert_eq!(args.limits(), (Some(20), Some(5)));
    }

    #[test]
    fn test_no_limit_removes_shared_limit() {
        let args = merge_args(&["merge", "--src1", "a", "--src2", "b", "--no-limit"]);
        assert_eq!(args.limits(), (None, None));

        let args = merge_args(&[
            "merge", "--src1", "a", "--src2", "b", "--no-limit", "--src1-limit", "3",
        ]);
        assert_eq!(args.limits(), (Some(3), None));
    }

    #[test]
    fn test_negative_limit_is_parsed_and_rejected_by_merge() {
        let args = merge_args(&["merge", "--src1", "a", "--src2", "b", "--src1-limit", "-1"]);
        let request = args.into_request().unwrap();
        assert_eq!(request.first_limit, Some(-1));

        let service = crate::playlist::MockPlaylistService::new();
        let err = run_merge(&service, &request).unwrap_err();
        assert!(err.to_string().contains("Invalid limit"));
    }

    #[test]
    fn test_request_uses_default_name_and_parsed_ids() {
        let args = merge_args(&[
            "merge",
            "--src1",
            "spotify:playlist:abc123",
            "--src2",
            "https://open.spotify.com/playlist/def456?si=xyz",
        ]);
        let request = args.into_request().unwrap();
        assert_eq!(request.first_playlist, "abc123");
        assert_eq!(request.second_playlist, "def456");
        assert!(request.name.starts_with("Mixed playlist "));
        assert!(!request.dry_run);
    }

    #[test]
    fn test_titles_requires_playlist() {
        assert!(Cli::try_parse_from(["playlist-tricks", "titles"]).is_err());
    }
}
