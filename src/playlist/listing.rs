use crate::models::Track;

/// Format a single track as `"<title> — <first artist>"`
pub fn display_line(track: &Track) -> String {
    format!("{} — {}", track.name, track.first_artist().unwrap_or_default())
}

/// Lazily map tracks to display lines, keeping their order
pub fn display_lines<'a, I>(tracks: I) -> impl Iterator<Item = String> + 'a
where
    I: IntoIterator<Item = &'a Track>,
    I::IntoIter: 'a,
{
    tracks.into_iter().map(display_line)
}
