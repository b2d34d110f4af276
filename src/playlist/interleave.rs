use thiserror::Error;

/// Which input sequence a limit belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    First,
    Second,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::First => write!(f, "first"),
            Source::Second => write!(f, "second"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MergeError {
    #[error("Invalid limit for {which} playlist: {value} (limits must be non-negative)")]
    InvalidLimit { which: Source, value: i64 },
}

/// Turn an optional signed limit into an optional length cap
pub fn validate_limit(limit: Option<i64>, which: Source) -> Result<Option<usize>, MergeError> {
    match limit {
        None => Ok(None),
        Some(value) => usize::try_from(value)
            .map(Some)
            .map_err(|_| MergeError::InvalidLimit { which, value }),
    }
}

/// Interleave two sequences: `first` forward, `second` in reverse.
///
/// Each sequence is cut to its leading `limit` elements before anything else,
/// so the reversal applies to the kept prefix of `second`. Elements are then
/// taken pairwise by position and the longer tail is appended as is.
/// Duplicates are kept.
pub fn interleave<T: Clone>(
    first: &[T],
    second: &[T],
    first_limit: Option<i64>,
    second_limit: Option<i64>,
) -> Result<Vec<T>, MergeError> {
    let first_cap = validate_limit(first_limit, Source::First)?;
    let second_cap = validate_limit(second_limit, Source::Second)?;

    let first = &first[..first_cap.map_or(first.len(), |cap| cap.min(first.len()))];
    let second = &second[..second_cap.map_or(second.len(), |cap| cap.min(second.len()))];

    let mut merged = Vec::with_capacity(first.len() + second.len());
    let mut forward = first.iter();
    let mut backward = second.iter().rev();

    loop {
        match (forward.next(), backward.next()) {
            (None, None) => break,
            (a, b) => {
                merged.extend(a.cloned());
                merged.extend(b.cloned());
            }
        }
    }

    Ok(merged)
}
