//! Human-readable room lists as stored in the settings file.
//!
//! Rooms are written as comma-separated numbers and inclusive ranges, e.g.
//! `"23, 200, 304, 333, 400-600"`, so the file stays easy to edit by hand.
//!
//! Only numeric rooms can be written as ranges or read back. Other room
//! identifiers (e.g. `A04`) are written verbatim after the numeric rooms,
//! but [`expand_integers`] ignores them.

use std::collections::{BTreeSet, HashSet};

use crate::domain::range::{MAX_EXPANSION, is_digits};

/// Packs room tokens into a human-readable list of numbers and ranges.
///
/// Numeric tokens are deduplicated, sorted, and contiguous runs written as
/// `start-end`. Non-numeric tokens are appended verbatim in first-seen order.
#[must_use]
pub fn compress<'a, I>(tokens: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut numbers = BTreeSet::new();
    let mut verbatim: Vec<&str> = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens.into_iter().map(str::trim) {
        if token.is_empty() {
            continue;
        }
        match token.parse::<u64>() {
            Ok(n) if is_digits(token) => {
                numbers.insert(n);
            }
            _ => {
                if seen.insert(token) {
                    tracing::warn!("room '{token}' is not numeric and will not be read back");
                    verbatim.push(token);
                }
            }
        }
    }

    let mut parts = Vec::new();
    let mut run: Option<(u64, u64)> = None;
    for n in numbers {
        run = match run {
            Some((start, end)) if end.checked_add(1) == Some(n) => Some((start, n)),
            Some(finished) => {
                parts.push(format_run(finished));
                Some((n, n))
            }
            None => Some((n, n)),
        };
    }
    parts.extend(run.map(format_run));
    parts.extend(verbatim.into_iter().map(ToString::to_string));

    parts.join(", ")
}

fn format_run((start, end): (u64, u64)) -> String {
    if start == end {
        start.to_string()
    } else {
        format!("{start}-{end}")
    }
}

/// Unpacks a stored room list into room tokens.
///
/// Each comma-separated piece must be a number or an inclusive `start-end`
/// range of numbers; anything else is skipped.
#[must_use]
pub fn expand_integers(value: &str) -> Vec<String> {
    let mut rooms = Vec::new();

    for piece in value.split(',').map(str::trim) {
        if piece.is_empty() {
            continue;
        }
        if is_digits(piece) {
            rooms.push(piece.to_string());
        } else if piece.contains('-') {
            match integer_range(piece) {
                Some(range) => rooms.extend(range.map(|n| n.to_string())),
                None => tracing::debug!("skipping malformed room range '{piece}'"),
            }
        } else {
            tracing::debug!("skipping room '{piece}'");
        }
    }

    rooms
}

fn integer_range(piece: &str) -> Option<std::ops::RangeInclusive<u64>> {
    let (start, end) = piece.split_once('-')?;
    if end.contains('-') {
        return None;
    }
    let start: u64 = start.trim().parse().ok()?;
    let end: u64 = end.trim().parse().ok()?;

    let count = end.checked_sub(start).map_or(0, |d| d.saturating_add(1));
    if usize::try_from(count).map_or(true, |count| count > MAX_EXPANSION) {
        return None;
    }
    Some(start..=end)
}
