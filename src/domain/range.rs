//! Expansion of free-text room lists into room identifiers.
//!
//! Users type room lists the way they appear on floor plans, for example
//! `"101-110, A1-A20, HS10B100-HS10B399, Lab"`. [`expand`] turns such a list
//! into the individual room identifiers and reports every token it could not
//! make sense of.

use std::fmt::Write as _;

use serde::Serialize;

/// Upper bound on the number of rooms a single token may expand to.
///
/// Tokens that would produce more rooms than this are skipped.
pub const MAX_EXPANSION: usize = 100_000;

/// Letters outside ASCII that may prefix a room number (Norwegian).
const EXTRA_LETTERS: [char; 6] = ['Æ', 'Ø', 'Å', 'æ', 'ø', 'å'];

/// The result of expanding a room list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Expansion {
    /// Room identifiers, in input order.
    pub rooms: Vec<String>,

    /// Tokens that could not be parsed, verbatim (trimmed).
    pub skipped: Vec<String>,
}

impl Expansion {
    /// Returns `true` if no rooms were produced.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}

/// Reasons a single token is rejected.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// The token is neither a room, a word nor a recognised range.
    #[error("unrecognised room pattern '{0}'")]
    Pattern(String),

    /// The letters of a simple alphanumeric range run backwards.
    #[error("letters in range '{0}' are not in alphabetical order")]
    ReversedLetters(String),

    /// The range would expand to more than [`MAX_EXPANSION`] rooms.
    #[error("range '{0}' expands to too many rooms")]
    TooLarge(String),
}

/// Expands a comma-separated room list.
///
/// Each token is handled on its own; a token that cannot be parsed is added
/// to [`Expansion::skipped`] and the remaining tokens are still processed.
///
/// # Examples
///
/// ```
/// let expansion = shot::domain::range::expand("101-103, A01-A02, Lab, foo bar");
///
/// assert_eq!(expansion.rooms, ["101", "102", "103", "A01", "A02", "Lab"]);
/// assert_eq!(expansion.skipped, ["foo bar"]);
/// ```
#[must_use]
pub fn expand(input: &str) -> Expansion {
    let mut expansion = Expansion::default();

    for token in input.split(',').map(str::trim) {
        if token.is_empty() {
            continue;
        }

        match expand_token(token) {
            Ok(rooms) => expansion.rooms.extend(rooms),
            Err(e) => {
                tracing::debug!("skipping room token: {e}");
                expansion.skipped.push(token.to_string());
            }
        }
    }

    expansion
}

/// Expands a single token (no commas) into room identifiers.
///
/// # Errors
///
/// Returns an error if the token matches none of the supported patterns.
pub fn expand_token(token: &str) -> Result<Vec<String>, Error> {
    if is_digits(token) {
        return Ok(vec![token.to_string()]);
    }

    if let Some((start, end)) = token.split_once('-') {
        if end.contains('-') {
            return Err(Error::Pattern(token.to_string()));
        }
        if is_digits(start) && is_digits(end) {
            return numeric_range(token, start, end);
        }
        if let (Some(start), Some(end)) = (LetterNumber::parse(start), LetterNumber::parse(end)) {
            return letter_range(token, &start, &end);
        }
        return pretext_range(token, start, end);
    }

    if token.split_whitespace().count() == 1 {
        return Ok(vec![token.to_string()]);
    }

    Err(Error::Pattern(token.to_string()))
}

/// `"N-M"`, inclusive. Empty when `M < N`.
fn numeric_range(token: &str, start: &str, end: &str) -> Result<Vec<String>, Error> {
    let start: u64 = start.parse().map_err(|_| Error::TooLarge(token.to_string()))?;
    let end: u64 = end.parse().map_err(|_| Error::TooLarge(token.to_string()))?;

    if end < start {
        return Ok(Vec::new());
    }
    check_size(token, end - start + 1)?;

    Ok((start..=end).map(|n| n.to_string()).collect())
}

/// One leading letter followed by digits, e.g. `A20`.
struct LetterNumber<'a> {
    letter: char,
    digits: &'a str,
}

impl<'a> LetterNumber<'a> {
    fn parse(s: &'a str) -> Option<Self> {
        let mut chars = s.chars();
        let letter = chars.next().filter(|c| c.is_alphabetic())?;
        let digits = chars.as_str();
        is_digits(digits).then_some(Self { letter, digits })
    }
}

/// `"A20-B20"`: walks the letters from start to end and emits every zero
/// padded number for each accepted letter.
fn letter_range(
    token: &str,
    start: &LetterNumber<'_>,
    end: &LetterNumber<'_>,
) -> Result<Vec<String>, Error> {
    if start.letter > end.letter {
        return Err(Error::ReversedLetters(token.to_string()));
    }

    let width = start.digits.len().max(end.digits.len());
    let too_large = || Error::TooLarge(token.to_string());
    let full: u64 = u32::try_from(width)
        .ok()
        .and_then(|w| 10u64.checked_pow(w))
        .ok_or_else(too_large)?
        - 1;
    let floor: u64 = start.digits.parse().map_err(|_| too_large())?;
    let ceiling: u64 = end.digits.parse().map_err(|_| too_large())?;

    let letters: Vec<char> = (start.letter..=end.letter)
        .filter(|&c| is_accepted_letter(c))
        .collect();

    let spans: Vec<(char, u64, u64)> = letters
        .iter()
        .map(|&letter| {
            let lo = if letter == start.letter { floor } else { 0 };
            let hi = if letter == end.letter { ceiling } else { full };
            (letter, lo, hi)
        })
        .collect();

    let total = spans
        .iter()
        .map(|&(_, lo, hi)| if hi < lo { 0 } else { hi - lo + 1 })
        .fold(0u64, u64::saturating_add);
    check_size(token, total)?;

    let mut rooms = Vec::new();
    for (letter, lo, hi) in spans {
        for n in lo..=hi {
            let mut room = String::with_capacity(width + letter.len_utf8());
            room.push(letter);
            let _ = write!(room, "{n:0width$}");
            rooms.push(room);
        }
    }
    Ok(rooms)
}

/// `"HS10B100-HS10B399"`: identical text before the trailing digits on both
/// sides. The end value is excluded.
fn pretext_range(token: &str, start: &str, end: &str) -> Result<Vec<String>, Error> {
    let (start_text, start_digits) = split_trailing_digits(start);
    let (end_text, end_digits) = split_trailing_digits(end);

    if start_text != end_text || start_digits.is_empty() || end_digits.is_empty() {
        return Err(Error::Pattern(token.to_string()));
    }

    let lo: u64 = start_digits
        .parse()
        .map_err(|_| Error::TooLarge(token.to_string()))?;
    let hi: u64 = end_digits
        .parse()
        .map_err(|_| Error::TooLarge(token.to_string()))?;

    if lo >= hi {
        return Err(Error::Pattern(token.to_string()));
    }
    check_size(token, hi - lo)?;

    let width = start_digits.len().max(end_digits.len());
    Ok((lo..hi)
        .map(|n| format!("{start_text}{n:0width$}"))
        .collect())
}

/// Splits `"HS10B399"` into `("HS10B", "399")`.
fn split_trailing_digits(s: &str) -> (&str, &str) {
    let text = s.trim_end_matches(|c: char| c.is_ascii_digit());
    s.split_at(text.len())
}

fn check_size(token: &str, count: u64) -> Result<(), Error> {
    match usize::try_from(count) {
        Ok(count) if count <= MAX_EXPANSION => Ok(()),
        _ => Err(Error::TooLarge(token.to_string())),
    }
}

fn is_accepted_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || EXTRA_LETTERS.contains(&c)
}

pub(crate) fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}
