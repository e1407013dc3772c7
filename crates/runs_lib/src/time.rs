//! This module contains various utilities related to the times of the runs.
//!
//! Runners type times by hand, so the grammar accepted by [`parse_time`] is wider
//! than the canonical `M:SS.mmm` shape produced by [`format_time`]: colon forms,
//! unit-suffix forms like `1m30s`, and plain second counts all parse. In-game
//! times additionally pass through [`normalize_glyphs`], because the star timer
//! community writes them with minute and second marks, like `1'23"45`.

use nom::{
    Parser as _,
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::multispace0,
    combinator::{all_consuming, map, map_res},
    multi::many1,
    sequence::{preceded, terminated},
};

use crate::error::{RunsError, RunsResult};

/// Represents a run time, in milliseconds.
///
/// This type is used to format a time as text. Use [`parse_time`] for the other
/// direction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Time(pub i64);

impl std::fmt::Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&format_time(self.0))
    }
}

/// Parses a handwritten time into milliseconds.
///
/// Three shapes are accepted, tried in this order:
///
/// * colon form: `[[H:]M:]S` read right to left, where the seconds component
///   may carry a fraction, as in `1:23.45`;
/// * unit-suffix form: terms like `1h30m`, `90s`, `100ms`, in any order and
///   optionally separated by spaces; only a seconds term may carry a fraction,
///   as in `1.5s`;
/// * plain number form: the whole input parses as a second count, as in `83.45`.
///
/// Commas work as decimal separators: `1:23,45` reads as `1:23.45`. Anything
/// else, including an empty string, negative or non-finite values, and inputs
/// with junk around an otherwise valid time, is an
/// [`InvalidTimeFormat`](RunsError::InvalidTimeFormat) error. A bad time is
/// never coerced to zero.
pub fn parse_time(input: &str) -> RunsResult<i64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(RunsError::InvalidTimeFormat(trimmed.to_owned()));
    }
    let normalized = trimmed.replace(',', ".");

    let total = if normalized.contains(':') {
        parse_colon_form(&normalized)
    } else {
        parse_unit_form(&normalized).or_else(|| parse_plain_seconds(&normalized))
    };

    match total {
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(ms.round() as i64),
        _ => Err(RunsError::InvalidTimeFormat(trimmed.to_owned())),
    }
}

/// Rewrites the timer marks used by the star community into the plain grammar.
///
/// Minute marks (`'` and its typographic variants) become `:`, second marks (`"`
/// and its variants) become `.`, so `1'23"45` reads as `1:23.45`. Everything else
/// passes through untouched.
pub fn normalize_glyphs(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '\'' | '\u{2018}' | '\u{2019}' | '\u{2032}' => ':',
            '"' | '\u{201C}' | '\u{201D}' | '\u{2033}' => '.',
            c => c,
        })
        .collect()
}

/// Parses an in-game time, accepting the star timer marks on top of the plain
/// grammar of [`parse_time`].
///
/// The error carries the text as typed, not the rewritten form.
pub fn parse_igt(input: &str) -> RunsResult<i64> {
    parse_time(&normalize_glyphs(input))
        .map_err(|_| RunsError::InvalidTimeFormat(input.trim().to_owned()))
}

/// Formats a millisecond count as `M:SS.mmm`, or `H:MM:SS.mmm` from one hour up.
///
/// Negative inputs format as `Invalid Time`; the archive never contains them, but
/// a display layer should not panic on one either.
pub fn format_time(ms: i64) -> String {
    if ms < 0 {
        return "Invalid Time".to_owned();
    }

    let hours = ms / 3_600_000;
    let minutes = ms % 3_600_000 / 60_000;
    let seconds = ms % 60_000 / 1000;
    let millis = ms % 1000;

    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}.{millis:03}")
    } else {
        format!("{minutes}:{seconds:02}.{millis:03}")
    }
}

/// Formats the gap between two times in the spoken style of the community,
/// with centisecond precision: `03"50` under a minute, `1'23"45` above.
///
/// The sign of the gap is ignored; callers say in prose which run was faster.
pub fn format_time_delta(old_ms: i64, new_ms: i64) -> String {
    let diff = (old_ms - new_ms).abs();
    // Round to centiseconds first so 999 ms carries up instead of truncating.
    let centis = (diff + 5) / 10;

    let minutes = centis / 6000;
    let seconds = centis / 100 % 60;
    let rest = centis % 100;

    if minutes > 0 {
        format!("{minutes}'{seconds:02}\"{rest:02}")
    } else {
        format!("{seconds:02}\"{rest:02}")
    }
}

// --------
// --- Parsing internals
// --------

/// A component made of digits only, like the minute and hour parts of a colon
/// form.
fn parse_whole_component(raw: &str) -> Option<u64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// A component made of digits and at most one dot. Rejects signs, exponents and
/// `nan`/`inf` spellings that `f64::from_str` would otherwise accept.
fn parse_seconds_component(raw: &str) -> Option<f64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return None;
    }
    raw.parse().ok()
}

fn parse_colon_form(input: &str) -> Option<f64> {
    let mut parts = input.rsplit(':');

    let mut total = parse_seconds_component(parts.next()?)? * 1000.0;
    if let Some(minutes) = parts.next() {
        total += parse_whole_component(minutes)? as f64 * 60_000.0;
    }
    if let Some(hours) = parts.next() {
        total += parse_whole_component(hours)? as f64 * 3_600_000.0;
    }

    match parts.next() {
        Some(_) => None,
        None => Some(total),
    }
}

fn decimal_number(input: &str) -> nom::IResult<&str, f64> {
    map_res(
        take_while1(|c: char| c.is_ascii_digit() || c == '.'),
        |raw: &str| raw.parse::<f64>(),
    )
    .parse(input)
}

fn integer_number(input: &str) -> nom::IResult<&str, f64> {
    map_res(take_while1(|c: char| c.is_ascii_digit()), |raw: &str| {
        raw.parse::<f64>()
    })
    .parse(input)
}

fn unit_term(input: &str) -> nom::IResult<&str, f64> {
    alt((
        // Only a seconds term may carry a fraction.
        map((decimal_number, tag("s")), |(value, _)| value * 1000.0),
        map(
            // "ms" must come before "m" or every millisecond term parses as minutes.
            (integer_number, alt((tag("ms"), tag("h"), tag("m")))),
            |(value, unit)| match unit {
                "ms" => value,
                "h" => value * 3_600_000.0,
                _ => value * 60_000.0,
            },
        ),
    ))
    .parse(input)
}

fn parse_unit_form(input: &str) -> Option<f64> {
    let (_, terms) = all_consuming(terminated(
        many1(preceded(multispace0, unit_term)),
        multispace0,
    ))
    .parse(input)
    .ok()?;
    Some(terms.into_iter().sum())
}

fn parse_plain_seconds(input: &str) -> Option<f64> {
    parse_seconds_component(input).map(|seconds| seconds * 1000.0)
}
