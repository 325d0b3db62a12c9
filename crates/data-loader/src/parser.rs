//! Parser entry points and shared text helpers.
//!
//! This module handles reading the two input files:
//! - catalog: pipe-separated with 19 binary genre flag columns
//!   (falls back to a comma-separated file with a named header)
//! - ratings: userId, movieId, rating, timestamp with the separator
//!   detected from the first line (falls back to comma)
//!
//! The per-format logic lives in the `catalog` and `ratings` modules as
//! [`ParseStrategy`](crate::strategy::ParseStrategy) implementations.

use crate::catalog::{DelimitedCatalog, PipeFlaggedCatalog};
use crate::error::{DataLoadError, Result};
use crate::ratings::DelimitedRatings;
use crate::strategy::StrategyChain;
use crate::types::{Movie, MovieId, Rating};
use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;
use tracing::info;

/// Read a whole file into memory.
///
/// A missing file maps to [`DataLoadError::FileNotFound`] so the startup
/// error names the path instead of a bare OS message.
pub(crate) fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    let mut file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => DataLoadError::FileNotFound {
            path: path.display().to_string(),
        },
        _ => DataLoadError::IoError(e),
    })?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Decode ISO-8859-1 (Latin-1) bytes.
///
/// Each byte maps directly to the Unicode code point of the same value,
/// so this never fails.
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode UTF-8 bytes, replacing invalid sequences and dropping a BOM.
pub(crate) fn decode_utf8(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&*text).to_string()
}

/// Split one line into fields.
///
/// A field that starts with `"` is quoted: the delimiter is literal inside
/// it and `""` stands for a single quote. Quotes anywhere else are kept.
pub(crate) fn split_fields(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut chars = line.chars().peekable();
    let mut in_quotes = false;
    let mut at_field_start = true;

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
            continue;
        }

        if c == delimiter {
            fields.push(std::mem::take(&mut current));
            at_field_start = true;
            continue;
        }

        if c == '"' && at_field_start {
            in_quotes = true;
        } else {
            current.push(c);
        }
        at_field_start = false;
    }
    fields.push(current);
    fields
}

/// Parse a finite number, tolerating surrounding whitespace.
///
/// `"NaN"` and `"inf"` parse as floats in Rust but are not usable values.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a non-negative integer; integral floats such as `"7.0"` are accepted.
pub(crate) fn parse_integer(s: &str) -> Option<u32> {
    let s = s.trim();
    if let Ok(v) = s.parse::<u32>() {
        return Some(v);
    }
    parse_number(s)
        .filter(|v| v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64)
        .map(|v| v as u32)
}

/// Parse a catalog movie id (a positive integer).
pub(crate) fn parse_movie_id(s: &str) -> Option<MovieId> {
    parse_integer(s).filter(|&id| id > 0)
}

/// Normalize a header cell for name matching: trimmed, unquoted, lowercase.
pub(crate) fn normalize_header(s: &str) -> String {
    s.trim().trim_matches('"').trim().to_lowercase()
}

/// Position of the first header cell matching any of `names`.
pub(crate) fn find_column(header: &[String], names: &[&str]) -> Option<usize> {
    header
        .iter()
        .position(|cell| names.contains(&normalize_header(cell).as_str()))
}

/// Human-readable name of a field separator (for logs and strategy names).
pub(crate) fn delimiter_name(delimiter: char) -> &'static str {
    match delimiter {
        '\t' => "tab",
        ',' => "comma",
        '|' => "pipe",
        _ => "custom",
    }
}

fn file_label(path: &Path) -> String {
    path.display().to_string()
}

/// Parse the catalog file.
///
/// Tries the pipe-separated genre-flag layout first, then a
/// comma-separated file with `movieId,title,genres` style headers.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let bytes = read_bytes(path)?;
    let movies = StrategyChain::new(file_label(path))
        .add_strategy(PipeFlaggedCatalog)
        .add_strategy(DelimitedCatalog::new(','))
        .run(&bytes)?;

    info!("Parsed {} movies from {}", movies.len(), path.display());
    Ok(movies)
}

/// Parse the ratings file.
///
/// The separator is detected from the first line (tab, else comma, else
/// pipe); if that yields nothing, comma is tried as a fallback.
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let bytes = read_bytes(path)?;
    let detected = DelimitedRatings::detect(&decode_utf8(&bytes));
    info!(
        "Detected {} separator in {}",
        delimiter_name(detected),
        path.display()
    );

    let mut chain = StrategyChain::new(file_label(path)).add_strategy(DelimitedRatings::new(detected));
    if detected != ',' {
        chain = chain.add_strategy(DelimitedRatings::new(','));
    }
    let ratings = chain.run(&bytes)?;

    info!("Parsed {} ratings from {}", ratings.len(), path.display());
    Ok(ratings)
}
