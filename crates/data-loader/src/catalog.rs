//! Catalog file strategies.
//!
//! Primary layout (Latin-1, pipe-separated, header row):
//! `movie_id|movie_title|release_date|video_release_date|IMDb_URL|unknown|Action|...|Western`
//! where the last 19 columns are `0`/`1` genre flags.
//!
//! Fallback layout (UTF-8, comma-separated, header row):
//! `movieId,title,genres` with genres as a `|` list.

use crate::error::{DataLoadError, Result};
use crate::parser::{decode_latin1, decode_utf8, delimiter_name, find_column, parse_movie_id, parse_number, split_fields};
use crate::strategy::ParseStrategy;
use crate::types::Movie;
use tracing::debug;

/// Genre flag columns, in file order. Underscores become hyphens in tokens.
pub const GENRE_COLUMNS: [&str; 19] = [
    "unknown",
    "Action",
    "Adventure",
    "Animation",
    "Childrens",
    "Comedy",
    "Crime",
    "Documentary",
    "Drama",
    "Fantasy",
    "Film_Noir",
    "Horror",
    "Musical",
    "Mystery",
    "Romance",
    "Sci_Fi",
    "Thriller",
    "War",
    "Western",
];

/// id, title, release date, video release date, IMDb URL
const LEADING_COLUMNS: usize = 5;

/// Rows with fewer fields than this are rejected by the flag layout
pub const MIN_CATALOG_COLUMNS: usize = LEADING_COLUMNS + GENRE_COLUMNS.len();

/// Pipe-separated catalog with binary genre flag columns.
///
/// The header row needs no special handling: its id cell is not numeric,
/// so it is dropped like any other row whose id fails to parse.
pub struct PipeFlaggedCatalog;

impl ParseStrategy<Movie> for PipeFlaggedCatalog {
    fn name(&self) -> &str {
        "pipe-separated genre flags"
    }

    fn parse(&self, _file: &str, content: &[u8]) -> Result<Vec<Movie>> {
        let text = decode_latin1(content);
        let mut movies = Vec::new();
        let mut short_rows = 0usize;
        let mut bad_ids = 0usize;

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }

            let fields = split_fields(line, '|');
            if fields.len() < MIN_CATALOG_COLUMNS {
                short_rows += 1;
                continue;
            }

            let Some(id) = parse_movie_id(&fields[0]) else {
                bad_ids += 1;
                continue;
            };

            let genres = GENRE_COLUMNS
                .iter()
                .zip(&fields[LEADING_COLUMNS..MIN_CATALOG_COLUMNS])
                .filter(|(_, flag)| is_flag_set(flag))
                .map(|(column, _)| column.replace('_', "-"))
                .collect();

            movies.push(Movie {
                id,
                title: fields[1].trim().to_string(),
                genres,
            });
        }

        debug!(
            "Flag layout: kept {} rows, dropped {} short rows and {} rows with a bad id",
            movies.len(),
            short_rows,
            bad_ids
        );
        Ok(movies)
    }
}

fn is_flag_set(flag: &str) -> bool {
    parse_number(flag) == Some(1.0)
}

/// Delimited catalog with a named header (`movieId`, `title`, `genres`).
pub struct DelimitedCatalog {
    delimiter: char,
    name: String,
}

impl DelimitedCatalog {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            name: format!("{}-separated named columns", delimiter_name(delimiter)),
        }
    }
}

impl ParseStrategy<Movie> for DelimitedCatalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, file: &str, content: &[u8]) -> Result<Vec<Movie>> {
        let text = decode_utf8(content);
        let mut lines = text
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty());

        let Some((header_idx, header_line)) = lines.next() else {
            return Ok(Vec::new());
        };
        let header = split_fields(header_line, self.delimiter);
        let missing = |column: &str| DataLoadError::ParseError {
            file: file.to_string(),
            line: header_idx + 1,
            reason: format!("header has no {} column", column),
        };

        let id_col = find_column(&header, &["movieid", "movie_id", "item_id", "itemid", "id"])
            .ok_or_else(|| missing("movie id"))?;
        let title_col = find_column(&header, &["title", "movie_title"]).ok_or_else(|| missing("title"))?;
        let genres_col = find_column(&header, &["genres", "genre"]);

        let mut movies = Vec::new();
        for (_, line) in lines {
            let fields = split_fields(line, self.delimiter);

            let Some(id) = fields.get(id_col).and_then(|f| parse_movie_id(f)) else {
                continue;
            };
            let Some(title) = fields.get(title_col) else {
                continue;
            };
            let genres = genres_col
                .and_then(|col| fields.get(col))
                .map(|g| parse_genre_list(g))
                .unwrap_or_default();

            movies.push(Movie {
                id,
                title: title.trim().to_string(),
                genres,
            });
        }
        Ok(movies)
    }
}

/// Split a `|` genre list, dropping empty tokens.
///
/// Example: `"Adventure|Animation|"` -> `["Adventure", "Animation"]`
fn parse_genre_list(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty())
        .map(str::to_string)
        .collect()
}
