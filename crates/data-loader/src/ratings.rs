//! Ratings file strategy.
//!
//! Logical columns are `userId, movieId, rating, timestamp`; the timestamp
//! is ignored. A header row is optional: when the first line is not
//! numeric it is treated as a header and columns are matched by name.

use crate::error::Result;
use crate::parser::{decode_utf8, delimiter_name, find_column, parse_integer, parse_number, split_fields};
use crate::strategy::ParseStrategy;
use crate::types::Rating;
use tracing::debug;

/// Where userId, movieId and rating live in each row
#[derive(Debug, Clone, Copy, PartialEq)]
struct RatingColumns {
    user: usize,
    movie: usize,
    rating: usize,
}

impl RatingColumns {
    const POSITIONAL: Self = Self {
        user: 0,
        movie: 1,
        rating: 2,
    };

    /// Match header names; any unknown name falls back to positional order.
    fn from_header(header: &[String]) -> Self {
        let user = find_column(header, &["userid", "user_id", "user"]);
        let movie = find_column(header, &["movieid", "movie_id", "item_id", "itemid"]);
        let rating = find_column(header, &["rating"]);

        match (user, movie, rating) {
            (Some(user), Some(movie), Some(rating)) => Self { user, movie, rating },
            _ => Self::POSITIONAL,
        }
    }

    fn width(&self) -> usize {
        self.user.max(self.movie).max(self.rating) + 1
    }
}

/// Delimited ratings table with a fixed separator.
pub struct DelimitedRatings {
    delimiter: char,
    name: String,
}

impl DelimitedRatings {
    pub fn new(delimiter: char) -> Self {
        Self {
            delimiter,
            name: format!("{}-separated ratings", delimiter_name(delimiter)),
        }
    }

    /// Pick the separator from the first line: tab, else comma, else pipe.
    pub fn detect(content: &str) -> char {
        let first_line = content.lines().next().unwrap_or_default();
        if first_line.contains('\t') {
            '\t'
        } else if first_line.contains(',') {
            ','
        } else {
            '|'
        }
    }
}

impl ParseStrategy<Rating> for DelimitedRatings {
    fn name(&self) -> &str {
        &self.name
    }

    fn parse(&self, _file: &str, content: &[u8]) -> Result<Vec<Rating>> {
        let text = decode_utf8(content);
        let mut columns = RatingColumns::POSITIONAL;
        let mut ratings = Vec::new();
        let mut dropped = 0usize;
        let mut first_row = true;

        for line in text.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let fields = split_fields(line, self.delimiter);

            if first_row {
                first_row = false;
                if is_header(&fields) {
                    columns = RatingColumns::from_header(&fields);
                    debug!("Ratings header found, columns: {:?}", columns);
                    continue;
                }
            }

            match parse_row(&fields, columns) {
                Some(rating) => ratings.push(rating),
                None => dropped += 1,
            }
        }

        debug!("{}: kept {} rows, dropped {}", self.name, ratings.len(), dropped);
        Ok(ratings)
    }
}

/// A row is a header when its first three cells are not all numeric.
fn is_header(fields: &[String]) -> bool {
    fields.len() < 3 || fields.iter().take(3).any(|f| parse_number(f).is_none())
}

fn parse_row(fields: &[String], columns: RatingColumns) -> Option<Rating> {
    if fields.len() < columns.width() {
        return None;
    }
    Some(Rating {
        user_id: parse_integer(&fields[columns.user])?,
        movie_id: parse_integer(&fields[columns.movie])?,
        rating: parse_number(&fields[columns.rating])?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_separator() {
        assert_eq!(DelimitedRatings::detect("1\t2\t3\t4\n"), '\t');
        assert_eq!(DelimitedRatings::detect("userId,movieId,rating,timestamp\n"), ',');
        assert_eq!(DelimitedRatings::detect("1|2|3|4\n"), '|');
        assert_eq!(DelimitedRatings::detect(""), '|');
    }

    #[test]
    fn test_headerless_tab_file_keeps_first_row() {
        let content = "196\t242\t3\t881250949\n186\t302\t3\t891717742\n";
        let ratings = DelimitedRatings::new('\t').parse("ratings.csv", content.as_bytes()).unwrap();

        assert_eq!(ratings.len(), 2);
        assert_eq!(
            ratings[0],
            Rating {
                user_id: 196,
                movie_id: 242,
                rating: 3.0
            }
        );
    }

    #[test]
    fn test_named_header_maps_columns() {
        let content = "item_id,rating,user_id,timestamp\n50,4.5,7,0\n";
        let ratings = DelimitedRatings::new(',').parse("ratings.csv", content.as_bytes()).unwrap();

        assert_eq!(ratings.len(), 1);
        assert_eq!(ratings[0].user_id, 7);
        assert_eq!(ratings[0].movie_id, 50);
        assert_eq!(ratings[0].rating, 4.5);
    }

    #[test]
    fn test_unrecognised_header_is_positional() {
        let content = "a|b|c|d\n1|2|4|0\n";
        let ratings = DelimitedRatings::new('|').parse("ratings.csv", content.as_bytes()).unwrap();

        assert_eq!(ratings[0].user_id, 1);
        assert_eq!(ratings[0].movie_id, 2);
    }

    #[test]
    fn test_non_numeric_rows_are_dropped() {
        let content = "userId,movieId,rating,timestamp\n\
                       1,10,4.0,0\n\
                       x,10,4.0,0\n\
                       2,y,4.0,0\n\
                       3,10,NaN,0\n\
                       4,10\n\
                       5,11,2.5,0\n";
        let ratings = DelimitedRatings::new(',').parse("ratings.csv", content.as_bytes()).unwrap();

        let users: Vec<_> = ratings.iter().map(|r| r.user_id).collect();
        assert_eq!(users, vec![1, 5]);
    }

    #[test]
    fn test_fractional_rating_is_not_narrowed() {
        let content = "1,10,1.045,0\n";
        let ratings = DelimitedRatings::new(',').parse("ratings.csv", content.as_bytes()).unwrap();

        assert_eq!(ratings[0].rating, 1.045);
    }

    #[test]
    fn test_wrong_separator_yields_nothing() {
        let content = "1,10,4.0,0\n2,10,3.0,0\n";
        let ratings = DelimitedRatings::new('\t').parse("ratings.csv", content.as_bytes()).unwrap();
        assert!(ratings.is_empty());
    }
}
