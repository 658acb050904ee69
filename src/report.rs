use rusqlite::Connection;
use serde::Serialize;
use std::fmt::Write as _;

use crate::error::{Error, Result};

/// Number of genres shown by default
pub const TOP_GENRES_LIMIT: usize = 10;

/// Header line of the text report
pub fn report_header(limit: usize) -> String {
    format!("Top {} Highest Rated Genres:", limit)
}

const TOP_GENRES_SQL: &str = "SELECT g.genre, AVG(m.rating) AS avg_rating
     FROM movies m
     JOIN genres g ON m.id = g.movie_id
     GROUP BY g.genre
     ORDER BY avg_rating DESC, g.genre ASC
     LIMIT ?1";

/// Average movie rating for one genre
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenreRating {
    pub genre: String,
    pub avg_rating: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// Highest average-rated genres, best first
pub fn top_genres(conn: &Connection, limit: usize) -> Result<Vec<GenreRating>> {
    let mut stmt = conn.prepare(TOP_GENRES_SQL).map_err(Error::Query)?;

    let limit = i64::try_from(limit).unwrap_or(i64::MAX);

    let rows = stmt
        .query_map([limit], |row| {
            Ok(GenreRating {
                genre: row.get(0)?,
                avg_rating: row.get(1)?,
            })
        })
        .map_err(Error::Query)?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::Query)
}

/// Render the report as printed on stdout. `limit` is the limit the
/// ratings were queried with.
pub fn render(
    ratings: &[GenreRating],
    limit: usize,
    format: ReportFormat,
) -> std::result::Result<String, serde_json::Error> {
    match format {
        ReportFormat::Text => Ok(render_text(ratings, limit)),
        ReportFormat::Json => serde_json::to_string_pretty(ratings).map(|json| json + "\n"),
    }
}

fn render_text(ratings: &[GenreRating], limit: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", report_header(limit));
    for rating in ratings {
        let _ = writeln!(out, "{}: {:.2}", rating.genre, rating.avg_rating);
    }
    out
}
