//! Stage sequencing: create tables, load movies, load genres, report.
//!
//! Stages run strictly in order. A fatal error stops the run where it
//! happens; rows already written stay written. A rerun appends genre rows
//! again while repeated movie ids are rejected by the primary key.

use std::path::PathBuf;

use crate::diagnostics::{Diagnostics, Phase};
use crate::error::Result;
use crate::report::{top_genres, GenreRating, TOP_GENRES_LIMIT};
use crate::schema::{ALL_TABLES, GENRES, MOVIES};
use crate::writer::{LoadStats, SqliteWriter};

pub const DEFAULT_DB_PATH: &str = "movies.db";

/// Paths and limits for one run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub db_path: PathBuf,
    pub movies_csv: PathBuf,
    pub genres_csv: PathBuf,
    pub limit: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            movies_csv: PathBuf::from(MOVIES.source_file),
            genres_csv: PathBuf::from(GENRES.source_file),
            limit: TOP_GENRES_LIMIT,
        }
    }
}

/// What a full run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub movies: LoadStats,
    pub genres: LoadStats,
    pub ratings: Vec<GenreRating>,
}

/// Open the store and make sure every table exists
pub fn open_store(config: &PipelineConfig, diag: &mut dyn Diagnostics) -> Result<SqliteWriter> {
    diag.set_phase(Phase::Initializing);
    let writer = SqliteWriter::open(&config.db_path)?;
    writer.create_tables(ALL_TABLES)?;
    Ok(writer)
}

/// Load both CSV files into an opened store
pub fn load_all(
    writer: &SqliteWriter,
    config: &PipelineConfig,
    diag: &mut dyn Diagnostics,
) -> Result<(LoadStats, LoadStats)> {
    diag.set_phase(Phase::LoadingMovies);
    let movies = writer.load_movies(&config.movies_csv, diag)?;

    diag.set_phase(Phase::LoadingGenres);
    let genres = writer.load_genres(&config.genres_csv, diag)?;

    Ok((movies, genres))
}

/// Run the report against an opened store
pub fn report(
    writer: &SqliteWriter,
    config: &PipelineConfig,
    diag: &mut dyn Diagnostics,
) -> Result<Vec<GenreRating>> {
    diag.set_phase(Phase::Reporting);
    top_genres(writer.connection(), config.limit)
}

/// Full run: init, load movies, load genres, report
pub fn run(config: &PipelineConfig, diag: &mut dyn Diagnostics) -> Result<RunSummary> {
    let writer = open_store(config, diag)?;
    let (movies, genres) = load_all(&writer, config, diag)?;
    let ratings = report(&writer, config, diag)?;
    diag.set_phase(Phase::Complete);

    Ok(RunSummary {
        movies,
        genres,
        ratings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::CollectingDiagnostics;
    use crate::error::Error;
    use tempfile::TempDir;

    #[test]
    fn test_default_paths() {
        let config = PipelineConfig::default();
        assert_eq!(config.db_path, PathBuf::from("movies.db"));
        assert_eq!(config.movies_csv, PathBuf::from("IMDB-movies.csv"));
        assert_eq!(config.genres_csv, PathBuf::from("IMDB-movies_genres.csv"));
        assert_eq!(config.limit, 10);
    }

    #[test]
    fn test_missing_genres_stops_after_movies() {
        let dir = TempDir::new().unwrap();
        let movies_csv = dir.path().join("movies.csv");
        std::fs::write(&movies_csv, "id,title,year,rating\n1,A,2000,8.0\n").unwrap();
        let config = PipelineConfig {
            db_path: dir.path().join("movies.db"),
            movies_csv,
            genres_csv: dir.path().join("missing.csv"),
            limit: TOP_GENRES_LIMIT,
        };
        let mut diag = CollectingDiagnostics::new();

        let err = run(&config, &mut diag).unwrap_err();

        assert!(matches!(err, Error::Read { .. }));
        assert_eq!(
            diag.phases,
            [Phase::Initializing, Phase::LoadingMovies, Phase::LoadingGenres]
        );
    }
}
