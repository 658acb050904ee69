//! End-to-end tests: CSV files on disk -> SQLite file -> report.
//!
//! Every test builds its own scratch directory, so they can run in parallel.

use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

use movies_to_sqlite::diagnostics::{CollectingDiagnostics, SilentDiagnostics};
use movies_to_sqlite::pipeline::{self, PipelineConfig};
use movies_to_sqlite::report::{render, ReportFormat};
use movies_to_sqlite::schema::ALL_TABLES;
use movies_to_sqlite::{Error, SqliteWriter};

// =============================================================================
// Fixtures
// =============================================================================

const MOVIES_HEADER: &str = "id,title,year,rating\n";
const GENRES_HEADER: &str = "movie_id,genre\n";

/// Twelve genres, one movie each, ratings 0.5 apart
static WIDE_DATASET: Lazy<(String, String)> = Lazy::new(|| {
    let mut movies = String::from(MOVIES_HEADER);
    let mut genres = String::from(GENRES_HEADER);
    for i in 0..12 {
        movies.push_str(&format!("{},Movie {},{},{:.1}\n", i + 1, i, 1990 + i, i as f64 * 0.5));
        genres.push_str(&format!("{},Genre{:02}\n", i + 1, i));
    }
    (movies, genres)
});

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new(movies_csv: &str, genres_csv: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join("movies.csv"), movies_csv).unwrap();
        fs::write(dir.path().join("genres.csv"), genres_csv).unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> std::path::PathBuf {
        self.dir.path().join(name)
    }

    fn config(&self) -> PipelineConfig {
        PipelineConfig {
            db_path: self.path("movies.db"),
            movies_csv: self.path("movies.csv"),
            genres_csv: self.path("genres.csv"),
            ..PipelineConfig::default()
        }
    }

    fn connection(&self) -> Connection {
        Connection::open(self.path("movies.db")).expect("Failed to open test database")
    }
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| row.get(0))
        .unwrap()
}

fn report_text(workspace: &Workspace) -> String {
    let summary = pipeline::run(&workspace.config(), &mut SilentDiagnostics::new()).unwrap();
    render(&summary.ratings, workspace.config().limit, ReportFormat::Text).unwrap()
}

// =============================================================================
// Report
// =============================================================================

#[test]
fn test_report_orders_by_average() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,8.0\n2,B,2001,6.0\n",
        "movie_id,genre\n1,Drama\n2,Drama\n1,Comedy\n",
    );

    assert_eq!(
        report_text(&workspace),
        "Top 10 Highest Rated Genres:\nComedy: 8.00\nDrama: 7.00\n"
    );
}

#[test]
fn test_report_caps_at_ten_lines() {
    let (movies, genres) = &*WIDE_DATASET;
    let workspace = Workspace::new(movies, genres);

    let text = report_text(&workspace);
    let lines: Vec<&str> = text.lines().skip(1).collect();

    assert_eq!(lines.len(), 10);
    assert_eq!(lines[0], "Genre11: 5.50");
    assert_eq!(lines[9], "Genre02: 1.00");
}

#[test]
fn test_report_with_few_genres() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,4.0\n",
        "movie_id,genre\n1,Western\n",
    );

    let text = report_text(&workspace);
    assert_eq!(text.lines().count(), 2);
    assert_eq!(text.lines().nth(1), Some("Western: 4.00"));
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_null_rating_becomes_zero() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,NULL\n2,B,2001,\n",
        GENRES_HEADER,
    );

    pipeline::run(&workspace.config(), &mut SilentDiagnostics::new()).unwrap();

    let conn = workspace.connection();
    let ratings: Vec<f64> = conn
        .prepare("SELECT rating FROM movies ORDER BY id")
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(ratings, [0.0, 0.0]);
}

#[test]
fn test_skipped_rows_are_reported_with_index() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,7.0\n2,B\n3,C,20x0,7.0\n4,D,2003,bad\n",
        "movie_id,genre\n1,Drama\nbroken\n",
    );
    let mut diag = CollectingDiagnostics::new();

    let summary = pipeline::run(&workspace.config(), &mut diag).unwrap();

    assert_eq!(diag.skipped_rows("movies"), [2, 3, 4]);
    assert_eq!(diag.skipped_rows("genres"), [2]);
    assert!(diag.skipped[0].reason.contains("not enough columns"));
    assert!(diag.skipped[1].reason.contains("invalid year format"));
    assert!(diag.skipped[2].reason.contains("invalid rating format"));
    assert_eq!(summary.movies.inserted, 1);
    assert_eq!(summary.movies.skipped, 3);
    assert_eq!(summary.genres.skipped, 1);

    let conn = workspace.connection();
    assert_eq!(count(&conn, "movies"), 1);
    assert_eq!(count(&conn, "genres"), 1);
}

#[test]
fn test_rerun_duplicates_genres_only() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,8.0\n2,B,2001,6.0\n",
        "movie_id,genre\n1,Drama\n2,Drama\n",
    );

    pipeline::run(&workspace.config(), &mut SilentDiagnostics::new()).unwrap();
    let mut diag = CollectingDiagnostics::new();
    let second = pipeline::run(&workspace.config(), &mut diag).unwrap();

    assert_eq!(second.movies.inserted, 0);
    assert_eq!(second.movies.failed, 2);
    assert_eq!(diag.skipped_rows("movies"), [1, 2]);
    assert_eq!(second.genres.inserted, 2);

    let conn = workspace.connection();
    assert_eq!(count(&conn, "movies"), 2);
    assert_eq!(count(&conn, "genres"), 4);
}

#[test]
fn test_repeated_movie_id_keeps_first_row() {
    let workspace = Workspace::new(
        "id,title,year,rating\n1,A,2000,8.0\n1,A2,2000,2.0\n",
        "movie_id,genre\n1,Drama\n",
    );
    let mut diag = CollectingDiagnostics::new();

    let summary = pipeline::run(&workspace.config(), &mut diag).unwrap();

    assert_eq!(summary.movies.inserted, 1);
    assert_eq!(summary.movies.failed, 1);
    assert_eq!(diag.skipped_rows("movies"), [2]);
    assert!(!diag.skipped[0].validation);
    assert_eq!(
        render(&summary.ratings, workspace.config().limit, ReportFormat::Text).unwrap(),
        "Top 10 Highest Rated Genres:\nDrama: 8.00\n"
    );
}

#[test]
fn test_non_utf8_title_still_loads() {
    let workspace = Workspace::new(MOVIES_HEADER, "movie_id,genre\n1,Drama\n2,Drama\n");
    fs::write(
        workspace.path("movies.csv"),
        b"id,title,year,rating\n1,Am\xe9lie,2001,8.0\n2,B,2001,6.0\n",
    )
    .unwrap();

    let summary = pipeline::run(&workspace.config(), &mut SilentDiagnostics::new()).unwrap();

    assert_eq!(summary.movies.inserted, 2);
    let title: String = workspace
        .connection()
        .query_row("SELECT title FROM movies WHERE id = 1", [], |row| row.get(0))
        .unwrap();
    assert_eq!(title, "Am\u{FFFD}lie");
    assert_eq!(summary.ratings[0].avg_rating, 7.0);
}

#[test]
fn test_create_tables_is_idempotent() {
    let workspace = Workspace::new(MOVIES_HEADER, GENRES_HEADER);
    let db_path = workspace.path("movies.db");

    for _ in 0..2 {
        let writer = SqliteWriter::open(&db_path).unwrap();
        writer.create_tables(ALL_TABLES).unwrap();
    }

    let conn = workspace.connection();
    let tables: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table'",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(tables, 2);
}

// =============================================================================
// Fatal errors
// =============================================================================

#[test]
fn test_missing_movies_file() {
    let workspace = Workspace::new(MOVIES_HEADER, GENRES_HEADER);
    let config = PipelineConfig {
        movies_csv: workspace.path("nope.csv"),
        ..workspace.config()
    };

    let err = pipeline::run(&config, &mut SilentDiagnostics::new()).unwrap_err();
    assert!(matches!(err, Error::Read { .. }));
}

#[test]
fn test_unwritable_database() {
    let workspace = Workspace::new(MOVIES_HEADER, GENRES_HEADER);
    let config = PipelineConfig {
        db_path: Path::new("/nonexistent/dir/movies.db").to_path_buf(),
        ..workspace.config()
    };

    let err = pipeline::run(&config, &mut SilentDiagnostics::new()).unwrap_err();
    assert!(matches!(err, Error::Open { .. }));
}
