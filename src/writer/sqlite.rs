use csv::StringRecord;
use rusqlite::{Connection, Statement};
use std::path::Path;

use super::schema_gen::{generate_create_table, generate_indexes, generate_insert};
use crate::diagnostics::Diagnostics;
use crate::error::{Error, Result, RowError};
use crate::parser::{read_records, GenreRecord, MovieRecord, SqlValue};
use crate::schema::{TableSchema, GENRES, MOVIES};

/// Row counts for one load phase
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Data rows read, header excluded
    pub rows: usize,
    pub inserted: usize,
    /// Rows rejected by validation
    pub skipped: usize,
    /// Rows rejected by the database
    pub failed: usize,
}

pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open or create the database file. Existing data is kept.
    pub fn open(db_path: &Path) -> Result<Self> {
        let open_err = |source| Error::Open {
            path: db_path.to_path_buf(),
            source,
        };
        let conn = Connection::open(db_path).map_err(open_err)?;
        Self::configure(conn).map_err(open_err)
    }

    pub fn open_in_memory() -> Result<Self> {
        let open_err = |source| Error::Open {
            path: ":memory:".into(),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_err)?;
        Self::configure(conn).map_err(open_err)
    }

    /// Genre rows reference movies by id without the reference being checked
    fn configure(conn: Connection) -> rusqlite::Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = OFF;")?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the given tables and their indexes if they do not exist yet
    pub fn create_tables(&self, schemas: &[&TableSchema]) -> Result<()> {
        for schema in schemas {
            let schema_err = |source| Error::Schema {
                table: schema.name.to_string(),
                source,
            };

            self.conn
                .execute(&generate_create_table(schema), [])
                .map_err(schema_err)?;

            for index_sql in generate_indexes(schema) {
                self.conn.execute(&index_sql, []).map_err(schema_err)?;
            }
        }

        Ok(())
    }

    /// Load a CSV file into `schema`'s table, one insert per data row.
    ///
    /// The first record is the header and is dropped. `parse_row` turns each
    /// remaining record into column values in schema order; rows it rejects
    /// and rows the database rejects are reported to `diag` and skipped.
    pub fn load_csv<F>(
        &self,
        schema: &TableSchema,
        csv_path: &Path,
        diag: &mut dyn Diagnostics,
        mut parse_row: F,
    ) -> Result<LoadStats>
    where
        F: FnMut(&StringRecord) -> std::result::Result<Vec<SqlValue>, RowError>,
    {
        let records = read_records(csv_path)?;

        let mut stmt = self
            .conn
            .prepare(&generate_insert(schema))
            .map_err(|source| Error::Prepare {
                table: schema.name.to_string(),
                source,
            })?;

        let mut stats = LoadStats::default();

        for (i, record) in records.iter().skip(1).enumerate() {
            let row = i + 1;
            stats.rows += 1;

            let outcome = parse_row(record).and_then(|values| insert_row(&mut stmt, &values));
            match outcome {
                Ok(()) => stats.inserted += 1,
                Err(err) => {
                    if err.is_validation() {
                        stats.skipped += 1;
                    } else {
                        stats.failed += 1;
                    }
                    diag.row_skipped(schema.name, row, &err);
                }
            }
        }

        diag.log(&format!(
            "{}: {} rows, {} inserted, {} skipped, {} failed",
            schema.name, stats.rows, stats.inserted, stats.skipped, stats.failed
        ));

        Ok(stats)
    }

    /// Load the movies file (id, title, year, rating)
    pub fn load_movies(&self, csv_path: &Path, diag: &mut dyn Diagnostics) -> Result<LoadStats> {
        self.load_csv(&MOVIES, csv_path, diag, |record| {
            MovieRecord::from_record(record).map(|movie| movie.values())
        })
    }

    /// Load the genres file (movie_id, genre)
    pub fn load_genres(&self, csv_path: &Path, diag: &mut dyn Diagnostics) -> Result<LoadStats> {
        self.load_csv(&GENRES, csv_path, diag, |record| {
            GenreRecord::from_record(record).map(|genre| genre.values())
        })
    }
}

/// Bind one row's values and execute the prepared insert
fn insert_row(stmt: &mut Statement, values: &[SqlValue]) -> std::result::Result<(), RowError> {
    for (idx, value) in values.iter().enumerate() {
        value.bind_to(idx + 1, stmt)?;
    }
    stmt.raw_execute()?;
    Ok(())
}
