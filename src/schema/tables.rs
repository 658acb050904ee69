//! Table schema definitions for the movie dataset

use super::types::*;

pub static MOVIES: TableSchema = TableSchema {
    name: "movies",
    source_file: "IMDB-movies.csv",
    columns: &[
        Column::primary("id", ColumnType::Integer),
        Column::new("title", ColumnType::Text),
        Column::new("year", ColumnType::Integer),
        Column::new("rating", ColumnType::Real),
    ],
    foreign_keys: &[],
};

pub static GENRES: TableSchema = TableSchema {
    name: "genres",
    source_file: "IMDB-movies_genres.csv",
    columns: &[
        Column::new("movie_id", ColumnType::Integer),
        Column::new("genre", ColumnType::Text),
    ],
    foreign_keys: &[ForeignKey::new("movie_id", "movies")],
};

/// All tables, parents before children
pub static ALL_TABLES: &[&TableSchema] = &[&MOVIES, &GENRES];

/// Names of every table in creation order
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|t| t.name).collect()
}
