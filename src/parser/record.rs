use csv::StringRecord;

use crate::error::RowError;

/// Literal used in the source data for an absent value
pub const NULL_MARKER: &str = "NULL";

#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Real(f64),
    Text(String),
}

impl SqlValue {
    pub fn bind_to(&self, idx: usize, stmt: &mut rusqlite::Statement) -> rusqlite::Result<()> {
        match self {
            SqlValue::Integer(i) => stmt.raw_bind_parameter(idx, i)?,
            SqlValue::Real(f) => stmt.raw_bind_parameter(idx, f)?,
            SqlValue::Text(s) => stmt.raw_bind_parameter(idx, s.as_str())?,
        }
        Ok(())
    }
}

/// A validated row from the movies file.
///
/// `id` stays as source text; the column's INTEGER affinity converts it.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub id: String,
    pub title: String,
    pub year: i64,
    pub rating: f64,
}

impl MovieRecord {
    pub const MIN_FIELDS: usize = 4;

    pub fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        require_fields(record, Self::MIN_FIELDS)?;

        let year = record[2].parse::<i64>().map_err(RowError::InvalidYear)?;
        let rating = parse_rating(&record[3])?;

        Ok(Self {
            id: record[0].to_string(),
            title: record[1].to_string(),
            year,
            rating,
        })
    }

    pub fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.id.clone()),
            SqlValue::Text(self.title.clone()),
            SqlValue::Integer(self.year),
            SqlValue::Real(self.rating),
        ]
    }
}

/// A validated row from the genres file
#[derive(Debug, Clone, PartialEq)]
pub struct GenreRecord {
    pub movie_id: String,
    pub genre: String,
}

impl GenreRecord {
    pub const MIN_FIELDS: usize = 2;

    pub fn from_record(record: &StringRecord) -> Result<Self, RowError> {
        require_fields(record, Self::MIN_FIELDS)?;

        Ok(Self {
            movie_id: record[0].to_string(),
            genre: record[1].to_string(),
        })
    }

    pub fn values(&self) -> Vec<SqlValue> {
        vec![
            SqlValue::Text(self.movie_id.clone()),
            SqlValue::Text(self.genre.clone()),
        ]
    }
}

/// Parse a rating field. Empty and `NULL` both map to 0.0.
pub fn parse_rating(field: &str) -> Result<f64, RowError> {
    if field.is_empty() || field == NULL_MARKER {
        return Ok(0.0);
    }
    field.parse::<f64>().map_err(RowError::InvalidRating)
}

fn require_fields(record: &StringRecord, expected: usize) -> Result<(), RowError> {
    if record.len() < expected {
        return Err(RowError::TooFewFields {
            expected,
            found: record.len(),
        });
    }
    Ok(())
}
