//! Diagnostics sink for the load pipeline
//!
//! The loaders never write to a global log directly. They report phases,
//! skipped rows and free-form messages to a [`Diagnostics`] implementation
//! passed in by the caller:
//! - [`TracingDiagnostics`] forwards everything to `tracing` (the binary)
//! - [`SilentDiagnostics`] drops everything
//! - [`CollectingDiagnostics`] keeps everything for inspection in tests

use crate::error::RowError;

/// Pipeline phases
#[derive(Debug, Clone, PartialEq)]
pub enum Phase {
    Initializing,
    LoadingMovies,
    LoadingGenres,
    Reporting,
    Complete,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Initializing => write!(f, "Creating tables"),
            Phase::LoadingMovies => write!(f, "Loading movies"),
            Phase::LoadingGenres => write!(f, "Loading genres"),
            Phase::Reporting => write!(f, "Running report"),
            Phase::Complete => write!(f, "Complete"),
        }
    }
}

/// Receiver for pipeline progress and per-row problems
pub trait Diagnostics {
    fn set_phase(&mut self, phase: Phase);
    /// A data row was not stored. `row` is 1-based and excludes the header.
    fn row_skipped(&mut self, table: &str, row: usize, error: &RowError);
    fn log(&mut self, message: &str);
}

/// Forwards diagnostics to the `tracing` subscriber
#[derive(Default)]
pub struct TracingDiagnostics;

impl TracingDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl Diagnostics for TracingDiagnostics {
    fn set_phase(&mut self, phase: Phase) {
        tracing::debug!("{}", phase);
    }

    fn row_skipped(&mut self, table: &str, row: usize, error: &RowError) {
        tracing::warn!(table, "Skipping row {}: {}", row, error);
    }

    fn log(&mut self, message: &str) {
        tracing::info!("{}", message);
    }
}

/// Silent implementation for non-interactive use
#[derive(Default)]
pub struct SilentDiagnostics;

impl SilentDiagnostics {
    pub fn new() -> Self {
        Self
    }
}

impl Diagnostics for SilentDiagnostics {
    fn set_phase(&mut self, _phase: Phase) {}
    fn row_skipped(&mut self, _table: &str, _row: usize, _error: &RowError) {}
    fn log(&mut self, _message: &str) {}
}

/// A skipped row as recorded by [`CollectingDiagnostics`]
#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub table: String,
    pub row: usize,
    pub reason: String,
    pub validation: bool,
}

/// Records everything it receives
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    pub phases: Vec<Phase>,
    pub skipped: Vec<SkippedRow>,
    pub messages: Vec<String>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Row indices skipped for a table, in report order
    pub fn skipped_rows(&self, table: &str) -> Vec<usize> {
        self.skipped
            .iter()
            .filter(|s| s.table == table)
            .map(|s| s.row)
            .collect()
    }
}

impl Diagnostics for CollectingDiagnostics {
    fn set_phase(&mut self, phase: Phase) {
        self.phases.push(phase);
    }

    fn row_skipped(&mut self, table: &str, row: usize, error: &RowError) {
        self.skipped.push(SkippedRow {
            table: table.to_string(),
            row,
            reason: error.to_string(),
            validation: error.is_validation(),
        });
    }

    fn log(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }
}
