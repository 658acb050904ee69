pub mod cli;
pub mod diagnostics;
pub mod error;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod schema;
pub mod writer;

pub use cli::{Cli, Commands};
pub use diagnostics::{
    CollectingDiagnostics, Diagnostics, Phase, SilentDiagnostics, TracingDiagnostics,
};
pub use error::{Error, Result, RowError};
pub use pipeline::{run, PipelineConfig, RunSummary};
pub use report::GenreRating;
pub use writer::{LoadStats, SqliteWriter};
