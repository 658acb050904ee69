use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::pipeline::{PipelineConfig, DEFAULT_DB_PATH};
use crate::report::{ReportFormat, TOP_GENRES_LIMIT};
use crate::schema::{GENRES, MOVIES};

#[derive(Parser, Debug)]
#[command(name = "movies-to-sqlite")]
#[command(version, about = "Load IMDB movie CSVs into SQLite and report top-rated genres")]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Defaults to `run` with default paths
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create tables, load both CSV files and print the report
    Run {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// Create tables and load both CSV files
    Load {
        #[command(flatten)]
        inputs: InputArgs,
    },

    /// Print the report for an already loaded database
    Report {
        /// SQLite database path
        #[arg(long, default_value = DEFAULT_DB_PATH)]
        db: PathBuf,

        #[command(flatten)]
        report: ReportArgs,
    },

    /// List all table names
    ListTables,
}

#[derive(Args, Debug, Clone)]
pub struct InputArgs {
    /// SQLite database path
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    pub db: PathBuf,

    /// Movies CSV (id,title,year,rating)
    #[arg(long, default_value = MOVIES.source_file)]
    pub movies: PathBuf,

    /// Genres CSV (movie_id,genre)
    #[arg(long, default_value = GENRES.source_file)]
    pub genres: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct ReportArgs {
    /// Number of genres to show
    #[arg(short, long, default_value_t = TOP_GENRES_LIMIT)]
    pub limit: usize,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    pub fn format(&self) -> ReportFormat {
        if self.json {
            ReportFormat::Json
        } else {
            ReportFormat::Text
        }
    }
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            limit: TOP_GENRES_LIMIT,
            json: false,
        }
    }
}

impl InputArgs {
    pub fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            db_path: self.db.clone(),
            movies_csv: self.movies.clone(),
            genres_csv: self.genres.clone(),
            ..PipelineConfig::default()
        }
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_command_defaults_to_run() {
        let cli = Cli::try_parse_from(["movies-to-sqlite"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_run_overrides() {
        let cli = Cli::try_parse_from([
            "movies-to-sqlite",
            "run",
            "--db",
            "out.db",
            "--limit",
            "3",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Some(Commands::Run { inputs, report }) => {
                let config = inputs.to_config();
                assert_eq!(config.db_path, PathBuf::from("out.db"));
                assert_eq!(config.movies_csv, PathBuf::from("IMDB-movies.csv"));
                assert_eq!(report.limit, 3);
                assert_eq!(report.format(), ReportFormat::Json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
