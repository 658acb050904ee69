use anyhow::{Context, Result};
use movies_to_sqlite::{
    cli::{Cli, Commands, ReportArgs},
    diagnostics::TracingDiagnostics,
    pipeline::{self, PipelineConfig},
    report::render,
    schema::table_names,
};
use std::time::Instant;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let mut diag = TracingDiagnostics::new();

    match cli.command {
        None => {
            run(&PipelineConfig::default(), &ReportArgs::default(), &mut diag)?;
        }

        Some(Commands::Run { inputs, report }) => {
            let config = PipelineConfig {
                limit: report.limit,
                ..inputs.to_config()
            };
            run(&config, &report, &mut diag)?;
        }

        Some(Commands::Load { inputs }) => {
            let start = Instant::now();
            let config = inputs.to_config();
            let writer = pipeline::open_store(&config, &mut diag)
                .with_context(|| format!("Failed to prepare {:?}", config.db_path))?;
            let (movies, genres) = pipeline::load_all(&writer, &config, &mut diag)?;

            tracing::info!(
                "Loaded {} movies and {} genre rows into {:?} in {:.1}s",
                movies.inserted,
                genres.inserted,
                config.db_path,
                start.elapsed().as_secs_f64()
            );
        }

        Some(Commands::Report { db, report }) => {
            let config = PipelineConfig {
                db_path: db,
                limit: report.limit,
                ..PipelineConfig::default()
            };
            let writer = pipeline::open_store(&config, &mut diag)
                .with_context(|| format!("Failed to prepare {:?}", config.db_path))?;
            let ratings = pipeline::report(&writer, &config, &mut diag)?;
            print!("{}", render(&ratings, config.limit, report.format())?);
        }

        Some(Commands::ListTables) => {
            println!("Available tables:\n");
            for name in table_names() {
                println!("  {}", name);
            }
        }
    }

    Ok(())
}

fn run(
    config: &PipelineConfig,
    report: &ReportArgs,
    diag: &mut TracingDiagnostics,
) -> Result<()> {
    let start = Instant::now();

    let summary = pipeline::run(config, diag)
        .with_context(|| format!("Failed to build report from {:?}", config.db_path))?;

    tracing::debug!(
        "Loaded {} movies and {} genre rows in {:.1}s",
        summary.movies.inserted,
        summary.genres.inserted,
        start.elapsed().as_secs_f64()
    );

    print!("{}", render(&summary.ratings, config.limit, report.format())?);
    Ok(())
}
