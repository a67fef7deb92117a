use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use retail_etl::{config::resolve_config, pipeline, report::Filter};

#[derive(Parser)]
#[command(version, about = "Retail star-schema ETL")]
struct Cli {
    /// Config file (defaults to $RETAIL_ETL_CONFIG, then built-in defaults)
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Clean the raw CSVs into processed tables
    Clean,
    /// Build and commit the star schema from processed tables
    Build,
    /// Clean, then build
    Run,
    /// Summarize the committed star schema
    Report {
        /// Product category to include (repeatable)
        #[arg(long = "category", value_name = "CATEGORY")]
        categories: Vec<String>,
        /// Store country to include (repeatable)
        #[arg(long = "country", value_name = "COUNTRY")]
        countries: Vec<String>,
        /// Calendar year to include (repeatable)
        #[arg(long = "year", value_name = "YEAR")]
        years: Vec<i32>,
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

fn setup_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let cfg = resolve_config(cli.config.as_deref())?;

    match cli.cmd {
        Cmd::Clean => {
            pipeline::clean_stage(&cfg)?;
        }
        Cmd::Build => {
            let outcome = pipeline::build_stage(&cfg)?;
            println!("{}", outcome.report);
        }
        Cmd::Run => {
            let outcome = pipeline::run(&cfg)?;
            println!("{}", outcome.build.report);
        }
        Cmd::Report {
            categories,
            countries,
            years,
            format,
        } => {
            let filter = Filter {
                categories,
                countries,
                years,
            };
            let summary = pipeline::report_stage(&cfg, &filter)?;
            match format {
                Format::Text => print!("{summary}"),
                Format::Json => println!(
                    "{}",
                    retail_etl::report::to_json(&summary).context("encode report as JSON")?
                ),
            }
        }
    }

    Ok(())
}
