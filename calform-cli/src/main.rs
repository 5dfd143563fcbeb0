mod commands;
mod logging;
mod prompt;
mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use calform_core::ExportFormat;
use calform_core::config::CalFormConfig;
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "calform", version)]
#[command(about = "Fill in calendar entries and export them as ICS, JSON, CSV or text")]
struct Cli {
    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Less log output (-q warn, -qq error)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    quiet: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill in a calendar interactively
    New {
        /// Calendar name
        #[arg(short, long)]
        name: Option<String>,

        /// IANA time zone (e.g. "Europe/Berlin"), or "UTC"
        #[arg(long)]
        tz: Option<String>,

        /// Start from the rows of an uploaded CSV file
        #[arg(long)]
        from_csv: Option<PathBuf>,
    },
    /// Convert a CSV upload into another format
    Convert {
        input: PathBuf,

        /// ics, json, csv or text (default from config)
        #[arg(short, long)]
        format: Option<ExportFormat>,

        /// Output path, or "-" for stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Calendar name
        #[arg(short, long)]
        name: Option<String>,

        /// IANA time zone (e.g. "Europe/Berlin"), or "UTC"
        #[arg(long)]
        tz: Option<String>,

        /// Open the saved file with the system handler
        #[arg(long)]
        open: bool,
    },
    /// Write an empty CSV with the expected columns
    Template {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the config file path and effective defaults
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose, cli.quiet)?;

    let config = CalFormConfig::load().context("Could not load config")?;

    match cli.command {
        Commands::New { name, tz, from_csv } => {
            let header = commands::resolve_header(&config, name, tz);
            commands::new::run(&config, header, from_csv.as_deref())
        }
        Commands::Convert {
            input,
            format,
            output,
            name,
            tz,
            open,
        } => {
            let header = commands::resolve_header(&config, name, tz);
            let format = format.unwrap_or(config.default_format);
            commands::convert::run(&config, &input, header, format, output, open)
        }
        Commands::Template { output } => commands::template::run(output.as_deref()),
        Commands::Config => commands::config::run(&config),
    }
}
