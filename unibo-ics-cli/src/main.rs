mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "unibo-ics")]
#[command(about = "University of Bologna course calendar export tool")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List the downloadable resources of a catalogue package
    Resources {
        /// Catalogue package identifier
        #[arg(short, long)]
        package: String,
    },

    /// List the courses published in a package resource
    Courses {
        /// Catalogue package identifier
        #[arg(short, long)]
        package: String,

        /// Resource alias within the package
        #[arg(short, long)]
        alias: String,
    },

    /// Fetch a course timetable and generate an ICS file
    Generate {
        /// Catalogue package identifier
        #[arg(short, long)]
        package: String,

        /// Resource alias within the package
        #[arg(short, long)]
        alias: String,

        /// Course code
        #[arg(short, long)]
        code: u32,

        /// Year of study within the programme
        #[arg(short, long, default_value = "1")]
        year: u32,

        /// Output file path (stdout when omitted)
        #[arg(short, long)]
        output: Option<String>,

        /// Calendar name
        #[arg(long)]
        calendar_name: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    format!("unibo_ics_cli={log_level},unibo_ics_core={log_level}").into()
                }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Resources { package } => commands::resources_command(package).await,

        Commands::Courses { package, alias } => commands::courses_command(package, alias).await,

        Commands::Generate {
            package,
            alias,
            code,
            year,
            output,
            calendar_name,
        } => {
            commands::generate_command(commands::GenerateParams {
                package,
                alias,
                code,
                year,
                output,
                calendar_name,
            })
            .await
        }
    }
}
