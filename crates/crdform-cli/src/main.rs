use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod util;

#[derive(Parser)]
#[command(name = "crdform", version, about = "CRD form templates and manifest generation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a form template from a CRD or resource YAML
    Extract(commands::extract::Args),
    /// Check the top-level structure of a CRD
    Validate(commands::validate::Args),
    /// Generate a manifest from form fields
    Generate(commands::generate::Args),
    /// List the built-in templates
    Templates(commands::templates::Args),
}

fn main() -> anyhow::Result<()> {
    // stdout carries command output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Extract(args) => commands::extract::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Generate(args) => commands::generate::run(args),
        Commands::Templates(args) => commands::templates::run(args),
    }
}
