mod check;
mod config;
mod logging;
mod serve;
mod server_utils;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::SiteConfig;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the content API and static files
    Serve {
        /// Path to the configuration file (default: atelier.toml, if present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
        /// Expose the server on all network interfaces
        #[arg(long)]
        host: bool,
    },
    /// Load the content tree, report problems and exit
    Check {
        /// Path to the configuration file (default: atelier.toml, if present)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging();

    match cli.command {
        Commands::Serve { config, port, host } => {
            let config = load_config(config.as_deref());
            if let Err(err) = serve::run(config, port, host).await {
                tracing::error!(name: "server", "{}", err);
                std::process::exit(1);
            }
        }
        Commands::Check { config } => {
            let config = load_config(config.as_deref());
            std::process::exit(check::run(&config));
        }
    }
}

fn load_config(path: Option<&Path>) -> SiteConfig {
    match config::load_or_default(path) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!(name: "config", "{}", err);
            std::process::exit(1);
        }
    }
}
