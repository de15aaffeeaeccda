use clap::{Parser, Subcommand};
use std::path::PathBuf;

use stepwise_core::config::Config;
use stepwise_core::store::Store;

#[derive(Parser)]
#[command(
    name = "stepwise",
    about = "Goal decomposition service — break a dated goal into AI-planned steps",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to a YAML config file (env overrides still apply)
    #[arg(long, global = true, env = "STEPWISE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Listen port (overrides config and STEPWISE_PORT)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create the database and mint a session token for a user
    Session {
        /// User id to create a session for
        #[arg(long, default_value = "local-user")]
        user: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_target(false)
        .init();

    if let Err(e) = run(cli) {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[tokio::main]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.port = port;
            }
            for warning in config.validate() {
                tracing::warn!("{warning}");
            }
            stepwise_server::serve(&config).await
        }
        Commands::Session { user } => {
            let store = Store::connect(&config.database_url).await?;
            let token = store.create_session(&user).await?;
            println!("{token}");
            Ok(())
        }
    }
}
