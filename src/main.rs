//! tictactoe-net - Peer-to-peer tic-tac-toe
//!
//! One player hosts and plays X, the other joins over TCP and plays O. Each
//! process runs its own copy of the rules and keeps it in step with the other.

mod config;
mod game;
mod network;
mod protocol;
mod session;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use config::{Config, DisplayConfig};
use network::NetworkConfig as NetConfig;
use session::{EndReason, Session};

/// tictactoe-net - Tic-tac-toe over a direct network link
#[derive(Parser)]
#[command(name = "tictactoe-net")]
#[command(version = "0.1.0")]
#[command(about = "Play tic-tac-toe against another terminal over TCP", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host a game and wait for an opponent (plays X)
    Host {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Join a hosted game (plays O)
    Join {
        /// Host address to connect to
        #[arg(short, long)]
        address: Option<String>,

        /// Host port
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show current configuration
    Config {
        /// Generate sample configuration
        #[arg(long)]
        generate: bool,

        /// Output path for generated config
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show protocol information
    Info,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        Config::load(config_path)?
    } else {
        Config::load_default().unwrap_or_default()
    };

    // Initialize logging; stdout belongs to the board
    let filter = if cli.verbose || config.general.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        Commands::Host { port } => {
            run_host(config, port).await?;
        }
        Commands::Join { address, port } => {
            run_join(config, address, port).await?;
        }
        Commands::Config { generate, output } => {
            if generate {
                let sample = config::generate_sample_config()?;
                if let Some(path) = output {
                    std::fs::write(&path, &sample)?;
                    println!("Configuration written to: {}", path.display());
                } else {
                    println!("{}", sample);
                }
            } else {
                println!("{}", toml::to_string_pretty(&config)?);
            }
        }
        Commands::Info => {
            print_info(&config);
        }
    }

    Ok(())
}

/// Host a game (plays X)
async fn run_host(config: Config, port: Option<u16>) -> anyhow::Result<()> {
    let mut net_config = NetConfig::from(&config.network);
    if let Some(port) = port {
        net_config.port = port;
    }

    println!("Waiting for an opponent on port {}...", net_config.port);
    println!("Press Ctrl+C to stop.\n");

    let session = tokio::select! {
        result = Session::start_as_host(&net_config) => result?,
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
            return Ok(());
        }
    };

    play(session, &config.display).await
}

/// Join a hosted game (plays O)
async fn run_join(
    config: Config,
    address: Option<String>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let mut net_config = NetConfig::from(&config.network);
    if let Some(port) = port {
        net_config.port = port;
    }
    let address = address.unwrap_or_else(|| config.network.default_host.clone());

    println!("Connecting to {}:{}...", address, net_config.port);

    let session = Session::start_as_joiner(&address, &net_config).await?;

    play(session, &config.display).await
}

async fn play(session: Session, display: &DisplayConfig) -> anyhow::Result<()> {
    match ui::run(session, display).await {
        Some(EndReason::ConnectionLost(reason)) => {
            tracing::error!("Session ended by connection failure: {}", reason);
            anyhow::bail!("connection lost: {}", reason)
        }
        Some(reason) => {
            tracing::info!("Game over: {}", reason);
            Ok(())
        }
        None => Ok(()),
    }
}

/// Print protocol information
fn print_info(config: &Config) {
    println!("tictactoe-net");
    println!("=============\n");
    println!("Host plays X and moves first; joiner plays O.");
    println!("Wire format: {},<player>,<row>,<col>", protocol::MOVE_COMMAND);
    println!("  player: 1 for X, -1 for O; row/col in 0..3");
    println!("\nDefault port: {}", protocol::DEFAULT_PORT);
    println!("Configured port: {}", config.network.port);
    println!("Max frame size: {} bytes", config.network.max_frame_size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::try_parse_from(["tictactoe-net", "info"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_join_arguments() {
        let cli = Cli::try_parse_from([
            "tictactoe-net",
            "join",
            "--address",
            "10.0.0.2",
            "--port",
            "9000",
        ])
        .unwrap();

        match cli.command {
            Commands::Join { address, port } => {
                assert_eq!(address.as_deref(), Some("10.0.0.2"));
                assert_eq!(port, Some(9000));
            }
            _ => panic!("expected join"),
        }
    }

    #[test]
    fn test_host_requires_valid_port() {
        assert!(Cli::try_parse_from(["tictactoe-net", "host", "--port", "70000"]).is_err());
    }
}
