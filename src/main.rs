use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tinydhcp::{Config, DhcpServer, Engine, Result};

#[derive(Parser)]
#[command(name = "tinydhcp")]
#[command(author, version, about = "A minimal BOOTP/DHCP server", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "tinydhcp.json")]
    config: PathBuf,

    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Run,
    ShowConfig,
    ShowPool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let config = Config::load_or_create(&cli.config)?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!("Starting DHCP server with config: {:?}", cli.config);
            let mut server = DhcpServer::new(config)?;

            tokio::select! {
                result = server.run() => result,
                _ = tokio::signal::ctrl_c() => {
                    info!("Received shutdown signal, stopping server...");
                    Ok(())
                }
            }
        }
        Commands::ShowConfig => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Commands::ShowPool => {
            let engine = Engine::new(config.server_ip, config.pool_range);
            let octets = config.server_ip.octets();
            println!(
                "Pool: {}.{}.{}.2 - {}.{}.{}.{} ({} addresses, all free)",
                octets[0],
                octets[1],
                octets[2],
                octets[0],
                octets[1],
                octets[2],
                engine.pool().range() + 1,
                engine.pool().range(),
            );
            Ok(())
        }
    }
}
