use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use frontdesk_gateway::{Config, Daemon};

/// Front desk - WhatsApp conversational gateway for energy sales
#[derive(Parser)]
#[command(name = "frontdesk", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "FRONTDESK_PORT", default_value = "8080")]
    port: u16,

    /// Data directory for the interaction log
    #[arg(long, env = "FRONTDESK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,frontdesk_gateway=info",
        1 => "info,frontdesk_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    tracing::info!(port = cli.port, "starting front desk gateway");

    let config = Config::load(cli.data_dir)?;
    tracing::debug!(data_dir = %config.data_dir.display(), "loaded configuration");

    let daemon = Daemon::new(config, cli.port);
    daemon.run().await?;

    Ok(())
}
