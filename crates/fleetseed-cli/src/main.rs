use clap::Parser;
use tracing::error;

use fleetseed_cli::logging::init_logging;
use fleetseed_cli::{Cli, CliError, execute};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;

    if let Err(err) = execute(cli).await {
        error!(event = "run_failed", error = %err);
        return Err(err);
    }
    Ok(())
}
