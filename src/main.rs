use anyhow::{Context, Result};
use kitchen_batch::app::App;
use kitchen_batch::cli::parse_args;
use kitchen_batch::config::AppConfig;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for KITCHEN_* settings

    let cli = parse_args();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::resolve(cli.data_dir.clone(), cli.catalog.clone(), cli.density)
        .context("Invalid configuration")?;
    debug!(?config, "Resolved configuration");

    let app = App::new(config).await?;
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout).await
}
