use clap::Parser;
use exam_store::cli::Args;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file (if present) before clap reads the environment
    dotenvy::dotenv().ok();

    let args = Args::parse();

    init_tracing(&args.log_level)?;

    info!("Running {:?}", args.command);
    exam_store::execute(&args).await?;

    Ok(())
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::try_new(log_level)?).init();
    Ok(())
}
