use crate::cli::Args;
use crate::cli::Command;
use crate::db::{init_pool, run_query, setup_schema};
use anyhow::{Context, bail};
use deadpool_diesel::postgres::Pool;
use tracing::info;

pub mod authoring;
pub mod cli;
pub mod db;
pub mod errors;
pub mod model;
pub mod schema;
pub mod scoring;
pub mod seed;
pub mod store;
pub mod verify;

pub use errors::StoreError;

/// Runs the selected subcommand against a freshly built pool. The pool is
/// dropped, and with it every connection, before this returns.
pub async fn execute(args: &Args) -> anyhow::Result<()> {
    info!("Initializing database pool...");
    let pool = init_pool(&args.connection_str, args.db_pool_max_size)
        .context("Failed to initialize database pool")?;

    match &args.command {
        Command::Setup => setup(&pool).await,
        Command::Seed {
            questions_per_subject,
            rng_seed,
        } => {
            setup(&pool).await?;
            let options = seed::SeedOptions {
                questions_per_subject: *questions_per_subject,
                rng_seed: *rng_seed,
            };
            seed::run(&pool, &options)
                .await
                .context("Error seeding database")?;
            Ok(())
        }
        Command::Verify { json, strict } => {
            let report = verify::run(&pool)
                .await
                .context("Error verifying database")?;
            if *json {
                let rendered = serde_json::to_string_pretty(&report)
                    .context("Failed to render verification report")?;
                println!("{}", rendered);
            } else {
                report.log();
            }
            if *strict && !report.is_consistent() {
                bail!(
                    "{} data-model violations found",
                    report.violations.len()
                );
            }
            Ok(())
        }
    }
}

async fn setup(pool: &Pool) -> anyhow::Result<()> {
    info!("Applying schema...");
    run_query(pool, setup_schema)
        .await
        .context("Failed to apply schema")
}
