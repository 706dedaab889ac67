use clap::Parser;
use seeder::cli::{Args, StartupError, resolve_dsn};
use seeder::seed_all;
use std::process::ExitCode;
use std::time::Duration;
use util::config;
use util::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();
    args.apply_overrides();

    let _log_guard = init_logging(
        &config::log_level(),
        config::log_file().as_deref(),
        config::log_to_stdout(),
    );

    match run(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::from(1)
        }
    }
}

async fn run(args: &Args) -> Result<(), StartupError> {
    let dsn = resolve_dsn(args.database.as_deref(), config::database_url().as_deref())?;
    let timeout = Duration::from_secs(config::connect_timeout_secs());

    let db = db::connect(&dsn, timeout).await?;
    tracing::info!("database connection pool established");

    let report = seed_all(&db).await;

    if let Err(err) = db.close().await {
        tracing::warn!(error = %err, "failed to close database connection");
    }

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        "database seeded successfully"
    );
    Ok(())
}
