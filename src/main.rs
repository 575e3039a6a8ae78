use std::process::ExitCode;

use clap::Parser;
use rq_app::AppPaths;
use rq_core::ports::AppDirsPort;

use repliq::bootstrap::{tracing::init_tracing_subscriber, wiring::default_app_dirs};
use repliq::cli::Cli;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let logs_dir = default_app_dirs()
        .get_app_dirs()
        .ok()
        .map(|dirs| AppPaths::from_app_dirs(&dirs).logs_dir);
    if let Err(err) = init_tracing_subscriber(logs_dir.as_deref()) {
        eprintln!("Failed to initialize tracing: {err:#}");
    }

    match repliq::run_cli(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
