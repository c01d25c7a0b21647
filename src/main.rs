//! demodeck entry point

use clap::Parser;
use demodeck::analysis::ExampleAnalyzer;
use demodeck::config::{Cli, Settings};
use demodeck::server::AppState;
use demodeck::{cleanup, samples, server};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // .env is optional; missing file is fine
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&cli);

    let settings = match Settings::resolve(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = settings.ensure_directories() {
        eprintln!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    cleanup::sweep(&settings.temp_dir, settings.cleanup_days);

    let sample_list = samples::discover(&settings.samples_dir);

    let analyzer = Arc::new(ExampleAnalyzer::new(&settings.temp_dir));
    let state = Arc::new(AppState::new(settings, sample_list, analyzer));

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: could not start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(server::launch(state)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(cli: &Cli) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.log_level().to_string())),
        )
        .with_target(false)
        .init();
}
