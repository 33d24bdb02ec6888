//! VoiceLoop CLI entry point

use std::process::ExitCode;

use clap::Parser;

use voice_loop::cli::{
    app::{load_merged_config, run_interactive, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    presenter::Presenter,
};
use voice_loop::domain::config::AppConfig;
use voice_loop::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Handle subcommands
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Build CLI config from args
    let cli_config = AppConfig {
        endpoint: cli.endpoint.clone(),
        capture_dir: cli.capture_dir.clone(),
        timeout_secs: cli.timeout,
        volume: cli.volume,
    };

    // Merge config
    let config = load_merged_config(cli_config).await;

    run_interactive(config).await
}
