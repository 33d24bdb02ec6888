//! Main app runner for the interactive voice loop

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinHandle;

use crate::application::ports::ConfigStore;
use crate::application::SessionCoordinator;
use crate::domain::config::AppConfig;
use crate::domain::CaptureState;
use crate::infrastructure::{CpalCapture, HttpUploader, RodioPlayer, XdgConfigStore};

use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the interactive record/send/playback loop
pub async fn run_interactive(config: AppConfig) -> ExitCode {
    let mut presenter = Presenter::new();

    let endpoint = match config.endpoint() {
        Ok(endpoint) => endpoint.to_string(),
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_USAGE_ERROR);
        }
    };

    let capture_dir = match prepare_capture_dir(&config) {
        Ok(dir) => dir,
        Err(e) => {
            presenter.error(&e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let capture = Arc::new(CpalCapture::new(capture_dir));
    let uploader = match HttpUploader::new(
        endpoint.clone(),
        Duration::from_secs(config.timeout_secs_or_default()),
    ) {
        Ok(uploader) => uploader,
        Err(e) => {
            presenter.error(&format!("Failed to initialize HTTP client: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let player = RodioPlayer::new(config.volume_or_default());
    let coordinator = SessionCoordinator::new(capture, uploader, player);

    presenter.info(&format!("Endpoint: {}", endpoint));
    presenter.info("Commands: start, stop, send, quit");

    let mut meter: Option<JoinHandle<()>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break, // stdin closed
            Err(e) => {
                presenter.error(&format!("Failed to read input: {}", e));
                return ExitCode::from(EXIT_ERROR);
            }
        };

        match line.trim() {
            "" => {}
            "start" | "r" => match coordinator.start_capture().await {
                Ok(()) => {
                    meter = Some(spawn_meter(&coordinator));
                    presenter.info("Recording. Type 'stop' to finish.");
                }
                Err(e) => presenter.error(&e.to_string()),
            },
            "stop" | "s" => {
                stop_meter(&mut meter, &presenter);
                coordinator.stop_capture().await;
                presenter.success("Recording stopped");
            }
            "send" => {
                if coordinator.state().await == CaptureState::Recording {
                    stop_meter(&mut meter, &presenter);
                    coordinator.stop_capture().await;
                }
                presenter.start_spinner("Sending...");
                match coordinator.submit().await {
                    Ok(output) => {
                        presenter.spinner_success(&format!("Reply received ({})", output.reply_size));
                        if let Some(transcript) = &output.transcript {
                            presenter.output(&format!("You said: {}", transcript));
                        }
                        if let Some(text) = &output.response_text {
                            presenter.output(text);
                        }
                        output.playback.finished().await;
                        presenter.success("Playback complete");
                    }
                    Err(e) => presenter.spinner_fail(&e.to_string()),
                }
            }
            "quit" | "q" | "exit" => break,
            other => presenter.error(&format!(
                "Unknown command '{}'. Commands: start, stop, send, quit",
                other
            )),
        }
    }

    stop_meter(&mut meter, &presenter);
    if coordinator.state().await == CaptureState::Recording {
        coordinator.stop_capture().await;
    }

    ExitCode::from(EXIT_SUCCESS)
}

/// Spawn the live level meter task
fn spawn_meter<C, U, P>(coordinator: &SessionCoordinator<C, U, P>) -> JoinHandle<()>
where
    C: crate::application::ports::AudioCapture + 'static,
    U: crate::application::ports::Uploader,
    P: crate::application::ports::AudioPlayer,
{
    let mut levels = coordinator.levels();
    tokio::spawn(async move {
        let presenter = Presenter::new();
        while levels.changed().await.is_ok() {
            let frame = levels.borrow_and_update().clone();
            presenter.show_levels(&frame);
        }
    })
}

/// Abort the meter task and clear its line
fn stop_meter(meter: &mut Option<JoinHandle<()>>, presenter: &Presenter) {
    if let Some(handle) = meter.take() {
        handle.abort();
        presenter.clear_levels();
    }
}

/// Resolve and create the capture directory
fn prepare_capture_dir(config: &AppConfig) -> Result<PathBuf, String> {
    let dir = match &config.capture_dir {
        Some(dir) => PathBuf::from(dir),
        None => dirs::data_dir()
            .ok_or_else(|| "Could not determine data directory".to_string())?
            .join("voice-loop"),
    };
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("Failed to create capture directory {}: {}", dir.display(), e))?;
    Ok(dir)
}

/// Load and merge configuration from file, env, and CLI
pub async fn load_merged_config(cli_config: AppConfig) -> AppConfig {
    let store = XdgConfigStore::new();
    let file_config = store.load().await.unwrap_or_else(|_| AppConfig::empty());

    // Build env config
    let env_config = AppConfig {
        endpoint: env::var("VOICE_LOOP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        ..Default::default()
    };

    // Merge: defaults < file < env < cli
    AppConfig::defaults()
        .merge(file_config)
        .merge(env_config)
        .merge(cli_config)
}
