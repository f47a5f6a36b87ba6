// SPDX-License-Identifier: MPL-2.0
use media_shell::config;
use media_shell::engine::SimulatedEngine;
use media_shell::logging;
use media_shell::presentation::HeadlessHost;
use media_shell::Shell;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_RUN_SECS: u64 = 5;

struct Flags {
    config_dir: Option<String>,
    run_secs: u64,
    fullscreen: bool,
    files: Vec<PathBuf>,
}

fn parse_flags() -> Result<Flags, pico_args::Error> {
    let mut args = pico_args::Arguments::from_env();
    let flags = Flags {
        config_dir: args.opt_value_from_str("--config-dir")?,
        run_secs: args
            .opt_value_from_str("--run-secs")?
            .unwrap_or(DEFAULT_RUN_SECS),
        fullscreen: args.contains("--fullscreen"),
        files: args.finish().into_iter().map(PathBuf::from).collect(),
    };
    Ok(flags)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let flags = match parse_flags() {
        Ok(flags) => flags,
        Err(err) => {
            eprintln!("media-shell: {err}");
            eprintln!("usage: media-shell [--config-dir DIR] [--run-secs N] [--fullscreen] FILE...");
            std::process::exit(2);
        }
    };

    config::paths::init_cli_override(flags.config_dir);
    let (config, warning) = config::load();
    logging::init(config.general.log_level.as_deref());
    if let Some(warning) = warning {
        tracing::warn!("{warning}");
    }

    let mut shell = Shell::new(
        &config,
        Box::new(SimulatedEngine::new()),
        Box::new(HeadlessHost::new()),
    );
    let outcome = shell.start();
    tracing::info!(?outcome, "shell started");

    if flags.files.is_empty() {
        tracing::warn!("no media given; running idle");
    } else if !shell.open(flags.files) {
        tracing::error!("could not select the first playlist entry");
    }
    if flags.fullscreen {
        shell.with_application(|app, out| app.toggle_fullscreen(out));
    }

    shell.run_for(Duration::from_secs(flags.run_secs)).await;

    {
        let state = shell.state().read();
        tracing::info!(
            title = state.window_title(),
            playing = state.is_playing(),
            position_ms = state.current_time_ms(),
            duration_ms = state.total_duration_ms(),
            "final playback state"
        );
    }
    shell.shutdown();
}
