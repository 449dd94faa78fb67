use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use console_core::{update, AppState, Msg};
use console_logging::{console_info, console_warn};
use log::LevelFilter;

use super::commands::{self, Command, HELP};
use super::config::{self, ConfigSource};
use super::effects::EffectRunner;
use super::render;

/// Everything the main loop reacts to.
pub(crate) enum Input {
    Msg(Msg),
    Quit,
}

pub fn run_app(config_path: &Path) -> anyhow::Result<()> {
    let (config, source) = config::load(config_path)
        .with_context(|| format!("loading configuration from {config_path:?}"))?;
    console_logging::initialize(
        config.log_destination.into(),
        LevelFilter::Info,
        &config.log_file,
    );
    match source {
        ConfigSource::File => console_info!("console starting with {:?}", config_path),
        ConfigSource::Defaults => {
            console_info!("no configuration at {:?}; using defaults", config_path)
        }
    }

    let (input_tx, input_rx) = mpsc::channel::<Input>();
    let runner =
        EffectRunner::new(&config, input_tx.clone()).context("starting the request engine")?;

    // Background tick to throttle rendering.
    let tick_tx = input_tx.clone();
    thread::spawn(move || {
        let interval = Duration::from_millis(250);
        while tick_tx.send(Input::Msg(Msg::Tick)).is_ok() {
            thread::sleep(interval);
        }
    });
    spawn_stdin_reader(input_tx);

    let stdout = io::stdout();
    let mut state = AppState::new();
    while let Ok(input) = input_rx.recv() {
        let msg = match input {
            Input::Msg(msg) => msg,
            Input::Quit => break,
        };
        let render_due = matches!(msg, Msg::Tick);
        let (next, effects) = update(state, msg);
        state = next;
        runner.enqueue(effects);

        if render_due && state.consume_dirty() {
            let mut out = stdout.lock();
            for line in render::render(&state.view()) {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
            out.flush()?;
        }
    }

    console_info!("console stopped; {} polls were live", state.polls().live().count());
    Ok(())
}

fn spawn_stdin_reader(input_tx: mpsc::Sender<Input>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    console_warn!("stdin read failed: {}", err);
                    break;
                }
            };
            let input = match commands::parse(&line) {
                Ok(Some(Command::Dispatch(msg))) => Input::Msg(msg),
                Ok(Some(Command::Quit)) => Input::Quit,
                Ok(Some(Command::Help)) => {
                    println!("{HELP}");
                    continue;
                }
                Ok(None) => continue,
                Err(err) => {
                    println!("? {err}");
                    continue;
                }
            };
            if input_tx.send(input).is_err() {
                return;
            }
        }
        // End of input behaves like `quit`.
        let _ = input_tx.send(Input::Quit);
    });
}
