//! Terminal page for the member score lookup.
//!
//! Reads one name per line from stdin. While a lookup runs, the request
//! executes on a worker thread and this thread drives the controller at
//! frame rate, mirroring the indicator into an `indicatif` bar on stderr.

mod render;
mod transport;

use std::env;
use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use score_lookup_core::config::DEFAULT_ENDPOINT;
use score_lookup_core::{LoadingPhase, LookupConfig, LookupController, PendingLookup};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::render::{render_page, Styling};
use crate::transport::Transport;

const FRAME: Duration = Duration::from_millis(16);

fn env_u64(name: &str) -> Option<u64> {
    env::var(name).ok().and_then(|v| v.parse::<u64>().ok())
}

fn config_from_env() -> LookupConfig {
    let mut config = LookupConfig::with_endpoint(
        &env::var("SCORE_LOOKUP_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
    );
    if let Some(ms) = env_u64("SCORE_LOOKUP_TIMEOUT_MS") {
        config.request_timeout = Duration::from_millis(ms);
    }
    config
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn progress_bar() -> ProgressBar {
    let bar = ProgressBar::with_draw_target(Some(100), ProgressDrawTarget::stderr());
    if let Ok(style) = ProgressStyle::with_template("{bar:40.magenta/white} {percent:>3}% {msg}") {
        bar.set_style(style.progress_chars("██░"));
    }
    bar
}

/// Drive one lookup until the request has ended and the indicator is hidden.
fn run_lookup(controller: &mut LookupController, transport: &Transport, pending: PendingLookup) {
    let (tx, rx) = mpsc::channel();
    let request = pending.request;
    let worker = transport.clone();
    thread::spawn(move || {
        let _ = tx.send(worker.execute(&request));
    });

    let bar = progress_bar();
    loop {
        if let Ok(outcome) = rx.try_recv() {
            controller.complete(pending.id, outcome, Instant::now());
        }
        controller.poll(Instant::now());

        let indicator = controller.animator().indicator();
        if indicator.visible {
            bar.set_position(indicator.fill_percent.round() as u64);
            bar.set_message(indicator.text.to_string());
        }
        if !controller.is_busy() && controller.animator().state().phase == LoadingPhase::Idle {
            break;
        }
        thread::sleep(FRAME);
    }
    bar.finish_and_clear();
}

fn main() -> Result<()> {
    init_tracing();
    let config = config_from_env();
    debug!(endpoint = %config.endpoint, "starting");

    let transport = Transport::new(config.request_timeout);
    let mut controller = LookupController::new(config);
    let styling = if io::stdout().is_terminal() {
        Styling::Terminal
    } else {
        Styling::Plain
    };

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();
    loop {
        write!(stdout, "名前> ")?;
        stdout.flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line).context("reading name from stdin")? == 0 {
            break;
        }

        if let Ok(pending) = controller.submit(&line, Instant::now()) {
            run_lookup(&mut controller, &transport, pending);
        }

        let page = render_page(controller.status(), controller.results(), styling);
        write!(stdout, "{page}").context("writing results")?;
    }
    Ok(())
}
