use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warden_config::{ConfigLoader, WardenConfig};
use warden_core::{ErrorResponse, WardenRequest, WardenResponse};
use warden_governor::Warden;

/// Serves the Warden control plane as JSON request/response lines:
/// one request per stdin line, one response per stdout line. Logs go
/// to stderr so stdout stays protocol-only.
#[derive(Parser)]
#[command(name = "warden", version, about = "Token budget governor for generated output")]
struct Args {
    /// Path to warden.toml (defaults to $WARDEN_CONFIG, then ./warden.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the startup mode (EXECUTION or DESIGN).
    #[arg(long)]
    mode: Option<String>,
}

fn main() {
    let args = Args::parse();
    if let Err(e) = run(args) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> warden_core::Result<()> {
    let config = ConfigLoader::load(args.config.as_deref())?.into_config();
    init_tracing(&config);

    let warden = Warden::from_config(&config);
    if let Some(mode) = &args.mode {
        warden.set_mode(mode)?;
    }
    info!(state_hash = %warden.get_state().state_hash, "warden ready");

    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let response = match serde_json::from_str::<WardenRequest>(&line) {
            Ok(request) => warden.handle(request),
            Err(e) => WardenResponse::Error(ErrorResponse {
                error: format!("malformed request: {e}"),
                reason: None,
                fail_closed: false,
            }),
        };
        let json = serde_json::to_string(&response)?;
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn init_tracing(config: &WardenConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
}
