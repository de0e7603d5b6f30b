use anyhow::{anyhow, Result};
use protocol_docgen::{run, Layout};
use std::{path::PathBuf, process::ExitCode};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> ExitCode {
    // ─── 1) init logging ─────────────────────────────────────────────
    // stdout carries the result line, diagnostics go to stderr
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    match generate() {
        Ok(path) => {
            println!("document created, saved to: {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn generate() -> Result<PathBuf> {
    let root = std::env::current_dir()
        .map_err(|e| anyhow!("cannot resolve working directory: {}", e))?;
    let layout = Layout::new(root);
    debug!(config = %layout.config_path.display(), counter = %layout.counter_path.display(), "layout");

    let outcome = run(&layout).map_err(|e| {
        debug!(category = e.category(), "run aborted");
        e
    })?;
    Ok(outcome.path)
}
