use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod command;
mod relocate;
mod util;

fn main() -> anyhow::Result<()> {
    init_tracing();
    command::run()
}

/// Logs go to stderr, filtered by `CENTRALITY_LOG` (default `info`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env("CENTRALITY_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
