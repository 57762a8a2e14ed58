//! Log output for the command line tool.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Install a stderr subscriber.
///
/// `RUST_LOG` takes precedence; otherwise each `-v` raises the level by one
/// step from `warn`.
pub fn init_logging(verbose: u8) {
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::builder()
        .with_default_directive(verbosity_to_filter(verbose).into())
        .from_env_lossy();

    let layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let subscriber = tracing_subscriber::registry().with(filter).with(layer);

    // Try to set as global default (ignore error if already set)
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn verbosity_to_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}
