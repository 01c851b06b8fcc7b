//! # STRATA Headless
//!
//! Streams, simulates and culls a world around a scripted observer, with no
//! window and no GPU. Useful for profiling and for checking a config.
//!
//! ```bash
//! # Defaults: 600 ticks walking east from (8, 8)
//! ./strata_headless
//!
//! # Custom session, verbose logs
//! RUST_LOG=debug ./strata_headless strata.toml
//! ```

use std::process::ExitCode;

use strata::{Session, SessionConfig};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = match std::env::args().nth(1) {
        Some(path) => match SessionConfig::from_file(&path) {
            Ok(config) => {
                tracing::info!("loaded session config from {}", path);
                config
            }
            Err(e) => {
                tracing::error!("FATAL: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => SessionConfig::default(),
    };

    let mut session = Session::new(config);
    session.run().log_summary();

    let world = session.simulation().world_handle();
    let stats = world.read().stats();
    tracing::info!(
        "final world: {} chunks loaded, {} generated, {} evicted, {} fluids pending",
        stats.loaded_chunks,
        stats.generated_this_session,
        stats.evicted_this_session,
        stats.pending_fluids
    );
    ExitCode::SUCCESS
}
