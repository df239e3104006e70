use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive, e.g. `napigen=debug`.
pub const LOG_ENV: &str = "NAPIGEN_LOG";

/// Installs the global fmt subscriber on stderr. `NAPIGEN_LOG` wins over the
/// `verbose` default. Calling this twice is harmless.
pub fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "napigen=debug,napigen_cache=debug"
    } else {
        "napigen=info,napigen_cache=info"
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
