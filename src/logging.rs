use anyhow::{Context, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the default level is `info`, raised
/// to `debug` for this crate when the `--debug` flag is passed.
pub fn init(debug: bool) -> Result<()> {
    let default_directives = if debug { "info,watchdir=debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    fmt()
        .with_env_filter(filter)
        .with_timer(fmt::time::LocalTime::rfc_3339())
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("{err}"))
        .context("failed to install tracing subscriber")?;

    Ok(())
}
