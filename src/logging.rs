use anyhow::{Context, Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Installs a stderr fmt subscriber filtered by `filter`. `RUST_LOG` wins
/// over the configured directive when set.
pub fn init_tracing(filter: &str) -> Result<()> {
    if filter.trim().is_empty() {
        return Err(anyhow!("logging.filter cannot be empty"));
    }
    let env_filter = match std::env::var("RUST_LOG") {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive),
        _ => EnvFilter::try_new(filter),
    }
    .with_context(|| format!("invalid logging filter '{filter}'"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init()
        .context("failed to initialize tracing subscriber")?;

    tracing::debug!(target: "logging", filter = %filter, "logging_initialized");
    Ok(())
}
