// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Environment variable read before `RUST_LOG`, so an embedding application
/// can tune engine logging without touching its own filter.
pub const LOG_ENV: &str = "T81_LOG";

/// Engine events at `info`, everything else (including bridged `log` records)
/// at `warn`.
pub const DEFAULT_DIRECTIVE: &str = "warn,t81=info";

/// Initializes the global `tracing` subscriber for structured JSON logging.
///
/// The filter comes from `T81_LOG`, then `RUST_LOG`, then [`DEFAULT_DIRECTIVE`].
pub fn init_tracing() -> Result<(), anyhow::Error> {
    init_tracing_with_default(DEFAULT_DIRECTIVE)
}

/// Like [`init_tracing`], with an explicit fallback directive such as `"t81=debug"`.
pub fn init_tracing_with_default(default_directive: &str) -> Result<(), anyhow::Error> {
    let engine_env = std::env::var(LOG_ENV).ok();
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = select_directive(engine_env.as_deref(), rust_log.as_deref(), default_directive);
    let filter = EnvFilter::try_new(directive)
        .map_err(|e| anyhow::anyhow!("invalid log directive {:?}: {}", directive, e))?;

    // Engine targets are all `t81::<module>`; the span list adds the operation
    // context when a caller wraps engine calls in spans.
    let fmt_layer = fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_current_span(false)
        .with_span_list(true)
        .with_timer(fmt::time::UtcTime::rfc_3339());
    let subscriber = Registry::default().with(filter).with(fmt_layer);
    tracing_log::LogTracer::init()?;
    tracing::subscriber::set_global_default(subscriber)?;
    tracing::debug!(target: "t81::telemetry", directive, "structured logging initialized");
    Ok(())
}

/// Picks the first non-blank directive in precedence order.
fn select_directive<'a>(
    engine_env: Option<&'a str>,
    rust_log: Option<&'a str>,
    fallback: &'a str,
) -> &'a str {
    [engine_env, rust_log]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|d| !d.is_empty())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_variable_takes_precedence() {
        assert_eq!(
            select_directive(Some("t81=trace"), Some("debug"), DEFAULT_DIRECTIVE),
            "t81=trace"
        );
        assert_eq!(
            select_directive(None, Some("debug"), DEFAULT_DIRECTIVE),
            "debug"
        );
        assert_eq!(select_directive(None, None, DEFAULT_DIRECTIVE), DEFAULT_DIRECTIVE);
    }

    #[test]
    fn test_blank_variables_fall_through() {
        assert_eq!(
            select_directive(Some("  "), Some(""), "t81::mul=trace"),
            "t81::mul=trace"
        );
    }

    #[test]
    fn test_default_directive_parses() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVE).is_ok());
        assert!(EnvFilter::try_new("warn,t81::mul=trace,t81::storage=debug").is_ok());
    }
}
