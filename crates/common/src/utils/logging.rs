use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` wins; otherwise the given directives.
fn filter_or(default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Compact human-readable output on stdout, defaulting to `info,tower_http=info,axum=info`.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(filter_or("info,tower_http=info,axum=info"))
        .with_target(false)
        .compact()
        .with_writer(io::stdout)
        .try_init();
}

/// One JSON object per event on stdout, defaulting to `info,service=debug`.
pub fn init_logging_json() {
    let _ = fmt()
        .with_env_filter(filter_or("info,service=debug"))
        .with_target(false)
        .json()
        .with_writer(io::stdout)
        .try_init();
}

/// Pick the subscriber flavour from `LOG_FORMAT` (`json` or anything else).
pub fn init_logging_from_env() {
    match std::env::var("LOG_FORMAT") {
        Ok(f) if f.eq_ignore_ascii_case("json") => init_logging_json(),
        _ => init_logging_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        init_logging_default();
        init_logging_json();
        init_logging_from_env();
    }
}
