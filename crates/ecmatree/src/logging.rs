//! Diagnostics go to stderr; stdout carries only the JSON report.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "ECMATREE_LOG";

/// Filter directive for a `-v` count. `-v` flags win over the environment.
pub fn directive(verbose: u8, env: Option<&str>) -> String {
    match (verbose, env) {
        (0, Some(env)) if !env.trim().is_empty() => env.to_string(),
        (0, _) => "warn".to_string(),
        (1, _) => "debug".to_string(),
        _ => "trace".to_string(),
    }
}

/// Install the stderr subscriber. Calling it twice is harmless.
pub fn init(verbose: u8) {
    let env = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::try_new(directive(verbose, env.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_warn() {
        assert_eq!(directive(0, None), "warn");
        assert_eq!(directive(0, Some("  ")), "warn");
    }

    #[test]
    fn test_env_is_used_without_flags() {
        assert_eq!(directive(0, Some("ecmatree_syntax=debug")), "ecmatree_syntax=debug");
    }

    #[test]
    fn test_flags_override_env() {
        assert_eq!(directive(1, Some("error")), "debug");
        assert_eq!(directive(3, None), "trace");
    }
}
