// Logging goes to stderr through tracing-subscriber so the menu on stdout stays clean.

use crate::error::{AppErr, Result};
use tracing_subscriber::EnvFilter;

/// Picks the directives in order of preference: the `--log-level` flag,
/// `RUST_LOG`, the configured level.
fn directives(flag: Option<&str>, env: Option<String>, configured: &str) -> String {
    match (flag, env) {
        (Some(level), _) => level.to_string(),
        (None, Some(env)) if !env.trim().is_empty() => env,
        _ => configured.to_string(),
    }
}

fn build_env_filter(flag: Option<&str>, configured: &str) -> Result<EnvFilter> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directives = directives(flag, env, configured);
    EnvFilter::try_new(&directives)
        .map_err(|e| AppErr::Config(format!("invalid log filter '{directives}': {e}")))
}

pub fn init(flag: Option<&str>, configured: &str) -> Result<()> {
    let filter = build_env_filter(flag, configured)?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| AppErr::Config(format!("logging already initialised: {e}")))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let env = Some("debug".to_string());
        assert_eq!(directives(Some("trace"), env, "warn"), "trace");
        // 설정 값이 잘못되어도 플래그가 있으면 쓰이지 않는다
        assert!(build_env_filter(Some("debug"), "flightdeck=loud").is_ok());
    }

    #[test]
    fn test_env_then_config() {
        assert_eq!(directives(None, Some("info".to_string()), "warn"), "info");
        assert_eq!(directives(None, Some("  ".to_string()), "warn"), "warn");
        assert_eq!(directives(None, None, "warn"), "warn");
    }

    #[test]
    fn test_per_target_directives() {
        assert!(build_env_filter(Some("warn,flightdeck=trace"), "warn").is_ok());
    }

    #[test]
    fn test_garbage_rejected() {
        match build_env_filter(Some("flightdeck=loud"), "warn") {
            Err(AppErr::Config(msg)) => assert!(msg.contains("flightdeck=loud")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }
}
