use anyhow::{Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Core configuration loaded from environment variables.
/// The embedding application calls `Config::from_env()` once at startup and
/// constructs the orchestrator/coordinator pair from it.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub rust_log: String,
    /// Ring-buffer capacity for the orchestrator's execution history.
    pub history_capacity: usize,
    /// Default per-execution timeout hint, in milliseconds.
    pub default_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            history_capacity: std::env::var("AGENT_HISTORY_CAPACITY")
                .unwrap_or_else(|_| "1000".to_string())
                .parse::<usize>()
                .context("AGENT_HISTORY_CAPACITY must be a positive integer")?,
            default_timeout_ms: std::env::var("AGENT_TIMEOUT_MS")
                .unwrap_or_else(|_| "60000".to_string())
                .parse::<u64>()
                .context("AGENT_TIMEOUT_MS must be a duration in milliseconds")?,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Initializes structured logging for the embedding application.
/// Honors `RUST_LOG` when set, otherwise falls back to the given filter.
pub fn init_tracing(default_filter: &str) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
