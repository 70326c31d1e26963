//! Application configuration loaded from environment variables.

use payment::PaymentToken;
use payment::payment::DEFAULT_TRANSITION_LIMIT;

/// Checkout configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `RUST_LOG`: tracing filter directive (default: `"info"`)
/// - `CHECKOUT_GATEWAY_DECLINE`: make the in-memory gateway decline (default: `false`)
/// - `CHECKOUT_MAX_TRANSITIONS`: transition limit per response (default: `16`)
/// - `CHECKOUT_SAVED_TOKEN`: a saved token to seed, as `<id>:<token>` (default: none)
#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    pub gateway_decline: bool,
    pub transition_limit: usize,
    pub saved_token: Option<PaymentToken>,
}

impl Config {
    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            gateway_decline: std::env::var("CHECKOUT_GATEWAY_DECLINE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            transition_limit: parse_transition_limit(
                std::env::var("CHECKOUT_MAX_TRANSITIONS").ok().as_deref(),
            ),
            saved_token: std::env::var("CHECKOUT_SAVED_TOKEN")
                .ok()
                .and_then(|v| parse_saved_token(&v)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            gateway_decline: false,
            transition_limit: DEFAULT_TRANSITION_LIMIT,
            saved_token: None,
        }
    }
}

/// Parses the transition limit, falling back to the default when it is
/// missing, malformed or zero.
pub fn parse_transition_limit(value: Option<&str>) -> usize {
    value
        .and_then(|v| v.trim().parse().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_TRANSITION_LIMIT)
}

/// Parses `<id>:<token>`, e.g. `42:pm_card_visa`.
pub fn parse_saved_token(value: &str) -> Option<PaymentToken> {
    let (id, token) = value.split_once(':')?;
    let id: u64 = id.trim().parse().ok()?;
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(PaymentToken::new(id, token))
}
