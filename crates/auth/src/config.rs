use std::time::Duration;

use uuid::Uuid;

/// Default access token lifetime in minutes.
pub const DEFAULT_TOKEN_TTL_MINUTES: u64 = 60;

/// Longest accepted `JWT_TTL_MINUTES`: one year.
pub const MAX_TOKEN_TTL_MINUTES: u64 = 366 * 24 * 60;

/// Default cookie consulted when no `Authorization` header is sent.
pub const DEFAULT_COOKIE_NAME: &str = "token";

/// Complete auth configuration.
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub cookie_name: String,
}

impl AuthConfig {
    /// Creates a configuration with default lifetime, cost and cookie name.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            token_ttl: default_token_ttl(),
            bcrypt_cost: bcrypt::DEFAULT_COST,
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Self {
        self.bcrypt_cost = cost;
        self
    }

    /// Load from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `JWT_SECRET`: HMAC secret for signing tokens. When unset a random
    ///   secret is generated, so tokens do not survive a restart.
    /// - `JWT_TTL_MINUTES`: Token lifetime in minutes (default: 60)
    /// - `BCRYPT_COST`: bcrypt work factor, 4 to 31 (default: 12)
    /// - `AUTH_COOKIE_NAME`: Cookie holding the token for browser clients (default: `token`)
    pub fn from_env() -> Self {
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, using a random secret for this process");
                format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
            }
        };

        let token_ttl = match std::env::var("JWT_TTL_MINUTES") {
            Ok(raw) => parse_token_ttl(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "Ignoring invalid JWT_TTL_MINUTES");
                default_token_ttl()
            }),
            Err(_) => default_token_ttl(),
        };

        let bcrypt_cost = match std::env::var("BCRYPT_COST") {
            Ok(raw) => match raw.parse::<u32>() {
                Ok(cost) if (4..=31).contains(&cost) => cost,
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid BCRYPT_COST");
                    bcrypt::DEFAULT_COST
                }
            },
            Err(_) => bcrypt::DEFAULT_COST,
        };

        let cookie_name =
            std::env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.to_string());

        Self {
            jwt_secret,
            token_ttl,
            bcrypt_cost,
            cookie_name,
        }
    }
}

fn default_token_ttl() -> Duration {
    Duration::from_secs(DEFAULT_TOKEN_TTL_MINUTES * 60)
}

/// Parses a lifetime in minutes between 1 and [`MAX_TOKEN_TTL_MINUTES`].
fn parse_token_ttl(raw: &str) -> Option<Duration> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|minutes| (1..=MAX_TOKEN_TTL_MINUTES).contains(minutes))
        .and_then(|minutes| minutes.checked_mul(60))
        .map(Duration::from_secs)
}
