use std::time::Duration;

use chrono::{DateTime, Utc};

use super::Claims;

/// Extracts the token from an `Authorization` header value.
///
/// The scheme is matched case-insensitively; an empty token is rejected.
pub fn parse_bearer(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

/// Calculate token expiry (epoch seconds) from issue time and lifetime.
///
/// Saturates at `i64::MAX` instead of wrapping.
pub fn calculate_expiry(issued_at: DateTime<Utc>, ttl: Duration) -> i64 {
    let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
    issued_at.timestamp().saturating_add(ttl_secs)
}

/// Check if a token's claims have expired.
pub fn is_token_expired(claims: &Claims, now: DateTime<Utc>) -> bool {
    claims.exp <= now.timestamp()
}

/// Time left before the token expires, or `None` if it already has.
pub fn remaining_lifetime(claims: &Claims, now: DateTime<Utc>) -> Option<Duration> {
    let remaining = claims.exp.saturating_sub(now.timestamp());
    (remaining > 0).then(|| Duration::from_secs(remaining as u64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn claims_expiring_at(exp: i64) -> Claims {
        Claims {
            sub: "user".to_string(),
            jti: "jti".to_string(),
            iat: exp - 3600,
            exp,
        }
    }

    #[test]
    fn parse_bearer_accepts_standard_header() {
        assert_eq!(parse_bearer("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(parse_bearer("bearer abc"), Some("abc"));
    }

    #[test]
    fn parse_bearer_rejects_other_schemes() {
        assert_eq!(parse_bearer("Basic dXNlcjpwYXNz"), None);
        assert_eq!(parse_bearer("Bearer"), None);
        assert_eq!(parse_bearer("Bearer    "), None);
        assert_eq!(parse_bearer(""), None);
    }

    #[test]
    fn calculate_expiry_adds_ttl() {
        let issued = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();
        let exp = calculate_expiry(issued, Duration::from_secs(3600));
        assert_eq!(exp, issued.timestamp() + 3600);
    }

    #[test]
    fn calculate_expiry_saturates() {
        let issued = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();
        assert_eq!(calculate_expiry(issued, Duration::from_secs(u64::MAX)), i64::MAX);
    }

    #[test]
    fn expiry_boundary_counts_as_expired() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();
        assert!(is_token_expired(&claims_expiring_at(now.timestamp()), now));
        assert!(!is_token_expired(&claims_expiring_at(now.timestamp() + 1), now));
    }

    #[test]
    fn remaining_lifetime_for_live_and_dead_tokens() {
        let now = Utc.with_ymd_and_hms(2024, 5, 20, 14, 0, 0).unwrap();

        assert_eq!(
            remaining_lifetime(&claims_expiring_at(now.timestamp() + 90), now),
            Some(Duration::from_secs(90))
        );
        assert_eq!(
            remaining_lifetime(&claims_expiring_at(now.timestamp() - 1), now),
            None
        );
    }
}
