//! Health check endpoint.
//!
//! - `/livez` - Liveness check (immediate 200, touches no backend)

use axum::http::StatusCode;

/// GET /livez - Liveness check.
///
/// Returns 200 immediately. Touches neither storage nor cache.
#[axum::debug_handler]
pub async fn livez() -> StatusCode {
    StatusCode::OK
}
