mod error;
mod functions;
mod types;

pub use error::AuthError;
pub use functions::{calculate_expiry, is_token_expired, parse_bearer, remaining_lifetime};
pub use types::{Claims, IssuedToken};
