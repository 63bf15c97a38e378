mod envelope;
mod rate_limit;

pub use envelope::{error_envelope, not_found};
pub use rate_limit::{RateLimitDecision, RateLimiter, rate_limit};
