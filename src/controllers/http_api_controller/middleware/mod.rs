mod rate_limiter;

pub(crate) use rate_limiter::RateLimiterConfig;
