use std::num::NonZeroU32;

use governor::{
    Quota, RateLimiter,
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
};

/// Caps outgoing RPC calls at a fixed rate. Without a limit every call passes
/// through immediately.
pub struct RpcRateLimiter {
    limiter: Option<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>,
}

impl RpcRateLimiter {
    pub fn new(requests_per_second: Option<u32>) -> Self {
        let limiter = requests_per_second.and_then(|rps| {
            NonZeroU32::new(rps).map(|rps| RateLimiter::direct(Quota::per_second(rps)))
        });

        Self { limiter }
    }

    pub fn is_limited(&self) -> bool {
        self.limiter.is_some()
    }

    /// Wait until a request can be made according to the rate limit.
    pub async fn acquire(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.until_ready().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unlimited_limiter_never_waits() {
        let limiter = RpcRateLimiter::new(None);
        assert!(!limiter.is_limited());
        for _ in 0..100 {
            limiter.acquire().await;
        }
    }

    #[test]
    fn zero_rate_means_unlimited() {
        assert!(!RpcRateLimiter::new(Some(0)).is_limited());
        assert!(RpcRateLimiter::new(Some(25)).is_limited());
    }
}
