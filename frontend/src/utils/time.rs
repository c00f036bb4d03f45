use chrono::Utc;
use std::time::Duration;

/// Seconds since the Unix epoch, the unit JWT `exp` claims use.
pub fn now_unix() -> i64 {
    Utc::now().timestamp()
}

#[cfg(target_arch = "wasm32")]
pub async fn sleep(duration: Duration) {
    let millis = u32::try_from(duration.as_millis()).unwrap_or(u32::MAX);
    gloo_timers::future::TimeoutFuture::new(millis).await;
}

#[cfg(not(target_arch = "wasm32"))]
pub async fn sleep(duration: Duration) {
    tokio::time::sleep(duration).await;
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn now_unix_is_after_2024() {
        assert!(now_unix() > 1_704_067_200);
    }

    #[tokio::test]
    async fn sleep_waits_at_least_the_requested_duration() {
        let start = std::time::Instant::now();
        sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
