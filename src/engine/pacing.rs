//! Randomized sleeps that keep request timing inside a human-looking
//! envelope. The platform has no documented rate limit; the delays are
//! what the web client's own usage pattern looks like.

use crate::config::PacingConfig;
use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

async fn sleep_range(min_ms: u64, max_ms: u64) {
    // Draw outside the await so the rng never crosses it.
    let ms = if max_ms > min_ms {
        rand::thread_rng().gen_range(min_ms..max_ms)
    } else {
        min_ms
    };
    if ms > 0 {
        sleep(Duration::from_millis(ms)).await;
    }
}

/// Pause before a like or comment.
pub async fn action_pause(config: &PacingConfig) {
    sleep_range(config.action_delay_min_ms, config.action_delay_max_ms).await;
}

/// Extra back-off after a failed platform call.
pub async fn failure_pause(config: &PacingConfig) {
    sleep_range(config.failure_delay_ms, config.failure_delay_ms).await;
}

/// Pause between listing pages during discovery.
pub async fn page_pause(config: &PacingConfig) {
    sleep_range(config.page_delay_min_ms, config.page_delay_max_ms).await;
}
