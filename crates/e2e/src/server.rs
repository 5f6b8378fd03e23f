//! Target reachability - checking the application answers before any test runs

use std::time::Duration;

use tokio::time::sleep;
use tracing::{info, warn};
use url::Url;

use crate::error::{E2eError, E2eResult};

/// How long and how often to probe the target
#[derive(Debug, Clone)]
pub struct ReachabilityConfig {
    /// Give up after this long
    pub timeout: Duration,

    /// Pause between attempts
    pub interval: Duration,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl Default for ReachabilityConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            interval: Duration::from_millis(500),
            request_timeout: Duration::from_secs(5),
        }
    }
}

/// Wait for `url` to answer with a success status
pub async fn wait_for_reachable(url: &Url, config: &ReachabilityConfig) -> E2eResult<()> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let start = std::time::Instant::now();
    let mut attempts = 0;

    loop {
        attempts += 1;

        match client.get(url.clone()).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("Target {} is reachable", url);
                return Ok(());
            }
            Ok(resp) => {
                warn!("Reachability check returned {}", resp.status());
            }
            Err(e) => {
                if attempts == 1 {
                    info!("Waiting for {} to respond...", url);
                }
                if !e.is_connect() {
                    warn!("Reachability check error: {}", e);
                }
            }
        }

        if start.elapsed() >= config.timeout {
            return Err(E2eError::TargetUnreachable {
                url: url.to_string(),
                attempts,
            });
        }
        sleep(config.interval).await;
    }
}
