//! Assertions
//!
//! `expect(&locator)` returns web-first assertions that poll the page until the
//! condition holds or the expect timeout runs out. The `ensure*` helpers check
//! plain values and fail immediately.

use std::fmt::Debug;
use std::time::Duration;

use tracing::debug;

use crate::browser::POLL_INTERVAL;
use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;

pub fn expect(locator: &Locator) -> LocatorAssertions {
    let timeout = locator.page().timeouts().expect();
    LocatorAssertions {
        locator: locator.clone(),
        timeout,
    }
}

/// Polling assertions on a locator
#[derive(Debug, Clone)]
pub struct LocatorAssertions {
    locator: Locator,
    timeout: Duration,
}

impl LocatorAssertions {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn to_be_visible(&self) -> E2eResult<()> {
        self.poll("to be visible", |l| async move {
            let visible = l.is_visible().await?;
            Ok((visible, format!("visible={}", visible)))
        })
        .await
    }

    pub async fn to_be_hidden(&self) -> E2eResult<()> {
        self.poll("to be hidden", |l| async move {
            let visible = l.is_visible().await?;
            Ok((!visible, format!("visible={}", visible)))
        })
        .await
    }

    /// Whitespace-normalized text of the first match equals `expected`
    pub async fn to_have_text(&self, expected: &str) -> E2eResult<()> {
        let expected = normalize(expected);
        let what = format!("to have text {:?}", expected);
        self.poll(&what, |l| {
            let expected = expected.clone();
            async move {
                let actual = l.text_content().await?;
                Ok((actual.as_deref() == Some(expected.as_str()), format!("{:?}", actual)))
            }
        })
        .await
    }

    pub async fn to_contain_text(&self, expected: &str) -> E2eResult<()> {
        let expected = normalize(expected);
        let what = format!("to contain text {:?}", expected);
        self.poll(&what, |l| {
            let expected = expected.clone();
            async move {
                let actual = l.text_content().await?;
                let hit = actual.as_deref().is_some_and(|t| t.contains(&expected));
                Ok((hit, format!("{:?}", actual)))
            }
        })
        .await
    }

    pub async fn to_have_count(&self, expected: usize) -> E2eResult<()> {
        let what = format!("to have count {}", expected);
        self.poll(&what, |l| async move {
            let count = l.count().await?;
            Ok((count == expected, format!("count={}", count)))
        })
        .await
    }

    async fn poll<F, Fut>(&self, what: &str, mut check: F) -> E2eResult<()>
    where
        F: FnMut(Locator) -> Fut,
        Fut: std::future::Future<Output = E2eResult<(bool, String)>>,
    {
        debug!("expect {} {}", self.locator, what);
        let deadline = tokio::time::Instant::now() + self.timeout;

        loop {
            let last = match check(self.locator.clone()).await {
                Ok((true, _)) => return Ok(()),
                Ok((false, observed)) => observed,
                Err(e) => e.to_string(),
            };
            if tokio::time::Instant::now() >= deadline {
                return Err(E2eError::AssertionFailed(format!(
                    "expected {} {} within {} ms, last observed {}",
                    self.locator,
                    what,
                    self.timeout.as_millis(),
                    last
                )));
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn ensure(condition: bool, message: impl Into<String>) -> E2eResult<()> {
    if condition {
        Ok(())
    } else {
        Err(E2eError::AssertionFailed(message.into()))
    }
}

pub fn ensure_eq<T: PartialEq + Debug>(actual: &T, expected: &T, what: &str) -> E2eResult<()> {
    ensure(
        actual == expected,
        format!("{}: expected {:?}, got {:?}", what, expected, actual),
    )
}

pub fn ensure_contains<T: PartialEq + Debug>(items: &[T], item: &T, what: &str) -> E2eResult<()> {
    ensure(
        items.contains(item),
        format!("{}: expected {:?} to contain {:?}", what, items, item),
    )
}

pub fn ensure_not_contains<T: PartialEq + Debug>(
    items: &[T],
    item: &T,
    what: &str,
) -> E2eResult<()> {
    ensure(
        !items.contains(item),
        format!("{}: expected {:?} not to contain {:?}", what, items, item),
    )
}
