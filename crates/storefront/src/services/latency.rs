//! Simulated network latency.
//!
//! Login, registration and checkout pause before completing so front ends
//! can show a pending state. A wait can be abandoned through a
//! [`CancellationToken`]; without one it always runs to completion.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// The wait was cancelled before the delay elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("operation cancelled")]
pub struct Cancelled;

/// A fixed artificial delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Latency(Duration);

impl Latency {
    /// No delay at all.
    pub const NONE: Self = Self(Duration::ZERO);

    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self(delay)
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.0
    }

    /// Sleep for the configured delay.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `cancel` fires first. A token that is already
    /// cancelled wins even when the delay is zero.
    pub async fn wait(&self, cancel: Option<&CancellationToken>) -> Result<(), Cancelled> {
        let Some(token) = cancel else {
            if !self.0.is_zero() {
                tokio::time::sleep(self.0).await;
            }
            return Ok(());
        };

        tokio::select! {
            biased;
            () = token.cancelled() => Err(Cancelled),
            () = tokio::time::sleep(self.0) => Ok(()),
        }
    }
}

impl From<Duration> for Latency {
    fn from(delay: Duration) -> Self {
        Self(delay)
    }
}
