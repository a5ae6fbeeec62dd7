//! Per-call cancellation and deadline.
//!
//! Every service operation takes a `&CallContext`. Reads run through
//! [`CallContext::run`], which races them against the cancellation token and
//! the deadline. Writes run through [`CallContext::commit`]: once submitted
//! they are awaited to the end, since the storage thread keeps going even if
//! the future is dropped.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a call stopped before finishing.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    #[error("operation cancelled")]
    Cancelled,
    #[error("operation timed out")]
    TimedOut,
}

#[derive(Debug, Clone, Default)]
pub struct CallContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context that is never cancelled and has no deadline.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context whose deadline is `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Sets the deadline to `timeout` from now.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    /// Cancels this context and every clone of it.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns the interruption that already happened, if any.
    pub fn check(&self) -> Result<(), Interrupted> {
        if self.cancel.is_cancelled() {
            return Err(Interrupted::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Err(Interrupted::TimedOut);
        }
        Ok(())
    }

    /// Runs `fut` until it completes, the token is cancelled, or the deadline passes.
    pub async fn run<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(Interrupted::Cancelled),
            () = deadline => Err(Interrupted::TimedOut),
            output = fut => Ok(output),
        }
    }

    /// Checks the context, then drives `fut` to completion.
    ///
    /// An interruption is only reported when it happened before `fut` started,
    /// so an `Err` means nothing was submitted.
    pub async fn commit<F: Future>(&self, fut: F) -> Result<F::Output, Interrupted> {
        self.check()?;
        Ok(fut.await)
    }
}
