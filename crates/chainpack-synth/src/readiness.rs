//! One-shot backend readiness latch.
//!
//! Backends finish a process-wide initialization once; synthesis must not
//! start before that. The backend keeps the [`ReadySignal`] and fires it when
//! initialization completes, every synthesis run awaits its [`Readiness`].

use tokio::sync::watch;

use crate::{Result, SynthError};

/// Firing side of the latch, held by the backend.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<bool>,
}

impl ReadySignal {
    /// Mark the backend as initialized. Firing more than once has no effect.
    pub fn fire(&self) {
        self.tx.send_replace(true);
    }
}

/// Waiting side of the latch. Clones observe the same signal.
#[derive(Debug, Clone)]
pub struct Readiness {
    rx: watch::Receiver<bool>,
}

impl Readiness {
    pub fn new() -> (ReadySignal, Readiness) {
        let (tx, rx) = watch::channel(false);
        (ReadySignal { tx }, Readiness { rx })
    }

    /// Readiness of a backend that needs no initialization
    pub fn ready() -> Self {
        let (signal, readiness) = Self::new();
        signal.fire();
        readiness
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait until the signal fires.
    ///
    /// # Errors
    ///
    /// [`SynthError::BackendUnavailable`] if the [`ReadySignal`] is dropped
    /// without having fired.
    pub async fn wait(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let mut rx = self.rx.clone();
        rx.wait_for(|ready| *ready)
            .await
            .map(|_| ())
            .map_err(|_| SynthError::BackendUnavailable)
    }
}

impl Default for Readiness {
    fn default() -> Self {
        Self::ready()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ready_latch_resolves_immediately() {
        Readiness::ready().wait().await.unwrap();
    }

    #[tokio::test]
    async fn wait_resumes_after_fire() {
        let (signal, readiness) = Readiness::new();
        assert!(!readiness.is_ready());

        let waiter = tokio::spawn({
            let readiness = readiness.clone();
            async move { readiness.wait().await }
        });
        tokio::task::yield_now().await;
        signal.fire();

        waiter.await.unwrap().unwrap();
        assert!(readiness.is_ready());
    }

    #[tokio::test]
    async fn dropped_signal_is_reported() {
        let (signal, readiness) = Readiness::new();
        drop(signal);
        assert!(matches!(
            readiness.wait().await,
            Err(SynthError::BackendUnavailable)
        ));
    }

    #[tokio::test]
    async fn fired_then_dropped_signal_stays_ready() {
        let (signal, readiness) = Readiness::new();
        signal.fire();
        drop(signal);
        readiness.wait().await.unwrap();
    }
}
