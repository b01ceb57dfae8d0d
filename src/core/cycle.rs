// SPDX-License-Identifier: GPL-3.0-only

use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::utils::StarryError;

/// Identity of one pipeline run.
///
/// Published state carries the generation of the cycle that produced it, a
/// cycle only writes while that generation is still the published one.
#[derive(Debug, Clone)]
pub struct CycleToken {
    generation: u64,
    cancel: CancellationToken,
}

impl CycleToken {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Runs `fut` unless this cycle gets superseded first, in which case `fut` is dropped
    pub async fn run<T, F>(&self, fut: F) -> Result<T, StarryError>
    where
        F: Future<Output = Result<T, StarryError>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(StarryError::Cancelled),
            result = fut => result,
        }
    }
}

/// Hands out cycle tokens, cancelling the previous one each time
#[derive(Debug, Default)]
pub struct CycleTracker {
    generation: u64,
    current: Option<CancellationToken>,
}

impl CycleTracker {
    pub fn begin(&mut self) -> CycleToken {
        if let Some(previous) = self.current.take() {
            previous.cancel();
        }

        self.generation += 1;
        let cancel = CancellationToken::new();
        self.current = Some(cancel.clone());

        CycleToken {
            generation: self.generation,
            cancel,
        }
    }

    /// Cancels the running cycle without starting a new one
    pub fn stop(&mut self) {
        if let Some(current) = self.current.take() {
            current.cancel();
        }
    }
}

impl Drop for CycleTracker {
    fn drop(&mut self) {
        self.stop();
    }
}
