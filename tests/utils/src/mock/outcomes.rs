use anyhow::{anyhow, Result};
use std::time::Duration;
use tokio::sync::mpsc;
use wallet_core::InitOutcome;

const WAIT: Duration = Duration::from_secs(5);

/// Receives tagged completion outcomes from registry callbacks.
pub struct Outcomes {
    tx: mpsc::UnboundedSender<(usize, InitOutcome)>,
    rx: mpsc::UnboundedReceiver<(usize, InitOutcome)>,
}

impl Default for Outcomes {
    fn default() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }
}

impl Outcomes {
    /// Create a receiver.
    pub fn new() -> Self {
        Default::default()
    }

    /// Callback sending its outcome tagged with `tag`.
    pub fn callback(
        &self,
        tag: usize,
    ) -> impl FnOnce(InitOutcome) + Send + 'static {
        let tx = self.tx.clone();
        move |outcome| {
            let _ = tx.send((tag, outcome));
        }
    }

    /// Next outcome, waiting for it to arrive.
    pub async fn next(&mut self) -> Result<(usize, InitOutcome)> {
        tokio::time::timeout(WAIT, self.rx.recv())
            .await?
            .ok_or_else(|| anyhow!("outcome channel closed"))
    }

    /// Outcome already delivered, if any.
    pub fn try_next(&mut self) -> Option<(usize, InitOutcome)> {
        self.rx.try_recv().ok()
    }

    /// Wait for a number of outcomes.
    pub async fn collect(
        &mut self,
        count: usize,
    ) -> Result<Vec<(usize, InitOutcome)>> {
        let mut outcomes = Vec::with_capacity(count);
        for _ in 0..count {
            outcomes.push(self.next().await?);
        }
        Ok(outcomes)
    }

    /// Determine if no outcome arrives within a short delay.
    pub async fn is_quiet(&mut self) -> bool {
        tokio::time::timeout(Duration::from_millis(100), self.rx.recv())
            .await
            .is_err()
    }
}
