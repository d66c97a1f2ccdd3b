// Ambient Deadline Token
// Soft time limit imposed by whoever schedules the scan, observed at the process-wait boundary

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Deadline signal handed to `ProcessInvoker::execute`
#[derive(Clone)]
pub struct DeadlineToken {
    rx: watch::Receiver<bool>,
}

impl DeadlineToken {
    /// Token that never fires
    pub fn never() -> Self {
        let (_tx, rx) = watch::channel(false);
        Self { rx }
    }

    /// Check if the deadline already fired
    pub fn is_expired(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the deadline
    ///
    /// Stays pending forever if the sender is dropped without firing.
    pub async fn expired(&mut self) {
        loop {
            if *self.rx.borrow_and_update() {
                return;
            }
            if self.rx.changed().await.is_err() {
                if *self.rx.borrow() {
                    return;
                }
                std::future::pending::<()>().await;
            }
        }
    }
}

/// Deadline sender, held by the scheduler side
pub struct DeadlineSender {
    tx: watch::Sender<bool>,
}

impl DeadlineSender {
    /// Signal the deadline to every token
    pub fn fire(&self) {
        let _ = self.tx.send(true);
    }

    /// Fire once `after` has elapsed (must be called inside a tokio runtime)
    pub fn fire_after(self, after: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            self.fire();
        })
    }
}

/// Create a deadline channel
pub fn deadline_channel() -> (DeadlineSender, DeadlineToken) {
    let (tx, rx) = watch::channel(false);
    (DeadlineSender { tx }, DeadlineToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_fire_wakes_waiter() {
        let (sender, mut token) = deadline_channel();
        assert!(!token.is_expired());

        sender.fire();

        tokio_test::assert_ok!(timeout(Duration::from_secs(1), token.expired()).await);
        assert!(token.is_expired());
    }

    #[tokio::test]
    async fn test_fire_after_elapses() {
        let (sender, mut token) = deadline_channel();
        let _handle = sender.fire_after(Duration::from_millis(20));

        tokio_test::assert_ok!(timeout(Duration::from_secs(2), token.expired()).await);
    }

    #[tokio::test]
    async fn test_never_stays_pending() {
        let mut token = DeadlineToken::never();

        tokio_test::assert_err!(timeout(Duration::from_millis(50), token.expired()).await);
        assert!(!token.is_expired());
    }

    #[tokio::test]
    async fn test_dropped_sender_after_fire_still_expired() {
        let (sender, mut token) = deadline_channel();
        sender.fire();
        drop(sender);

        tokio_test::assert_ok!(timeout(Duration::from_secs(1), token.expired()).await);
    }
}
