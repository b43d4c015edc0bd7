// Worker Shutdown Token

use tokio::sync::watch;

/// Shutdown signal for graceful termination, observed by every worker
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<bool>,
}

impl ShutdownToken {
    /// Check if shutdown was requested (non-blocking)
    pub fn is_shutdown(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for shutdown signal
    ///
    /// Returns immediately if shutdown was already requested, or if the
    /// sender is gone.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|stop| *stop).await;
    }
}

/// Shutdown sender, owned by the supervisor
pub struct ShutdownSender {
    tx: watch::Sender<bool>,
}

impl ShutdownSender {
    /// Signal shutdown to all workers
    ///
    /// Returns true only for the call that actually closed the signal.
    pub fn shutdown(&self) -> bool {
        self.tx.send_if_modified(|stop| {
            if *stop {
                false
            } else {
                *stop = true;
                true
            }
        })
    }

    /// Hand out another token observing this sender
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(false);
    (ShutdownSender { tx }, ShutdownToken { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready, task};

    #[test]
    fn test_wait_pending_until_shutdown() {
        let (tx, mut token) = shutdown_channel();
        assert!(!token.is_shutdown());

        let mut waiting = task::spawn(token.wait());
        assert_pending!(waiting.poll());

        assert!(tx.shutdown());
        assert!(waiting.is_woken());
        assert_ready!(waiting.poll());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let (tx, token) = shutdown_channel();
        assert!(tx.shutdown());
        assert!(!tx.shutdown());
        assert!(token.is_shutdown());
    }

    #[test]
    fn test_all_tokens_observe_one_broadcast() {
        let (tx, token) = shutdown_channel();
        let mut tokens: Vec<ShutdownToken> = (0..16).map(|_| token.clone()).collect();
        tokens.push(tx.token());

        tx.shutdown();

        for token in tokens.iter_mut() {
            assert!(token.is_shutdown());
            let mut waiting = task::spawn(token.wait());
            assert_ready!(waiting.poll());
        }
    }

    #[test]
    fn test_token_created_after_shutdown_sees_it() {
        let (tx, _token) = shutdown_channel();
        tx.shutdown();
        assert!(tx.token().is_shutdown());
    }

    #[test]
    fn test_dropped_sender_releases_waiters() {
        let (tx, mut token) = shutdown_channel();
        let mut waiting = task::spawn(token.wait());
        assert_pending!(waiting.poll());

        drop(tx);
        assert_ready!(waiting.poll());
    }
}
