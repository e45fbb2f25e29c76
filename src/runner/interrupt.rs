//! @ai:module:intent Operator interrupt (Ctrl-C) propagation into running benchmarks
//! @ai:module:layer infrastructure
//! @ai:module:public_api Interrupt
//! @ai:module:stateless false

use tokio::sync::watch;

/// @ai:intent Shared flag raised once when the operator interrupts the harness
#[derive(Debug, Clone)]
pub struct Interrupt {
    rx: watch::Receiver<bool>,
}

impl Interrupt {
    /// @ai:intent Install the Ctrl-C listener and ignore SIGTERM to the harness
    /// @ai:pre called inside a tokio runtime
    /// @ai:effects signal:install
    pub fn listen() -> Self {
        let (tx, interrupt) = Self::channel();

        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::warn!("Cannot listen for interrupts: {}", e);
                return;
            }
            let _ = tx.send(true);
        });

        #[cfg(unix)]
        tokio::spawn(async {
            use tokio::signal::unix::{signal, SignalKind};

            match signal(SignalKind::terminate()) {
                Ok(mut term) => {
                    while term.recv().await.is_some() {
                        tracing::debug!("Received SIGTERM, ignoring it.");
                    }
                }
                Err(e) => tracing::warn!("Cannot install SIGTERM handler: {}", e),
            }
        });

        interrupt
    }

    /// @ai:intent Manually driven interrupt, used where no signal handler is wanted
    pub fn channel() -> (watch::Sender<bool>, Self) {
        let (tx, rx) = watch::channel(false);
        (tx, Self { rx })
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// @ai:intent Resolve once the flag is raised; pending forever if the sender is gone
    pub async fn triggered(&mut self) {
        if self.rx.wait_for(|raised| *raised).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_triggered_resolves_after_send() {
        let (tx, mut interrupt) = Interrupt::channel();
        assert!(!interrupt.is_triggered());

        tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(1), interrupt.triggered())
            .await
            .unwrap();
        assert!(interrupt.is_triggered());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_sender_never_triggers() {
        let (tx, mut interrupt) = Interrupt::channel();
        drop(tx);

        let fired = tokio::time::timeout(Duration::from_secs(60), interrupt.triggered()).await;
        assert!(fired.is_err());
    }
}
