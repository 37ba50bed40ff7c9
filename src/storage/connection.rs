//! Lazily established, process-wide store connection.
//!
//! [`ConnectionManager`] moves through `Uninitialized -> Connecting -> Connected`.
//! While an attempt is in flight every caller awaits that same attempt; a failed
//! attempt drops back to `Uninitialized` so the next call tries again.

use crate::errors::StoreError;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

#[async_trait]
pub trait Connector: Send + Sync + 'static {
    type Handle: Clone + Send + Sync + 'static;

    async fn connect(&self) -> Result<Self::Handle, StoreError>;

    fn describe(&self) -> String;
}

type Attempt<H> = Shared<BoxFuture<'static, Result<H, StoreError>>>;

enum ConnectionState<H> {
    Uninitialized,
    Connecting(Attempt<H>),
    Connected(H),
}

pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    state: Mutex<ConnectionState<C::Handle>>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C) -> Self {
        Self {
            connector: Arc::new(connector),
            state: Mutex::new(ConnectionState::Uninitialized),
        }
    }

    pub async fn connect(&self) -> Result<C::Handle, StoreError> {
        let attempt = {
            let mut state = self.lock_state();
            match &*state {
                ConnectionState::Connected(handle) => return Ok(handle.clone()),
                ConnectionState::Connecting(attempt) => attempt.clone(),
                ConnectionState::Uninitialized => {
                    let connector = Arc::clone(&self.connector);
                    let attempt = async move { connector.connect().await }.boxed().shared();
                    *state = ConnectionState::Connecting(attempt.clone());
                    attempt
                }
            }
        };

        let outcome = attempt.clone().await;

        let mut state = self.lock_state();
        let current = matches!(
            &*state,
            ConnectionState::Connecting(pending) if pending.ptr_eq(&attempt)
        );
        if current {
            *state = match &outcome {
                Ok(handle) => {
                    info!("connected to {}", self.connector.describe());
                    ConnectionState::Connected(handle.clone())
                }
                Err(err) => {
                    warn!("connection to {} failed: {err}", self.connector.describe());
                    ConnectionState::Uninitialized
                }
            };
        }

        outcome
    }

    pub fn is_connected(&self) -> bool {
        matches!(&*self.lock_state(), ConnectionState::Connected(_))
    }

    // The guarded state is always left consistent, so a poisoned lock is usable.
    fn lock_state(&self) -> MutexGuard<'_, ConnectionState<C::Handle>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingConnector {
        attempts: Arc<AtomicUsize>,
        failures_left: AtomicUsize,
    }

    impl CountingConnector {
        fn new(attempts: Arc<AtomicUsize>, failures: usize) -> Self {
            Self {
                attempts,
                failures_left: AtomicUsize::new(failures),
            }
        }
    }

    #[async_trait]
    impl Connector for CountingConnector {
        type Handle = usize;

        async fn connect(&self) -> Result<usize, StoreError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
            tokio::time::sleep(Duration::from_millis(20)).await;
            let failing = self
                .failures_left
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if failing {
                return Err(StoreError::Connection("refused".to_string()));
            }
            Ok(attempt)
        }

        fn describe(&self) -> String {
            "counting store".to_string()
        }
    }

    #[tokio::test]
    async fn concurrent_callers_share_one_attempt() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let manager = Arc::new(ConnectionManager::new(CountingConnector::new(
            Arc::clone(&attempts),
            0,
        )));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = Arc::clone(&manager);
                tokio::spawn(async move { manager.connect().await })
            })
            .collect();

        for task in tasks {
            assert_eq!(task.await.unwrap().unwrap(), 1);
        }
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn live_connection_is_reused() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let manager = ConnectionManager::new(CountingConnector::new(Arc::clone(&attempts), 0));

        manager.connect().await.unwrap();
        manager.connect().await.unwrap();
        manager.connect().await.unwrap();

        assert_eq!(attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_attempt_is_shared_then_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let manager = Arc::new(ConnectionManager::new(CountingConnector::new(
            Arc::clone(&attempts),
            1,
        )));

        let (first, second) = tokio::join!(manager.connect(), manager.connect());
        assert!(matches!(first, Err(StoreError::Connection(_))));
        assert!(matches!(second, Err(StoreError::Connection(_))));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert!(!manager.is_connected());

        let handle = manager.connect().await.unwrap();
        assert_eq!(handle, 2);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
        assert!(manager.is_connected());
    }
}
