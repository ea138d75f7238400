//! Concurrency gate in front of the hashing loop

use log::trace;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Counting limiter shared by every task of a manager
#[derive(Debug, Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

/// One unit of the limiter, released on drop
#[derive(Debug)]
pub struct LimiterPermit {
    _permit: OwnedSemaphorePermit,
}

impl Limiter {
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Units free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Units currently held by tasks
    pub fn in_use(&self) -> usize {
        self.capacity.saturating_sub(self.available())
    }

    /// Wait for a unit, giving up when `cancel` fires first
    ///
    /// Returns `None` if cancelled; the caller then never held a unit.
    pub async fn acquire(&self, cancel: &CancellationToken) -> Option<LimiterPermit> {
        let semaphore = Arc::clone(&self.semaphore);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            permit = semaphore.acquire_owned() => {
                // The semaphore is never closed.
                let permit = permit.ok()?;
                trace!("Limiter unit acquired, {} left", self.available());
                Some(LimiterPermit { _permit: permit })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_acquire_and_release() {
        let limiter = Limiter::new(2);
        let token = CancellationToken::new();

        let first = limiter.acquire(&token).await.unwrap();
        assert_eq!(limiter.in_use(), 1);
        let second = limiter.acquire(&token).await.unwrap();
        assert_eq!(limiter.available(), 0);

        drop(first);
        assert_eq!(limiter.in_use(), 1);
        drop(second);
        assert_eq!(limiter.available(), 2);
    }

    #[tokio::test]
    async fn test_cancel_while_waiting() {
        let limiter = Limiter::new(1);
        let token = CancellationToken::new();
        let _held = limiter.acquire(&token).await.unwrap();

        let waiter_token = CancellationToken::new();
        let waiter = {
            let limiter = limiter.clone();
            let waiter_token = waiter_token.clone();
            tokio::spawn(async move { limiter.acquire(&waiter_token).await.is_some() })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        waiter_token.cancel();
        assert!(!waiter.await.unwrap());
        assert_eq!(limiter.in_use(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_token_wins_over_free_unit() {
        let limiter = Limiter::new(1);
        let token = CancellationToken::new();
        token.cancel();

        assert!(limiter.acquire(&token).await.is_none());
        assert_eq!(limiter.available(), 1);
    }

    #[tokio::test]
    async fn test_waiter_proceeds_after_release() {
        let limiter = Limiter::new(1);
        let token = CancellationToken::new();
        let held = limiter.acquire(&token).await.unwrap();

        let waiter = {
            let limiter = limiter.clone();
            let token = token.clone();
            tokio::spawn(async move { limiter.acquire(&token).await.is_some() })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        drop(held);

        assert!(waiter.await.unwrap());
    }
}
