//! Counting admission gate for upload tasks

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limits how many upload tasks hold a slot at the same time
#[derive(Debug)]
pub struct Throttle {
    semaphore: Arc<Semaphore>,
    capacity: usize,
    /// Slots currently held
    held: AtomicUsize,
    /// Highest value `held` has reached
    peak: AtomicUsize,
}

impl Throttle {
    pub fn new(capacity: usize) -> Arc<Self> {
        let capacity = capacity.max(1);
        Arc::new(Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
            held: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        })
    }

    /// Wait until a slot is free and take it.
    ///
    /// The slot is released when the returned guard is dropped, including
    /// during unwinding.
    pub async fn acquire(self: &Arc<Self>) -> SlotGuard {
        let permit = Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("throttle semaphore is never closed");

        let held = self.held.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(held, Ordering::SeqCst);

        SlotGuard {
            throttle: Arc::clone(self),
            _permit: permit,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// A held concurrency slot
#[derive(Debug)]
pub struct SlotGuard {
    throttle: Arc<Throttle>,
    _permit: OwnedSemaphorePermit,
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        // Runs before the permit field is dropped, so `held` never exceeds capacity
        self.throttle.held.fetch_sub(1, Ordering::SeqCst);
    }
}
