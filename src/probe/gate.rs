//! Probe gate: the limiter on concurrent resolver requests
//!
//! The gate is a counting semaphore owned by the orchestrator and shared
//! with every probe task through an `Arc`. A task holds a [`GatePermit`]
//! for the duration of its network call; dropping the permit returns the
//! unit, whether the probe succeeded, failed or panicked.

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{AcquireError, Semaphore, SemaphorePermit};

/// Counting concurrency limiter with occupancy instrumentation
#[derive(Debug)]
pub struct ProbeGate {
    semaphore: Semaphore,
    capacity: usize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
}

impl ProbeGate {
    /// Creates a gate admitting at most `capacity` holders at once
    ///
    /// A capacity of zero is raised to one so the gate can never deadlock.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            semaphore: Semaphore::new(capacity),
            capacity,
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Waits for a free unit and takes it
    ///
    /// # Returns
    ///
    /// * `Ok(GatePermit)` - A unit is held until the permit is dropped
    /// * `Err(AcquireError)` - The gate has been closed
    pub async fn acquire(&self) -> Result<GatePermit<'_>, AcquireError> {
        let permit = self.semaphore.acquire().await?;

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        Ok(GatePermit {
            _permit: permit,
            in_flight: &self.in_flight,
        })
    }

    /// Closes the gate; pending and future acquisitions fail
    pub fn close(&self) {
        self.semaphore.close();
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of permits currently held
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Highest number of permits held at the same time so far
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    /// Number of units free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// One held unit of a [`ProbeGate`]
///
/// The in-flight counter is decremented before the semaphore unit is
/// returned, so `in_flight() <= capacity()` holds at every instant.
#[derive(Debug)]
pub struct GatePermit<'a> {
    _permit: SemaphorePermit<'a>,
    in_flight: &'a AtomicUsize,
}

impl Drop for GatePermit<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
