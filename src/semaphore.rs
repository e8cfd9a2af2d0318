//! A counting semaphore built on [`parking_lot`] primitives.

use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Counts available permits and lets threads wait for one to become available.
///
/// The [`RingBuffer`](crate::RingBuffer) uses two of these:
/// one counting empty slots (acquired by producers)
/// and one counting filled slots (acquired by consumers).
#[derive(Debug)]
pub(crate) struct Semaphore {
    permits: Mutex<usize>,
    released: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` permits.
    pub(crate) fn new(permits: usize) -> Semaphore {
        Semaphore {
            permits: Mutex::new(permits),
            released: Condvar::new(),
        }
    }

    /// Takes a permit, suspending the calling thread until one is available.
    pub(crate) fn acquire(&self) {
        let mut permits = self.permits.lock();
        self.released.wait_while(&mut permits, |permits| *permits == 0);
        *permits -= 1;
    }

    /// Takes a permit if one is available right now.
    pub(crate) fn try_acquire(&self) -> bool {
        let mut permits = self.permits.lock();
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Takes a permit, waiting at most `timeout` for one to become available.
    ///
    /// Returns `false` (and takes nothing) if the timeout expired.
    pub(crate) fn try_acquire_for(&self, timeout: Duration) -> bool {
        let mut permits = self.permits.lock();
        self.released
            .wait_while_for(&mut permits, |permits| *permits == 0, timeout);
        // NB: A permit might have arrived just as the wait timed out, so we check the count
        //     instead of the returned WaitTimeoutResult.
        if *permits == 0 {
            return false;
        }
        *permits -= 1;
        true
    }

    /// Returns a permit and wakes up one waiting thread (if any).
    pub(crate) fn release(&self) {
        let mut permits = self.permits.lock();
        *permits += 1;
        drop(permits);
        self.released.notify_one();
    }

    /// Returns the number of permits currently available.
    ///
    /// This is only a snapshot, other threads might change it at any time.
    #[cfg(test)]
    pub(crate) fn available(&self) -> usize {
        *self.permits.lock()
    }
}
