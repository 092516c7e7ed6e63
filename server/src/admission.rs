//! Bounds the number of sessions running at once.
//!
//! Capacity is a counting semaphore owned by the controller. Admitting a
//! connection takes one permit without waiting; the permit travels with the
//! session as an [`AdmissionSlot`] and goes back to the pool when the slot is
//! dropped. Releasing on drop means the slot is returned exactly once on
//! every exit path, including I/O errors and panics inside the session.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Decides whether a new connection may start a session.
///
/// Cloning is cheap and every clone shares the same pool of slots.
#[derive(Debug, Clone)]
pub struct AdmissionController {
    slots: Arc<Semaphore>,
    capacity: usize,
}

/// The right to run one session. Returned to the controller on drop.
#[derive(Debug)]
pub struct AdmissionSlot {
    _permit: OwnedSemaphorePermit,
}

impl AdmissionSlot {
    /// Gives the slot back. Equivalent to dropping it.
    pub fn release(self) {}
}

impl AdmissionController {
    /// Creates a controller that admits at most `capacity` concurrent sessions.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Attempts to take a slot without waiting.
    ///
    /// Returns None if every slot is in use. A rejected attempt leaves the
    /// count untouched.
    pub fn try_admit(&self) -> Option<AdmissionSlot> {
        Arc::clone(&self.slots)
            .try_acquire_owned()
            .ok()
            .map(|permit| AdmissionSlot { _permit: permit })
    }

    /// Number of sessions currently holding a slot.
    pub fn active(&self) -> usize {
        self.capacity - self.slots.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admits_up_to_capacity() {
        let controller = AdmissionController::new(2);

        let first = controller.try_admit();
        let second = controller.try_admit();
        assert!(first.is_some());
        assert!(second.is_some());
        assert_eq!(controller.active(), 2);

        assert!(controller.try_admit().is_none());
        assert_eq!(controller.active(), 2);
    }

    #[test]
    fn test_release_frees_a_slot() {
        let controller = AdmissionController::new(1);

        let slot = controller.try_admit().unwrap();
        assert!(controller.try_admit().is_none());

        slot.release();
        assert_eq!(controller.active(), 0);
        assert!(controller.try_admit().is_some());
    }

    #[test]
    fn test_drop_releases_slot() {
        let controller = AdmissionController::new(1);

        {
            let _slot = controller.try_admit().unwrap();
            assert_eq!(controller.active(), 1);
        }

        assert_eq!(controller.active(), 0);
    }

    #[test]
    fn test_clones_share_slots() {
        let controller = AdmissionController::new(1);
        let other = controller.clone();

        let _slot = controller.try_admit().unwrap();
        assert!(other.try_admit().is_none());
        assert_eq!(other.active(), 1);
        assert_eq!(other.capacity(), 1);
    }

    #[tokio::test]
    async fn test_slot_released_when_task_fails() {
        let controller = AdmissionController::new(1);
        let slot = controller.try_admit().unwrap();

        let handle = tokio::spawn(async move {
            let _slot = slot;
            Err::<(), std::io::Error>(std::io::ErrorKind::BrokenPipe.into())
        });

        assert!(handle.await.unwrap().is_err());
        assert_eq!(controller.active(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_admission_never_exceeds_capacity() {
        let controller = AdmissionController::new(5);
        let mut handles = Vec::new();

        for _ in 0..100 {
            let controller = controller.clone();
            handles.push(tokio::spawn(async move { controller.try_admit() }));
        }

        let mut slots = Vec::new();
        for handle in handles {
            if let Some(slot) = handle.await.unwrap() {
                slots.push(slot);
            }
        }

        assert_eq!(slots.len(), 5);
        assert_eq!(controller.active(), 5);

        slots.clear();
        assert_eq!(controller.active(), 0);
    }
}
