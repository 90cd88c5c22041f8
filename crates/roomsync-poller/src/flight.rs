//! Single-flight guard: at most one poll in flight at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Default)]
pub struct SingleFlight {
    busy: Arc<AtomicBool>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the slot. `None` while another guard is alive.
    pub fn try_acquire(&self) -> Option<FlightGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Releases the slot on drop, including when the owning task panics or is aborted.
#[derive(Debug)]
pub struct FlightGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_acquire_fails_until_release() {
        let flight = SingleFlight::new();
        let guard = flight.try_acquire().expect("first acquire");
        assert!(flight.try_acquire().is_none());

        drop(guard);
        assert!(flight.try_acquire().is_some());
    }

    #[test]
    fn clones_share_the_slot() {
        let a = SingleFlight::new();
        let b = a.clone();
        let _guard = a.try_acquire().expect("acquire");
        assert!(b.try_acquire().is_none());
    }
}
