//! Last-request-wins bookkeeping for in-flight analyses.
//!
//! When the candidate routes change while an analysis is running, the
//! stale result must be dropped rather than merged with the new one.

use std::sync::atomic::{AtomicU64, Ordering};

use log::warn;

/// Identifies one analysis request issued by an [`AnalysisGuard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnalysisTicket(u64);

impl AnalysisTicket {
    /// Sequence number of the request.
    #[must_use]
    pub const fn sequence(self) -> u64 {
        self.0
    }
}

/// Issues monotonically increasing tickets and accepts only the newest.
///
/// # Examples
/// ```
/// use kerbside_core::AnalysisGuard;
///
/// let guard = AnalysisGuard::new();
/// let stale = guard.begin();
/// let fresh = guard.begin();
///
/// assert_eq!(guard.accept(stale, "old routes"), None);
/// assert_eq!(guard.accept(fresh, "new routes"), Some("new routes"));
/// ```
#[derive(Debug, Default)]
pub struct AnalysisGuard {
    latest: AtomicU64,
}

impl AnalysisGuard {
    /// Create a guard with no outstanding requests.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            latest: AtomicU64::new(0),
        }
    }

    /// Register a new request, superseding every earlier ticket.
    #[must_use]
    pub fn begin(&self) -> AnalysisTicket {
        let previous = self.latest.fetch_add(1, Ordering::AcqRel);
        AnalysisTicket(previous.wrapping_add(1))
    }

    /// Report whether `ticket` belongs to the newest request.
    #[must_use]
    pub fn is_current(&self, ticket: AnalysisTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Return `value` if `ticket` is still current, discarding it otherwise.
    #[must_use]
    pub fn accept<T>(&self, ticket: AnalysisTicket, value: T) -> Option<T> {
        if self.is_current(ticket) {
            Some(value)
        } else {
            warn!(
                "discarding stale analysis result for request {}",
                ticket.sequence()
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn tickets_increase() {
        let guard = AnalysisGuard::new();
        let first = guard.begin();
        let second = guard.begin();
        assert!(second > first);
        assert!(!guard.is_current(first));
        assert!(guard.is_current(second));
    }

    #[rstest]
    fn only_the_last_of_concurrent_requests_is_accepted() {
        let guard = Arc::new(AnalysisGuard::new());
        let tickets: Vec<AnalysisTicket> = (0..8)
            .map(|_| {
                let shared = Arc::clone(&guard);
                thread::spawn(move || shared.begin())
            })
            .map(|handle| handle.join().expect("thread completes"))
            .collect();
        let accepted: Vec<_> = tickets
            .iter()
            .filter_map(|ticket| guard.accept(*ticket, ticket.sequence()))
            .collect();
        assert_eq!(accepted, vec![8]);
    }
}
