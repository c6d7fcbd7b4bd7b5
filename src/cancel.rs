//! Cooperative cancellation for in-flight runs.
//!
//! A [`CancelToken`] is checked before every map and reduce work unit and at each
//! barrier. Once it trips, the run fails with
//! [`Error::Cancelled`](crate::Error::Cancelled); partial results are discarded.

use crate::error::{Error, Result, Stage};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Cloneable cancellation flag with an optional deadline.
///
/// Clones share the same flag, so a caller can keep one clone and hand another to
/// [`Pipeline::run_with_cancel`](crate::Pipeline::run_with_cancel).
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A token that trips on its own once `timeout` has elapsed from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    /// A token sharing this token's flag whose deadline is at most `timeout`
    /// from now.
    ///
    /// The deadline belongs to the returned token only: once it passes, the
    /// derived token reports cancelled while `self` does not.
    #[must_use]
    pub fn and_timeout(&self, timeout: Duration) -> Self {
        let candidate = Instant::now().checked_add(timeout);
        let deadline = match (self.deadline, candidate) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        Self {
            flag: Arc::clone(&self.flag),
            deadline,
        }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    /// True once [`cancel`](Self::cancel) was called or the deadline passed.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        if self.flag.load(Ordering::Acquire) {
            return true;
        }
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// `Err(Cancelled { stage })` if the token has tripped.
    pub(crate) fn check(&self, stage: Stage) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled { stage })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let a = CancelToken::new();
        let b = a.clone();
        assert!(!b.is_cancelled());
        a.cancel();
        assert!(b.is_cancelled());
        assert!(matches!(
            b.check(Stage::Reduce),
            Err(Error::Cancelled {
                stage: Stage::Reduce
            })
        ));
    }

    #[test]
    fn zero_timeout_trips_immediately() {
        let t = CancelToken::with_timeout(Duration::ZERO);
        assert!(t.is_cancelled());
    }

    #[test]
    fn and_timeout_shares_flag_and_keeps_earliest_deadline() {
        let outer = CancelToken::new();
        let inner = outer.and_timeout(Duration::from_secs(3600));
        assert!(!inner.is_cancelled());
        outer.cancel();
        assert!(inner.is_cancelled());

        let short = CancelToken::with_timeout(Duration::ZERO);
        assert!(short.and_timeout(Duration::from_secs(3600)).is_cancelled());
    }

    #[test]
    fn expired_deadline_leaves_parent_untouched() {
        let outer = CancelToken::new();
        let inner = outer.and_timeout(Duration::ZERO);
        assert!(inner.is_cancelled());
        assert!(!outer.is_cancelled());
        assert!(outer.check(Stage::Map).is_ok());
    }

    #[test]
    fn long_timeout_does_not_trip() {
        let t = CancelToken::with_timeout(Duration::from_secs(3600));
        assert!(t.check(Stage::Map).is_ok());
    }
}
