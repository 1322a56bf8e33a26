//! Listener suppression guard.
//!
//! The engine moves carets and selections programmatically, and the host
//! reports those moves back through the same callbacks it uses for user
//! input. The guard is a reentrant counter the listener layer consults: while
//! it is non-zero, host notifications are dropped instead of re-entering the
//! engine.
//!
//! ```
//! use core_state::SuppressionGuard;
//! let guard = SuppressionGuard::new();
//! {
//!     let _outer = guard.lock();
//!     let mut inner = guard.lock();
//!     inner.release();
//!     inner.release(); // second release is a no-op
//!     assert!(guard.is_locked());
//! }
//! assert!(!guard.is_locked());
//! ```
//!
//! Clones share one counter; each engine session creates its own guard.

use std::cell::Cell;
use std::rc::Rc;
use tracing::{error, trace};

#[derive(Debug, Clone, Default)]
pub struct SuppressionGuard {
    depth: Rc<Cell<usize>>,
}

impl SuppressionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the lock depth. The returned token releases on drop.
    #[must_use = "dropping the token releases the lock immediately"]
    pub fn lock(&self) -> SuppressionToken {
        let depth = self.depth.get() + 1;
        self.depth.set(depth);
        trace!(target: "state.suppress", depth, "lock");
        SuppressionToken {
            guard: self.clone(),
            released: false,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.depth.get() > 0
    }

    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Raw decrement for callers pairing lock/unlock by hand.
    ///
    /// Unlocking an unlocked guard is a programming error: it asserts in debug
    /// builds and stays clamped at zero in release builds.
    pub fn unlock(&self) {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "suppression guard released without a lock");
        if depth == 0 {
            error!(target: "state.suppress", "unbalanced_unlock");
        }
        self.depth.set(depth.saturating_sub(1));
        trace!(target: "state.suppress", depth = depth.saturating_sub(1), "unlock");
    }
}

/// Scoped lock handle; releases exactly once, explicitly or on drop.
#[derive(Debug)]
pub struct SuppressionToken {
    guard: SuppressionGuard,
    released: bool,
}

impl SuppressionToken {
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.guard.unlock();
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl Drop for SuppressionToken {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn nested_locks_need_every_release() {
        let g = SuppressionGuard::new();
        let mut a = g.lock();
        let mut b = g.lock();
        assert_eq!(g.depth(), 2);
        b.release();
        assert!(g.is_locked());
        a.release();
        assert!(!g.is_locked());
    }

    #[test]
    fn release_survives_panic_unwinding() {
        let g = SuppressionGuard::new();
        let inner = g.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _token = inner.lock();
            panic!("mutation failed");
        }));
        assert!(result.is_err());
        assert!(!g.is_locked());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "without a lock"))]
    fn unbalanced_unlock_is_clamped() {
        let g = SuppressionGuard::new();
        g.unlock();
        assert_eq!(g.depth(), 0);
    }

    proptest! {
        // Arbitrary nesting: push = lock, pop = release of the innermost token.
        #[test]
        fn balanced_sequences_end_unlocked(ops in proptest::collection::vec(any::<bool>(), 0..64)) {
            let g = SuppressionGuard::new();
            let mut stack = Vec::new();
            for push in ops {
                if push || stack.is_empty() {
                    stack.push(g.lock());
                } else if let Some(mut t) = stack.pop() {
                    t.release();
                    t.release();
                }
                prop_assert_eq!(g.depth(), stack.len());
                prop_assert_eq!(g.is_locked(), !stack.is_empty());
            }
            while let Some(mut t) = stack.pop() {
                t.release();
            }
            prop_assert!(!g.is_locked());
        }
    }
}
