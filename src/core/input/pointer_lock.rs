//=========================================================================
// Pointer Lock Policy
//=========================================================================
//
// Process-wide pointer-lock requirement and re-acquisition throttle.
//
// When the application opts in, input dispatch is gated on the lock
// being held, and pointer-down events try to (re-)acquire it no more
// often than once per cooldown window.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== Constants ===========================================================

/// Time that must pass after a lock-state change before the lock is
/// requested again.
pub const POINTER_LOCK_COOLDOWN: Duration = Duration::from_millis(1500);

//=== PointerLock =========================================================

/// Tracks whether pointer lock is required and currently held.
///
/// Timestamps are durations since application start, supplied by the
/// caller, so the policy stays deterministic under test.
#[derive(Debug, Clone)]
pub struct PointerLock {
    required: bool,
    held: bool,
    last_change: Option<Duration>,
    cooldown: Duration,
}

impl PointerLock {
    pub fn new() -> Self {
        Self {
            required: false,
            held: false,
            last_change: None,
            cooldown: POINTER_LOCK_COOLDOWN,
        }
    }

    /// Opts in to pointer lock. There is no way to opt back out.
    pub fn require(&mut self) {
        self.required = true;
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Records a lock-state change reported by the platform.
    ///
    /// Returns `true` if the held state actually changed.
    pub fn set_held(&mut self, held: bool, now: Duration) -> bool {
        self.last_change = Some(now);
        if self.held == held {
            return false;
        }
        self.held = held;
        true
    }

    /// Returns `true` if input may be dispatched under the current policy.
    pub fn allows_input(&self) -> bool {
        !self.required || self.held
    }

    /// Returns `true` if a pointer-down at `now` should request the lock.
    pub fn should_request(&self, now: Duration) -> bool {
        if !self.required || self.held {
            return false;
        }

        match self.last_change {
            Some(changed_at) => now.saturating_sub(changed_at) > self.cooldown,
            None => true,
        }
    }
}

impl Default for PointerLock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
