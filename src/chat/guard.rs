//! One-shot suppression of the next history reload
//!
//! When a session is auto-created as a side effect of sending a message,
//! activating it would normally trigger a history fetch — which would come
//! back empty and race with the optimistic user message appended in the same
//! operation. Arming the guard suppresses exactly one such reload.

/// One-shot reload suppression flag.
///
/// `arm` sets the flag; the next `consume` clears it and returns `true`.
/// A second consume behaves normally — the flag never suppresses more than
/// one reload.
#[derive(Debug, Default)]
pub struct ReloadGuard {
    armed: bool,
}

impl ReloadGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the guard so the next triggered reload is skipped.
    pub fn arm(&mut self) {
        self.armed = true;
    }

    /// Consume the flag, returning whether the pending reload should be
    /// skipped. Clears the flag either way.
    pub fn consume(&mut self) -> bool {
        std::mem::take(&mut self.armed)
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }
}
