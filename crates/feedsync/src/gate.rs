//! The mutation gate: one mutating operation in flight, process-wide.
//!
//! The busy flag lives in a `watch` channel so readers can either poll it or
//! wait for changes (e.g. to show and hide a progress indicator).

use tokio::sync::watch;

/// Non-reentrant busy flag serializing mutating operations.
#[derive(Debug)]
pub struct MutationGate {
    busy: watch::Sender<bool>,
}

impl MutationGate {
    /// Create an idle gate.
    pub fn new() -> Self {
        let (busy, _) = watch::channel(false);
        Self { busy }
    }

    /// Take the gate if it is free.
    ///
    /// Returns `None` while another holder exists. The gate is released when
    /// the returned guard is dropped, on every exit path.
    pub fn try_acquire(&self) -> Option<GateGuard<'_>> {
        let acquired = self.busy.send_if_modified(|busy| {
            if *busy {
                false
            } else {
                *busy = true;
                true
            }
        });
        // Lazy: a guard built on the failing path would release someone else's hold.
        acquired.then(|| GateGuard { gate: self })
    }

    /// Whether a mutating operation is in flight.
    pub fn is_busy(&self) -> bool {
        *self.busy.borrow()
    }

    /// Watch the busy flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.busy.subscribe()
    }
}

impl Default for MutationGate {
    fn default() -> Self {
        Self::new()
    }
}

/// Scoped ownership of the gate.
#[must_use = "the gate is released as soon as the guard is dropped"]
#[derive(Debug)]
pub struct GateGuard<'a> {
    gate: &'a MutationGate,
}

impl Drop for GateGuard<'_> {
    fn drop(&mut self) {
        self.gate.busy.send_replace(false);
    }
}
