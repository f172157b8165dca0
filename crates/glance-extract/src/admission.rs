//! Extraction admission control.
//!
//! Bounds how many images are processed concurrently. Callers acquire a
//! permit before starting extraction work; the permit returns its slot when
//! dropped. Waiters are resumed strictly first-come-first-served.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::debug;

/// Snapshot of gate occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStatus {
    /// Permits currently held.
    pub active: usize,
    /// Callers suspended waiting for a permit.
    pub waiting: usize,
}

struct GateState {
    active: usize,
    waiters: VecDeque<oneshot::Sender<AdmissionPermit>>,
}

struct GateInner {
    max_concurrent: usize,
    state: Mutex<GateState>,
}

/// Concurrency gate for extraction work.
///
/// At most `max_concurrent` permits are out at any moment; `active` never
/// goes negative. The gate is cheap to clone and clones share the same
/// slots.
#[derive(Clone)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

impl AdmissionGate {
    /// Create a gate admitting at most `max_concurrent` holders at once.
    pub fn new(max_concurrent: usize) -> Self {
        Self {
            inner: Arc::new(GateInner {
                max_concurrent,
                state: Mutex::new(GateState {
                    active: 0,
                    waiters: VecDeque::new(),
                }),
            }),
        }
    }

    /// Acquire a permit, suspending while the gate is full.
    ///
    /// Waiters are resumed in arrival order. Dropping the returned future
    /// while suspended abandons the queue position; a slot already handed to
    /// a cancelled waiter is released again by the in-flight permit's drop,
    /// so it always reaches a live waiter or frees up.
    pub async fn acquire(&self) -> AdmissionPermit {
        let rx = {
            let mut state = self.inner.state.lock().unwrap();
            if state.active < self.inner.max_concurrent {
                state.active += 1;
                return AdmissionPermit::new(Arc::clone(&self.inner));
            }
            let (tx, rx) = oneshot::channel();
            state.waiters.push_back(tx);
            rx
        };

        debug!("All extraction slots busy; waiting");
        rx.await
            .expect("admission gate dropped its waiter without resuming it")
    }

    /// Current occupancy. `waiting` may briefly include waiters whose
    /// callers were cancelled but not yet skipped by a release.
    pub fn status(&self) -> GateStatus {
        let state = self.inner.state.lock().unwrap();
        GateStatus {
            active: state.active,
            waiting: state.waiters.len(),
        }
    }

    pub fn max_concurrent(&self) -> usize {
        self.inner.max_concurrent
    }
}

/// RAII permit for one unit of extraction work.
///
/// Returns its slot to the gate on drop.
pub struct AdmissionPermit {
    gate: Arc<GateInner>,
    released: bool,
}

impl AdmissionPermit {
    fn new(gate: Arc<GateInner>) -> Self {
        Self {
            gate,
            released: false,
        }
    }

    /// Return the slot to the gate. Equivalent to dropping the permit.
    pub fn release(self) {}
}

impl Drop for AdmissionPermit {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        release_slot(&self.gate);
    }
}

/// Hand the freed slot to the longest waiter, or decrement the count.
fn release_slot(gate: &Arc<GateInner>) {
    let mut state = match gate.state.lock() {
        Ok(state) => state,
        Err(poisoned) => poisoned.into_inner(),
    };

    while let Some(tx) = state.waiters.pop_front() {
        match tx.send(AdmissionPermit::new(Arc::clone(gate))) {
            // Slot transferred; the active count already covers the new
            // holder.
            Ok(()) => return,
            Err(mut orphan) => {
                // The waiter was cancelled before resume. Disarm the permit
                // (its drop must not re-enter the lock) and try the next one.
                orphan.released = true;
            }
        }
    }

    state.active -= 1;
}
