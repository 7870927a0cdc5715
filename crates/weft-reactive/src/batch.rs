#![forbid(unsafe_code)]

//! Notification batching.
//!
//! A [`BatchScope`] defers subscriber notifications while it is alive;
//! dropping the outermost scope flushes them. Values themselves are updated
//! immediately — only the callbacks wait — so reads inside a batch always
//! see the latest state.
//!
//! Two deferral flavors exist: keyed (used by value cells, where repeated
//! changes to the same cell should wake each subscriber once, with the
//! final value) and unkeyed (used by lists, whose structural events must
//! all be delivered, in order, or membership bookkeeping would break).
//!
//! # Invariants
//!
//! 1. Nested scopes are allowed; only the outermost one flushes.
//! 2. Flush runs callbacks in first-enqueue order.
//! 3. A panicking callback does not starve the rest; the first panic is
//!    re-raised once the flush completes.

use std::cell::RefCell;

use tracing::debug;
use web_time::Instant;

type Deferred = Box<dyn FnOnce()>;

struct Entry {
    key: Option<usize>,
    run: Deferred,
}

struct BatchContext {
    depth: u32,
    deferred: Vec<Entry>,
}

thread_local! {
    static BATCH: RefCell<Option<BatchContext>> = const { RefCell::new(None) };
}

/// True while a batch scope is active on this thread.
pub fn is_batching() -> bool {
    BATCH.with(|ctx| ctx.borrow().is_some())
}

/// Defer `f` until the current batch flushes, or run it immediately when
/// no batch is active. Returns `true` if deferred.
pub fn defer_or_run(f: impl FnOnce() + 'static) -> bool {
    BATCH.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut batch) = *guard {
            batch.deferred.push(Entry {
                key: None,
                run: Box::new(f),
            });
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Keyed variant of [`defer_or_run`]: a later entry with the same key
/// replaces the earlier callback while keeping its queue position.
pub fn defer_or_run_keyed(key: usize, f: impl FnOnce() + 'static) -> bool {
    BATCH.with(|ctx| {
        let mut guard = ctx.borrow_mut();
        if let Some(ref mut batch) = *guard {
            if let Some(entry) = batch
                .deferred
                .iter_mut()
                .find(|entry| entry.key == Some(key))
            {
                entry.run = Box::new(f);
            } else {
                batch.deferred.push(Entry {
                    key: Some(key),
                    run: Box::new(f),
                });
            }
            true
        } else {
            drop(guard);
            f();
            false
        }
    })
}

/// Run the deferred notifications of a finished batch.
///
/// The batch context has already been torn down at this point, so a
/// callback that mutates further cells notifies immediately (in causal
/// order) instead of re-deferring into a dead batch.
fn run_deferred(deferred: Vec<Entry>) {
    if deferred.is_empty() {
        return;
    }

    let count = deferred.len();
    let start = Instant::now();

    let mut first_panic: Option<Box<dyn std::any::Any + Send>> = None;
    for entry in deferred {
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(entry.run));
        if let Err(payload) = outcome
            && first_panic.is_none()
        {
            first_panic = Some(payload);
        }
    }

    debug!(
        notifications = count,
        duration_us = start.elapsed().as_micros() as u64,
        "batch flushed"
    );

    if let Some(payload) = first_panic {
        std::panic::resume_unwind(payload);
    }
}

/// RAII guard that begins a batch scope on the current thread.
pub struct BatchScope {
    is_root: bool,
}

impl BatchScope {
    /// Open a scope; nested calls only bump the depth.
    #[must_use]
    pub fn new() -> Self {
        let is_root = BATCH.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            match *guard {
                Some(ref mut batch) => {
                    batch.depth += 1;
                    false
                }
                None => {
                    *guard = Some(BatchContext {
                        depth: 1,
                        deferred: Vec::new(),
                    });
                    true
                }
            }
        });
        Self { is_root }
    }

    /// Notifications queued so far in the active batch.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        BATCH.with(|ctx| ctx.borrow().as_ref().map_or(0, |b| b.deferred.len()))
    }
}

impl Default for BatchScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BatchScope {
    fn drop(&mut self) {
        let finished = BATCH.with(|ctx| {
            let mut guard = ctx.borrow_mut();
            let done = match *guard {
                Some(ref mut batch) => {
                    batch.depth -= 1;
                    batch.depth == 0
                }
                None => false,
            };
            if done { guard.take() } else { None }
        });
        if let Some(batch) = finished {
            run_deferred(batch.deferred);
        }
    }
}

impl std::fmt::Debug for BatchScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchScope")
            .field("is_root", &self.is_root)
            .field("pending", &self.pending_count())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
