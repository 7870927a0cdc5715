#![forbid(unsafe_code)]

//! Observable value cell with change notification.
//!
//! [`Observable<T>`] wraps a value in shared, reference-counted storage
//! (`Rc<RefCell<..>>`). Setting a value that differs from the current one
//! (by `PartialEq`) bumps a version counter and notifies all live
//! subscribers in registration order.
//!
//! Subscribers are stored as `Weak` callbacks; dropping the
//! [`Subscription`] guard is all it takes to unsubscribe, and dead entries
//! are pruned lazily on the next notification.
//!
//! Re-entrancy: `set` and `update` release the interior borrow before
//! invoking callbacks, so a subscriber may read or mutate other cells (or
//! this one) without tripping `RefCell`.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

type CallbackRc<T> = Rc<dyn Fn(&T)>;
type CallbackWeak<T> = Weak<dyn Fn(&T)>;

struct CellInner<T> {
    value: T,
    version: u64,
    subscribers: Vec<CallbackWeak<T>>,
}

/// A shared, version-tracked value with change notification.
///
/// Cloning an `Observable` clones the handle, not the value: both handles
/// see the same state and the same subscriber list.
///
/// # Invariants
///
/// 1. `version` increments by exactly 1 per value-changing mutation.
/// 2. Setting a value equal to the current one is a no-op.
/// 3. Subscribers are notified in registration order.
/// 4. While a [`BatchScope`](crate::batch::BatchScope) is active,
///    notifications are deferred and coalesced per subscriber.
pub struct Observable<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    /// Create a cell holding `value`, version 0, no subscribers.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Read the current value by reference.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value. Notifies subscribers only if it actually changed.
    pub fn set(&self, value: T) {
        {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
        }
        self.notify();
    }

    /// Mutate the value in place. Notifies subscribers only if the closure
    /// changed it (compared against a pre-mutation snapshot).
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let changed = {
            let mut inner = self.inner.borrow_mut();
            let before = inner.value.clone();
            f(&mut inner.value);
            if inner.value == before {
                false
            } else {
                inner.version += 1;
                true
            }
        };
        if changed {
            self.notify();
        }
    }

    /// Register a change callback, invoked with the new value after each
    /// change. Dropping the returned [`Subscription`] unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let strong: CallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        // `Rc<dyn Fn(&T)>` cannot coerce to `Rc<dyn Any>` directly, so the
        // guard boxes the strong handle instead.
        Subscription::hold(strong)
    }

    /// Version counter; bumps once per value-changing mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscriber entries, including dead ones awaiting pruning.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self) {
        let callbacks: Vec<CallbackRc<T>> = {
            let mut inner = self.inner.borrow_mut();
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            inner
                .subscribers
                .iter()
                .filter_map(Weak::upgrade)
                .collect()
        };
        if callbacks.is_empty() {
            return;
        }

        trace!(subscribers = callbacks.len(), "cell changed");

        if crate::batch::is_batching() {
            // Defer per subscriber, coalescing repeated changes so each
            // callback fires once with the value current at flush time.
            for callback in callbacks {
                let key = Rc::as_ptr(&callback) as *const () as usize;
                let source = self.clone();
                crate::batch::defer_or_run_keyed(key, move || {
                    let latest = source.get();
                    callback(&latest);
                });
            }
            return;
        }

        let value = self.inner.borrow().value.clone();
        for callback in &callbacks {
            callback(&value);
        }
    }
}

/// RAII guard for a subscriber callback.
///
/// The observable only holds a `Weak` to the callback; this guard owns the
/// strong reference. Dropping it makes the callback unreachable, so it will
/// not fire again (the stale `Weak` is pruned on the next notification).
pub struct Subscription {
    _keepalive: Box<dyn std::any::Any>,
}

impl Subscription {
    pub(crate) fn hold(keepalive: impl std::any::Any) -> Self {
        Self {
            _keepalive: Box::new(keepalive),
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn get_set_roundtrip() {
        let cell = Observable::new(7);
        assert_eq!(cell.get(), 7);
        assert_eq!(cell.version(), 0);

        cell.set(9);
        assert_eq!(cell.get(), 9);
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn equal_set_is_noop() {
        let cell = Observable::new("a".to_string());
        cell.set("a".to_string());
        assert_eq!(cell.version(), 0);
    }

    #[test]
    fn with_reads_by_reference() {
        let cell = Observable::new(vec![1, 2, 3]);
        assert_eq!(cell.with(|v| v.len()), 3);
    }

    #[test]
    fn update_in_place() {
        let cell = Observable::new(String::from("ab"));
        cell.update(|s| s.push('c'));
        assert_eq!(cell.get(), "abc");
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn update_without_change_keeps_version() {
        let cell = Observable::new(5);
        cell.update(|v| *v = 5);
        assert_eq!(cell.version(), 0);
    }

    #[test]
    fn subscriber_sees_new_value() {
        let cell = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let seen_clone = Rc::clone(&seen);
        let _sub = cell.subscribe(move |v| seen_clone.set(*v));

        cell.set(41);
        assert_eq!(seen.get(), 41);
        cell.set(42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn equal_set_does_not_notify() {
        let cell = Observable::new(1);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = cell.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        cell.set(1);
        assert_eq!(hits.get(), 0);
        cell.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn drop_subscription_unsubscribes() {
        let cell = Observable::new(0);
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let sub = cell.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        cell.set(1);
        assert_eq!(hits.get(), 1);

        drop(sub);
        cell.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn dead_subscribers_pruned_on_notify() {
        let cell = Observable::new(0);
        let kept = cell.subscribe(|_| {});
        let dropped = cell.subscribe(|_| {});
        drop(dropped);
        assert_eq!(cell.subscriber_count(), 2);

        cell.set(1);
        assert_eq!(cell.subscriber_count(), 1);
        drop(kept);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let cell = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let l = Rc::clone(&log);
        let _a = cell.subscribe(move |_| l.borrow_mut().push('a'));
        let l = Rc::clone(&log);
        let _b = cell.subscribe(move |_| l.borrow_mut().push('b'));

        cell.set(1);
        assert_eq!(*log.borrow(), vec!['a', 'b']);
    }

    #[test]
    fn clone_shares_state_and_subscribers() {
        let a = Observable::new(0);
        let b = a.clone();
        let hits = Rc::new(Cell::new(0u32));
        let hits_clone = Rc::clone(&hits);
        let _sub = a.subscribe(move |_| hits_clone.set(hits_clone.get() + 1));

        b.set(10);
        assert_eq!(a.get(), 10);
        assert_eq!(a.version(), 1);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn subscriber_may_read_other_cells() {
        let a = Observable::new(1);
        let b = Observable::new(2);
        let sum = Rc::new(Cell::new(0));
        let sum_clone = Rc::clone(&sum);
        let b_handle = b.clone();
        let _sub = a.subscribe(move |v| sum_clone.set(v + b_handle.get()));

        a.set(10);
        assert_eq!(sum.get(), 12);
    }

    #[test]
    fn debug_output_mentions_value() {
        let cell = Observable::new(42);
        let text = format!("{cell:?}");
        assert!(text.contains("Observable"));
        assert!(text.contains("42"));
    }
}
