#![forbid(unsafe_code)]

//! Observable list with structural change events.
//!
//! [`ObservableList<T>`] is an ordered, shared, mutable sequence. Every
//! mutation notifies subscribers with a [`ListChange`] describing what
//! happened, after the mutation has been applied — callbacks always see
//! the post-mutation list.
//!
//! Order is significant to callers (the formatter binding applies replace
//! pairs in list order), so the list never reorders behind your back.
//!
//! Unlike value cells, structural events are never coalesced under a
//! [`BatchScope`](crate::batch::BatchScope): an `Inserted` followed by a
//! `Removed` must both be delivered or subscription bookkeeping on the
//! receiving side would leak or dangle.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::trace;

use crate::observable::Subscription;

/// A structural change to an [`ObservableList`].
#[derive(Debug, Clone)]
pub enum ListChange<T> {
    /// An item was inserted at `index`.
    Inserted {
        /// Position the item now occupies.
        index: usize,
        /// Handle to the inserted item.
        item: T,
    },
    /// The item previously at `index` was removed.
    Removed {
        /// Position the item occupied.
        index: usize,
        /// Handle to the removed item.
        item: T,
    },
    /// All items were removed at once.
    Cleared {
        /// The items that were in the list, in order.
        items: Vec<T>,
    },
}

type ListCallbackRc<T> = Rc<dyn Fn(&ListChange<T>)>;
type ListCallbackWeak<T> = Weak<dyn Fn(&ListChange<T>)>;

struct ListInner<T> {
    items: Vec<T>,
    version: u64,
    subscribers: Vec<ListCallbackWeak<T>>,
}

/// Ordered, shared list with change notification.
///
/// Cloning clones the handle; all handles share items and subscribers.
pub struct ObservableList<T> {
    inner: Rc<RefCell<ListInner<T>>>,
}

impl<T> Clone for ObservableList<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for ObservableList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ObservableList")
            .field("items", &inner.items)
            .field("version", &inner.version)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}

impl<T: Clone + 'static> Default for ObservableList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + 'static> ObservableList<T> {
    /// Create an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                items: Vec::new(),
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().items.is_empty()
    }

    /// Clone out the item at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<T> {
        self.inner.borrow().items.get(index).cloned()
    }

    /// Snapshot of all items, in order.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.inner.borrow().items.clone()
    }

    /// Read the items by reference.
    pub fn with<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(&self.inner.borrow().items)
    }

    /// Append an item.
    pub fn push(&self, item: T) {
        let index = {
            let mut inner = self.inner.borrow_mut();
            inner.items.push(item.clone());
            inner.version += 1;
            inner.items.len() - 1
        };
        self.notify(ListChange::Inserted { index, item });
    }

    /// Insert an item at `index`, shifting later items right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&self, index: usize, item: T) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.items.insert(index, item.clone());
            inner.version += 1;
        }
        self.notify(ListChange::Inserted { index, item });
    }

    /// Remove and return the item at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&self, index: usize) -> T {
        let item = {
            let mut inner = self.inner.borrow_mut();
            let item = inner.items.remove(index);
            inner.version += 1;
            item
        };
        self.notify(ListChange::Removed {
            index,
            item: item.clone(),
        });
        item
    }

    /// Remove all items. No-op (and no notification) when already empty.
    pub fn clear(&self) {
        let items = {
            let mut inner = self.inner.borrow_mut();
            if inner.items.is_empty() {
                return;
            }
            inner.version += 1;
            std::mem::take(&mut inner.items)
        };
        self.notify(ListChange::Cleared { items });
    }

    /// Register a structural change callback. Dropping the returned
    /// [`Subscription`] unsubscribes.
    pub fn subscribe(&self, callback: impl Fn(&ListChange<T>) + 'static) -> Subscription {
        let strong: ListCallbackRc<T> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&strong));
        Subscription::hold(strong)
    }

    /// Version counter; bumps once per mutation.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Registered subscriber entries, including dead ones awaiting pruning.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }

    fn notify(&self, change: ListChange<T>) {
        let callbacks: Vec<ListCallbackRc<T>> = {
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

        trace!(subscribers = callbacks.len(), "list changed");

        if crate::batch::is_batching() {
            // Deliver every structural event, in order, at flush time.
            let change = Rc::new(change);
            for callback in callbacks {
                let change = Rc::clone(&change);
                crate::batch::defer_or_run(move || callback(&change));
            }
            return;
        }

        for callback in &callbacks {
            callback(&change);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
