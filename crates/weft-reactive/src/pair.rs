#![forbid(unsafe_code)]

//! Replace pairs: the (pattern, replacement) unit of a formatter binding.
//!
//! Both fields start unset. A pair is *complete* once both are set; the
//! formatter binding only publishes output while every pair in its list is
//! complete, so a half-bound pair quietly suppresses recomputation instead
//! of producing broken text.
//!
//! Cloning a `ReplacePair` shares state, the same way cloning an
//! [`Observable`] does. Identity is reference identity: two clones of one
//! pair report the same [`key`](ReplacePair::key), two separately built
//! pairs never do — the binding uses this to match subscriptions to list
//! membership.

use std::rc::Rc;

use crate::observable::{Observable, Subscription};

struct PairCells {
    pattern: Observable<Option<String>>,
    replacement: Observable<Option<String>>,
}

/// One substitution rule with field-change notification.
pub struct ReplacePair {
    inner: Rc<PairCells>,
}

impl Clone for ReplacePair {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl std::fmt::Debug for ReplacePair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReplacePair")
            .field("pattern", &self.pattern())
            .field("replacement", &self.replacement())
            .finish()
    }
}

impl Default for ReplacePair {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacePair {
    /// Create a pair with both fields unset.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: Rc::new(PairCells {
                pattern: Observable::new(None),
                replacement: Observable::new(None),
            }),
        }
    }

    /// Create a pair with both fields set.
    #[must_use]
    pub fn with(pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        let pair = Self::new();
        pair.set_pattern(pattern);
        pair.set_replacement(replacement);
        pair
    }

    /// Set the text to search for.
    pub fn set_pattern(&self, pattern: impl Into<String>) {
        self.inner.pattern.set(Some(pattern.into()));
    }

    /// Unset the pattern, making the pair incomplete again.
    pub fn clear_pattern(&self) {
        self.inner.pattern.set(None);
    }

    /// Set the text to substitute.
    pub fn set_replacement(&self, replacement: impl Into<String>) {
        self.inner.replacement.set(Some(replacement.into()));
    }

    /// Unset the replacement, making the pair incomplete again.
    pub fn clear_replacement(&self) {
        self.inner.replacement.set(None);
    }

    /// Current pattern, if set.
    #[must_use]
    pub fn pattern(&self) -> Option<String> {
        self.inner.pattern.get()
    }

    /// Current replacement, if set.
    #[must_use]
    pub fn replacement(&self) -> Option<String> {
        self.inner.replacement.get()
    }

    /// Whether both fields are set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.inner.pattern.with(Option::is_some) && self.inner.replacement.with(Option::is_some)
    }

    /// Both fields, or `None` while either is unset.
    #[must_use]
    pub fn resolved(&self) -> Option<(String, String)> {
        Some((self.pattern()?, self.replacement()?))
    }

    /// Reference identity of the shared state, stable across clones.
    #[must_use]
    pub fn key(&self) -> usize {
        Rc::as_ptr(&self.inner) as usize
    }

    /// Register a callback fired when either field changes. Dropping the
    /// returned guard detaches it from both fields.
    pub fn subscribe(&self, callback: impl Fn() + 'static) -> PairSubscription {
        let callback = Rc::new(callback);
        let on_pattern = Rc::clone(&callback);
        let on_replacement = callback;
        PairSubscription {
            _pattern: self.inner.pattern.subscribe(move |_| on_pattern()),
            _replacement: self.inner.replacement.subscribe(move |_| on_replacement()),
        }
    }
}

/// RAII guard covering both field subscriptions of a [`ReplacePair`].
pub struct PairSubscription {
    _pattern: Subscription,
    _replacement: Subscription,
}

impl std::fmt::Debug for PairSubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PairSubscription").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
