#![forbid(unsafe_code)]

//! Formatter binding: template + replace pairs → derived output text.
//!
//! [`FormatterBinding`] owns three cells — a template
//! (`Observable<Option<String>>`), an ordered pair list
//! (`ObservableList<ReplacePair>`), and the derived output
//! (`Observable<String>`) — and keeps the output consistent with the other
//! two. A refresh runs whenever the template is replaced, the list gains or
//! loses a pair, or either field of a member pair changes.
//!
//! # Refresh guard
//!
//! Output is published only when the template is set, the list is
//! non-empty, and every pair is complete. Otherwise the refresh is skipped
//! and the previous output stays put — a pair mid-way through data binding
//! is a transient state, not an error, so the display keeps its last good
//! text rather than flashing blank.
//!
//! # Subscription lifetime
//!
//! Each pair gets a field-change subscription when it enters the list and
//! loses it when it leaves. This tracking is exact: mutating a pair after
//! removing it must not wake the binding, and the binding must not keep a
//! removed pair alive. Membership is matched by [`ReplacePair::key`]
//! (reference identity), so a pair inserted twice holds two subscriptions
//! and sheds them one per removal.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};

use weft_i18n::format;

use crate::list::{ListChange, ObservableList};
use crate::observable::{Observable, Subscription};
use crate::pair::{PairSubscription, ReplacePair};

/// Per-pair subscriptions, keyed by pair identity.
type PairSubs = Rc<RefCell<Vec<(usize, PairSubscription)>>>;

/// Keeps a derived output string consistent with a template and a dynamic
/// list of replace pairs.
///
/// The output cell is the bindable "rendered text" surface: whatever
/// displays the text subscribes to [`output`](Self::output) and repaints on
/// change.
///
/// # Examples
///
/// ```
/// use weft_reactive::{FormatterBinding, ReplacePair};
///
/// let binding = FormatterBinding::new();
/// binding.set_template("{first} {last}");
/// binding.push_pair(ReplacePair::with("{first}", "Diane"));
/// binding.push_pair(ReplacePair::with("{last}", "Selden"));
/// assert_eq!(binding.text(), "Diane Selden");
/// ```
pub struct FormatterBinding {
    template: Observable<Option<String>>,
    pairs: ObservableList<ReplacePair>,
    output: Observable<String>,
    pair_subs: PairSubs,
    _template_sub: Subscription,
    _list_sub: Subscription,
}

impl std::fmt::Debug for FormatterBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatterBinding")
            .field("template", &self.template.get())
            .field("pairs", &self.pairs.len())
            .field("output", &self.output.get())
            .finish()
    }
}

impl Default for FormatterBinding {
    fn default() -> Self {
        Self::new()
    }
}

impl FormatterBinding {
    /// Create a binding with no template, an empty pair list, and empty
    /// output.
    #[must_use]
    pub fn new() -> Self {
        let template: Observable<Option<String>> = Observable::new(None);
        let pairs: ObservableList<ReplacePair> = ObservableList::new();
        let output = Observable::new(String::new());
        let pair_subs: PairSubs = Rc::new(RefCell::new(Vec::new()));

        let _template_sub = {
            let (t, p, o) = (template.clone(), pairs.clone(), output.clone());
            template.subscribe(move |_| refresh(&t, &p, &o))
        };

        let _list_sub = {
            let (template, pairs_handle, output) =
                (template.clone(), pairs.clone(), output.clone());
            let pair_subs = Rc::clone(&pair_subs);
            pairs.subscribe(move |change| {
                match change {
                    ListChange::Inserted { item, .. } => {
                        attach(&pair_subs, item, &template, &pairs_handle, &output);
                    }
                    ListChange::Removed { item, .. } => {
                        detach(&pair_subs, item.key());
                    }
                    ListChange::Cleared { items } => {
                        for item in items {
                            detach(&pair_subs, item.key());
                        }
                    }
                }
                refresh(&template, &pairs_handle, &output);
            })
        };

        let binding = Self {
            template,
            pairs,
            output,
            pair_subs,
            _template_sub,
            _list_sub,
        };
        binding.refresh();
        binding
    }

    /// Set (or replace) the template and refresh.
    pub fn set_template(&self, template: impl Into<String>) {
        self.template.set(Some(template.into()));
    }

    /// Unset the template. Subsequent refreshes retain the current output.
    pub fn clear_template(&self) {
        self.template.set(None);
    }

    /// Current template, if set.
    #[must_use]
    pub fn template(&self) -> Option<String> {
        self.template.get()
    }

    /// Handle to the pair list. Mutations through this handle drive the
    /// binding exactly like [`push_pair`](Self::push_pair) does.
    #[must_use]
    pub fn pairs(&self) -> ObservableList<ReplacePair> {
        self.pairs.clone()
    }

    /// Append a pair to the list.
    pub fn push_pair(&self, pair: ReplacePair) {
        self.pairs.push(pair);
    }

    /// Handle to the derived output cell.
    #[must_use]
    pub fn output(&self) -> Observable<String> {
        self.output.clone()
    }

    /// Current output text.
    #[must_use]
    pub fn text(&self) -> String {
        self.output.get()
    }

    /// Force a refresh attempt, subject to the usual guard. Useful after
    /// wiring a binding whose inputs were populated out of band.
    pub fn refresh(&self) {
        refresh(&self.template, &self.pairs, &self.output);
    }

    /// Number of live per-pair subscriptions. Equals the number of pair
    /// entries currently in the list.
    #[must_use]
    pub fn tracked_pairs(&self) -> usize {
        self.pair_subs.borrow().len()
    }
}

fn attach(
    pair_subs: &PairSubs,
    pair: &ReplacePair,
    template: &Observable<Option<String>>,
    pairs: &ObservableList<ReplacePair>,
    output: &Observable<String>,
) {
    let (template, pairs, output) = (template.clone(), pairs.clone(), output.clone());
    let sub = pair.subscribe(move || refresh(&template, &pairs, &output));
    pair_subs.borrow_mut().push((pair.key(), sub));
}

fn detach(pair_subs: &PairSubs, key: usize) {
    let mut subs = pair_subs.borrow_mut();
    if let Some(position) = subs.iter().position(|(k, _)| *k == key) {
        subs.remove(position);
    }
}

fn refresh(
    template: &Observable<Option<String>>,
    pairs: &ObservableList<ReplacePair>,
    output: &Observable<String>,
) {
    let Some(template) = template.get() else {
        trace!("no template yet, output retained");
        return;
    };
    let items = pairs.items();
    if items.is_empty() {
        trace!("no pairs yet, output retained");
        return;
    }
    let mut resolved = Vec::with_capacity(items.len());
    for pair in &items {
        match pair.resolved() {
            Some(entry) => resolved.push(entry),
            None => {
                trace!("incomplete pair, output retained");
                return;
            }
        }
    }

    let text = format(
        &template,
        resolved.iter().map(|(p, r)| (p.as_str(), r.as_str())),
    );
    debug!(pairs = items.len(), "formatter output recomputed");
    output.set(text);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
