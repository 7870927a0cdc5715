#![forbid(unsafe_code)]

//! Reactive text binding layer for Weft.
//!
//! This crate provides the change-tracking primitives and the formatter
//! binding that keeps a derived display string consistent with its inputs:
//!
//! - [`Observable`]: a shared, version-tracked value cell with change
//!   notification via subscriber callbacks.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`BatchScope`]: defers and coalesces notifications while alive.
//! - [`ObservableList`]: an ordered list with structural change events.
//! - [`ReplacePair`]: a (pattern, replacement) pair with field-change
//!   notification; both fields optional until set.
//! - [`FormatterBinding`]: derives formatted output from a template cell
//!   and a list of replace pairs, recomputing on any relevant change.
//!
//! # Role in Weft
//! `weft-reactive` is the glue between `weft-i18n` templates and whatever
//! displays the text. Everything is single-threaded and event-driven:
//! callbacks fire synchronously on the mutating thread, and a callback
//! always observes the fully-applied state of the mutation that woke it.

pub mod batch;
pub mod binding;
pub mod list;
pub mod observable;
pub mod pair;

pub use batch::BatchScope;
pub use binding::FormatterBinding;
pub use list::{ListChange, ObservableList};
pub use observable::{Observable, Subscription};
pub use pair::{PairSubscription, ReplacePair};
