#![forbid(unsafe_code)]

//! Localization core for Weft.
//!
//! Provides externalized string storage with key-based lookup, echo
//! fallback for missing keys, and ordered replace-pair formatting.
//!
//! # Role in Weft
//! `weft-i18n` isolates translation concerns so the reactive binding layer
//! and applications can resolve keys into display text without depending on
//! any UI machinery. It has no dependencies and no I/O, keeping the
//! localization layer reusable and testable.

pub mod formatter;
pub mod translator;

pub use formatter::format;
pub use translator::{LocaleChange, StringTable, Translator};
