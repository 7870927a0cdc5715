#![forbid(unsafe_code)]

//! Patient view model for the roster demo.

use weft_reactive::{BatchScope, Observable};

/// A patient with observable name fields.
///
/// Cloning shares state, so a clone handed to a binding sees the same
/// names as the roster entry.
#[derive(Clone)]
pub struct Patient {
    first_name: Observable<String>,
    last_name: Observable<String>,
}

impl Patient {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: Observable::new(first_name.into()),
            last_name: Observable::new(last_name.into()),
        }
    }

    pub fn first_name(&self) -> Observable<String> {
        self.first_name.clone()
    }

    pub fn last_name(&self) -> Observable<String> {
        self.last_name.clone()
    }

    /// Exchange first and last name. Batched so observers wake once with
    /// the final state instead of seeing the half-swapped name.
    pub fn swap_names(&self) {
        let _batch = BatchScope::new();
        let first = self.first_name.get();
        let last = self.last_name.get();
        self.first_name.set(last);
        self.last_name.set(first);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swap_exchanges_fields() {
        let patient = Patient::new("Diane", "Selden");
        patient.swap_names();
        assert_eq!(patient.first_name().get(), "Selden");
        assert_eq!(patient.last_name().get(), "Diane");
    }

    #[test]
    fn clone_shares_names() {
        let patient = Patient::new("Millie", "Dandrea");
        let clone = patient.clone();
        clone.swap_names();
        assert_eq!(patient.first_name().get(), "Dandrea");
    }
}
