//! Assertions for generated identifiers.

use std::collections::HashSet;

use crate::identifier::Identifier;

/// Asserts that `value` has the 36-character identifier layout.
///
/// # Panics
///
/// Panics with the parse error if the layout is wrong.
pub fn assert_identifier_layout(value: &str) {
    if let Err(err) = Identifier::validate(value) {
        panic!("{value:?} is not an identifier: {err}");
    }
}

/// Asserts that no identifier appears twice.
///
/// # Panics
///
/// Panics naming the first repeated identifier.
pub fn assert_distinct<'a>(identifiers: impl IntoIterator<Item = &'a Identifier>) {
    let mut seen = HashSet::new();
    for id in identifiers {
        assert!(seen.insert(id), "identifier {id} emitted twice");
    }
}
