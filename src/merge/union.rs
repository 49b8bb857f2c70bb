//! Unordered union of structural sets.
//!
//! Interface lists and nested-type references have set semantics: their
//! declaration order carries no meaning, so reconciliation is a plain
//! symmetric-difference union. Both sides converge to the union, and the
//! one-sided remainders are reported so the class itself can be flagged as
//! carrying exclusive content; individual set elements are not tagged.
//!
//! The merged output is canonicalized to ascending order, which stabilizes
//! emission across runs regardless of scan order.

use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// UnionOutcome
// ---------------------------------------------------------------------------

/// Result of reconciling one unordered set across the two distributions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnionOutcome<T> {
    /// The union of both sides, sorted ascending.
    pub merged: Vec<T>,
    /// Elements only the client declared, sorted ascending.
    pub client_only: Vec<T>,
    /// Elements only the server declared, sorted ascending.
    pub server_only: Vec<T>,
}

impl<T> UnionOutcome<T> {
    /// Returns `true` if either side contributed exclusive elements.
    #[must_use]
    pub fn has_exclusive(&self) -> bool {
        !self.client_only.is_empty() || !self.server_only.is_empty()
    }
}

/// Merge two unordered structural sets into their union.
///
/// Duplicates within one input are collapsed; unlike ordered member
/// sequences, repeating a set element cannot misalign anything.
pub fn merge_unordered<T: Clone + Ord>(client: &[T], server: &[T]) -> UnionOutcome<T> {
    let client_set: BTreeSet<&T> = client.iter().collect();
    let server_set: BTreeSet<&T> = server.iter().collect();

    let client_only = client_set
        .difference(&server_set)
        .map(|e| (*e).clone())
        .collect();
    let server_only = server_set
        .difference(&client_set)
        .map(|e| (*e).clone())
        .collect();
    let merged = client_set
        .union(&server_set)
        .map(|e| (*e).clone())
        .collect();

    UnionOutcome {
        merged,
        client_only,
        server_only,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::InnerClassRef;

    fn strs(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn identical_sets_have_no_exclusives() {
        let side = strs(&["I2", "I1"]);
        let out = merge_unordered(&side, &side);
        assert_eq!(out.merged, strs(&["I1", "I2"]));
        assert!(!out.has_exclusive());
    }

    #[test]
    fn both_sides_converge_to_sorted_union() {
        let client = strs(&["I1", "I2"]);
        let server = strs(&["I2", "I3"]);
        let out = merge_unordered(&client, &server);
        assert_eq!(out.merged, strs(&["I1", "I2", "I3"]));
        assert_eq!(out.client_only, strs(&["I1"]));
        assert_eq!(out.server_only, strs(&["I3"]));
        assert!(out.has_exclusive());
    }

    #[test]
    fn union_is_order_insensitive() {
        let client = strs(&["B", "A", "C"]);
        let shuffled = strs(&["C", "A", "B"]);
        let server = strs(&["A"]);
        assert_eq!(
            merge_unordered(&client, &server),
            merge_unordered(&shuffled, &server)
        );
    }

    #[test]
    fn one_empty_side() {
        let client: Vec<String> = vec![];
        let server = strs(&["I1"]);
        let out = merge_unordered(&client, &server);
        assert_eq!(out.merged, strs(&["I1"]));
        assert!(out.client_only.is_empty());
        assert_eq!(out.server_only, strs(&["I1"]));
    }

    #[test]
    fn inner_refs_union_on_the_full_triple() {
        let client = vec![
            InnerClassRef::new("a/B$C", "a/B", "C"),
            InnerClassRef::anonymous("a/B$1"),
        ];
        let server = vec![
            // Same nested class name but recorded without an enclosing
            // class: a distinct reference, both survive.
            InnerClassRef::anonymous("a/B$C"),
            InnerClassRef::anonymous("a/B$1"),
        ];
        let out = merge_unordered(&client, &server);
        assert_eq!(out.merged.len(), 3);
        assert_eq!(out.client_only.len(), 1);
        assert_eq!(out.server_only.len(), 1);
    }
}
