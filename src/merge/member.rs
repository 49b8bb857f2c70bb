//! Member equivalence and ordering.
//!
//! The alignment walk in [`crate::merge::sequence`] is generic over one
//! member kind at a time. Everything kind-specific lives behind the
//! [`Member`] trait: the identity key that decides cross-distribution
//! correspondence, the declared-order comparator used to break ties when
//! both sides diverge, and the provenance setter used when a member is
//! mirrored into the side it was missing from.
//!
//! The end-of-sequence sentinel is expressed as `Option<&T>` rather than a
//! nullable placeholder: [`slots_match`] treats the absent slot as equal
//! only to itself, and [`slot_order`] sorts it after every real member.

use std::cmp::Ordering;

use crate::model::{Dist, Field, Method};

// ---------------------------------------------------------------------------
// Member
// ---------------------------------------------------------------------------

/// One kind of ordered class member (field or method).
pub trait Member: Clone {
    /// Identity key deciding correspondence across distributions:
    /// the declared name, plus the descriptor for kinds whose overloads
    /// differ by signature.
    fn identity(&self) -> (&str, Option<&str>);

    /// Total, deterministic tie-break ordering between two members that are
    /// *not* identity-equal. Used only when both sides inserted divergent
    /// members before the next shared one.
    fn declared_order(a: &Self, b: &Self) -> Ordering;

    /// Attach an origin-side marker to this member.
    fn set_dist(&mut self, dist: Dist);

    /// Identity key rendered for diagnostics.
    fn describe(&self) -> String {
        match self.identity() {
            (name, None) => name.to_owned(),
            (name, Some(desc)) => format!("{name}{desc}"),
        }
    }
}

impl Member for Field {
    /// Field names are unique within a class, so the name alone is the key.
    fn identity(&self) -> (&str, Option<&str>) {
        (&self.name, None)
    }

    /// Fields carry no position information; order lexicographically by name.
    fn declared_order(a: &Self, b: &Self) -> Ordering {
        a.name.cmp(&b.name)
    }

    fn set_dist(&mut self, dist: Dist) {
        self.dist = Some(dist);
    }
}

impl Member for Method {
    fn identity(&self) -> (&str, Option<&str>) {
        (&self.name, Some(&self.descriptor))
    }

    /// Ascending by first declared source line; methods without line
    /// information sort last.
    fn declared_order(a: &Self, b: &Self) -> Ordering {
        let line = |m: &Self| m.line.unwrap_or(u32::MAX);
        line(a).cmp(&line(b))
    }

    fn set_dist(&mut self, dist: Dist) {
        self.dist = Some(dist);
    }
}

// ---------------------------------------------------------------------------
// Sentinel-aware helpers
// ---------------------------------------------------------------------------

/// Identity equality over slots. The absent slot equals only itself.
pub fn slots_match<T: Member>(a: Option<&T>, b: Option<&T>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.identity() == b.identity(),
        _ => false,
    }
}

/// Declared-order comparison over slots. The absent slot sorts last.
pub fn slot_order<T: Member>(a: Option<&T>, b: Option<&T>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => T::declared_order(a, b),
    }
}

/// A slot rendered for diagnostics.
pub fn describe_slot<T: Member>(slot: Option<&T>) -> String {
    slot.map_or_else(|| "<end>".to_owned(), Member::describe)
}
