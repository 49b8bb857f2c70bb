//! Ordered structural merge of member sequences.
//!
//! Given the client's and the server's declaration-ordered sequences of one
//! member kind, produce two new equal-length, positionally-congruent
//! sequences: position `i` holds corresponding members on both sides, and a
//! member present on only one side is mirrored into the other side at its
//! correct relative position, tagged with its origin distribution.
//!
//! There is no explicit alignment key across distributions. Correspondence
//! is discovered greedily: `common` is the subsequence of client members
//! (in client order) that have *some* identity-equal counterpart on the
//! server, and the walk uses it as the alignment guide. This is a greedy
//! approximation of the intersection, not a true longest common
//! subsequence, and it relies on identity keys being unique within each
//! sequence, which is checked up front.
//!
//! Every internal consistency check failure is surfaced as
//! [`MergeError::IntegrityViolation`]: a silently-misaligned class is worse
//! than a failed merge.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::error::MergeError;
use crate::merge::member::{Member, describe_slot, slot_order, slots_match};
use crate::merge::observe::MergeObserver;
use crate::model::Dist;

// ---------------------------------------------------------------------------
// MergeSession
// ---------------------------------------------------------------------------

/// Per-class context threaded through the alignment walk.
pub struct MergeSession<'a> {
    /// Internal name of the class being merged, for diagnostics.
    pub class: &'a str,
    /// When `false`, mirrored members are inserted without provenance
    /// markers. Tagging never alters alignment.
    pub tag_inserts: bool,
    /// Receives alignment events. Must not affect merge semantics.
    pub observer: &'a dyn MergeObserver,
}

impl MergeSession<'_> {
    fn integrity(&self, detail: impl Into<String>) -> MergeError {
        MergeError::integrity(self.class, detail)
    }
}

// ---------------------------------------------------------------------------
// merge_ordered
// ---------------------------------------------------------------------------

/// Align and merge two declaration-ordered member sequences.
///
/// Returns new owned `(client, server)` sequences. Postconditions (checked,
/// violation is an error, never a silent truncation):
///
/// - both outputs have length `|client ∪ server|` under identity-key
///   equality, and are positionally congruent;
/// - relative order of members shared by both inputs is preserved;
/// - each mirrored member carries its origin tag on both sides (when
///   `tag_inserts` is set).
///
/// When both sides inserted divergent members before the next shared one,
/// the tie is broken by [`Member::declared_order`]. Should the comparator
/// place neither strictly first it would need a special case for the two
/// sides disagreeing on who goes first; for now the client's member is
/// pushed first. Deterministic, but best-effort for that interleaving.
///
/// # Errors
///
/// [`MergeError::IntegrityViolation`] on duplicate identity keys within one
/// input, or on any internal consistency check failing mid-walk.
pub fn merge_ordered<T: Member>(
    session: &MergeSession<'_>,
    client: &[T],
    server: &[T],
) -> Result<(Vec<T>, Vec<T>), MergeError> {
    check_unique(session, Dist::Client, client)?;
    check_unique(session, Dist::Server, server)?;

    // Trailing absent slot plays the end-of-sequence sentinel so the walk
    // needs no special casing at the tail.
    let mut a: Vec<Option<T>> = client.iter().cloned().map(Some).collect();
    let mut b: Vec<Option<T>> = server.iter().cloned().map(Some).collect();
    a.push(None);
    b.push(None);

    // Greedy common subsequence, in client order. The sentinel pair always
    // contributes a final entry.
    let common: Vec<Option<T>> = a
        .iter()
        .filter(|ca| b.iter().any(|sb| slots_match(ca.as_ref(), sb.as_ref())))
        .cloned()
        .collect();

    let mut i = 0;
    let mut mi = 0;
    while i < a.len() {
        if b.len() <= i {
            return Err(session.integrity(format!("server sequence exhausted at position {i}")));
        }
        if slots_match(a[i].as_ref(), b[i].as_ref()) {
            let mt = common
                .get(mi)
                .ok_or_else(|| session.integrity("common subsequence exhausted mid-walk"))?;
            if !slots_match(a[i].as_ref(), mt.as_ref()) {
                return Err(session.integrity(format!(
                    "alignment drifted: {} {} {}",
                    describe_slot(a[i].as_ref()),
                    describe_slot(b[i].as_ref()),
                    describe_slot(mt.as_ref()),
                )));
            }
            mi += 1;
            session
                .observer
                .member_shared(session.class, &describe_slot(a[i].as_ref()));
        } else {
            let mt = common
                .get(mi)
                .ok_or_else(|| session.integrity("common subsequence exhausted mid-walk"))?;
            if slots_match(b[i].as_ref(), mt.as_ref()) {
                // Server is on track toward the next shared member; the
                // client holds an extra one here. Mirror it across.
                mirror(session, Dist::Client, i, &mut a, &mut b);
            } else if slots_match(a[i].as_ref(), mt.as_ref()) {
                mirror(session, Dist::Server, i, &mut b, &mut a);
            } else {
                // Both sides added a divergent member before the next shared
                // one. Break the tie by declared order.
                if slot_order(a[i].as_ref(), b[i].as_ref()) == Ordering::Greater {
                    mirror(session, Dist::Server, i, &mut b, &mut a);
                } else {
                    // Should be strictly-less with a special case for the
                    // sides disagreeing on who goes first; for now the
                    // client's member is pushed first.
                    mirror(session, Dist::Client, i, &mut a, &mut b);
                }
            }
        }
        i += 1;
    }

    if mi != common.len() {
        return Err(session.integrity(format!(
            "common subsequence not exhausted: {mi} of {}",
            common.len()
        )));
    }
    if a.len() != b.len() {
        return Err(session.integrity(format!("length mismatch: {} != {}", a.len(), b.len())));
    }
    match (a.pop(), b.pop()) {
        (Some(None), Some(None)) => {}
        _ => return Err(session.integrity("trailing sentinel missing after walk")),
    }

    Ok((collect_members(session, a)?, collect_members(session, b)?))
}

/// Tag the member at `from[i]` with its origin side and insert a copy into
/// `into` at the same position, keeping the two sequences congruent.
fn mirror<T: Member>(
    session: &MergeSession<'_>,
    origin: Dist,
    i: usize,
    from: &mut [Option<T>],
    into: &mut Vec<Option<T>>,
) {
    // The origin copy is tagged too: the merged class keeps one side as
    // canonical, and provenance must survive whichever side that is.
    if session.tag_inserts
        && let Some(member) = from[i].as_mut()
    {
        member.set_dist(origin);
    }
    session
        .observer
        .member_inserted(session.class, &describe_slot(from[i].as_ref()), origin);
    into.insert(i, from[i].clone());
}

/// Reject duplicate identity keys within one input sequence. The greedy
/// common subsequence assumes uniqueness; duplicates would misalign the walk
/// in ways the end checks may not catch deterministically.
fn check_unique<T: Member>(
    session: &MergeSession<'_>,
    side: Dist,
    members: &[T],
) -> Result<(), MergeError> {
    let mut seen = BTreeSet::new();
    for member in members {
        let (name, desc) = member.identity();
        if !seen.insert((name.to_owned(), desc.map(str::to_owned))) {
            return Err(session.integrity(format!(
                "duplicate identity key `{}` in {side} sequence",
                member.describe()
            )));
        }
    }
    Ok(())
}

/// Strip the slot wrappers; an absent slot inside a merged sequence means
/// the walk mirrored a sentinel, which the end checks should have caught.
fn collect_members<T: Member>(
    session: &MergeSession<'_>,
    slots: Vec<Option<T>>,
) -> Result<Vec<T>, MergeError> {
    slots
        .into_iter()
        .map(|slot| slot.ok_or_else(|| session.integrity("absent slot inside merged sequence")))
        .collect()
}
