//! Injectable merge observer.
//!
//! The engine reports alignment decisions through [`MergeObserver`] instead
//! of a compile-time debug flag, keeping the core pure and testable.
//! Observers must not affect merge semantics; the default implementation of
//! every hook is a no-op.

use crate::model::{Dist, Provenance};

/// Hooks invoked by the merge engine as it walks member sequences and routes
/// classes. All methods default to no-ops.
pub trait MergeObserver {
    /// A member was present on both sides at the current position.
    fn member_shared(&self, _class: &str, _member: &str) {}

    /// A member exclusive to `origin` was mirrored into the other side.
    fn member_inserted(&self, _class: &str, _member: &str, _origin: Dist) {}

    /// A class was routed by the distribution driver.
    fn class_routed(&self, _name: &str, _provenance: Provenance) {}
}

/// Observer that drops every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl MergeObserver for NoopObserver {}

/// Observer that forwards events to the `tracing` facade at debug level.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceObserver;

impl MergeObserver for TraceObserver {
    fn member_shared(&self, class: &str, member: &str) {
        tracing::debug!(class, member, "both shared");
    }

    fn member_inserted(&self, class: &str, member: &str, origin: Dist) {
        tracing::debug!(class, member, origin = origin.as_str(), "mirrored exclusive member");
    }

    fn class_routed(&self, name: &str, provenance: Provenance) {
        tracing::debug!(class = name, %provenance, "routed class");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Observers are object-safe and hooks default to no-ops.
    #[test]
    fn default_hooks_are_noops() {
        struct Silent;
        impl MergeObserver for Silent {}
        let obs: &dyn MergeObserver = &Silent;
        obs.member_shared("a/B", "x");
        obs.member_inserted("a/B", "y", Dist::Client);
        obs.class_routed("a/B", Provenance::Shared);
    }

    #[test]
    fn custom_observer_sees_events() {
        #[derive(Default)]
        struct Recording(Mutex<Vec<String>>);
        impl MergeObserver for Recording {
            fn member_inserted(&self, class: &str, member: &str, origin: Dist) {
                self.0
                    .lock()
                    .expect("poisoned")
                    .push(format!("{class}:{member}:{origin}"));
            }
        }
        let rec = Recording::default();
        rec.member_inserted("a/B", "f", Dist::Server);
        assert_eq!(
            rec.0.lock().expect("poisoned").as_slice(),
            ["a/B:f:server"]
        );
    }
}
