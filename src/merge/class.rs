//! Per-class reconciliation driver.
//!
//! [`Reconciler`] bundles the configuration and observer capabilities and
//! drives the full merge of one same-named class pair: ordered alignment
//! for fields and methods, unordered union for interfaces and nested-type
//! references, then emission of a single merged [`ClassUnit`] built from
//! the client-side structure (which by then carries every server-exclusive
//! insertion, tagged).
//!
//! Stateless, single pass, no retries: any integrity violation aborts the
//! class's merge and is surfaced to the caller as fatal, never skipped.

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::merge::observe::{MergeObserver, TraceObserver};
use crate::merge::sequence::{MergeSession, merge_ordered};
use crate::merge::union::merge_unordered;
use crate::model::{ClassUnit, Dist, SideFlags};

static TRACE: TraceObserver = TraceObserver;

// ---------------------------------------------------------------------------
// Reconciler
// ---------------------------------------------------------------------------

/// Capability bundle for class reconciliation: configuration plus the
/// injected observer. Cheap to construct, holds no per-class state, so one
/// instance can drive every class pair of a run.
pub struct Reconciler<'a> {
    config: &'a MergeConfig,
    observer: &'a dyn MergeObserver,
}

impl<'a> Reconciler<'a> {
    /// Create a reconciler reporting through the `tracing` facade.
    #[must_use]
    pub fn new(config: &'a MergeConfig) -> Self {
        Self {
            config,
            observer: &TRACE,
        }
    }

    /// Replace the observer.
    #[must_use]
    pub fn with_observer(mut self, observer: &'a dyn MergeObserver) -> Self {
        self.observer = observer;
        self
    }

    /// The configuration this reconciler runs under.
    #[must_use]
    pub const fn config(&self) -> &MergeConfig {
        self.config
    }

    pub(crate) const fn observer(&self) -> &dyn MergeObserver {
        self.observer
    }

    /// Merge a same-named class pair into one [`ClassUnit`].
    ///
    /// The returned unit keeps the client's structure as canonical; both
    /// internal sequences are checked to be equal-length and congruent
    /// before it is emitted.
    ///
    /// # Errors
    ///
    /// [`MergeError::IntegrityViolation`] if the names differ, if either
    /// side carries duplicate member identity keys, or if the alignment
    /// walk's internal checks fail.
    pub fn merge_class(
        &self,
        client: &ClassUnit,
        server: &ClassUnit,
    ) -> Result<ClassUnit, MergeError> {
        if client.name != server.name {
            return Err(MergeError::integrity(
                &client.name,
                format!("paired with differently-named class `{}`", server.name),
            ));
        }

        let session = MergeSession {
            class: &client.name,
            tag_inserts: self.config.inject_markers,
            observer: self.observer,
        };

        let (fields, _) = merge_ordered(&session, &client.fields, &server.fields)?;
        let (methods, _) = merge_ordered(&session, &client.methods, &server.methods)?;

        let interfaces = merge_unordered(&client.interfaces, &server.interfaces);
        let inners = merge_unordered(&client.inner_classes, &server.inner_classes);

        let mut exclusive = SideFlags::default();
        if !interfaces.client_only.is_empty() || !inners.client_only.is_empty() {
            exclusive.mark(Dist::Client);
        }
        if !interfaces.server_only.is_empty() || !inners.server_only.is_empty() {
            exclusive.mark(Dist::Server);
        }

        Ok(ClassUnit {
            name: client.name.clone(),
            access: client.access,
            fields,
            methods,
            interfaces: interfaces.merged,
            inner_classes: inners.merged,
            dist: None,
            exclusive,
        })
    }
}
