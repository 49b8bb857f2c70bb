//! Distribution-level reconciliation driver.
//!
//! Takes the full name → class mapping of each distribution plus its
//! non-class resource entries, classifies every class name as shared,
//! client-only, or server-only, routes shared pairs through
//! [`Reconciler::merge_class`], and assembles the combined output set plus
//! the provenance side table for manifest emission.
//!
//! Resource policy: resources are copied from the client distribution only
//! (the server archive bundles redistributable dependencies, not original
//! content), gated by [`MergeConfig::copy_resources`]. Metadata-namespace
//! entries are carried raw by default; [`MergeConfig::keep_metadata`] routes
//! metadata into the merged output manifest instead and skips the raw
//! entries.
//!
//! All iteration is over `BTreeMap`/`BTreeSet` so the output is
//! deterministic regardless of input enumeration order.
//!
//! [`MergeConfig::copy_resources`]: crate::config::MergeConfig::copy_resources
//! [`MergeConfig::keep_metadata`]: crate::config::MergeConfig::keep_metadata

use std::collections::{BTreeMap, BTreeSet};

use crate::archive::class_entry_name;
use crate::error::MergeError;
use crate::manifest::{MANIFEST_PATH, ProvenanceTable};
use crate::merge::class::Reconciler;
use crate::model::{ClassUnit, Dist, Provenance};

// ---------------------------------------------------------------------------
// DistInput
// ---------------------------------------------------------------------------

/// One non-class payload entry of a distribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceEntry {
    /// Entry name (path inside the archive).
    pub name: String,
    /// Raw entry bytes, opaque to the merge core.
    pub data: Vec<u8>,
    /// Whether the entry lives in the metadata namespace (`META-INF/`).
    pub metadata: bool,
}

/// Everything the driver needs from one distribution.
#[derive(Clone, Debug, Default)]
pub struct DistInput {
    /// Classes by internal name.
    pub classes: BTreeMap<String, ClassUnit>,
    /// Non-class resource entries.
    pub resources: Vec<ResourceEntry>,
}

impl DistInput {
    /// Add a class, keyed by its own name.
    pub fn add_class(&mut self, class: ClassUnit) {
        self.classes.insert(class.name.clone(), class);
    }
}

// ---------------------------------------------------------------------------
// MergedDistribution
// ---------------------------------------------------------------------------

/// Counters summarizing one merge run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Classes present in both distributions and structurally merged.
    pub classes_merged: usize,
    /// Classes copied through from the client only.
    pub classes_client_only: usize,
    /// Classes copied through from the server only.
    pub classes_server_only: usize,
    /// Classes skipped by the allow-list.
    pub classes_skipped: usize,
    /// Resource entries carried into the output.
    pub resources_copied: usize,
}

/// The combined output of one run: a single class set, the carried
/// resources, and the provenance side table. Produced once, written out by
/// the caller, not persisted.
#[derive(Clone, Debug, Default)]
pub struct MergedDistribution {
    /// Merged and copied classes, sorted by name.
    pub classes: Vec<ClassUnit>,
    /// Carried resource entries, sorted by name.
    pub resources: Vec<ResourceEntry>,
    /// Entry-name → origin side for everything exclusive to one
    /// distribution.
    pub provenance: ProvenanceTable,
    /// Run counters.
    pub report: MergeReport,
}

// ---------------------------------------------------------------------------
// merge_distributions
// ---------------------------------------------------------------------------

/// Reconcile two whole distributions into one combined output.
///
/// # Errors
///
/// The first [`MergeError::IntegrityViolation`] from any class pair aborts
/// the run; there is no partial-success mode.
pub fn merge_distributions(
    reconciler: &Reconciler<'_>,
    client: &DistInput,
    server: &DistInput,
) -> Result<MergedDistribution, MergeError> {
    let config = reconciler.config();
    let mut out = MergedDistribution::default();

    let names: BTreeSet<&String> = client.classes.keys().chain(server.classes.keys()).collect();
    for name in names {
        if !config.admits(name) {
            out.report.classes_skipped += 1;
            continue;
        }
        match (client.classes.get(name), server.classes.get(name)) {
            (Some(c), Some(s)) => {
                reconciler.observer().class_routed(name, Provenance::Shared);
                out.classes.push(reconciler.merge_class(c, s)?);
                out.report.classes_merged += 1;
            }
            (Some(c), None) => {
                out.classes.push(copy_exclusive(reconciler, &mut out.provenance, c, Dist::Client));
                out.report.classes_client_only += 1;
            }
            (None, Some(s)) => {
                out.classes.push(copy_exclusive(reconciler, &mut out.provenance, s, Dist::Server));
                out.report.classes_server_only += 1;
            }
            (None, None) => unreachable!("name drawn from one of the two key sets"),
        }
    }

    if config.copy_resources {
        let server_names: BTreeSet<&str> =
            server.resources.iter().map(|r| r.name.as_str()).collect();
        let mut carried: Vec<ResourceEntry> = client
            .resources
            .iter()
            .filter(|r| r.name != MANIFEST_PATH)
            .filter(|r| !r.metadata || !config.keep_metadata)
            .cloned()
            .collect();
        carried.sort_by(|a, b| a.name.cmp(&b.name));
        if config.write_provenance_manifest {
            for resource in &carried {
                if !server_names.contains(resource.name.as_str()) {
                    out.provenance.record(&resource.name, Dist::Client);
                }
            }
        }
        out.report.resources_copied = carried.len();
        out.resources = carried;
    }

    tracing::debug!(
        merged = out.report.classes_merged,
        client_only = out.report.classes_client_only,
        server_only = out.report.classes_server_only,
        skipped = out.report.classes_skipped,
        resources = out.report.resources_copied,
        "reconciled distributions"
    );
    Ok(out)
}

/// Copy a one-sided class through unchanged, tagging the class (not its
/// members) and recording its origin in the side table.
fn copy_exclusive(
    reconciler: &Reconciler<'_>,
    provenance: &mut ProvenanceTable,
    class: &ClassUnit,
    origin: Dist,
) -> ClassUnit {
    reconciler
        .observer()
        .class_routed(&class.name, origin.provenance());
    provenance.record(class_entry_name(&class.name), origin);
    let mut copied = class.clone();
    if reconciler.config().inject_markers {
        copied.tag(origin);
    }
    copied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MergeConfig;
    use crate::model::Field;

    fn class_with_field(name: &str, field: &str) -> ClassUnit {
        let mut unit = ClassUnit::new(name);
        unit.fields.push(Field::new(field, "I"));
        unit
    }

    fn inputs() -> (DistInput, DistInput) {
        let mut client = DistInput::default();
        client.add_class(class_with_field("a/Shared", "both"));
        client.add_class(class_with_field("a/ClientOnly", "c"));
        client.resources.push(ResourceEntry {
            name: "assets/logo.png".to_owned(),
            data: vec![1, 2, 3],
            metadata: false,
        });
        client.resources.push(ResourceEntry {
            name: "META-INF/services/a.B".to_owned(),
            data: vec![4],
            metadata: true,
        });

        let mut server = DistInput::default();
        server.add_class(class_with_field("a/Shared", "both"));
        server.add_class(class_with_field("a/ServerOnly", "s"));
        server.resources.push(ResourceEntry {
            name: "log4j2.xml".to_owned(),
            data: vec![9],
            metadata: false,
        });
        (client, server)
    }

    #[test]
    fn classifies_shared_and_exclusive_classes() {
        let config = MergeConfig::default();
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let out = merge_distributions(&reconciler, &client, &server).expect("merge");

        let names: Vec<_> = out.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a/ClientOnly", "a/ServerOnly", "a/Shared"]);

        let by_name = |n: &str| out.classes.iter().find(|c| c.name == n).expect("class");
        assert_eq!(by_name("a/ClientOnly").dist, Some(Dist::Client));
        assert_eq!(by_name("a/ServerOnly").dist, Some(Dist::Server));
        assert_eq!(by_name("a/Shared").dist, None);

        assert_eq!(out.provenance.origin("a/ClientOnly.class"), Some(Dist::Client));
        assert_eq!(out.provenance.origin("a/ServerOnly.class"), Some(Dist::Server));
        assert_eq!(out.provenance.origin("a/Shared.class"), None);

        assert_eq!(out.report.classes_merged, 1);
        assert_eq!(out.report.classes_client_only, 1);
        assert_eq!(out.report.classes_server_only, 1);
    }

    #[test]
    fn resources_are_skipped_by_default() {
        let config = MergeConfig::default();
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let out = merge_distributions(&reconciler, &client, &server).expect("merge");
        assert!(out.resources.is_empty());
        assert_eq!(out.report.resources_copied, 0);
    }

    #[test]
    fn raw_metadata_is_copied_by_default() {
        let config = MergeConfig {
            copy_resources: true,
            ..MergeConfig::default()
        };
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let out = merge_distributions(&reconciler, &client, &server).expect("merge");
        let names: Vec<_> = out.resources.iter().map(|r| r.name.as_str()).collect();
        // Server's log4j2.xml is never copied; raw META-INF entries are
        // carried while no merged manifest supersedes them.
        assert_eq!(names, ["META-INF/services/a.B", "assets/logo.png"]);
    }

    #[test]
    fn keep_metadata_skips_raw_entries() {
        let config = MergeConfig {
            copy_resources: true,
            keep_metadata: true,
            write_provenance_manifest: true,
            ..MergeConfig::default()
        };
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let out = merge_distributions(&reconciler, &client, &server).expect("merge");
        let names: Vec<_> = out.resources.iter().map(|r| r.name.as_str()).collect();
        // Metadata moves into the merged manifest; only plain resources stay.
        assert_eq!(names, ["assets/logo.png"]);
        assert_eq!(out.provenance.origin("assets/logo.png"), Some(Dist::Client));
    }

    #[test]
    fn allow_list_scopes_processing() {
        let config = MergeConfig {
            allow_list: ["a/Shared".to_owned()].into(),
            ..MergeConfig::default()
        };
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let out = merge_distributions(&reconciler, &client, &server).expect("merge");
        let names: Vec<_> = out.classes.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["a/Shared"]);
        assert_eq!(out.report.classes_skipped, 2);
        assert!(out.provenance.is_empty());
    }

    #[test]
    fn integrity_violation_aborts_the_run() {
        let config = MergeConfig::default();
        let reconciler = Reconciler::new(&config);
        let mut client = DistInput::default();
        let mut bad = ClassUnit::new("a/Bad");
        bad.fields = vec![Field::new("dup", "I"), Field::new("dup", "J")];
        client.add_class(bad);
        let mut server = DistInput::default();
        server.add_class(ClassUnit::new("a/Bad"));
        let err = merge_distributions(&reconciler, &client, &server).expect_err("must fail");
        assert!(err.is_integrity_violation());
    }

    #[test]
    fn runs_are_deterministic() {
        let config = MergeConfig {
            copy_resources: true,
            keep_metadata: true,
            write_provenance_manifest: true,
            ..MergeConfig::default()
        };
        let reconciler = Reconciler::new(&config);
        let (client, server) = inputs();
        let first = merge_distributions(&reconciler, &client, &server).expect("merge");
        let second = merge_distributions(&reconciler, &client, &server).expect("merge");
        assert_eq!(first.classes, second.classes);
        assert_eq!(first.resources, second.resources);
        assert_eq!(first.provenance, second.provenance);
        assert_eq!(first.report, second.report);
    }
}
