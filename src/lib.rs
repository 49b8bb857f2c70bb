//! Structural merge of two parallel distributions of a compiled
//! application.
//!
//! A client distribution and a server distribution share most of their
//! compiled classes but diverge in some members and resources. This crate
//! reconciles the two into a single combined distribution loadable by
//! either runtime, recording for every one-sided element which side it came
//! from so downstream tooling can strip or guard dist-specific code.
//!
//! The core is pure and I/O-free: codecs and archive containers are
//! collaborator traits (see [`archive`]), and the whole run is a
//! deterministic batch transform: same inputs, byte-identical output.

pub mod archive;
pub mod config;
pub mod error;
pub mod manifest;
pub mod merge;
pub mod model;

pub use archive::{
    ArchiveSink, ArchiveSource, ClassCodec, EntryKind, MemoryArchive, STABLE_ENTRY_TIME_MS,
    classify_entry, merge_archives,
};
pub use config::MergeConfig;
pub use error::MergeError;
pub use manifest::{ManifestBuilder, ProvenanceTable};
pub use merge::class::Reconciler;
pub use merge::dist::{DistInput, MergeReport, MergedDistribution, ResourceEntry, merge_distributions};
pub use merge::observe::{MergeObserver, NoopObserver, TraceObserver};
pub use model::{ClassUnit, Dist, Field, InnerClassRef, Method, Provenance, SideFlags};
