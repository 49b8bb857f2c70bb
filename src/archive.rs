//! Archive boundary: collaborator traits and the run orchestrator.
//!
//! The merge core holds no I/O. Reading input distributions, decoding class
//! payloads, and writing the combined output all happen behind the narrow
//! traits defined here ([`ArchiveSource`], [`ClassCodec`], [`ArchiveSink`]);
//! [`merge_archives`] wires them around the distribution driver.
//!
//! Callers own atomicity: a failed run must not leave a corrupted artifact,
//! so sinks should stage output (temp file, in-memory buffer) and finalize
//! only after `merge_archives` returns `Ok`.

use std::collections::BTreeMap;

use crate::config::MergeConfig;
use crate::error::MergeError;
use crate::manifest::{MANIFEST_PATH, ManifestBuilder, parse_main_attributes};
use crate::merge::class::Reconciler;
use crate::merge::dist::{DistInput, MergeReport, ResourceEntry, merge_distributions};
use crate::model::ClassUnit;

/// Fixed modification time (milliseconds since the Unix epoch) for every
/// output entry, so merged archives are byte-for-byte reproducible.
/// Values before 1980 serialize differently across zip implementations, so
/// zero is not usable.
pub const STABLE_ENTRY_TIME_MS: u64 = 0x0092_D668_8800;

// ---------------------------------------------------------------------------
// Collaborator traits
// ---------------------------------------------------------------------------

/// Read side of an input distribution.
pub trait ArchiveSource {
    /// Names of every entry in the archive.
    ///
    /// # Errors
    ///
    /// [`MergeError::Io`] on container read failure.
    fn entry_names(&self) -> Result<Vec<String>, MergeError>;

    /// Raw bytes of one entry.
    ///
    /// # Errors
    ///
    /// [`MergeError::Io`] if the entry is missing or unreadable.
    fn read(&self, name: &str) -> Result<Vec<u8>, MergeError>;
}

/// Write side of the combined output distribution.
pub trait ArchiveSink {
    /// Write one entry with the given fixed modification time.
    ///
    /// # Errors
    ///
    /// [`MergeError::Io`] on container write failure.
    fn write(&mut self, name: &str, data: &[u8], mtime_ms: u64) -> Result<(), MergeError>;
}

/// Structured-class codec. Round-trips must be bit-exact except for derived
/// metadata (stack/frame sizing) that the codec recomputes itself.
pub trait ClassCodec {
    /// Decode one class entry's bytes.
    ///
    /// # Errors
    ///
    /// [`MergeError::Codec`] on malformed input bytes.
    fn decode(&self, entry: &str, data: &[u8]) -> Result<ClassUnit, MergeError>;

    /// Encode a class back to entry bytes.
    ///
    /// # Errors
    ///
    /// [`MergeError::Codec`] if the class cannot be represented.
    fn encode(&self, class: &ClassUnit) -> Result<Vec<u8>, MergeError>;
}

// ---------------------------------------------------------------------------
// Entry classification
// ---------------------------------------------------------------------------

/// What an archive entry is, by naming convention.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryKind {
    /// A compiled class payload (`*.class`, not dot-prefixed).
    Class,
    /// A plain resource entry.
    Resource,
    /// A metadata-namespace entry (`META-INF/`).
    Metadata,
    /// A directory marker; never carried into the output.
    Directory,
}

/// Classify an entry name. A naming-convention check only; no content
/// inspection.
#[must_use]
pub fn classify_entry(name: &str) -> EntryKind {
    if name.ends_with('/') {
        EntryKind::Directory
    } else if name.ends_with(".class") && !name.starts_with('.') {
        EntryKind::Class
    } else if name.starts_with("META-INF/") {
        EntryKind::Metadata
    } else {
        EntryKind::Resource
    }
}

/// Archive entry name for a class's internal name.
#[must_use]
pub fn class_entry_name(class_name: &str) -> String {
    format!("{class_name}.class")
}

// ---------------------------------------------------------------------------
// MemoryArchive
// ---------------------------------------------------------------------------

/// In-memory archive implementing both [`ArchiveSource`] and
/// [`ArchiveSink`]. Used as a staging buffer and by tests.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryArchive {
    entries: BTreeMap<String, (Vec<u8>, u64)>,
}

impl MemoryArchive {
    /// Create an empty archive.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert an entry (modification time zero).
    pub fn insert(&mut self, name: impl Into<String>, data: impl Into<Vec<u8>>) {
        self.entries.insert(name.into(), (data.into(), 0));
    }

    /// Bytes of one entry, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&[u8]> {
        self.entries.get(name).map(|(data, _)| data.as_slice())
    }

    /// Recorded modification time of one entry, if present.
    #[must_use]
    pub fn mtime_ms(&self, name: &str) -> Option<u64> {
        self.entries.get(name).map(|(_, mtime)| *mtime)
    }

    /// Entry names in lexicographic order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the archive holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ArchiveSource for MemoryArchive {
    fn entry_names(&self) -> Result<Vec<String>, MergeError> {
        Ok(self.entries.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, MergeError> {
        self.entries
            .get(name)
            .map(|(data, _)| data.clone())
            .ok_or_else(|| {
                MergeError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no such entry: {name}"),
                ))
            })
    }
}

impl ArchiveSink for MemoryArchive {
    fn write(&mut self, name: &str, data: &[u8], mtime_ms: u64) -> Result<(), MergeError> {
        self.entries
            .insert(name.to_owned(), (data.to_vec(), mtime_ms));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// merge_archives
// ---------------------------------------------------------------------------

/// One decoded input distribution plus its raw manifest text, if any.
struct LoadedSide {
    input: DistInput,
    manifest: Option<String>,
}

/// Merge two input distributions into the sink.
///
/// Entry order in the output: manifest (when configured), resources, then
/// classes, all at [`STABLE_ENTRY_TIME_MS`] and in lexicographic name order
/// within each group.
///
/// # Errors
///
/// Propagates codec and I/O errors unchanged; the first
/// [`MergeError::IntegrityViolation`] from any class pair aborts the run.
pub fn merge_archives<C, S, K, W>(
    client: &C,
    server: &S,
    codec: &K,
    config: &MergeConfig,
    sink: &mut W,
) -> Result<MergeReport, MergeError>
where
    C: ArchiveSource,
    S: ArchiveSource,
    K: ClassCodec,
    W: ArchiveSink,
{
    let client_side = load_side(client, codec)?;
    let server_side = load_side(server, codec)?;

    let reconciler = Reconciler::new(config);
    let merged = merge_distributions(&reconciler, &client_side.input, &server_side.input)?;

    if config.writes_manifest() {
        let mut builder = ManifestBuilder::new();
        if config.copy_resources && config.keep_metadata {
            for text in [&client_side.manifest, &server_side.manifest].into_iter().flatten() {
                builder.merge_main_attributes(parse_main_attributes(text));
            }
        }
        if config.write_provenance_manifest {
            builder.add_provenance(&merged.provenance);
        }
        sink.write(MANIFEST_PATH, builder.render().as_bytes(), STABLE_ENTRY_TIME_MS)?;
    }

    for resource in &merged.resources {
        sink.write(&resource.name, &resource.data, STABLE_ENTRY_TIME_MS)?;
    }
    for class in &merged.classes {
        let data = codec.encode(class)?;
        sink.write(&class_entry_name(&class.name), &data, STABLE_ENTRY_TIME_MS)?;
    }

    tracing::debug!(
        classes = merged.classes.len(),
        resources = merged.resources.len(),
        "wrote combined distribution"
    );
    Ok(merged.report)
}

/// Enumerate, classify, and decode one input distribution.
fn load_side<A: ArchiveSource, K: ClassCodec>(
    archive: &A,
    codec: &K,
) -> Result<LoadedSide, MergeError> {
    let mut input = DistInput::default();
    let mut manifest = None;
    for name in archive.entry_names()? {
        match classify_entry(&name) {
            EntryKind::Directory => {}
            EntryKind::Class => {
                let data = archive.read(&name)?;
                input.add_class(codec.decode(&name, &data)?);
            }
            kind @ (EntryKind::Resource | EntryKind::Metadata) => {
                let data = archive.read(&name)?;
                if name == MANIFEST_PATH {
                    manifest = Some(String::from_utf8_lossy(&data).into_owned());
                }
                input.resources.push(ResourceEntry {
                    name,
                    data,
                    metadata: kind == EntryKind::Metadata,
                });
            }
        }
    }
    Ok(LoadedSide { input, manifest })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_naming_conventions() {
        assert_eq!(classify_entry("a/B.class"), EntryKind::Class);
        assert_eq!(classify_entry(".hidden.class"), EntryKind::Resource);
        assert_eq!(classify_entry("assets/logo.png"), EntryKind::Resource);
        assert_eq!(classify_entry("META-INF/MANIFEST.MF"), EntryKind::Metadata);
        assert_eq!(classify_entry("META-INF/services/a.B"), EntryKind::Metadata);
        assert_eq!(classify_entry("a/"), EntryKind::Directory);
    }

    #[test]
    fn class_entry_name_appends_suffix() {
        assert_eq!(class_entry_name("a/B"), "a/B.class");
    }

    #[test]
    fn memory_archive_round_trip() {
        let mut archive = MemoryArchive::new();
        assert!(archive.is_empty());
        archive
            .write("x.class", &[1, 2], STABLE_ENTRY_TIME_MS)
            .expect("write");
        assert_eq!(archive.get("x.class"), Some([1u8, 2].as_slice()));
        assert_eq!(archive.mtime_ms("x.class"), Some(STABLE_ENTRY_TIME_MS));
        assert_eq!(archive.read("x.class").expect("read"), vec![1, 2]);
        assert!(archive.read("missing").is_err());
        assert_eq!(archive.len(), 1);
    }
}
