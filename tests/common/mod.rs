//! Shared helpers for integration tests.
//!
//! Real deployments plug in a binary class-file codec; tests use a JSON
//! stand-in so the pipeline can be exercised end-to-end with readable
//! fixtures.

use distmerge::{ClassCodec, ClassUnit, Field, MemoryArchive, MergeError, Method};

/// JSON-backed [`ClassCodec`] test double. Encoding is deterministic
/// (struct field order), which the byte-for-byte determinism tests rely on.
pub struct JsonCodec;

impl ClassCodec for JsonCodec {
    fn decode(&self, entry: &str, data: &[u8]) -> Result<ClassUnit, MergeError> {
        serde_json::from_slice(data).map_err(|e| MergeError::codec(entry, e.to_string()))
    }

    fn encode(&self, class: &ClassUnit) -> Result<Vec<u8>, MergeError> {
        serde_json::to_vec(class).map_err(|e| MergeError::codec(&class.name, e.to_string()))
    }
}

/// Build a class with the given fields (all `I`-typed) and methods
/// (all `()V`, lines ascending from 10 in steps of 10).
pub fn class(name: &str, fields: &[&str], methods: &[&str]) -> ClassUnit {
    let mut unit = ClassUnit::new(name);
    unit.fields = fields.iter().map(|f| Field::new(*f, "I")).collect();
    unit.methods = methods
        .iter()
        .enumerate()
        .map(|(i, m)| Method::new(*m, "()V").at_line(10 * (u32::try_from(i).expect("small") + 1)))
        .collect();
    unit
}

/// Store `class` into `archive` under its entry name, JSON-encoded.
pub fn put_class(archive: &mut MemoryArchive, unit: &ClassUnit) {
    let data = JsonCodec.encode(unit).expect("encode fixture");
    archive.insert(format!("{}.class", unit.name), data);
}

/// Decode the class stored under `entry` in `archive`.
pub fn get_class(archive: &MemoryArchive, entry: &str) -> ClassUnit {
    let data = archive.get(entry).expect("entry present");
    JsonCodec.decode(entry, data).expect("decode fixture")
}
