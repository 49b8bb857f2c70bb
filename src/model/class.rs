//! Structured class representation.
//!
//! [`ClassUnit`] is the in-memory form of one compiled class, produced and
//! consumed by the codec collaborator (see [`crate::archive::ClassCodec`]).
//! The merge core never touches raw class bytes: method bodies are carried
//! as opaque byte blobs, and the only thing the engine derives from them is
//! a declaration position supplied by the codec for tie-breaking.

use serde::{Deserialize, Serialize};

use crate::model::dist::{Dist, SideFlags};

// ---------------------------------------------------------------------------
// ClassUnit
// ---------------------------------------------------------------------------

/// One class of a distribution in structured form.
///
/// Field and method sequences are ordered (declaration order matters for
/// alignment); interfaces and nested-type references have set semantics and
/// are canonicalized to lexicographic order on merge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassUnit {
    /// Internal class name, unique within a distribution
    /// (e.g. `net/example/Widget`).
    pub name: String,
    /// Access/modifier bit set, opaque to the merge core.
    pub access: u32,
    /// Declared fields, in declaration order.
    pub fields: Vec<Field>,
    /// Declared methods, in declaration order.
    pub methods: Vec<Method>,
    /// Implemented interface names.
    pub interfaces: Vec<String>,
    /// Nested-type references.
    pub inner_classes: Vec<InnerClassRef>,
    /// Whole-class provenance. `None` until the distribution driver routes
    /// the class; stays `None` for shared classes when tagging is disabled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,
    /// Set when the union pass found one-sided interfaces or nested refs.
    #[serde(default, skip_serializing_if = "SideFlags::is_empty")]
    pub exclusive: SideFlags,
}

impl ClassUnit {
    /// Create an empty class with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            access: 0,
            fields: Vec::new(),
            methods: Vec::new(),
            interfaces: Vec::new(),
            inner_classes: Vec::new(),
            dist: None,
            exclusive: SideFlags::default(),
        }
    }

    /// Tag the whole class (and nothing below it) with its origin side.
    pub const fn tag(&mut self, dist: Dist) {
        self.dist = Some(dist);
    }
}

// ---------------------------------------------------------------------------
// Field
// ---------------------------------------------------------------------------

/// A field declaration. The field name alone is the identity key: within one
/// class, two fields never share a name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    /// Field name.
    pub name: String,
    /// Type descriptor (e.g. `Ljava/lang/String;`).
    pub descriptor: String,
    /// Access/modifier bit set, opaque to the merge core.
    pub access: u32,
    /// Provenance marker attached when this field was inserted from the
    /// other distribution. `None` for shared fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,
}

impl Field {
    /// Create a field with the given name and descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access: 0,
            dist: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Method
// ---------------------------------------------------------------------------

/// A method declaration. Name plus descriptor is the identity key: overloads
/// differ by descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Method {
    /// Method name.
    pub name: String,
    /// Parameter/return descriptor (e.g. `(I)V`).
    pub descriptor: String,
    /// Access/modifier bit set, opaque to the merge core.
    pub access: u32,
    /// First source-line number of the body, when the codec could derive
    /// one. Used only as the declared-order tie-break; methods without line
    /// information order last.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Instruction body, opaque to the merge core.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body: Vec<u8>,
    /// Provenance marker attached when this method was inserted from the
    /// other distribution. `None` for shared methods.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dist: Option<Dist>,
}

impl Method {
    /// Create a method with the given name and descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, descriptor: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            descriptor: descriptor.into(),
            access: 0,
            line: None,
            body: Vec::new(),
            dist: None,
        }
    }

    /// Set the first declared source line (tie-break position).
    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

// ---------------------------------------------------------------------------
// InnerClassRef
// ---------------------------------------------------------------------------

/// A nested-type reference.
///
/// Identity is the whole `(name, outer_name, inner_name)` triple; anonymous
/// and local classes leave `outer_name`/`inner_name` unset. `Ord` is derived
/// so merged reference lists can be canonicalized for deterministic output.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InnerClassRef {
    /// Internal name of the nested class.
    pub name: String,
    /// Internal name of the enclosing class, if the reference records one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outer_name: Option<String>,
    /// Simple name of the nested class; `None` for anonymous classes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_name: Option<String>,
}

impl InnerClassRef {
    /// Create a reference to a named nested class.
    #[must_use]
    pub fn new(name: impl Into<String>, outer: impl Into<String>, inner: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outer_name: Some(outer.into()),
            inner_name: Some(inner.into()),
        }
    }

    /// Create a reference to an anonymous nested class.
    #[must_use]
    pub fn anonymous(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            outer_name: None,
            inner_name: None,
        }
    }
}
