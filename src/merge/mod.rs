//! Structural merge pipeline.
//!
//! Leaf-first: member equivalence/ordering ([`member`]) parameterizes the
//! ordered alignment engine ([`sequence`]); unordered structural sets go
//! through [`union`]; [`class`] drives the four passes for one same-named
//! class pair; [`dist`] routes whole distributions and assembles the
//! combined output plus provenance records.
//!
//! # Determinism guarantee
//!
//! The same pair of input distributions always produces the same output:
//! class names and resource names are processed in lexicographic order,
//! unordered sets are canonicalized on emission, and the divergent-insertion
//! tie-break is a total order over members.

pub mod class;
pub mod dist;
pub mod member;
pub mod observe;
pub mod sequence;
pub mod union;
