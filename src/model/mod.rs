//! In-memory data model shared by the merge pipeline.

pub mod class;
pub mod dist;

pub use class::{ClassUnit, Field, InnerClassRef, Method};
pub use dist::{Dist, Provenance, SideFlags};
