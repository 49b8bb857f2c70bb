//! Distribution sides and provenance markers.
//!
//! A compiled application ships as two parallel distributions: the client
//! and the dedicated server. Most classes are shared; the merge engine
//! records, for everything that is not, which side it came from so that
//! downstream tooling can strip or guard dist-specific code.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dist
// ---------------------------------------------------------------------------

/// One of the two input distributions being merged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dist {
    /// The client distribution.
    Client,
    /// The dedicated-server distribution.
    Server,
}

impl Dist {
    /// Stable string form used in manifest attributes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Server => "server",
        }
    }

    /// Provenance tag for an element exclusive to this side.
    #[must_use]
    pub const fn provenance(self) -> Provenance {
        match self {
            Self::Client => Provenance::ClientOnly,
            Self::Server => Provenance::ServerOnly,
        }
    }
}

impl fmt::Display for Dist {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

/// Which distribution(s) a class or member originated from.
///
/// A `Shared` class may still contain `ClientOnly`/`ServerOnly` members.
/// A `ClientOnly`/`ServerOnly` class implies every member carries the same
/// tag, so exclusive classes are tagged once at class level and their
/// members are left untagged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provenance {
    /// Present in both distributions.
    Shared,
    /// Present only in the client distribution.
    ClientOnly,
    /// Present only in the server distribution.
    ServerOnly,
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared => f.write_str("shared"),
            Self::ClientOnly => f.write_str("client-only"),
            Self::ServerOnly => f.write_str("server-only"),
        }
    }
}

// ---------------------------------------------------------------------------
// SideFlags
// ---------------------------------------------------------------------------

/// Per-side "this class has exclusive content" markers.
///
/// Set by the unordered union pass when a class's interface or nested-type
/// sets differed between distributions. The class itself stays shared; the
/// flags feed manifest/provenance reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideFlags {
    /// The client side contributed elements absent from the server.
    pub client: bool,
    /// The server side contributed elements absent from the client.
    pub server: bool,
}

impl SideFlags {
    /// Returns `true` if neither side contributed exclusive content.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        !self.client && !self.server
    }

    /// Mark `side` as having contributed exclusive content.
    pub const fn mark(&mut self, side: Dist) {
        match side {
            Dist::Client => self.client = true,
            Dist::Server => self.server = true,
        }
    }
}
