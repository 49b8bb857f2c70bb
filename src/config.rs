//! Merge run configuration.
//!
//! Typed configuration for a merge run, parsed from a TOML file or built in
//! code. Missing fields use defaults; a missing file means all defaults (no
//! error). The merge core receives this as a plain value and performs no
//! parsing of its own.

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::MergeError;

// ---------------------------------------------------------------------------
// MergeConfig
// ---------------------------------------------------------------------------

/// Configuration for one distribution merge run.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MergeConfig {
    /// Copy non-class resource entries from the client distribution into
    /// the output (default: `false`). Server resources are never copied;
    /// they are assumed to be redistributable dependencies, not original
    /// content.
    #[serde(default)]
    pub copy_resources: bool,

    /// Carry metadata in the merged output manifest instead of copying raw
    /// metadata-namespace entries (`META-INF/`): base attributes of both
    /// input manifests are merged and raw `META-INF/` resources are skipped
    /// (default: `false`, raw entries copied).
    /// Only meaningful together with `copy_resources`.
    #[serde(default)]
    pub keep_metadata: bool,

    /// Record the origin distribution of every exclusive entry in the
    /// output manifest (default: `false`).
    #[serde(default)]
    pub write_provenance_manifest: bool,

    /// Attach origin markers to mirrored members and exclusive classes
    /// (default: `true`). Disabling is a pure no-op on merge structure.
    #[serde(default = "default_true")]
    pub inject_markers: bool,

    /// When non-empty, restrict class processing to these internal names;
    /// classes outside the list are skipped entirely, neither merged nor
    /// copied. Used to scope partial re-merges.
    #[serde(default)]
    pub allow_list: BTreeSet<String>,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            copy_resources: false,
            keep_metadata: false,
            write_provenance_manifest: false,
            inject_markers: true,
            allow_list: BTreeSet::new(),
        }
    }
}

const fn default_true() -> bool {
    true
}

impl MergeConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// [`MergeError::Config`] if the file exists but cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, MergeError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| MergeError::Config {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }

    /// Returns `true` if `class_name` should be processed under the
    /// allow-list (empty list admits everything).
    #[must_use]
    pub fn admits(&self, class_name: &str) -> bool {
        self.allow_list.is_empty() || self.allow_list.contains(class_name)
    }

    /// Returns `true` if the run needs a manifest entry in the output.
    #[must_use]
    pub const fn writes_manifest(&self) -> bool {
        self.write_provenance_manifest || (self.copy_resources && self.keep_metadata)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let cfg = MergeConfig::default();
        assert!(!cfg.copy_resources);
        assert!(!cfg.keep_metadata);
        assert!(!cfg.write_provenance_manifest);
        assert!(cfg.inject_markers);
        assert!(cfg.allow_list.is_empty());
        assert!(!cfg.writes_manifest());
    }

    #[test]
    fn missing_file_is_defaults() {
        let cfg = MergeConfig::load(Path::new("/nonexistent/distmerge.toml")).expect("load");
        assert_eq!(cfg, MergeConfig::default());
    }

    #[test]
    fn parses_partial_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(
            file,
            "copy_resources = true\nallow_list = [\"a/B\", \"a/C\"]"
        )
        .expect("write");
        let cfg = MergeConfig::load(file.path()).expect("load");
        assert!(cfg.copy_resources);
        assert!(cfg.inject_markers, "unset fields keep defaults");
        assert!(cfg.admits("a/B"));
        assert!(!cfg.admits("a/D"));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "copy_resorces = true").expect("write");
        let err = MergeConfig::load(file.path()).expect_err("must fail");
        assert!(matches!(err, MergeError::Config { .. }));
    }

    #[test]
    fn empty_allow_list_admits_everything() {
        let cfg = MergeConfig::default();
        assert!(cfg.admits("anything/At/All"));
    }

    #[test]
    fn manifest_needed_for_meta_carrying_runs() {
        let cfg = MergeConfig {
            copy_resources: true,
            keep_metadata: true,
            ..MergeConfig::default()
        };
        assert!(cfg.writes_manifest());
    }
}
