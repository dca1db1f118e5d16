//! Surface manifest discovery and loading.
//!
//! Manifests are discovered by glob pattern relative to a base directory,
//! loaded in sorted path order, and folded into a single
//! [`Manifest`](typebridge::Manifest) so generation always sees one
//! surface.

use std::path::{Path, PathBuf};

use typebridge::{Diagnostics, Manifest};

use crate::error::{CliResult, ManifestError};

/// Expand one glob pattern relative to a base directory.
///
/// Matches are returned sorted so merge order is stable across runs.
fn expand_pattern(base: &Path, pattern: &str) -> CliResult<Vec<PathBuf>> {
    let full = base.join(pattern);
    let full = full.to_string_lossy();

    let entries = glob::glob(&full)
        .map_err(|e| ManifestError::invalid_pattern(pattern, e.to_string()))?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ManifestError::Io {
            path: e.path().to_path_buf(),
            source: e.into(),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Load a single manifest file.
pub fn load_manifest(path: &Path) -> CliResult<Manifest> {
    let content = std::fs::read_to_string(path).map_err(|e| ManifestError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let manifest = serde_json::from_str(&content)
        .map_err(|e| ManifestError::invalid_json(path.to_path_buf(), e.to_string()))?;

    Ok(manifest)
}

/// Load and merge every manifest matched by the given patterns.
///
/// A pattern matching nothing is an error; a partial surface would
/// otherwise generate silently incomplete declarations. Merge collisions
/// are routed through the shared diagnostics context.
pub fn load_manifests(
    base: &Path,
    patterns: &[String],
    diag: &mut Diagnostics,
) -> CliResult<Manifest> {
    let mut merged = Manifest::default();

    for pattern in patterns {
        let paths = expand_pattern(base, pattern)?;
        if paths.is_empty() {
            return Err(ManifestError::no_matches(pattern).into());
        }
        for path in paths {
            let manifest = load_manifest(&path)?;
            merged.merge(manifest, diag)?;
        }
    }

    Ok(merged)
}
