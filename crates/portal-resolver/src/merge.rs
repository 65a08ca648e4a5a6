//! Flattening of a block's own and transitive sub-block dependencies.
//!
//! Sub-blocks are walked depth first in declaration order. Each sub-block's
//! flattened map is folded into an accumulator before the block's own direct
//! dependencies, so a direct range that clashes with an inherited one is a
//! conflict rather than an override.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use portal_core::manifest::PackageManifest;
use portal_core::MANIFEST_FILE;

use crate::classify::classify;
use crate::conflict::ConflictReport;
use crate::range::RangeIntersector;
use crate::DependencyMap;

/// The parts of a block manifest the merge needs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockManifest {
    pub dependencies: DependencyMap,
    /// Sub-block locations, in declaration order.
    pub sub_blocks: Vec<String>,
}

impl From<&PackageManifest> for BlockManifest {
    fn from(pkg: &PackageManifest) -> Self {
        Self {
            dependencies: pkg.dependencies.clone(),
            sub_blocks: pkg.sub_blocks().to_vec(),
        }
    }
}

/// Looks up the manifest of a block by its location.
pub trait ManifestResolver {
    fn resolve(&self, location: &str) -> miette::Result<BlockManifest>;
}

/// Reads `<root>/<location>/package.json`.
#[derive(Debug, Clone)]
pub struct FsManifestResolver {
    root: PathBuf,
}

impl FsManifestResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ManifestResolver for FsManifestResolver {
    fn resolve(&self, location: &str) -> miette::Result<BlockManifest> {
        let path = self.root.join(location).join(MANIFEST_FILE);
        let pkg = PackageManifest::from_path(&path)?;
        Ok(BlockManifest::from(&pkg))
    }
}

/// Why a block's dependencies could not be flattened.
#[derive(Debug, Error, Diagnostic)]
pub enum MergeError {
    /// Two blocks in the tree require incompatible ranges.
    #[error("Dependencies conflict between blocks:\n{0}")]
    #[diagnostic(help("Sub-blocks and their parent must agree on dependency ranges"))]
    Conflict(ConflictReport),

    /// A block depends on itself, directly or transitively.
    #[error("Cyclic block dependency: {}", .path.join(" -> "))]
    Cycle { path: Vec<String> },

    /// A sub-block manifest could not be loaded.
    #[error("Failed to load block '{location}': {message}")]
    Manifest { location: String, message: String },
}

/// Fold `incoming` into `accumulator`.
///
/// Keys missing from the accumulator (or held with an empty range) take the
/// incoming range; keys present with an
/// intersecting range keep the accumulator's range. If any key's ranges do
/// not intersect, every such key is reported and `accumulator` is left
/// untouched.
pub fn merge_into(
    accumulator: &mut DependencyMap,
    incoming: &DependencyMap,
    ranges: &dyn RangeIntersector,
) -> Result<(), MergeError> {
    let classified = classify(incoming, accumulator, ranges);
    if !classified.conflicts.is_empty() {
        return Err(MergeError::Conflict(classified.conflicts.into()));
    }
    for lack in classified.lacks {
        accumulator.insert(lack.name, lack.range);
    }
    Ok(())
}

/// Flattens block dependency trees.
pub struct DependencyMerger<'a> {
    manifests: &'a dyn ManifestResolver,
    ranges: &'a dyn RangeIntersector,
}

impl<'a> DependencyMerger<'a> {
    pub fn new(manifests: &'a dyn ManifestResolver, ranges: &'a dyn RangeIntersector) -> Self {
        Self { manifests, ranges }
    }

    /// Flatten the dependencies of `root` (found at `location`) and of every
    /// block it transitively depends on.
    pub fn merge_all(
        &self,
        location: &str,
        root: &BlockManifest,
    ) -> Result<DependencyMap, MergeError> {
        let mut path = vec![normalize_location(location)];
        self.walk(root, &mut path)
    }

    /// Like [`merge_all`](Self::merge_all), resolving the root manifest first.
    pub fn merge_location(&self, location: &str) -> Result<DependencyMap, MergeError> {
        let root = self.load(location)?;
        self.merge_all(location, &root)
    }

    fn walk(
        &self,
        block: &BlockManifest,
        path: &mut Vec<String>,
    ) -> Result<DependencyMap, MergeError> {
        let mut accumulator = DependencyMap::new();

        for sub in &block.sub_blocks {
            let key = normalize_location(sub);
            if path.contains(&key) {
                let mut cycle = path.clone();
                cycle.push(key);
                return Err(MergeError::Cycle { path: cycle });
            }

            let manifest = self.load(sub)?;
            path.push(key);
            let flattened = self.walk(&manifest, path)?;
            path.pop();

            tracing::debug!(
                "folding {} dependencies of block '{sub}' into '{}'",
                flattened.len(),
                path.last().map(String::as_str).unwrap_or_default()
            );
            merge_into(&mut accumulator, &flattened, self.ranges)?;
        }

        merge_into(&mut accumulator, &block.dependencies, self.ranges)?;
        Ok(accumulator)
    }

    fn load(&self, location: &str) -> Result<BlockManifest, MergeError> {
        self.manifests
            .resolve(location)
            .map_err(|e| MergeError::Manifest {
                location: location.to_string(),
                message: e.to_string(),
            })
    }
}

/// Canonical form of a block location for identity checks:
/// `./blocks/a/` and `blocks/a` name the same block.
fn normalize_location(location: &str) -> String {
    let parts: Vec<&str> = location
        .split(['/', '\\'])
        .filter(|p| !p.is_empty() && *p != ".")
        .collect();
    parts.join("/")
}
