//! Classification of a source dependency map against a target map.

use crate::conflict::{Conflict, Lack};
use crate::range::RangeIntersector;
use crate::DependencyMap;

/// Source entries that are missing from, or incompatible with, the target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub lacks: Vec<Lack>,
    pub conflicts: Vec<Conflict>,
}

/// Partition every entry of `source` against `target`.
///
/// Entries absent from `target`, or declared there with an empty range,
/// become lacks; entries whose ranges do not intersect become conflicts;
/// compatible entries are dropped. Entries only in `target` are never looked
/// at. Output order follows `source`.
pub fn classify(
    source: &DependencyMap,
    target: &DependencyMap,
    ranges: &dyn RangeIntersector,
) -> Classification {
    let mut out = Classification::default();
    for (name, range) in source {
        match target.get(name).filter(|existing| !existing.is_empty()) {
            None => out.lacks.push(Lack::new(name, range)),
            Some(existing) if !ranges.intersects(existing, range) => {
                out.conflicts.push(Conflict::new(name, range, existing));
            }
            Some(_) => {}
        }
    }
    tracing::debug!(
        "classified {} dependencies: {} lacking, {} conflicting",
        source.len(),
        out.lacks.len(),
        out.conflicts.len()
    );
    out
}
