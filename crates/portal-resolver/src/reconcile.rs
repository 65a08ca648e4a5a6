//! Reconciliation of a block's flattened dependencies with a host project.

use crate::classify::classify;
use crate::conflict::{Conflict, ConflictReport, Lack};
use crate::range::RangeIntersector;
use crate::DependencyMap;

/// Outcome of comparing a block with a project, for both dependency kinds.
///
/// Abort and install policy belongs to the caller: any conflict should abort
/// the pull, lacks are candidates for installation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub conflicts: Vec<Conflict>,
    pub lacks: Vec<Lack>,
    pub dev_conflicts: Vec<Conflict>,
    pub dev_lacks: Vec<Lack>,
}

impl ReconciliationResult {
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty() || !self.dev_conflicts.is_empty()
    }

    /// Runtime conflicts followed by dev conflicts.
    pub fn all_conflicts(&self) -> ConflictReport {
        self.conflicts
            .iter()
            .chain(&self.dev_conflicts)
            .cloned()
            .collect::<Vec<_>>()
            .into()
    }

    /// Dev lacks not already being installed as runtime dependencies.
    pub fn dev_install_list(&self) -> Vec<Lack> {
        self.dev_lacks
            .iter()
            .filter(|dev| !self.lacks.iter().any(|lack| lack.name == dev.name))
            .cloned()
            .collect()
    }
}

/// Classify block runtime dependencies against the project's runtime
/// dependencies, and block dev dependencies against everything the project
/// declares.
pub fn reconcile(
    block_deps: &DependencyMap,
    project_deps: &DependencyMap,
    block_dev_deps: &DependencyMap,
    project_all_deps: &DependencyMap,
    ranges: &dyn RangeIntersector,
) -> ReconciliationResult {
    let runtime = classify(block_deps, project_deps, ranges);
    let dev = classify(block_dev_deps, project_all_deps, ranges);
    ReconciliationResult {
        conflicts: runtime.conflicts,
        lacks: runtime.lacks,
        dev_conflicts: dev.conflicts,
        dev_lacks: dev.lacks,
    }
}

/// The project's runtime and dev dependencies in one map; a name declared in
/// both keeps its runtime range.
pub fn union_deps(runtime: &DependencyMap, dev: &DependencyMap) -> DependencyMap {
    let mut all = dev.clone();
    all.extend(runtime.iter().map(|(k, v)| (k.clone(), v.clone())));
    all
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::range::SemverIntersector;

    fn deps(pairs: &[(&str, &str)]) -> DependencyMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn lacking_runtime_dependency() {
        let result = reconcile(
            &deps(&[("react", "^16.0.0")]),
            &deps(&[]),
            &deps(&[]),
            &deps(&[]),
            &SemverIntersector,
        );
        assert_eq!(result.lacks, vec![Lack::new("react", "^16.0.0")]);
        assert!(result.conflicts.is_empty());
        assert!(!result.has_conflicts());
    }

    #[test]
    fn conflicting_runtime_dependency() {
        let result = reconcile(
            &deps(&[("react", "^16.0.0")]),
            &deps(&[("react", "^15.0.0")]),
            &deps(&[]),
            &deps(&[]),
            &SemverIntersector,
        );
        assert_eq!(
            result.conflicts,
            vec![Conflict::new("react", "^16.0.0", "^15.0.0")]
        );
        assert!(result.lacks.is_empty());
        assert!(result.has_conflicts());
    }

    #[test]
    fn dev_dependencies_are_satisfied_by_either_project_kind() {
        let project = deps(&[("mockjs", "^1.0.0")]);
        let project_dev = deps(&[("roadhog-api-doc", "^1.1.0")]);
        let all = union_deps(&project, &project_dev);

        let result = reconcile(
            &deps(&[]),
            &project,
            &deps(&[("mockjs", "^1.0.1"), ("roadhog-api-doc", "^1.0.0"), ("faker", "^4.0.0")]),
            &all,
            &SemverIntersector,
        );
        assert_eq!(result.dev_lacks, vec![Lack::new("faker", "^4.0.0")]);
        assert!(result.dev_conflicts.is_empty());
    }

    #[test]
    fn all_conflicts_lists_runtime_then_dev() {
        let result = ReconciliationResult {
            conflicts: vec![Conflict::new("react", "^16.0.0", "^15.0.0")],
            dev_conflicts: vec![Conflict::new("mockjs", "^2.0.0", "^1.0.0")],
            ..Default::default()
        };
        let report = result.all_conflicts();
        assert_eq!(report.len(), 2);
        assert_eq!(report.conflicts[0].name, "react");
        assert_eq!(report.conflicts[1].name, "mockjs");
    }

    #[test]
    fn dev_install_list_skips_runtime_lacks() {
        let result = ReconciliationResult {
            lacks: vec![Lack::new("a", "1.0.0")],
            dev_lacks: vec![Lack::new("a", "1.0.0"), Lack::new("b", "2.0.0")],
            ..Default::default()
        };
        assert_eq!(result.dev_install_list(), vec![Lack::new("b", "2.0.0")]);
    }

    #[test]
    fn union_prefers_runtime_range() {
        let all = union_deps(
            &deps(&[("react", "^16.0.0")]),
            &deps(&[("react", "^15.0.0"), ("eslint", "^5.0.0")]),
        );
        assert_eq!(all, deps(&[("eslint", "^5.0.0"), ("react", "^16.0.0")]));
    }
}
