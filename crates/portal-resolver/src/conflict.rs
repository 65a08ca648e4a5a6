//! Lacks, conflicts, and conflict reporting.

use std::fmt;

/// A dependency required by the source map but absent from the target map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lack {
    pub name: String,
    pub range: String,
}

impl Lack {
    pub fn new(name: impl Into<String>, range: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            range: range.into(),
        }
    }

    /// `name@range`, as a package manager expects it.
    pub fn install_spec(&self) -> String {
        format!("{}@{}", self.name, self.range)
    }
}

impl fmt::Display for Lack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.range)
    }
}

/// A dependency present in both maps whose ranges do not intersect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub name: String,
    /// Range required by the source (the block, or the incoming map in a merge).
    pub source: String,
    /// Range already held by the target (the project, or the accumulator).
    pub target: String,
}

impl Conflict {
    pub fn new(
        name: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} not compatible with {}",
            self.name, self.target, self.source
        )
    }
}

/// All conflicts found in one merge or classification step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, conflict: Conflict) {
        self.conflicts.push(conflict);
    }

    pub fn is_empty(&self) -> bool {
        self.conflicts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.conflicts.len()
    }

    /// The listing shown when block dependencies clash with the project's:
    /// one `* name: <project>(your project) not compatible with <block>(block)` line each.
    pub fn project_listing(&self) -> String {
        self.conflicts
            .iter()
            .map(|c| {
                format!(
                    "* {}: {}(your project) not compatible with {}(block)",
                    c.name, c.target, c.source
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl From<Vec<Conflict>> for ConflictReport {
    fn from(conflicts: Vec<Conflict>) -> Self {
        Self { conflicts }
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.conflicts.is_empty() {
            return write!(f, "No dependency conflicts.");
        }
        let lines: Vec<String> = self.conflicts.iter().map(|c| format!("* {c}")).collect();
        write!(f, "{}", lines.join("\n"))
    }
}
