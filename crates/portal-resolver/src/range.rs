//! npm-style version ranges and their intersection.
//!
//! A range is a union (`||`) of comparator sets. Each comparator set is the
//! intersection of its comparators and is normalized to a single interval
//! over [`semver::Version`]:
//! - `1.2.3`, `=1.2.3`, `v1.2.3`: exactly that version
//! - `1`, `1.2`, `1.x`, `1.2.*`: every version with that prefix
//! - `^1.2.3`: compatible with the leftmost non-zero component
//! - `~1.2.3`: same minor version
//! - `>`, `>=`, `<`, `<=`: open-ended bounds
//! - `1.2.3 - 2.0.0`: inclusive hyphen range
//! - `*`, `x`, empty: any version
//!
//! Exclusive upper bounds derived from a prefix or a caret/tilde are the
//! `-0` prerelease of the next version (`^1.2.3` is `>=1.2.3 <2.0.0-0`), so
//! prereleases of the next version stay outside the range. Prerelease tags
//! are otherwise ordered by semver precedence; npm's rule that prereleases
//! only match comparators on the same `major.minor.patch` is not modelled.

use std::cmp::Ordering;

use semver::{BuildMetadata, Prerelease, Version};

/// Decides whether two version-range expressions can be satisfied by a
/// common version.
pub trait RangeIntersector {
    fn intersects(&self, a: &str, b: &str) -> bool;
}

/// The default [`RangeIntersector`] for npm-style range syntax.
///
/// Expressions that do not parse as ranges (git urls, `file:` paths, dist
/// tags such as `latest`) are only compatible with an identical expression.
#[derive(Debug, Default, Clone, Copy)]
pub struct SemverIntersector;

impl RangeIntersector for SemverIntersector {
    fn intersects(&self, a: &str, b: &str) -> bool {
        match (VersionRange::parse(a), VersionRange::parse(b)) {
            (Some(ra), Some(rb)) => ra.intersects(&rb),
            _ => {
                tracing::debug!("comparing non-semver ranges '{a}' and '{b}' textually");
                a.trim() == b.trim()
            }
        }
    }
}

/// A parsed range: the union of its comparator sets.
#[derive(Debug, Clone)]
pub struct VersionRange {
    pub sets: Vec<Interval>,
}

/// A contiguous set of versions. `None` bounds are unbounded.
#[derive(Debug, Clone, Default)]
pub struct Interval {
    pub lower: Option<Bound>,
    pub upper: Option<Bound>,
}

#[derive(Debug, Clone)]
pub struct Bound {
    pub version: Version,
    pub inclusive: bool,
}

impl Bound {
    fn inclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: true,
        }
    }

    fn exclusive(version: Version) -> Self {
        Self {
            version,
            inclusive: false,
        }
    }
}

impl VersionRange {
    /// Parse an npm-style range expression.
    ///
    /// Returns `None` when any comparator is not valid range syntax.
    pub fn parse(spec: &str) -> Option<Self> {
        let sets = spec
            .split("||")
            .map(parse_comparator_set)
            .collect::<Option<Vec<_>>>()?;
        Some(Self { sets })
    }

    /// Whether some version satisfies both ranges.
    pub fn intersects(&self, other: &VersionRange) -> bool {
        self.sets
            .iter()
            .any(|a| other.sets.iter().any(|b| !a.intersect(b).is_empty()))
    }
}

impl Interval {
    fn any() -> Self {
        Self::default()
    }

    fn none() -> Self {
        Self {
            lower: None,
            upper: Some(Bound::exclusive(Version::new(0, 0, 0))),
        }
    }

    fn exact(version: Version) -> Self {
        Self {
            lower: Some(Bound::inclusive(version.clone())),
            upper: Some(Bound::inclusive(version)),
        }
    }

    fn half_open(lower: Version, upper: Version) -> Self {
        Self {
            lower: Some(Bound::inclusive(lower)),
            upper: Some(Bound::exclusive(upper)),
        }
    }

    /// The versions in both intervals.
    pub fn intersect(&self, other: &Interval) -> Interval {
        Interval {
            lower: tighter(&self.lower, &other.lower, Ordering::Greater),
            upper: tighter(&self.upper, &other.upper, Ordering::Less),
        }
    }

    /// Whether no version lies in the interval.
    pub fn is_empty(&self) -> bool {
        match (&self.lower, &self.upper) {
            (Some(lo), Some(hi)) => match lo.version.cmp(&hi.version) {
                Ordering::Less => false,
                Ordering::Equal => !(lo.inclusive && hi.inclusive),
                Ordering::Greater => true,
            },
            (None, Some(hi)) => !hi.inclusive && hi.version == Version::new(0, 0, 0),
            _ => false,
        }
    }
}

/// Pick the stricter of two bounds. `wins` is the ordering a version must
/// have against the other to be stricter (greater for lower bounds, less for
/// upper bounds); on equal versions the exclusive bound is stricter.
fn tighter(a: &Option<Bound>, b: &Option<Bound>, wins: Ordering) -> Option<Bound> {
    match (a, b) {
        (None, None) => None,
        (Some(x), None) | (None, Some(x)) => Some(x.clone()),
        (Some(x), Some(y)) => {
            let ord = x.version.cmp(&y.version);
            if ord == wins || (ord == Ordering::Equal && !x.inclusive) {
                Some(x.clone())
            } else {
                Some(y.clone())
            }
        }
    }
}

/// npm rejects version components above `Number.MAX_SAFE_INTEGER`.
const MAX_SAFE_COMPONENT: u64 = (1 << 53) - 1;

/// A possibly partial version such as `1`, `1.2`, `1.x` or `1.2.3-beta.1`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim_start_matches('=').trim_start_matches(['v', 'V']);
        if s.is_empty() {
            return None;
        }
        let s = s.split_once('+').map_or(s, |(core, _build)| core);
        let (core, pre) = match s.split_once('-') {
            Some((core, pre)) => (core, Prerelease::new(pre).ok()?),
            None => (s, Prerelease::EMPTY),
        };

        let mut parts = [None; 3];
        let mut wildcard_seen = false;
        for (i, part) in core.split('.').enumerate() {
            if i >= 3 {
                return None;
            }
            if matches!(part, "x" | "X" | "*") {
                wildcard_seen = true;
                continue;
            }
            if wildcard_seen {
                return None;
            }
            let n = part.parse::<u64>().ok()?;
            if n > MAX_SAFE_COMPONENT {
                return None;
            }
            parts[i] = Some(n);
        }
        if !pre.is_empty() && parts.iter().any(Option::is_none) {
            return None;
        }

        Some(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre,
        })
    }

    fn is_any(&self) -> bool {
        self.major.is_none()
    }

    fn is_full(&self) -> bool {
        self.patch.is_some()
    }

    /// Missing components filled with zero.
    fn floor(&self) -> Version {
        Version {
            major: self.major.unwrap_or(0),
            minor: self.minor.unwrap_or(0),
            patch: self.patch.unwrap_or(0),
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        }
    }

    /// The first release past the `major.minor` (or `major`) prefix; the
    /// patch component is ignored.
    fn next_prefix(&self) -> Option<Version> {
        match (self.major, self.minor) {
            (Some(major), Some(minor)) => Some(Version::new(major, minor + 1, 0)),
            (Some(major), None) => Some(Version::new(major + 1, 0, 0)),
            (None, _) => None,
        }
    }

    /// Exclusive upper bound of the prefix: [`next_prefix`](Self::next_prefix)
    /// lowered to its `-0` prerelease.
    fn prefix_ceiling(&self) -> Option<Version> {
        self.next_prefix().and_then(lowest_prerelease)
    }
}

/// `X.Y.Z-0`, the smallest version at or above any `X.Y.Z` prerelease.
fn lowest_prerelease(mut version: Version) -> Option<Version> {
    version.pre = Prerelease::new("0").ok()?;
    Some(version)
}

const OPERATORS: [&str; 8] = [">=", "<=", "~>", ">", "<", "=", "~", "^"];

fn parse_comparator_set(set: &str) -> Option<Interval> {
    let set = set.trim();
    if let Some((lo, hi)) = set.split_once(" - ") {
        return parse_hyphen(lo.trim(), hi.trim());
    }

    let mut tokens: Vec<String> = Vec::new();
    let mut pending_op = String::new();
    for token in set.split(|c: char| c.is_whitespace() || c == ',') {
        if token.is_empty() {
            continue;
        }
        if token.chars().all(|c| matches!(c, '<' | '>' | '=' | '~' | '^')) {
            pending_op.push_str(token);
            continue;
        }
        tokens.push(format!("{pending_op}{token}"));
        pending_op.clear();
    }
    if !pending_op.is_empty() {
        return None;
    }

    tokens
        .iter()
        .try_fold(Interval::any(), |acc, token| {
            parse_comparator(token).map(|interval| acc.intersect(&interval))
        })
}

fn parse_hyphen(lo: &str, hi: &str) -> Option<Interval> {
    let lo = Partial::parse(lo)?;
    let hi = Partial::parse(hi)?;
    let lower = (!lo.is_any()).then(|| Bound::inclusive(lo.floor()));
    let upper = if hi.is_any() {
        None
    } else if hi.is_full() {
        Some(Bound::inclusive(hi.floor()))
    } else {
        Some(Bound::exclusive(hi.prefix_ceiling()?))
    };
    Some(Interval { lower, upper })
}

fn parse_comparator(token: &str) -> Option<Interval> {
    let op = OPERATORS
        .iter()
        .find(|op| token.starts_with(*op))
        .copied()
        .unwrap_or("");
    let partial = Partial::parse(&token[op.len()..])?;
    let floor = partial.floor();

    let interval = match op {
        "" | "=" => {
            if partial.is_any() {
                Interval::any()
            } else if partial.is_full() {
                Interval::exact(floor)
            } else {
                Interval::half_open(floor, partial.prefix_ceiling()?)
            }
        }
        ">" => {
            if partial.is_any() {
                Interval::none()
            } else if partial.is_full() {
                Interval {
                    lower: Some(Bound::exclusive(floor)),
                    upper: None,
                }
            } else {
                Interval {
                    lower: Some(Bound::inclusive(partial.next_prefix()?)),
                    upper: None,
                }
            }
        }
        ">=" => Interval {
            lower: (!partial.is_any()).then(|| Bound::inclusive(floor)),
            upper: None,
        },
        "<" => {
            if partial.is_any() {
                Interval::none()
            } else if partial.is_full() {
                Interval {
                    lower: None,
                    upper: Some(Bound::exclusive(floor)),
                }
            } else {
                Interval {
                    lower: None,
                    upper: Some(Bound::exclusive(lowest_prerelease(floor)?)),
                }
            }
        }
        "<=" => {
            if partial.is_any() {
                Interval::any()
            } else if partial.is_full() {
                Interval {
                    lower: None,
                    upper: Some(Bound::inclusive(floor)),
                }
            } else {
                Interval {
                    lower: None,
                    upper: Some(Bound::exclusive(partial.prefix_ceiling()?)),
                }
            }
        }
        "~" | "~>" => {
            if partial.is_any() {
                Interval::any()
            } else {
                Interval::half_open(floor, partial.prefix_ceiling()?)
            }
        }
        "^" => {
            if partial.is_any() {
                Interval::any()
            } else {
                Interval::half_open(floor, caret_ceiling(&partial)?)
            }
        }
        _ => return None,
    };
    Some(interval)
}

/// Exclusive upper bound of `^partial`: bump the leftmost non-zero specified
/// component.
fn caret_ceiling(partial: &Partial) -> Option<Version> {
    let major = partial.major.unwrap_or(0);
    let next = match (partial.minor, partial.patch) {
        _ if major > 0 => Version::new(major + 1, 0, 0),
        (None, _) => Version::new(1, 0, 0),
        (Some(minor), _) if minor > 0 => Version::new(0, minor + 1, 0),
        (Some(_), None) => Version::new(0, 1, 0),
        (Some(_), Some(patch)) => Version::new(0, 0, patch + 1),
    };
    lowest_prerelease(next)
}
