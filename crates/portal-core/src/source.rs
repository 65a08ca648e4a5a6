//! Block source locations: a local directory or a path inside a git repository.

use std::fmt;
use std::path::{Path, PathBuf};

use portal_util::errors::PortalError;

/// Where a block comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockSource {
    /// A block directory already on disk.
    Local {
        /// The block directory itself.
        source_path: PathBuf,
        /// The repository root sub-block locations resolve against.
        root: PathBuf,
    },
    /// A block inside a remote git repository.
    Git(GitSource),
}

/// A parsed git block url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitSource {
    /// Clone url of the repository.
    pub repo: String,
    pub branch: String,
    /// Block directory relative to the repository root; empty for the root.
    pub path: String,
    /// Cache id: `host/owner/repo`.
    pub id: String,
}

impl GitSource {
    /// The clone directory of this repository under `cache_root`.
    pub fn checkout_dir(&self, cache_root: &Path) -> PathBuf {
        cache_root.join(&self.id)
    }

    /// The block directory inside the clone under `cache_root`.
    pub fn source_path(&self, cache_root: &Path) -> PathBuf {
        let dir = self.checkout_dir(cache_root);
        if self.path.is_empty() {
            dir
        } else {
            dir.join(&self.path)
        }
    }
}

impl BlockSource {
    /// Parse a block location given on the command line.
    ///
    /// Relative local paths resolve against `cwd`. Git urls without an
    /// explicit branch use `default_branch`.
    pub fn parse(url: &str, cwd: &Path, default_branch: &str) -> Result<Self, PortalError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(PortalError::Source {
                message: "empty block url".to_string(),
            });
        }

        let local = cwd.join(url);
        if local.is_dir() {
            let root = local
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| local.clone());
            return Ok(Self::Local {
                source_path: local,
                root,
            });
        }

        if let Some(rest) = url.strip_prefix("git@") {
            let (host, repo_path) = rest.split_once(':').ok_or_else(|| invalid(url))?;
            return git_source(url.to_string(), host, repo_path, None, default_branch);
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .ok_or_else(|| invalid(url))?;
        let (host, repo_path) = rest.split_once('/').ok_or_else(|| invalid(url))?;
        let segments: Vec<&str> = repo_path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 2 {
            return Err(invalid(url));
        }

        let owner = segments[0];
        let name = segments[1].trim_end_matches(".git");
        let scheme = if url.starts_with("http://") {
            "http"
        } else {
            "https"
        };
        let repo = format!("{scheme}://{host}/{owner}/{name}.git");

        match segments.get(2) {
            Some(&"tree") | Some(&"blob") => {
                let branch = segments.get(3).ok_or_else(|| invalid(url))?;
                let path = segments[4..].join("/");
                git_source(
                    repo,
                    host,
                    &format!("{owner}/{name}"),
                    Some((branch.to_string(), path)),
                    default_branch,
                )
            }
            None => git_source(repo, host, &format!("{owner}/{name}"), None, default_branch),
            Some(_) => Err(invalid(url)),
        }
    }

    /// Override the branch of a git source; no-op for local sources.
    pub fn with_branch(mut self, branch: Option<&str>) -> Self {
        if let (Self::Git(git), Some(b)) = (&mut self, branch) {
            git.branch = b.to_string();
        }
        self
    }
}

impl fmt::Display for BlockSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local { source_path, .. } => write!(f, "{}", source_path.display()),
            Self::Git(git) if git.path.is_empty() => write!(f, "{}#{}", git.repo, git.branch),
            Self::Git(git) => write!(f, "{}#{}:{}", git.repo, git.branch, git.path),
        }
    }
}

fn git_source(
    repo: String,
    host: &str,
    repo_path: &str,
    branch_and_path: Option<(String, String)>,
    default_branch: &str,
) -> Result<BlockSource, PortalError> {
    let repo_path = repo_path.trim_matches('/').trim_end_matches(".git");
    if repo_path.split('/').filter(|s| !s.is_empty()).count() < 2 {
        return Err(invalid(&repo));
    }
    let (branch, path) =
        branch_and_path.unwrap_or_else(|| (default_branch.to_string(), String::new()));
    Ok(BlockSource::Git(GitSource {
        repo,
        branch,
        path,
        id: format!("{host}/{repo_path}"),
    }))
}

fn invalid(url: &str) -> PortalError {
    PortalError::Source {
        message: format!("'{url}' is neither a local directory nor a git url"),
    }
}
