//! Operation: make a block available on disk.
//!
//! Local blocks are used in place. Git blocks are cloned into the block
//! cache on first use and fetched, checked out and pulled afterwards.

use std::path::{Path, PathBuf};

use portal_core::source::{BlockSource, GitSource};
use portal_util::errors::PortalError;
use portal_util::fs::ensure_dir;
use portal_util::process::CommandBuilder;

use crate::run_step;

/// A block ready to be read from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedBlock {
    /// The block directory.
    pub source_path: PathBuf,
    /// The repository root sub-block locations resolve against.
    pub root: PathBuf,
    /// The block's own location relative to `root`.
    pub location: String,
}

/// Fetch `source`, cloning git repositories under `cache_root`.
pub async fn fetch(source: &BlockSource, cache_root: &Path) -> miette::Result<FetchedBlock> {
    match source {
        BlockSource::Local { source_path, root } => Ok(FetchedBlock {
            source_path: source_path.clone(),
            root: root.clone(),
            location: relative_location(source_path, root),
        }),
        BlockSource::Git(git) => {
            let checkout = git.checkout_dir(cache_root);
            if checkout.is_dir() {
                update(git, &checkout).await?;
            } else {
                ensure_dir(cache_root).map_err(PortalError::Io)?;
                clone(git, cache_root).await?;
            }
            Ok(FetchedBlock {
                source_path: git.source_path(cache_root),
                root: checkout,
                location: git.path.clone(),
            })
        }
    }
}

/// The command that clones `git` into `cache_root`.
pub fn clone_command(git: &GitSource, cache_root: &Path) -> CommandBuilder {
    git_command()
        .args([
            "clone",
            git.repo.as_str(),
            git.id.as_str(),
            "--single-branch",
            "-b",
            git.branch.as_str(),
        ])
        .cwd(cache_root)
}

/// The commands that bring an existing clone up to date, in order.
pub fn update_commands(git: &GitSource, checkout: &Path) -> Vec<(String, CommandBuilder)> {
    vec![
        (
            "Git fetch".to_string(),
            git_command().arg("fetch").cwd(checkout),
        ),
        (
            format!("Git checkout {}", git.branch),
            git_command()
                .args(["checkout", git.branch.as_str()])
                .cwd(checkout),
        ),
        (
            "Git pull".to_string(),
            git_command().arg("pull").cwd(checkout),
        ),
    ]
}

/// `git` that fails instead of prompting for credentials.
fn git_command() -> CommandBuilder {
    CommandBuilder::new("git").env("GIT_TERMINAL_PROMPT", "0")
}

async fn clone(git: &GitSource, cache_root: &Path) -> miette::Result<()> {
    tracing::debug!("cloning {} into {}", git.repo, cache_root.display());
    run_step(
        &format!("Clone git repo {}", git.repo),
        clone_command(git, cache_root),
        |message| PortalError::Git { message },
    )
    .await
}

async fn update(git: &GitSource, checkout: &Path) -> miette::Result<()> {
    tracing::debug!("updating existing clone at {}", checkout.display());
    for (message, cmd) in update_commands(git, checkout) {
        run_step(&message, cmd, |message| PortalError::Git { message }).await?;
    }
    Ok(())
}

fn relative_location(source_path: &Path, root: &Path) -> String {
    source_path
        .strip_prefix(root)
        .unwrap_or(source_path)
        .to_string_lossy()
        .replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git() -> GitSource {
        GitSource {
            repo: "https://github.com/umijs/umi-blocks.git".to_string(),
            branch: "master".to_string(),
            path: "demo".to_string(),
            id: "github.com/umijs/umi-blocks".to_string(),
        }
    }

    #[test]
    fn clone_command_is_single_branch() {
        let cmd = clone_command(&git(), Path::new("/cache"));
        assert_eq!(
            cmd.display(),
            "git clone https://github.com/umijs/umi-blocks.git github.com/umijs/umi-blocks --single-branch -b master"
        );
    }

    #[test]
    fn update_runs_fetch_checkout_pull() {
        let steps = update_commands(&git(), Path::new("/cache/repo"));
        let shown: Vec<String> = steps.iter().map(|(_, cmd)| cmd.display()).collect();
        assert_eq!(
            shown,
            vec!["git fetch", "git checkout master", "git pull"]
        );
        assert_eq!(steps[1].0, "Git checkout master");
    }

    #[tokio::test]
    async fn local_source_is_used_in_place() {
        let tmp = tempfile::TempDir::new().unwrap();
        let block = tmp.path().join("login");
        std::fs::create_dir_all(&block).unwrap();

        let fetched = fetch(
            &BlockSource::Local {
                source_path: block.clone(),
                root: tmp.path().to_path_buf(),
            },
            Path::new("/unused"),
        )
        .await
        .unwrap();

        assert_eq!(fetched.source_path, block);
        assert_eq!(fetched.root, tmp.path());
        assert_eq!(fetched.location, "login");
    }
}
