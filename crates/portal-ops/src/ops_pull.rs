//! Operation: pull a block into the current project.
//!
//! A pull fetches the block, flattens its dependency tree, reconciles it
//! with the project's `package.json`, installs what is missing and finally
//! copies the block sources into `src/`. Any conflict aborts the pull before
//! the project is touched.

use std::path::{Path, PathBuf};

use portal_core::config::GlobalConfig;
use portal_core::manifest::{normalize_route_path, PackageManifest};
use portal_core::source::BlockSource;
use portal_core::MANIFEST_FILE;
use portal_resolver::conflict::Lack;
use portal_resolver::merge::{BlockManifest, DependencyMerger, FsManifestResolver};
use portal_resolver::range::SemverIntersector;
use portal_resolver::reconcile::{reconcile, union_deps, ReconciliationResult};
use portal_util::errors::PortalError;
use portal_util::fs::find_ancestor_with;
use portal_util::progress::{status, status_info};

use crate::ops_fetch::fetch;
use crate::ops_generate::generate;
use crate::ops_install::{block_dev_dependencies, detect_npm_client, install};

/// Command-line options for a pull.
#[derive(Debug, Clone, Default)]
pub struct PullOptions {
    /// Local directory or git url of the block.
    pub url: String,
    /// Route path the block is mounted at; defaults to `/<block name>`.
    pub path: Option<String>,
    pub branch: Option<String>,
    pub npm_client: Option<String>,
    /// Check dependencies but install and write nothing.
    pub dry_run: bool,
    /// Skip reconciliation and installation.
    pub skip_dependencies: bool,
}

/// What a pull did.
#[derive(Debug, Clone, Default)]
pub struct PullOutcome {
    pub source_path: PathBuf,
    pub block_name: Option<String>,
    pub route_path: String,
    /// Runtime dependencies installed, or that would be with `dry_run`.
    pub installed: Vec<Lack>,
    pub installed_dev: Vec<Lack>,
    /// Files written into the project.
    pub files: Vec<PathBuf>,
}

/// Pull the block described by `opts` into the project containing `cwd`.
pub async fn pull(cwd: &Path, config: &GlobalConfig, opts: &PullOptions) -> miette::Result<PullOutcome> {
    let project_root = find_ancestor_with(cwd, MANIFEST_FILE).unwrap_or_else(|| cwd.to_path_buf());
    tracing::debug!("project root: {}", project_root.display());

    let source = BlockSource::parse(&opts.url, cwd, &config.pull.default_branch)?
        .with_branch(opts.branch.as_deref());
    tracing::debug!("block source: {source}");

    let fetched = fetch(&source, &config.cache.resolved_dir()).await?;
    let block_manifest_path = fetched.source_path.join(MANIFEST_FILE);
    if !block_manifest_path.is_file() {
        return Err(PortalError::Source {
            message: format!("not find package.json in {}", fetched.source_path.display()),
        }
        .into());
    }
    let block = PackageManifest::from_path(&block_manifest_path)?;
    let block_name = block.block_name().map(str::to_string);

    let route_path = match (&opts.path, &block_name) {
        (Some(path), _) => normalize_route_path(path),
        (None, Some(name)) => normalize_route_path(name),
        (None, None) => {
            return Err(PortalError::Generic {
                message: "path is required when the block package.json has no name".to_string(),
            }
            .into())
        }
    };

    let mut outcome = PullOutcome {
        source_path: fetched.source_path.clone(),
        block_name,
        route_path,
        ..Default::default()
    };

    if opts.skip_dependencies {
        status_info("Skipping", "dependency check");
    } else {
        let project = PackageManifest::from_path(&project_root.join(MANIFEST_FILE))?;
        let result = check_dependencies(&fetched.root, &fetched.location, &fetched.source_path, &block, &project)?;
        if result.has_conflicts() {
            return Err(PortalError::ProjectConflict {
                listing: result.all_conflicts().project_listing(),
            }
            .into());
        }
        status("Checked", "block dependencies are compatible with your project");

        outcome.installed = result.lacks.clone();
        outcome.installed_dev = result.dev_install_list();

        if !opts.dry_run {
            let client = detect_npm_client(
                opts.npm_client.as_deref(),
                config.pull.npm_client.as_deref(),
                &project_root,
            );
            install(&client, &outcome.installed, false, &project_root).await?;
            install(&client, &outcome.installed_dev, true, &project_root).await?;
        }
    }

    if opts.dry_run {
        status_info("Dry run", "no files written");
    } else {
        outcome.files = generate(
            &fetched.source_path,
            &project_root.join("src"),
            config.pull.singular,
        )?;
        status(
            "Generated",
            &format!("{} files for {}", outcome.files.len(), outcome.route_path),
        );
    }

    Ok(outcome)
}

/// Flatten the block's dependency tree and reconcile it with `project`.
fn check_dependencies(
    repo_root: &Path,
    location: &str,
    source_path: &Path,
    block: &PackageManifest,
    project: &PackageManifest,
) -> miette::Result<ReconciliationResult> {
    let resolver = FsManifestResolver::new(repo_root);
    let ranges = SemverIntersector;
    let merger = DependencyMerger::new(&resolver, &ranges);
    let flat = merger.merge_all(location, &BlockManifest::from(block))?;
    tracing::debug!("flattened {} block dependencies", flat.len());

    let block_dev = block_dev_dependencies(source_path, block);
    let project_all = union_deps(&project.dependencies, &project.dev_dependencies);
    Ok(reconcile(
        &flat,
        &project.dependencies,
        &block_dev,
        &project_all,
        &ranges,
    ))
}
