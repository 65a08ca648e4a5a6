//! Operation: install the dependencies a block needs but the project lacks.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

use portal_core::manifest::{DependencyMap, PackageManifest};
use portal_resolver::conflict::Lack;
use portal_resolver::reconcile::union_deps;
use portal_util::errors::PortalError;
use portal_util::process::CommandBuilder;

use crate::run_step;

/// Pick the package manager: an explicit choice, then the configured one,
/// then `yarn` if the project has a `yarn.lock`, else `npm`.
pub fn detect_npm_client(
    explicit: Option<&str>,
    configured: Option<&str>,
    project_root: &Path,
) -> String {
    if let Some(client) = explicit.or(configured) {
        return client.to_string();
    }
    if project_root.join("yarn.lock").is_file() {
        "yarn".to_string()
    } else {
        "npm".to_string()
    }
}

/// Build the install invocation for `deps` with `client`.
///
/// Clients whose name contains `yarn` use `add [--dev]`; every other client
/// is assumed to take npm's `install --save[-dev]`.
pub fn install_command(client: &str, deps: &[Lack], dev: bool, project_root: &Path) -> CommandBuilder {
    let specs = deps.iter().map(Lack::install_spec);
    let cmd = CommandBuilder::new(client).cwd(project_root);
    if client.contains("yarn") {
        let cmd = cmd.arg("add").args(specs);
        if dev {
            cmd.arg("--dev")
        } else {
            cmd
        }
    } else {
        cmd.arg("install")
            .args(specs)
            .arg(if dev { "--save-dev" } else { "--save" })
    }
}

/// Install `deps` as runtime (or, with `dev`, development) dependencies.
/// Does nothing for an empty list.
pub async fn install(
    client: &str,
    deps: &[Lack],
    dev: bool,
    project_root: &Path,
) -> miette::Result<()> {
    if deps.is_empty() {
        return Ok(());
    }
    let names: Vec<String> = deps.iter().map(Lack::install_spec).collect();
    let kind = if dev { "devDependencies" } else { "dependencies" };
    run_step(
        &format!("Install additional {kind} {} with {client}", names.join(",")),
        install_command(client, deps, dev, project_root),
        |message| PortalError::Install { message },
    )
    .await
}

fn module_specifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:\brequire\s*\(\s*|\bimport\s*\(\s*|\bfrom\s+|\bimport\s+)['"]([^'"\s]+)['"]"#,
        )
        .expect("valid regex")
    })
}

/// The package a module specifier belongs to: `lodash/get` is `lodash`,
/// `@scope/pkg/sub` is `@scope/pkg`. Relative and absolute paths have none.
fn package_of(specifier: &str) -> Option<&str> {
    if specifier.starts_with('.') || specifier.starts_with('/') {
        return None;
    }
    let segments = if specifier.starts_with('@') { 2 } else { 1 };
    let end = specifier
        .match_indices('/')
        .nth(segments - 1)
        .map(|(i, _)| i)
        .unwrap_or(specifier.len());
    Some(&specifier[..end])
}

/// Packages imported by a block's mock file that the block declares, with
/// the declared range. These are what the block needs as dev dependencies.
pub fn mock_dependencies(mock_content: &str, block: &PackageManifest) -> DependencyMap {
    let declared = union_deps(&block.dependencies, &block.dev_dependencies);
    let mut deps = DependencyMap::new();
    for caps in module_specifier_re().captures_iter(mock_content) {
        let Some(package) = package_of(&caps[1]) else {
            continue;
        };
        if let Some(range) = declared.get(package) {
            deps.insert(package.to_string(), range.clone());
        }
    }
    deps
}

/// Read the block's mock file (`src/_mock.js` or `src/_mock.ts`) and extract
/// its dependencies; a block without one has none.
pub fn block_dev_dependencies(source_path: &Path, block: &PackageManifest) -> DependencyMap {
    for name in ["_mock.js", "_mock.ts"] {
        let path = source_path.join("src").join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => return mock_dependencies(&content, block),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
            Err(e) => {
                tracing::warn!("Failed to read mock file {}: {e}", path.display());
                return DependencyMap::new();
            }
        }
    }
    DependencyMap::new()
}
