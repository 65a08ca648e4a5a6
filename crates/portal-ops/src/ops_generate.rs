//! Operation: copy block sources into the project.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::{Captures, Regex};

use portal_util::errors::PortalError;
use portal_util::fs::copy_tree_with;

/// Folders under a block's `src/` that are copied into the project's `src/`.
pub const COVER_FOLDERS: [&str; 8] = [
    "pages",
    "components",
    "layouts",
    "models",
    "services",
    "utils",
    "locales",
    "assets",
];

/// Folder names that have a singular form in singular-mode projects.
pub const SINGULAR_SENSITIVE: [&str; 7] = [
    "pages",
    "components",
    "layouts",
    "models",
    "services",
    "utils",
    "locales",
];

/// `components` becomes `component` when singular-sensitive; other names are kept.
pub fn singular_name(name: &str) -> &str {
    if SINGULAR_SENSITIVE.contains(&name) {
        name.strip_suffix('s').unwrap_or(name)
    } else {
        name
    }
}

fn singular_import_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let names = SINGULAR_SENSITIVE.join("|");
        Regex::new(&format!(r#"(['"])(@/|[./]+)({names})/"#)).expect("valid regex")
    })
}

/// Rewrite import paths such as `'@/components/x'` or `"../models/y"` to
/// their singular folder names.
pub fn content_to_singular(content: &str) -> String {
    singular_import_re()
        .replace_all(content, |caps: &Captures| {
            format!("{}{}{}/", &caps[1], &caps[2], singular_name(&caps[3]))
        })
        .into_owned()
}

/// Copy every cover folder of the block at `source_path` into `project_src`.
///
/// Dot entries at the top of each cover folder are skipped. With `singular`,
/// sensitive directory names directly under a cover folder are singularized
/// and import paths in UTF-8 files are rewritten. Returns the written files.
pub fn generate(source_path: &Path, project_src: &Path, singular: bool) -> miette::Result<Vec<PathBuf>> {
    let mut written = Vec::new();
    for folder in COVER_FOLDERS {
        let folder_path = source_path.join("src").join(folder);
        if !folder_path.is_dir() {
            continue;
        }
        let mut entries: Vec<_> = std::fs::read_dir(&folder_path)
            .map_err(PortalError::Io)?
            .collect::<Result<_, _>>()
            .map_err(PortalError::Io)?;
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            let is_dir = entry.file_type().map_err(PortalError::Io)?.is_dir();
            let target_name = if is_dir && singular {
                singular_name(&name).to_string()
            } else {
                name.clone()
            };
            let target = project_src.join(folder).join(&target_name);
            tracing::debug!("copy {} to {}", entry.path().display(), target.display());

            let files = copy_tree_with(&entry.path(), &target, |_, data| {
                if singular {
                    rewrite_utf8(data)
                } else {
                    data
                }
            })
            .map_err(|e| PortalError::Generate {
                message: format!("Failed to copy {}: {e}", entry.path().display()),
            })?;
            written.extend(files);
        }
    }
    Ok(written)
}

fn rewrite_utf8(data: Vec<u8>) -> Vec<u8> {
    match String::from_utf8(data) {
        Ok(text) => content_to_singular(&text).into_bytes(),
        Err(e) => e.into_bytes(),
    }
}
