use std::path::Path;

use portal_core::source::{BlockSource, GitSource};

#[test]
fn parse_github_tree_url() {
    let src = BlockSource::parse(
        "https://github.com/umijs/umi-blocks/tree/master/demo",
        Path::new("/nonexistent"),
        "master",
    )
    .unwrap();
    assert_eq!(
        src,
        BlockSource::Git(GitSource {
            repo: "https://github.com/umijs/umi-blocks.git".to_string(),
            branch: "master".to_string(),
            path: "demo".to_string(),
            id: "github.com/umijs/umi-blocks".to_string(),
        })
    );
}

#[test]
fn parse_nested_block_path() {
    let src = BlockSource::parse(
        "https://gitlab.example.com/team/blocks/tree/dev/pages/login",
        Path::new("/nonexistent"),
        "master",
    )
    .unwrap();
    match src {
        BlockSource::Git(git) => {
            assert_eq!(git.branch, "dev");
            assert_eq!(git.path, "pages/login");
            assert_eq!(git.id, "gitlab.example.com/team/blocks");
        }
        other => panic!("expected git source, got {other:?}"),
    }
}

#[test]
fn parse_plain_repo_url_uses_default_branch() {
    let src = BlockSource::parse(
        "https://github.com/owner/repo.git",
        Path::new("/nonexistent"),
        "main",
    )
    .unwrap();
    match src {
        BlockSource::Git(git) => {
            assert_eq!(git.repo, "https://github.com/owner/repo.git");
            assert_eq!(git.branch, "main");
            assert!(git.path.is_empty());
            assert_eq!(git.id, "github.com/owner/repo");
        }
        other => panic!("expected git source, got {other:?}"),
    }
}

#[test]
fn parse_ssh_url() {
    let src = BlockSource::parse(
        "git@github.com:owner/repo.git",
        Path::new("/nonexistent"),
        "master",
    )
    .unwrap();
    match src {
        BlockSource::Git(git) => {
            assert_eq!(git.repo, "git@github.com:owner/repo.git");
            assert_eq!(git.id, "github.com/owner/repo");
        }
        other => panic!("expected git source, got {other:?}"),
    }
}

#[test]
fn parse_local_directory() {
    let tmp = tempfile::TempDir::new().unwrap();
    let block = tmp.path().join("blocks").join("login");
    std::fs::create_dir_all(&block).unwrap();

    let src = BlockSource::parse("blocks/login", tmp.path(), "master").unwrap();
    assert_eq!(
        src,
        BlockSource::Local {
            source_path: block,
            root: tmp.path().join("blocks"),
        }
    );
}

#[test]
fn parse_rejects_garbage() {
    assert!(BlockSource::parse("", Path::new("/"), "master").is_err());
    assert!(BlockSource::parse("ftp://host/x/y", Path::new("/nonexistent"), "master").is_err());
    assert!(BlockSource::parse("https://github.com/only-owner", Path::new("/nonexistent"), "master").is_err());
    assert!(BlockSource::parse(
        "https://github.com/owner/repo/pulls/3",
        Path::new("/nonexistent"),
        "master"
    )
    .is_err());
}

#[test]
fn with_branch_overrides_git_branch() {
    let src = BlockSource::parse(
        "https://github.com/owner/repo/tree/master/demo",
        Path::new("/nonexistent"),
        "master",
    )
    .unwrap()
    .with_branch(Some("next"));
    match src {
        BlockSource::Git(git) => assert_eq!(git.branch, "next"),
        other => panic!("expected git source, got {other:?}"),
    }
}

#[test]
fn git_source_paths_under_cache_root() {
    let git = GitSource {
        repo: "https://github.com/owner/repo.git".to_string(),
        branch: "master".to_string(),
        path: "demo".to_string(),
        id: "github.com/owner/repo".to_string(),
    };
    let root = Path::new("/cache");
    assert_eq!(git.checkout_dir(root), Path::new("/cache/github.com/owner/repo"));
    assert_eq!(git.source_path(root), Path::new("/cache/github.com/owner/repo/demo"));
}
