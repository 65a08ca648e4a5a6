use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn portal_cmd(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("portal").unwrap();
    cmd.env("PORTAL_HOME", home);
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// `blocks/login` depends on the `blocks/button` sub-block; `project` sits
/// beside them with the given package.json.
fn setup(project_manifest: &str) -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp.path().join("blocks/login/package.json"),
        r#"{
            "name": "@demo/login",
            "dependencies": { "antd": "^3.0.0", "lodash": "^4.17.0" },
            "devDependencies": { "mockjs": "^1.0.1" },
            "blockConfig": { "dependencies": ["button"] }
        }"#,
    );
    write(
        &tmp.path().join("blocks/login/src/pages/index.js"),
        "import Button from '@/components/Button';",
    );
    write(
        &tmp.path().join("blocks/login/src/_mock.js"),
        "import mockjs from 'mockjs';",
    );
    write(
        &tmp.path().join("blocks/button/package.json"),
        r#"{ "name": "button", "dependencies": { "classnames": "^2.2.0" } }"#,
    );
    write(&tmp.path().join("project/package.json"), project_manifest);
    tmp
}

#[test]
fn test_pull_skip_dependencies_copies_files() {
    let tmp = setup(r#"{ "dependencies": {} }"#);
    let project = tmp.path().join("project");

    portal_cmd(tmp.path())
        .current_dir(&project)
        .args(["pull", "../blocks/login", "--skip-dependencies"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/login"));

    let copied = fs::read_to_string(project.join("src/pages/index.js")).unwrap();
    assert_eq!(copied, "import Button from '@/components/Button';");
    assert!(!project.join("src/_mock.js").exists());
}

#[test]
fn test_pull_conflict_aborts() {
    let tmp = setup(r#"{ "dependencies": { "antd": "^2.0.0" } }"#);
    let project = tmp.path().join("project");

    portal_cmd(tmp.path())
        .current_dir(&project)
        .args(["pull", "../blocks/login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Dependencies conflict between block and your project",
        ))
        .stderr(predicate::str::contains(
            "* antd: ^2.0.0(your project) not compatible with ^3.0.0(block)",
        ));

    assert!(!project.join("src").exists());
}

#[test]
fn test_pull_dry_run_lists_lacks() {
    let tmp = setup(r#"{ "dependencies": { "antd": "^3.1.0" } }"#);
    let project = tmp.path().join("project");

    portal_cmd(tmp.path())
        .current_dir(&project)
        .args(["pull", "../blocks/login", "--dry-run", "--npm-client", "no-such-client"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would install classnames@^2.2.0"))
        .stdout(predicate::str::contains("Would install lodash@^4.17.0"))
        .stdout(predicate::str::contains("Would install mockjs@^1.0.1 (dev)"));

    assert!(!project.join("src").exists());
}

#[test]
fn test_pull_custom_path() {
    let tmp = setup(r#"{ "dependencies": {} }"#);
    let project = tmp.path().join("project");

    portal_cmd(tmp.path())
        .current_dir(&project)
        .args(["pull", "../blocks/login", "--skip-dependencies", "--path", "user/login"])
        .assert()
        .success()
        .stdout(predicate::str::contains("/user/login"));
}

#[test]
fn test_pull_invalid_url_fails() {
    let tmp = TempDir::new().unwrap();

    portal_cmd(tmp.path())
        .current_dir(tmp.path())
        .args(["pull", "not-a-block"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not-a-block"));
}

#[test]
fn test_pull_singular_config() {
    let tmp = setup(r#"{ "dependencies": {} }"#);
    write(&tmp.path().join("config.toml"), "[pull]\nsingular = true\n");
    let project = tmp.path().join("project");

    portal_cmd(tmp.path())
        .current_dir(&project)
        .args(["pull", "../blocks/login", "--skip-dependencies"])
        .assert()
        .success();

    let copied = fs::read_to_string(project.join("src/pages/index.js")).unwrap();
    assert_eq!(copied, "import Button from '@/component/Button';");
}
