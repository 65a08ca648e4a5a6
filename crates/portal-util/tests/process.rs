use portal_util::process::{stderr_of, CommandBuilder};

#[tokio::test]
async fn test_builder_multiple_args() {
    let output = CommandBuilder::new("echo")
        .args(["react@^16.0.0", "antd@^3.0.0"])
        .exec_async()
        .await
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "react@^16.0.0 antd@^3.0.0");
}

#[cfg(unix)]
#[tokio::test]
async fn test_builder_with_env() {
    let output = CommandBuilder::new("sh")
        .arg("-c")
        .arg("echo $GIT_TERMINAL_PROMPT")
        .env("GIT_TERMINAL_PROMPT", "0")
        .exec_async()
        .await
        .unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "0");
}

#[cfg(unix)]
#[tokio::test]
async fn test_builder_with_cwd() {
    let tmp = tempfile::TempDir::new().unwrap();
    std::fs::write(tmp.path().join("package.json"), "{}").unwrap();

    let output = CommandBuilder::new("ls")
        .arg("package.json")
        .cwd(tmp.path())
        .exec_async()
        .await
        .unwrap();

    assert!(output.status.success());
}

#[test]
fn test_builder_display() {
    let cmd = CommandBuilder::new("yarn").args(["add", "react@^16.0.0", "--dev"]);
    assert_eq!(cmd.display(), "yarn add react@^16.0.0 --dev");
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_exit_is_not_an_error() {
    let output = CommandBuilder::new("sh")
        .args(["-c", "echo boom >&2; exit 3"])
        .exec_async()
        .await
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    assert_eq!(stderr_of(&output), "boom");
}

#[tokio::test]
async fn test_nonexistent_program_is_an_error() {
    let result = CommandBuilder::new("nonexistent_program_xyz_123")
        .exec_async()
        .await;
    assert!(result.is_err());
}
