pub mod ops_fetch;
pub mod ops_generate;
pub mod ops_install;
pub mod ops_pull;

use portal_util::errors::PortalError;
use portal_util::process::{stderr_of, CommandBuilder};
use portal_util::progress::{spinner, status, status_warn};

/// Run an external command under a spinner and fail with `on_fail` if it
/// cannot be spawned or exits unsuccessfully.
pub(crate) async fn run_step(
    message: &str,
    cmd: CommandBuilder,
    on_fail: impl FnOnce(String) -> PortalError,
) -> miette::Result<()> {
    let sp = spinner(message);
    let result = cmd.exec_async().await;
    sp.finish_and_clear();

    let failure = match result {
        Ok(output) if output.status.success() => None,
        Ok(output) => Some(format!("`{}` failed: {}", cmd.display(), stderr_of(&output))),
        Err(e) => Some(format!("`{}` could not be started: {e}", cmd.display())),
    };
    match failure {
        None => {
            status("Finished", message);
            Ok(())
        }
        Some(reason) => {
            status_warn("Failed", message);
            Err(on_fail(reason).into())
        }
    }
}
