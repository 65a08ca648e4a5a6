//! Command dispatch and handler modules.

mod pull;

use miette::Result;

use crate::cli::{Cli, Command};

/// Route a parsed CLI invocation to the appropriate command handler.
pub async fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Pull {
            url,
            path,
            branch,
            npm_client,
            dry_run,
            skip_dependencies,
        } => {
            pull::exec(portal_ops::ops_pull::PullOptions {
                url,
                path,
                branch,
                npm_client,
                dry_run,
                skip_dependencies,
            })
            .await
        }
    }
}
