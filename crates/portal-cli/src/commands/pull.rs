//! Handler for `portal pull`.

use console::Style;
use miette::Result;

use portal_core::config::GlobalConfig;
use portal_ops::ops_pull::{self, PullOptions};
use portal_util::errors::PortalError;
use portal_util::progress::status;

pub async fn exec(opts: PullOptions) -> Result<()> {
    let cwd = std::env::current_dir().map_err(PortalError::Io)?;
    let config = GlobalConfig::load()?;

    status("Pulling", &opts.url);
    let outcome = ops_pull::pull(&cwd, &config, &opts).await?;

    let bold = Style::new().bold();
    let name = outcome.block_name.as_deref().unwrap_or("block");
    println!("{} -> {}", bold.apply_to(name), outcome.route_path);

    let verb = if opts.dry_run { "Would install" } else { "Installed" };
    for lack in &outcome.installed {
        println!("  {verb} {lack}");
    }
    for lack in &outcome.installed_dev {
        println!("  {verb} {lack} (dev)");
    }
    for file in &outcome.files {
        let shown = file.strip_prefix(&cwd).unwrap_or(file);
        println!("  Wrote {}", shown.display());
    }
    Ok(())
}
