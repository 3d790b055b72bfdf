//! Find command - search watched targets for open PRs

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::Stylize;
use anstream::println;
use automerge::error::Result;
use automerge::targets::find_open_pull_requests;
use automerge::tracking::TrackedStore;

/// Run the find command
pub async fn run_find(options: &GlobalOptions, track: bool) -> Result<()> {
    let ctx = CommandContext::new(options)?;
    let config = &ctx.local.config;
    let owner = config.owner()?;

    let hits = find_open_pull_requests(
        ctx.platform.as_ref(),
        &config.monitor,
        &config.ignore,
        owner,
    )
    .await?;

    if hits.is_empty() {
        println!("{}", "No open pull requests found.".muted());
        return Ok(());
    }

    let mut added = 0;
    for hit in &hits {
        let marker = if track && ctx.local.store.add(&hit.html_url)? {
            added += 1;
            "+"
        } else {
            " "
        };
        println!("{marker} {} {}", hit.html_url.accent(), hit.title);
    }

    if track {
        println!();
        println!(
            "{} {} newly tracked",
            "Tracking:".emphasis(),
            added.accent()
        );
    }
    Ok(())
}
