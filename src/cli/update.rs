//! Update command - evaluate tracked PRs and merge the ready ones

use crate::cli::context::{CommandContext, GlobalOptions};
use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use automerge::activity::SystemClock;
use automerge::error::Result;
use automerge::gate::TokioSleeper;
use automerge::update::{UpdateContext, UpdateOutcome, run_update as run_update_pass};

/// Run the update command
pub async fn run_update(options: &GlobalOptions) -> Result<()> {
    let ctx = CommandContext::new(options)?;
    let config = &ctx.local.config;
    let ci_policy = config.ci_policy()?;

    let update_ctx = UpdateContext {
        platform: ctx.platform.as_ref(),
        store: &ctx.local.store,
        requirements: &config.requirements,
        ci_policy: &ci_policy,
        merge_method: config.merge_method,
        clock: &SystemClock,
        sleeper: &TokioSleeper,
    };

    let summary = run_update_pass(&update_ctx).await?;

    if summary.outcomes.is_empty() && summary.failures.is_empty() {
        println!("{}", "No pull requests tracked.".muted());
        return Ok(());
    }

    for evaluated in &summary.outcomes {
        let line = format!(
            "{} \"{}\": {}",
            evaluated.url, evaluated.title, evaluated.outcome
        );
        match evaluated.outcome {
            UpdateOutcome::Merged { .. } => println!("{} {}", CHECK.success(), line),
            _ => println!("  {}", line.muted()),
        }
    }
    for (url, error) in &summary.failures {
        println!("  {}", format!("{url}: {error}").warn());
    }

    println!();
    println!(
        "{} {} merged, {} failed",
        "Update complete:".emphasis(),
        summary.merged_count().accent(),
        summary.failures.len().accent()
    );
    Ok(())
}
