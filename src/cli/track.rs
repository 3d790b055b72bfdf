//! Track, untrack and list commands

use crate::cli::context::{GlobalOptions, LocalContext};
use crate::cli::style::{CHECK, Stylize};
use anstream::println;
use automerge::error::Result;
use automerge::pr_ref::PrRef;
use automerge::tracking::TrackedStore;

/// Start tracking PR URLs
///
/// Every URL is validated before any of them is written.
pub fn run_track(options: &GlobalOptions, urls: &[String]) -> Result<()> {
    for url in urls {
        PrRef::parse(url)?;
    }

    let ctx = LocalContext::new(options)?;
    for url in urls {
        if ctx.store.add(url)? {
            println!("{} Tracking {}", CHECK.success(), url.accent());
        } else {
            println!("{}", format!("Already tracking {url}").muted());
        }
    }
    Ok(())
}

/// Stop tracking PR URLs
pub fn run_untrack(options: &GlobalOptions, urls: &[String]) -> Result<()> {
    let ctx = LocalContext::new(options)?;
    for url in urls {
        if ctx.store.remove(url)? {
            println!("{} Untracked {}", CHECK.success(), url.accent());
        } else {
            println!("{}", format!("Not tracked: {url}").muted());
        }
    }
    Ok(())
}

/// Print tracked PR URLs
pub fn run_list(options: &GlobalOptions) -> Result<()> {
    let ctx = LocalContext::new(options)?;
    let urls = ctx.store.list()?;

    if urls.is_empty() {
        println!("{}", "No pull requests tracked.".muted());
        return Ok(());
    }

    println!("{}:", "Tracked pull requests".emphasis());
    for url in urls {
        println!("  {url}");
    }
    Ok(())
}
