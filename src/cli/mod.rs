//! CLI command implementations

mod context;
mod find;
mod style;
mod track;
mod update;

pub use context::GlobalOptions;
pub use find::run_find;
pub use track::{run_list, run_track, run_untrack};
pub use update::run_update;
