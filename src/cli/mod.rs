//! CLI module - argument parsing, interactive prompts and subcommands

mod args;
pub mod predict;
mod prompts;
pub mod track;
pub mod train;

pub use args::*;
pub use predict::run_predict;
pub use prompts::*;
pub use track::{run_track, TrackArgs};
pub use train::run_train;
