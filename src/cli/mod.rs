pub mod commands;
pub mod context;
pub mod effects;
mod help;
pub mod io;
pub mod output;
mod shell;

pub use context::{CliMode, CommandError, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV};
