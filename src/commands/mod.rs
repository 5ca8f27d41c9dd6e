//! Subcommand implementations.

mod rekey;
mod resolve;
mod serve;

pub use rekey::run_rekey;
pub use resolve::run_resolve;
pub use serve::run_serve;
