//! CLI argument definitions using clap derive macros.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Deliver LinkedIn post resources to requesters and log who asked.
///
/// Leadgate maps LinkedIn posts to downloadable resources, emails the link to
/// whoever requests it, and keeps a log of every request.
#[derive(Parser, Debug)]
#[command(name = "leadgate")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (default: $XDG_CONFIG_HOME/leadgate/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP service
    Serve {
        /// Address to listen on (default 127.0.0.1:5000)
        #[arg(short, long, value_name = "ADDR")]
        bind: Option<SocketAddr>,

        /// SQLite database file (default ./leadgate.db)
        #[arg(short, long, value_name = "PATH")]
        database: Option<PathBuf>,
    },

    /// Print the lookup key for one or more post URLs
    Resolve {
        /// LinkedIn post URLs
        #[arg(required = true, value_name = "URL")]
        urls: Vec<String>,
    },

    /// Re-key resources stored under full post URLs to activity IDs
    Rekey {
        /// SQLite database file (default ./leadgate.db)
        #[arg(short, long, value_name = "PATH")]
        database: Option<PathBuf>,

        /// Report what would change without writing
        #[arg(long)]
        dry_run: bool,
    },
}
