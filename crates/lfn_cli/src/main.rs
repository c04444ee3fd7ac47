//! LFN CLI
//!
//! Command-line tools for directories managed by the long-file-name index.
//!
//! # Commands
//!
//! - `mangle` - Show the file name an identity maps to
//! - `demangle` - Decode a short file name back to its identity
//! - `resolve` - Look an identity up in a directory
//! - `create` / `remove` - Add or remove an object file
//! - `inspect` - Show the identity behind an existing entry
//! - `chain` - List a long-name collision chain
//! - `verify` - Check a directory against the naming rules

mod commands;

use clap::{Parser, Subcommand};
use commands::common::{IdentityArgs, IndexArgs};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Long-file-name index tools.
#[derive(Parser)]
#[command(name = "lfn")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the objects
    #[arg(global = true, short, long)]
    dir: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(flatten)]
    index: IndexArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the file name an identity maps to
    Mangle {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Decode a short file name
    Demangle {
        /// The file name
        name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Look an identity up in a directory
    Resolve {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Create the file for an identity
    Create {
        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Remove an identity, compacting its chain
    Remove {
        #[command(flatten)]
        identity: IdentityArgs,
    },

    /// Show the identity behind a directory entry
    Inspect {
        /// Entry name inside the directory
        file_name: String,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// List the collision chain an identity maps to
    Chain {
        #[command(flatten)]
        identity: IdentityArgs,

        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Check a directory against the naming rules
    Verify {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Mangle { identity, format } => {
            commands::mangle::run(&cli.index, &identity, &format)?;
        }
        Commands::Demangle { name, format } => {
            commands::demangle::run(&name, cli.index.format_version, &format)?;
        }
        Commands::Resolve { identity, format } => {
            let dir = cli.dir.ok_or("Directory required for resolve")?;
            commands::entry::resolve(&cli.index, &dir, &identity, &format)?;
        }
        Commands::Create { identity } => {
            let dir = cli.dir.ok_or("Directory required for create")?;
            commands::entry::create(&cli.index, &dir, &identity)?;
        }
        Commands::Remove { identity } => {
            let dir = cli.dir.ok_or("Directory required for remove")?;
            commands::entry::remove(&cli.index, &dir, &identity)?;
        }
        Commands::Inspect { file_name, format } => {
            let dir = cli.dir.ok_or("Directory required for inspect")?;
            commands::inspect::run(&cli.index, &dir, &file_name, &format)?;
        }
        Commands::Chain { identity, format } => {
            let dir = cli.dir.ok_or("Directory required for chain")?;
            commands::chain::run(&cli.index, &dir, &identity, &format)?;
        }
        Commands::Verify { format } => {
            let dir = cli.dir.ok_or("Directory required for verify")?;
            commands::verify::run(&cli.index, &dir, &format)?;
        }
        Commands::Version => {
            println!("LFN CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("Name formats: v1, v2, v3 (default {})", cli.index.format_version);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_identity_flags() {
        let cli = Cli::try_parse_from([
            "lfn",
            "--format-version",
            "3",
            "mangle",
            "--name",
            "obj",
            "--hash",
            "ABABABAB",
            "--pool",
            "-1",
        ])
        .unwrap();
        assert_eq!(cli.index.format_version, lfn_codec::FormatVersion::V3);
        let Commands::Mangle { identity, .. } = cli.command else {
            panic!("expected mangle");
        };
        let id = identity.identity().unwrap();
        assert_eq!(id.name, b"obj");
        assert_eq!(id.hash, 0xABAB_ABAB);
        assert_eq!(id.pool, lfn_codec::NO_POOL);
    }
}
