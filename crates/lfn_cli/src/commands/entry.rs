//! Resolve, create and remove commands.

use super::common::{display_name, print_json, IdentityArgs, IndexArgs};
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// Outcome of a resolve.
#[derive(Debug, Serialize)]
pub struct ResolveResult {
    /// File name for the identity.
    pub file_name: String,
    /// Full path.
    pub path: String,
    /// Whether the identity is present.
    pub exists: bool,
}

/// Runs the resolve command.
///
/// May unlink an orphaned long-name slot on the way.
pub fn resolve(
    index_args: &IndexArgs,
    dir: &Path,
    identity: &IdentityArgs,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let resolved = index.resolve(dir, &identity.identity()?)?;
    let result = ResolveResult {
        file_name: display_name(resolved.name.as_bytes()),
        path: resolved.path.display().to_string(),
        exists: resolved.exists,
    };

    match format {
        "json" => print_json(&result)?,
        _ => {
            let state = if result.exists { "present" } else { "free" };
            println!("{} ({state})", result.path);
        }
    }

    let stats = index.stats().snapshot();
    if stats.orphans_healed > 0 {
        info!("Reclaimed {} orphaned slot(s)", stats.orphans_healed);
    }
    Ok(())
}

/// Runs the create command.
pub fn create(
    index_args: &IndexArgs,
    dir: &Path,
    identity: &IdentityArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let id = identity.identity()?;
    info!("Creating {} in {:?}", id, dir);

    let created = index.create(dir, &id)?;
    println!("✓ Created {}", created.path.display());
    Ok(())
}

/// Runs the remove command.
pub fn remove(
    index_args: &IndexArgs,
    dir: &Path,
    identity: &IdentityArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let id = identity.identity()?;
    info!("Removing {} from {:?}", id, dir);

    index.remove(dir, &id)?;
    if index.stats().snapshot().compactions > 0 {
        println!("✓ Removed (chain compacted)");
    } else {
        println!("✓ Removed");
    }
    Ok(())
}
