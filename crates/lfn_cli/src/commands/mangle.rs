//! Mangle command implementation.

use super::common::{display_name, print_json, IdentityArgs, IndexArgs};
use lfn_codec::encode;
use lfn_core::{NameIndex, Placement};
use lfn_storage::InMemoryDirBackend;
use serde::Serialize;

/// Mangling result.
#[derive(Debug, Serialize)]
pub struct MangleResult {
    /// Format version used.
    pub version: u8,
    /// Short encoding, regardless of length.
    pub short_name: String,
    /// Length of the short encoding in bytes.
    pub short_len: usize,
    /// Whether the short encoding overflows the budget.
    pub long: bool,
    /// File name of the first slot, the short name when it fits.
    pub file_name: String,
}

/// Runs the mangle command.
///
/// Pure computation: no directory is touched.
pub fn run(
    index_args: &IndexArgs,
    identity: &IdentityArgs,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = index_args.config();
    let id = identity.identity()?;
    let index = NameIndex::new(InMemoryDirBackend::new(), config)?;

    let short = encode(&id, index.config().format_version);
    let placement = index.placement(&id);
    let file_name = match &placement {
        Placement::Short(name) => name.clone(),
        Placement::Long(long) => long.to_mangled(),
    };
    let result = MangleResult {
        version: index.config().format_version.tag(),
        short_name: display_name(short.as_bytes()),
        short_len: short.len(),
        long: placement.is_long(),
        file_name: display_name(file_name.as_bytes()),
    };

    match format {
        "json" => print_json(&result)?,
        _ => {
            println!("{}", result.file_name);
            if result.long {
                println!(
                    "  (long name; short encoding is {} bytes, budget {})",
                    result.short_len,
                    index.config().max_short_name_len
                );
            }
        }
    }
    Ok(())
}
