//! Demangle command implementation.

use super::common::{print_json, IdentityView};
use lfn_codec::{decode, FormatVersion};
use lfn_core::is_long_name;

/// Runs the demangle command.
///
/// Decodes a short name without touching the disk. Long names carry their
/// identity in an attribute; use `inspect` for those.
pub fn run(
    name: &str,
    version: FormatVersion,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if is_long_name(name.as_bytes()) {
        return Err(format!("{name} is a long name; use `lfn inspect` to read its record").into());
    }
    let id = decode(name.as_bytes(), version)?;
    let view = IdentityView::from(&id);

    match format {
        "json" => print_json(&view)?,
        _ => {
            println!("{name} ({version}):");
            view.print_text();
        }
    }
    Ok(())
}
