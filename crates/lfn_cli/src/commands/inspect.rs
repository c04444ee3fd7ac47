//! Inspect command implementation.

use super::common::{print_json, IdentityView, IndexArgs};
use std::path::Path;

/// Runs the inspect command.
///
/// Recovers the identity behind an existing directory entry, reading the
/// identity record for long names.
pub fn run(
    index_args: &IndexArgs,
    dir: &Path,
    file_name: &str,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let id = index.translate(dir, file_name.as_bytes())?;
    let view = IdentityView::from(&id);

    match format {
        "json" => print_json(&view)?,
        _ => {
            println!("{}:", dir.join(file_name).display());
            view.print_text();
        }
    }
    Ok(())
}
