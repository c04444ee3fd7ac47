//! Chain command implementation.

use super::common::{display_name, print_json, IdentityArgs, IdentityView, IndexArgs};
use lfn_core::SlotState;
use serde::Serialize;
use std::path::Path;

/// One slot of a listed chain.
#[derive(Debug, Serialize)]
pub struct SlotView {
    /// Serial.
    pub serial: u32,
    /// File name.
    pub file_name: String,
    /// `valid`, `orphan` or `corrupt`.
    pub state: &'static str,
    /// Recorded identity, for valid slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<IdentityView>,
    /// Whether the slot holds the queried identity.
    pub matches: bool,
    /// Parse error, for corrupt slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Runs the chain command.
///
/// Lists every occupied slot sharing the identity's long-name prefix.
pub fn run(
    index_args: &IndexArgs,
    dir: &Path,
    identity: &IdentityArgs,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let id = identity.identity()?;
    if !index.placement(&id).is_long() {
        println!("Short name; no collision chain");
        return Ok(());
    }

    let slots: Vec<SlotView> = index
        .chain(dir, &id)?
        .into_iter()
        .map(|slot| {
            let file_name = display_name(slot.name.as_bytes());
            match slot.state {
                SlotState::Valid(record) => SlotView {
                    serial: slot.serial,
                    file_name,
                    state: "valid",
                    matches: record.identity == id,
                    identity: Some(IdentityView::from(&record.identity)),
                    error: None,
                },
                SlotState::Orphan => SlotView {
                    serial: slot.serial,
                    file_name,
                    state: "orphan",
                    identity: None,
                    matches: false,
                    error: None,
                },
                SlotState::Corrupt(error) => SlotView {
                    serial: slot.serial,
                    file_name,
                    state: "corrupt",
                    identity: None,
                    matches: false,
                    error: Some(error),
                },
            }
        })
        .collect();

    match format {
        "json" => print_json(&slots)?,
        _ => {
            if slots.is_empty() {
                println!("No occupied slots");
            }
            for slot in &slots {
                let marker = if slot.matches { " <=" } else { "" };
                println!("[{}] {} {}{marker}", slot.serial, slot.state, slot.file_name);
                if let Some(identity) = &slot.identity {
                    identity.print_text();
                }
                if let Some(error) = &slot.error {
                    println!("  Error: {error}");
                }
            }
        }
    }
    Ok(())
}
