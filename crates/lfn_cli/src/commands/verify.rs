//! Verify command implementation.
//!
//! Scans one directory and checks every entry against the naming rules:
//! short names must decode, long-name chains must occupy serials `0..k`
//! without gaps, and every long-name record must hash back to its prefix.

use super::common::{display_name, print_json, IndexArgs};
use lfn_codec::decode;
use lfn_core::{CoreError, LongName, NameIndex, Placement};
use lfn_storage::DirBackend;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Verification result.
#[derive(Debug, Default, Serialize)]
pub struct VerifyResult {
    /// Directory entries examined.
    pub entries_checked: usize,
    /// Entries with a short name.
    pub short_names: usize,
    /// Entries with a long name.
    pub long_names: usize,
    /// Distinct long-name prefixes.
    pub chains: usize,
    /// Long names without an identity record.
    pub orphans: usize,
    /// Problems found.
    pub errors: Vec<String>,
}

impl VerifyResult {
    fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Runs the verify command.
pub fn run(
    index_args: &IndexArgs,
    dir: &Path,
    format: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let index = index_args.open()?;
    let result = verify_dir(&index, dir)?;

    match format {
        "json" => print_json(&result)?,
        _ => {
            println!("Verifying {}", dir.display());
            println!();
            println!("  Entries checked: {}", result.entries_checked);
            println!("  Short names: {}", result.short_names);
            println!("  Long names: {}", result.long_names);
            println!("  Chains: {}", result.chains);
            println!("  Orphans: {}", result.orphans);
            for error in &result.errors {
                println!("  ✗ {error}");
            }
            println!();
        }
    }

    if result.is_ok() {
        println!("✓ Directory verification passed");
        Ok(())
    } else {
        println!("✗ Directory verification failed");
        Err("Verification failed".into())
    }
}

/// Checks every regular entry of `dir`.
///
/// Read-only: orphans are counted, not reclaimed.
pub fn verify_dir<B: DirBackend>(
    index: &NameIndex<B>,
    dir: &Path,
) -> Result<VerifyResult, Box<dyn std::error::Error>> {
    let mut result = VerifyResult::default();
    let mut chains: BTreeMap<Vec<u8>, Vec<u32>> = BTreeMap::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            continue;
        }
        result.entries_checked += 1;
        let name = entry.file_name();
        let name = name.as_bytes();

        if let Some(long) = LongName::parse(name) {
            result.long_names += 1;
            chains
                .entry(long.prefix().to_vec())
                .or_default()
                .push(long.serial());
            check_record(index, dir, &long, &mut result)?;
        } else {
            result.short_names += 1;
            if let Err(e) = decode(name, index.config().format_version) {
                result
                    .errors
                    .push(format!("{}: undecodable short name: {e}", display_name(name)));
            }
        }
    }

    result.chains = chains.len();
    for (prefix, mut serials) in chains {
        serials.sort_unstable();
        let expected = 0..serials.len() as u32;
        if !serials.iter().copied().eq(expected) {
            result.errors.push(format!(
                "{}: chain has gaps, serials {serials:?}",
                display_name(&prefix)
            ));
        }
    }
    Ok(result)
}

fn check_record<B: DirBackend>(
    index: &NameIndex<B>,
    dir: &Path,
    long: &LongName,
    result: &mut VerifyResult,
) -> Result<(), Box<dyn std::error::Error>> {
    let file_name = long.to_mangled();
    let shown = display_name(file_name.as_bytes());
    match index.translate(dir, file_name.as_bytes()) {
        Ok(identity) => match index.placement(&identity) {
            Placement::Long(first) if first.prefix() == long.prefix() => {}
            _ => result
                .errors
                .push(format!("{shown}: record does not belong to this name")),
        },
        Err(CoreError::MissingRecord { .. }) => result.orphans += 1,
        Err(CoreError::CorruptRecord { source, .. }) => result
            .errors
            .push(format!("{shown}: corrupt identity record: {source}")),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
