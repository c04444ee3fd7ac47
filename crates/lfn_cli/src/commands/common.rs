//! Arguments and output shared by several commands.

use clap::Args;
use lfn_codec::{FormatVersion, ObjectIdentity, Snapshot, NO_POOL};
use lfn_core::{IndexConfig, NameIndex, DEFAULT_ATTR_NAME};
use lfn_storage::FileDirBackend;
use serde::Serialize;

/// Index settings, shared by every command.
#[derive(Args, Debug, Clone)]
pub struct IndexArgs {
    /// Name format version (1, 2 or 3)
    #[arg(global = true, long = "format-version", default_value = "2", value_parser = parse_version)]
    pub format_version: FormatVersion,

    /// Longest short name kept as-is
    #[arg(global = true, long, default_value_t = 254)]
    pub max_short_name_len: usize,

    /// Digest characters in long-name prefixes
    #[arg(global = true, long, default_value_t = 20)]
    pub digest_hex_len: usize,

    /// Extended attribute holding identity records
    #[arg(global = true, long, default_value = DEFAULT_ATTR_NAME)]
    pub attr_name: String,
}

impl IndexArgs {
    /// Builds the index configuration.
    pub fn config(&self) -> IndexConfig {
        IndexConfig::new()
            .format_version(self.format_version)
            .max_short_name_len(self.max_short_name_len)
            .digest_hex_len(self.digest_hex_len)
            .attr_name(self.attr_name.clone())
    }

    /// Opens an index over the real file system.
    pub fn open(&self) -> Result<NameIndex<FileDirBackend>, Box<dyn std::error::Error>> {
        Ok(NameIndex::new(FileDirBackend::new(), self.config())?)
    }
}

/// An object identity given on the command line.
#[derive(Args, Debug, Clone)]
pub struct IdentityArgs {
    /// Object name
    #[arg(long, required_unless_present = "name_hex", conflicts_with = "name_hex")]
    pub name: Option<String>,

    /// Object name as hex, for names that are not valid UTF-8
    #[arg(long)]
    pub name_hex: Option<String>,

    /// Placement key
    #[arg(long, default_value = "")]
    pub key: String,

    /// Snapshot: head, snapdir or a sequence number
    #[arg(long, default_value = "head", value_parser = parse_snapshot)]
    pub snapshot: Snapshot,

    /// Placement hash in hex
    #[arg(long, default_value = "0", value_parser = parse_hash)]
    pub hash: u32,

    /// Pool id
    #[arg(long, default_value_t = NO_POOL, allow_negative_numbers = true)]
    pub pool: i64,
}

impl IdentityArgs {
    /// Builds the identity.
    pub fn identity(&self) -> Result<ObjectIdentity, Box<dyn std::error::Error>> {
        let name = match (&self.name, &self.name_hex) {
            (_, Some(hex_name)) => hex::decode(hex_name)?,
            (Some(name), None) => name.clone().into_bytes(),
            (None, None) => return Err("--name or --name-hex is required".into()),
        };
        Ok(ObjectIdentity::new(name)
            .with_key(self.key.clone())
            .with_snapshot(self.snapshot)
            .with_hash(self.hash)
            .with_pool(self.pool))
    }
}

fn parse_version(s: &str) -> Result<FormatVersion, String> {
    let tag: u8 = s
        .trim_start_matches(['v', 'V'])
        .parse()
        .map_err(|_| format!("invalid format version: {s}"))?;
    FormatVersion::from_tag(tag).map_err(|e| e.to_string())
}

/// Parses `head`, `snapdir` or a decimal sequence number.
pub fn parse_snapshot(s: &str) -> Result<Snapshot, String> {
    match s {
        "head" => Ok(Snapshot::Head),
        "snapdir" => Ok(Snapshot::SnapDir),
        seq => seq
            .parse()
            .map(Snapshot::Seq)
            .map_err(|_| format!("invalid snapshot: {s}")),
    }
}

/// Parses a hash given in hex, with or without `0x`.
pub fn parse_hash(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0x").trim_start_matches("0X");
    u32::from_str_radix(digits, 16).map_err(|_| format!("invalid hash: {s}"))
}

/// JSON/text view of an identity.
#[derive(Debug, Serialize)]
pub struct IdentityView {
    /// Name, lossily decoded.
    pub name: String,
    /// Name as hex.
    pub name_hex: String,
    /// Key, lossily decoded.
    pub key: String,
    /// Snapshot token.
    pub snapshot: String,
    /// Hash as 8 hex digits.
    pub hash: String,
    /// Pool id.
    pub pool: i64,
}

impl From<&ObjectIdentity> for IdentityView {
    fn from(id: &ObjectIdentity) -> Self {
        Self {
            name: String::from_utf8_lossy(&id.name).into_owned(),
            name_hex: hex::encode(&id.name),
            key: String::from_utf8_lossy(&id.key).into_owned(),
            snapshot: id.snapshot.to_string(),
            hash: format!("{:08X}", id.hash),
            pool: id.pool,
        }
    }
}

impl IdentityView {
    /// Prints the identity as indented text.
    pub fn print_text(&self) {
        println!("  Name: {:?}", self.name);
        println!("  Name (hex): {}", self.name_hex);
        println!("  Key: {:?}", self.key);
        println!("  Snapshot: {}", self.snapshot);
        println!("  Hash: {}", self.hash);
        if self.pool == NO_POOL {
            println!("  Pool: none");
        } else {
            println!("  Pool: {}", self.pool);
        }
    }
}

/// Prints `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Renders a possibly non-UTF-8 file name for display.
pub fn display_name(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_snapshots() {
        assert_eq!(parse_snapshot("head").unwrap(), Snapshot::Head);
        assert_eq!(parse_snapshot("snapdir").unwrap(), Snapshot::SnapDir);
        assert_eq!(parse_snapshot("17").unwrap(), Snapshot::Seq(17));
        assert!(parse_snapshot("-1").is_err());
    }

    #[test]
    fn parses_hashes_and_versions() {
        assert_eq!(parse_hash("ABABABAB").unwrap(), 0xABAB_ABAB);
        assert_eq!(parse_hash("0x1f").unwrap(), 0x1F);
        assert!(parse_hash("xyz").is_err());
        assert_eq!(parse_version("3").unwrap(), FormatVersion::V3);
        assert_eq!(parse_version("v1").unwrap(), FormatVersion::V1);
        assert!(parse_version("4").is_err());
    }

    #[test]
    fn identity_view_formats_hash() {
        let id = ObjectIdentity::new("a").with_hash(0x1F);
        let view = IdentityView::from(&id);
        assert_eq!(view.hash, "0000001F");
        assert_eq!(view.name_hex, "61");
    }
}
