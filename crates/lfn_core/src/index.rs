//! The long-file-name index.
//!
//! Maps identities to directory entries. Short encodings are used as file
//! names directly. Encodings over the length budget become long names: a
//! digest-derived prefix plus a serial, with the full identity kept in an
//! extended attribute so that prefix collisions can be told apart.
//!
//! # Probing
//!
//! Serials for a prefix are occupied contiguously from 0. Resolution walks
//! them in order:
//!
//! - file absent: the slot is free
//! - attribute absent: a crash left an orphan; it is unlinked and the slot
//!   is free
//! - record names another identity: try the next serial
//! - record names this identity: found
//!
//! Removal keeps the chain contiguous by renaming the last occupied serial
//! onto the removed one.
//!
//! Serials stop where the rendered name would exceed
//! [`IndexConfig::max_long_name_len`]; a chain that runs out of them fails
//! with [`CoreError::ChainFull`].

use crate::config::IndexConfig;
use crate::error::{CoreError, CoreResult};
use crate::long_name::LongName;
use crate::stats::IndexStats;
use lfn_codec::{decode, encode, IdentityRecord, MangledName, ObjectIdentity};
use lfn_storage::{DirBackend, StorageError};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Where an identity lives in its directory, before looking at the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The short encoding fits and is the file name.
    Short(MangledName),
    /// The short encoding overflows; serial 0 of its long-name chain.
    Long(LongName),
}

impl Placement {
    /// Returns `true` for [`Placement::Long`].
    #[must_use]
    pub fn is_long(&self) -> bool {
        matches!(self, Self::Long(_))
    }
}

/// Outcome of [`NameIndex::resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// File name to use for the identity.
    pub name: MangledName,
    /// Full path of that file.
    pub path: PathBuf,
    /// Whether the identity is already present under `name`.
    pub exists: bool,
}

/// State of one occupied long-name slot, as reported by [`NameIndex::chain`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    /// The slot carries a valid identity record.
    Valid(IdentityRecord),
    /// The slot has no identity record.
    Orphan,
    /// The attribute does not parse as an identity record.
    Corrupt(String),
}

/// One occupied slot of a long-name chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotInfo {
    /// Serial of the slot.
    pub serial: u32,
    /// On-disk file name.
    pub name: MangledName,
    /// What the slot's attribute holds.
    pub state: SlotState,
}

enum SlotRecord {
    Absent,
    Orphan,
    Present(IdentityRecord),
}

enum Probe {
    Free(LongName),
    Match(LongName),
}

/// Long-file-name index over a directory backend.
///
/// Holds no per-directory state: every call takes the directory it acts on
/// and inspects the disk afresh.
///
/// # Concurrency
///
/// Each operation is a short sequence of backend calls and is not atomic as
/// a whole. Concurrent writers to the same directory must be serialized by
/// the caller: a slot another writer has created but not yet committed
/// looks like an orphan and may be reclaimed. When [`NameIndex::create`]
/// loses the exclusive create itself it moves on to the next serial and
/// leaves the contested file alone.
///
/// # Example
///
/// ```rust
/// use lfn_codec::ObjectIdentity;
/// use lfn_core::NameIndex;
/// use lfn_storage::InMemoryDirBackend;
/// use std::path::Path;
///
/// let index = NameIndex::with_defaults(InMemoryDirBackend::new());
/// let dir = Path::new("/pg/1.0");
/// let id = ObjectIdentity::new(vec![b'x'; 400]).with_hash(7);
///
/// let created = index.create(dir, &id).unwrap();
/// assert!(created.name.as_bytes().ends_with(b"_0_long"));
/// assert!(index.resolve(dir, &id).unwrap().exists);
///
/// index.remove(dir, &id).unwrap();
/// assert!(!index.resolve(dir, &id).unwrap().exists);
/// ```
pub struct NameIndex<B: DirBackend> {
    backend: B,
    config: IndexConfig,
    stats: IndexStats,
}

impl<B: DirBackend> NameIndex<B> {
    /// Creates an index over `backend`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] if `config` is inconsistent.
    pub fn new(backend: B, config: IndexConfig) -> CoreResult<Self> {
        config.validate()?;
        Ok(Self {
            backend,
            config,
            stats: IndexStats::new(),
        })
    }

    /// Creates an index with the default configuration.
    #[must_use]
    pub fn with_defaults(backend: B) -> Self {
        Self {
            backend,
            config: IndexConfig::default(),
            stats: IndexStats::new(),
        }
    }

    /// Returns the backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Returns the configuration.
    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Returns the operation counters.
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }

    /// Computes where `id` lives without touching the disk.
    #[must_use]
    pub fn placement(&self, id: &ObjectIdentity) -> Placement {
        let short = encode(id, self.config.format_version);
        if short.len() <= self.config.max_short_name_len {
            Placement::Short(short)
        } else {
            Placement::Long(LongName::for_short_name(&short, &self.config))
        }
    }

    /// Finds the file name for `id` in `dir` and whether it is present.
    ///
    /// For long names this may unlink an orphaned slot.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `CorruptRecord` or `Io` from the disk, or
    /// `ChainFull` when every usable serial holds another identity. Nothing
    /// but an orphan is modified on error.
    pub fn resolve(&self, dir: &Path, id: &ObjectIdentity) -> CoreResult<Resolved> {
        self.stats.record_resolve();
        match self.placement(id) {
            Placement::Short(name) => {
                let path = entry_path(dir, &name);
                let exists = self.backend.exists(&path)?;
                Ok(Resolved { name, path, exists })
            }
            Placement::Long(first) => {
                let (slot, exists) = match self.probe(dir, id, first)? {
                    Probe::Free(slot) => (slot, false),
                    Probe::Match(slot) => (slot, true),
                };
                let name = slot.to_mangled();
                let path = entry_path(dir, &name);
                Ok(Resolved { name, path, exists })
            }
        }
    }

    /// Records `id` on the freshly created file at `path`.
    ///
    /// Only long names need a record; for short names this does nothing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the file is gone, or the attribute write error.
    pub fn commit(&self, path: &Path, id: &ObjectIdentity) -> CoreResult<()> {
        if !self.placement(id).is_long() {
            return Ok(());
        }
        let record = IdentityRecord::new(id.clone(), self.config.format_version);
        let bytes = record.to_bytes()?;
        self.backend.set_attr(path, &self.config.attr_name, &bytes)?;
        self.stats.record_commit();
        trace!(path = %path.display(), "identity record written");
        Ok(())
    }

    /// Removes `id` from `dir`, compacting its long-name chain.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `id` is not present, or any disk error.
    pub fn remove(&self, dir: &Path, id: &ObjectIdentity) -> CoreResult<()> {
        let first = match self.placement(id) {
            Placement::Short(name) => {
                self.backend.unlink(&entry_path(dir, &name))?;
                self.stats.record_removal(false);
                return Ok(());
            }
            Placement::Long(first) => first,
        };

        let slot = match self.probe(dir, id, first)? {
            Probe::Match(slot) => slot,
            Probe::Free(slot) => {
                return Err(CoreError::not_found(entry_path(dir, &slot.to_mangled())))
            }
        };
        let removed = entry_path(dir, &slot.to_mangled());

        let mut last = slot.clone();
        while let Some(next) = self.next_slot(&last) {
            if !self.backend.exists(&entry_path(dir, &next.to_mangled()))? {
                break;
            }
            last = next;
        }

        if last == slot {
            self.backend.unlink(&removed)?;
            self.stats.record_removal(false);
        } else {
            let moved = entry_path(dir, &last.to_mangled());
            self.backend.rename(&moved, &removed)?;
            self.stats.record_removal(true);
            debug!(
                from = last.serial(),
                to = slot.serial(),
                dir = %dir.display(),
                "compacted long-name chain"
            );
        }
        Ok(())
    }

    /// Recovers the identity stored under `file_name` in `dir`.
    ///
    /// Long names are read back from their identity record; short names are
    /// decoded with the configured format version.
    ///
    /// # Errors
    ///
    /// Returns `MissingRecord` or `CorruptRecord` for unreadable long names,
    /// `Format` for short names that do not decode, or any disk error.
    pub fn translate(&self, dir: &Path, file_name: &[u8]) -> CoreResult<ObjectIdentity> {
        if LongName::parse(file_name).is_none() {
            return Ok(decode(file_name, self.config.format_version)?);
        }
        let path = entry_path(dir, &MangledName::from_bytes(file_name));
        match self.read_record(&path)? {
            SlotRecord::Present(record) => Ok(record.identity),
            SlotRecord::Orphan => Err(CoreError::MissingRecord { path }),
            SlotRecord::Absent => Err(CoreError::not_found(path)),
        }
    }

    /// Creates the file for `id` in `dir` and records its identity.
    ///
    /// Finds a free slot, creates it exclusively and commits the record. If
    /// another writer creates the slot first, that file is left in place and
    /// the search continues from the next serial.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if `id` is present, `CreateContention` after
    /// `max_create_attempts` lost slots, `ChainFull` when no serial is left,
    /// or any disk error. A failed commit leaves an orphan that the next
    /// resolve reclaims.
    pub fn create(&self, dir: &Path, id: &ObjectIdentity) -> CoreResult<Resolved> {
        let mut slot = match self.placement(id) {
            Placement::Short(name) => {
                let path = entry_path(dir, &name);
                self.backend.create_exclusive(&path)?;
                return Ok(Resolved {
                    name,
                    path,
                    exists: true,
                });
            }
            Placement::Long(first) => first,
        };

        for attempt in 1..=self.config.max_create_attempts {
            let free = match self.probe(dir, id, slot)? {
                Probe::Free(free) => free,
                Probe::Match(found) => {
                    return Err(CoreError::AlreadyExists {
                        path: entry_path(dir, &found.to_mangled()),
                    })
                }
            };
            let name = free.to_mangled();
            let path = entry_path(dir, &name);
            match self.backend.create_exclusive(&path) {
                Ok(()) => {
                    self.commit(&path, id)?;
                    return Ok(Resolved {
                        name,
                        path,
                        exists: true,
                    });
                }
                Err(StorageError::AlreadyExists { .. }) => {
                    debug!(attempt, path = %path.display(), "lost create race");
                    slot = self.next_slot(&free).ok_or(CoreError::ChainFull { path })?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(CoreError::CreateContention {
            attempts: self.config.max_create_attempts,
        })
    }

    /// Lists the occupied slots of the long-name chain `id` maps to.
    ///
    /// The chain includes every identity sharing the prefix, not only `id`.
    /// Short placements have no chain and yield an empty list.
    ///
    /// # Errors
    ///
    /// Returns any disk error other than a malformed record, which is
    /// reported as [`SlotState::Corrupt`].
    pub fn chain(&self, dir: &Path, id: &ObjectIdentity) -> CoreResult<Vec<SlotInfo>> {
        let Placement::Long(first) = self.placement(id) else {
            return Ok(Vec::new());
        };

        let mut slots = Vec::new();
        let mut slot = first;
        loop {
            let name = slot.to_mangled();
            let path = entry_path(dir, &name);
            let state = match self.read_record(&path) {
                Ok(SlotRecord::Absent) => break,
                Ok(SlotRecord::Orphan) => SlotState::Orphan,
                Ok(SlotRecord::Present(record)) => SlotState::Valid(record),
                Err(CoreError::CorruptRecord { source, .. }) => {
                    SlotState::Corrupt(source.to_string())
                }
                Err(err) => return Err(err),
            };
            slots.push(SlotInfo {
                serial: slot.serial(),
                name,
                state,
            });
            match self.next_slot(&slot) {
                Some(next) => slot = next,
                None => break,
            }
        }
        Ok(slots)
    }

    fn probe(&self, dir: &Path, id: &ObjectIdentity, first: LongName) -> CoreResult<Probe> {
        let mut slot = first;
        loop {
            self.stats.record_probe();
            let path = entry_path(dir, &slot.to_mangled());
            trace!(serial = slot.serial(), path = %path.display(), "probing long-name slot");

            match self.read_record(&path)? {
                SlotRecord::Absent => return Ok(Probe::Free(slot)),
                SlotRecord::Orphan => {
                    match self.backend.unlink(&path) {
                        Ok(()) | Err(StorageError::NotFound { .. }) => {}
                        Err(err) => return Err(err.into()),
                    }
                    self.stats.record_orphan_healed();
                    debug!(path = %path.display(), "removed long name without identity record");
                    return Ok(Probe::Free(slot));
                }
                SlotRecord::Present(record) if record.identity == *id => {
                    return Ok(Probe::Match(slot));
                }
                SlotRecord::Present(_) => {
                    self.stats.record_collision();
                    slot = self.next_slot(&slot).ok_or(CoreError::ChainFull { path })?;
                }
            }
        }
    }

    /// The following serial, if its name still fits the length budget.
    fn next_slot(&self, slot: &LongName) -> Option<LongName> {
        let next = slot.with_serial(slot.serial().checked_add(1)?);
        (next.to_mangled().len() <= self.config.max_long_name_len()).then_some(next)
    }

    fn read_record(&self, path: &Path) -> CoreResult<SlotRecord> {
        let bytes = match self.backend.get_attr(path, &self.config.attr_name) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return Ok(SlotRecord::Orphan),
            Err(StorageError::NotFound { .. }) => return Ok(SlotRecord::Absent),
            Err(err) => return Err(err.into()),
        };
        IdentityRecord::from_bytes(&bytes)
            .map(SlotRecord::Present)
            .map_err(|source| CoreError::CorruptRecord {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl<B: DirBackend> std::fmt::Debug for NameIndex<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NameIndex")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn entry_path(dir: &Path, name: &MangledName) -> PathBuf {
    dir.join(name.clone().into_os_string())
}
