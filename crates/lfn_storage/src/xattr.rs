//! Chained extended attributes.
//!
//! Many file systems cap a single attribute value at one block, while an
//! identity record for a long name can exceed that. Values are therefore
//! split into chunks of [`CHAIN_BLOCK_LEN`] bytes stored under `name`,
//! `name@1`, `name@2`, ... A chunk shorter than the block length ends the
//! chain.

use std::ffi::{CStr, CString};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

/// Maximum bytes stored in one attribute of a chain.
pub const CHAIN_BLOCK_LEN: usize = 2048;

fn path_cstring(path: &Path) -> io::Result<CString> {
    CString::new(path.as_os_str().as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))
}

fn chunk_name(name: &str, index: usize) -> io::Result<CString> {
    let composed = if index == 0 {
        name.to_owned()
    } else {
        format!("{name}@{index}")
    };
    CString::new(composed)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "attribute name contains NUL"))
}

/// Reads a chained attribute. `Ok(None)` if the first chunk is absent.
pub fn get(path: &Path, name: &str) -> io::Result<Option<Vec<u8>>> {
    let path = path_cstring(path)?;
    let mut value = Vec::new();

    for index in 0usize.. {
        let chunk = match get_raw(&path, &chunk_name(name, index)?)? {
            Some(chunk) => chunk,
            None if index == 0 => return Ok(None),
            None => break,
        };
        let full = chunk.len() == CHAIN_BLOCK_LEN;
        value.extend_from_slice(&chunk);
        if !full {
            break;
        }
    }

    Ok(Some(value))
}

/// Writes a chained attribute and drops chunks left over from a longer
/// previous value.
pub fn set(path: &Path, name: &str, value: &[u8]) -> io::Result<()> {
    let path = path_cstring(path)?;
    let mut written = 0usize;

    if value.is_empty() {
        set_raw(&path, &chunk_name(name, 0)?, &[])?;
        written = 1;
    }
    for (index, chunk) in value.chunks(CHAIN_BLOCK_LEN).enumerate() {
        set_raw(&path, &chunk_name(name, index)?, chunk)?;
        written = index + 1;
    }

    for index in written.. {
        if !remove_raw(&path, &chunk_name(name, index)?)? {
            break;
        }
    }
    Ok(())
}

/// Removes every chunk of a chained attribute. `Ok(false)` if none existed.
pub fn remove(path: &Path, name: &str) -> io::Result<bool> {
    let path = path_cstring(path)?;
    let mut removed = false;
    for index in 0usize.. {
        if !remove_raw(&path, &chunk_name(name, index)?)? {
            break;
        }
        removed = true;
    }
    Ok(removed)
}

#[cfg(target_os = "linux")]
fn get_raw(path: &CStr, name: &CStr) -> io::Result<Option<Vec<u8>>> {
    loop {
        let size = unsafe { libc::getxattr(path.as_ptr(), name.as_ptr(), std::ptr::null_mut(), 0) };
        if size < 0 {
            return absent_or_err(io::Error::last_os_error());
        }

        let mut buf = vec![0u8; size as usize];
        let read = unsafe {
            libc::getxattr(
                path.as_ptr(),
                name.as_ptr(),
                buf.as_mut_ptr().cast(),
                buf.len(),
            )
        };
        if read < 0 {
            let err = io::Error::last_os_error();
            // Value grew between the two calls.
            if err.raw_os_error() == Some(libc::ERANGE) {
                continue;
            }
            return absent_or_err(err);
        }
        buf.truncate(read as usize);
        return Ok(Some(buf));
    }
}

#[cfg(target_os = "linux")]
fn set_raw(path: &CStr, name: &CStr, value: &[u8]) -> io::Result<()> {
    let res = unsafe {
        libc::setxattr(
            path.as_ptr(),
            name.as_ptr(),
            value.as_ptr().cast(),
            value.len(),
            0,
        )
    };
    if res < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

#[cfg(target_os = "linux")]
fn remove_raw(path: &CStr, name: &CStr) -> io::Result<bool> {
    let res = unsafe { libc::removexattr(path.as_ptr(), name.as_ptr()) };
    if res < 0 {
        return absent_or_err(io::Error::last_os_error()).map(|_: Option<()>| false);
    }
    Ok(true)
}

#[cfg(target_os = "linux")]
fn absent_or_err<T>(err: io::Error) -> io::Result<Option<T>> {
    if err.raw_os_error() == Some(libc::ENODATA) {
        Ok(None)
    } else {
        Err(err)
    }
}

#[cfg(not(target_os = "linux"))]
fn get_raw(_path: &CStr, _name: &CStr) -> io::Result<Option<Vec<u8>>> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

#[cfg(not(target_os = "linux"))]
fn set_raw(_path: &CStr, _name: &CStr, _value: &[u8]) -> io::Result<()> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

#[cfg(not(target_os = "linux"))]
fn remove_raw(_path: &CStr, _name: &CStr) -> io::Result<bool> {
    Err(io::Error::from(io::ErrorKind::Unsupported))
}

/// Probes whether `dir` supports user extended attributes.
pub fn supported(dir: &Path) -> bool {
    let probe = dir.join(".lfn_xattr_probe");
    if std::fs::File::create(&probe).is_err() {
        return false;
    }
    let ok = set(&probe, "user.lfn.probe", b"1").is_ok();
    let _ = std::fs::remove_file(&probe);
    ok
}
