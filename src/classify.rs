//! Compiled-artifact detection by magic-byte sniffing.
//!
//! A compiled Lua 5.1 chunk starts with `ESC 'L' 'u' 'a'` followed by the
//! version byte. The check here looks at bytes 1..5 only, so the leading
//! escape byte is not validated and the fixed `LuaQ` marker is enough to
//! route a file to the decompiler. Full header validation is left to the
//! decompiler itself.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{Error, Result};

/// Magic marker expected at [`MAGIC_OFFSET`].
pub const LUA_MAGIC: [u8; 4] = [0x4C, 0x75, 0x61, 0x51];

/// Offset of the magic marker; byte 0 is skipped.
pub const MAGIC_OFFSET: usize = 1;

/// Number of header bytes the check needs.
pub const HEADER_LEN: usize = MAGIC_OFFSET + LUA_MAGIC.len();

/// Returns true if `header` carries the compiled-chunk marker.
///
/// Slices shorter than [`HEADER_LEN`] never match.
#[inline]
pub fn has_lua_header(header: &[u8]) -> bool {
    header
        .get(MAGIC_OFFSET..HEADER_LEN)
        .is_some_and(|magic| magic == LUA_MAGIC)
}

/// Returns true if the file at `path` is a compiled Lua artifact.
///
/// Only the first [`HEADER_LEN`] bytes are read. Files shorter than that are
/// plain files. Failing to open or read the file is an error for the caller
/// to attribute to this work item.
pub fn is_compiled_artifact(path: &Path) -> Result<bool> {
    let file = File::open(path).map_err(|e| Error::file_open(path, e))?;
    let header = read_header(file).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(has_lua_header(&header))
}

/// Reads up to [`HEADER_LEN`] bytes, stopping early at end of file.
fn read_header(reader: impl Read) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(HEADER_LEN);
    reader.take(HEADER_LEN as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).unwrap();
        path
    }

    #[test]
    fn test_header_matches_any_version_byte() {
        for version in [0x00, 0x1B, 0x51, 0xFF] {
            assert!(has_lua_header(&[version, 0x4C, 0x75, 0x61, 0x51]));
        }
        assert!(has_lua_header(b"\x1bLuaQ\x00\x01\x04"));
    }

    #[test]
    fn test_header_short_input() {
        assert!(!has_lua_header(b""));
        assert!(!has_lua_header(b"\x1b"));
        assert!(!has_lua_header(b"\x1bLua"));
        assert!(!has_lua_header(b"LuaQ"));
    }

    #[test]
    fn test_header_mismatch() {
        assert!(!has_lua_header(b"\x1bLuaR"));
        assert!(!has_lua_header(b"\x1bluaQ"));
        // Marker at offset 0 instead of 1
        assert!(!has_lua_header(b"LuaQ\x00"));
        assert!(!has_lua_header(b"print('hello')"));
    }

    #[test]
    fn test_compiled_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "init.luac", b"\x1bLuaQ\x00\x01\x04\x08\x04\x08");
        assert!(is_compiled_artifact(&path).unwrap());
    }

    #[test]
    fn test_exactly_five_bytes() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "min.luac", b"\x00LuaQ");
        assert!(is_compiled_artifact(&path).unwrap());
    }

    #[test]
    fn test_short_and_empty_files() {
        let dir = TempDir::new().unwrap();
        let empty = write(&dir, "empty", b"");
        let four = write(&dir, "four", b"\x1bLua");
        assert!(!is_compiled_artifact(&empty).unwrap());
        assert!(!is_compiled_artifact(&four).unwrap());
    }

    #[test]
    fn test_plain_text_file() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "a.txt", b"0123456789");
        assert!(!is_compiled_artifact(&path).unwrap());
    }

    #[test]
    fn test_read_header_stops_at_header_len() {
        let header = read_header(&b"\x1bLuaQ\x00\x01\x04\x08 rest of chunk"[..]).unwrap();
        assert_eq!(header, b"\x1bLuaQ");
        assert_eq!(read_header(&b"Lu"[..]).unwrap(), b"Lu");
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = is_compiled_artifact(&dir.path().join("missing.luac")).unwrap_err();
        assert!(matches!(err, Error::FileOpen { .. }));
    }
}
