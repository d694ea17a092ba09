//! Binary classification and ELF introspection without spawning `readelf`.
//!
//! Classification reads file content, never extensions. Needed-library
//! entries live in the ELF dynamic section, not the symbol table, so they
//! survive stripping; extraction here is still done from the bytes read
//! before the strip tool runs.

use async_trait::async_trait;
use evoke_errors::{Error, PackError, Result};
use evoke_types::BinaryKind;
use object::elf;
use object::read::elf::{Dyn, FileHeader, SectionHeader};
use object::read::SectionIndex;
use object::{Endianness, FileKind};
use std::path::{Path, PathBuf};
use tokio::process::Command;

/// Content-based binary probe and dynamic-section reader.
///
/// A trait so the post-processor can be unit-tested with a fake.
pub trait BinaryInspector: Send + Sync {
    /// Determine a file's kind from its bytes
    fn classify(&self, data: &[u8]) -> BinaryKind;

    /// DT_NEEDED entries of an ELF file, in declaration order.
    ///
    /// Non-ELF input yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error when the file looks like ELF but its dynamic
    /// section cannot be parsed.
    fn needed_libraries(&self, data: &[u8]) -> Result<Vec<String>>;
}

/// Production inspector backed by the `object` crate
pub struct ElfInspector;

impl BinaryInspector for ElfInspector {
    fn classify(&self, data: &[u8]) -> BinaryKind {
        match FileKind::parse(data) {
            Ok(FileKind::Elf32) => elf_kind::<elf::FileHeader32<Endianness>>(data),
            Ok(FileKind::Elf64) => elf_kind::<elf::FileHeader64<Endianness>>(data),
            Ok(FileKind::Archive) => BinaryKind::StaticArchive,
            _ => BinaryKind::Other,
        }
    }

    fn needed_libraries(&self, data: &[u8]) -> Result<Vec<String>> {
        match FileKind::parse(data) {
            Ok(FileKind::Elf32) => needed::<elf::FileHeader32<Endianness>>(data),
            Ok(FileKind::Elf64) => needed::<elf::FileHeader64<Endianness>>(data),
            _ => Ok(Vec::new()),
        }
    }
}

fn elf_kind<Elf: FileHeader<Endian = Endianness>>(data: &[u8]) -> BinaryKind {
    let Ok(header) = Elf::parse(data) else {
        return BinaryKind::Other;
    };
    let Ok(endian) = header.endian() else {
        return BinaryKind::Other;
    };
    // PIE executables carry ET_DYN and are treated as shared objects,
    // matching the strip policy applied to them
    match header.e_type(endian) {
        elf::ET_EXEC => BinaryKind::Executable,
        elf::ET_DYN => BinaryKind::SharedObject,
        _ => BinaryKind::Other,
    }
}

fn needed<Elf: FileHeader<Endian = Endianness>>(data: &[u8]) -> Result<Vec<String>> {
    let header = Elf::parse(data).map_err(parse_err)?;
    let endian = header.endian().map_err(parse_err)?;
    let sections = header.sections(endian, data).map_err(parse_err)?;

    let mut out = Vec::new();
    if let Some((entries, index)) = sections.dynamic(endian, data).map_err(parse_err)? {
        let section = sections.section(index).map_err(parse_err)?;
        let strings_index = SectionIndex(section.sh_link(endian) as usize);
        let strings = sections
            .strings(endian, data, strings_index)
            .map_err(parse_err)?;
        for entry in entries {
            if entry.tag32(endian) == Some(elf::DT_NEEDED) {
                if let Ok(name) = entry.string(endian, strings) {
                    out.push(String::from_utf8_lossy(name).into_owned());
                }
            }
        }
    }
    Ok(out)
}

fn parse_err(e: object::read::Error) -> Error {
    Error::internal(format!("ELF parse error: {e}"))
}

/// Symbol stripping, decoupled from the walk so it can be faked in tests
#[async_trait]
pub trait StripTool: Send + Sync {
    /// Strip a file according to its classification.
    ///
    /// # Errors
    ///
    /// Returns `PackError::StripFailed` when the strip operation fails.
    async fn strip(&self, path: &Path, kind: BinaryKind) -> Result<()>;
}

/// Strip flag for a binary kind: full symbol table for executables,
/// non-dynamic symbols for shared objects, debug info for archives.
#[must_use]
pub fn strip_flag(kind: BinaryKind) -> Option<&'static str> {
    match kind {
        BinaryKind::Executable => Some("--strip-all"),
        BinaryKind::SharedObject => Some("--strip-unneeded"),
        BinaryKind::StaticArchive => Some("--strip-debug"),
        BinaryKind::Other => None,
    }
}

/// Strip implementation invoking the system `strip` binary
pub struct SystemStrip {
    program: PathBuf,
}

impl SystemStrip {
    /// Locate `strip` on PATH; `None` disables stripping
    #[must_use]
    pub fn locate() -> Option<Self> {
        which::which("strip").ok().map(|program| Self { program })
    }

    /// Use an explicit strip binary
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

#[async_trait]
impl StripTool for SystemStrip {
    async fn strip(&self, path: &Path, kind: BinaryKind) -> Result<()> {
        let Some(flag) = strip_flag(kind) else {
            return Ok(());
        };

        let output = Command::new(&self.program)
            .arg(flag)
            .arg(path)
            .output()
            .await
            .map_err(|e| PackError::StripFailed {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        if output.status.success() {
            Ok(())
        } else {
            Err(PackError::StripFailed {
                path: path.display().to_string(),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_non_binary_content() {
        let inspector = ElfInspector;
        assert_eq!(inspector.classify(b"#!/bin/sh\necho hi\n"), BinaryKind::Other);
        assert_eq!(inspector.classify(b""), BinaryKind::Other);
    }

    #[test]
    fn test_classify_ar_archive_magic() {
        let inspector = ElfInspector;
        assert_eq!(
            inspector.classify(b"!<arch>\nlibdemo.a content"),
            BinaryKind::StaticArchive
        );
    }

    #[test]
    fn test_needed_of_non_elf_is_empty() {
        let inspector = ElfInspector;
        assert_eq!(
            inspector.needed_libraries(b"just text").unwrap(),
            Vec::<String>::new()
        );
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_classify_own_test_binary() {
        let data = std::fs::read("/proc/self/exe").unwrap();
        let inspector = ElfInspector;
        let kind = inspector.classify(&data);
        assert!(kind.is_elf(), "test binary should classify as ELF, got {kind:?}");
        // the dynamic section, when present, must parse without error
        inspector.needed_libraries(&data).unwrap();
    }

    #[test]
    fn test_strip_flags_per_kind() {
        assert_eq!(strip_flag(BinaryKind::Executable), Some("--strip-all"));
        assert_eq!(strip_flag(BinaryKind::SharedObject), Some("--strip-unneeded"));
        assert_eq!(strip_flag(BinaryKind::StaticArchive), Some("--strip-debug"));
        assert_eq!(strip_flag(BinaryKind::Other), None);
    }
}
