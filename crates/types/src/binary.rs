//! Binary file classification

use serde::{Deserialize, Serialize};

/// Kind of a compiled artifact, probed from file content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryKind {
    /// ELF executable (`ET_EXEC`)
    Executable,
    /// ELF shared object (`ET_DYN`, covers PIE executables as well)
    SharedObject,
    /// `ar` static archive
    StaticArchive,
    /// Anything else; left untouched by post-processing
    Other,
}

impl BinaryKind {
    /// Whether the file carries ELF dynamic-linking metadata worth reading
    #[must_use]
    pub fn is_elf(self) -> bool {
        matches!(self, Self::Executable | Self::SharedObject)
    }

    /// Whether the strip policy applies to this kind at all
    #[must_use]
    pub fn is_strippable(self) -> bool {
        !matches!(self, Self::Other)
    }
}
