#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Package building for evoke
//!
//! This crate turns a package directory (PKGINFO metadata plus a PKGBUILD
//! script) into a dependency-annotated `.evx` archive: it fetches sources,
//! runs the build script in an ephemeral sandbox, strips the produced
//! binaries, derives runtime dependencies from their ELF dynamic sections
//! and archives the result.

mod context;
mod fetch;
mod inspect;
mod packaging;
mod post;
mod registry;
mod resolve;
mod sandbox;
mod workflow;

pub use context::BuildContext;
pub use fetch::fetch_sources;
pub use inspect::{strip_flag, BinaryInspector, ElfInspector, StripTool, SystemStrip};
pub use packaging::archive_package;
pub use post::{process_tree, PostProcessReport};
pub use registry::{InstalledPackage, InstalledRegistry};
pub use resolve::resolve_runtime_deps;
pub use sandbox::{script_environment, ScriptOutput};
pub use workflow::{BuildReport, Builder};
