#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Shared type definitions for evoke
//!
//! Small, dependency-light types used across the build pipeline:
//! package identity, binary classification and the runtime dependency set.

mod binary;
mod deps;
mod package;

pub use binary::BinaryKind;
pub use deps::DependencySet;
pub use package::{is_lib32, strip_lib32, PackageId, LIB32_PREFIX};
