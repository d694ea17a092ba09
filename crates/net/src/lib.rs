#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! HTTP source fetching for evoke
//!
//! Thin reqwest wrapper used by the build pipeline to download source
//! tarballs. Fetches are sequential and deliberately have no retry logic:
//! a single failed download aborts the whole build.

mod client;

pub use client::{file_name_for_url, NetClient, NetConfig};
