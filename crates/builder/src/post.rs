//! Binary post-processing walk
//!
//! Visits every regular file under the data root, strips what the policy
//! says to strip and collects DT_NEEDED entries. Per-file failures are
//! recorded as warnings and never abort packaging: a malformed or plainly
//! non-binary file is expected content.

use crate::inspect::{BinaryInspector, StripTool};
use evoke_errors::Result;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;

/// Outcome of the post-processing walk
#[derive(Debug, Default)]
pub struct PostProcessReport {
    /// Needed SONAMEs across all binaries, deduplicated, first-seen order
    pub needed: Vec<String>,
    /// Files successfully stripped
    pub stripped: usize,
    /// Files skipped because of read, probe or strip failures
    pub warnings: usize,
}

/// Walk the tree under `root`, classify and strip binaries and gather
/// their needed libraries.
///
/// `strip` may be `None` when no strip tool is available; classification
/// and dependency extraction still run.
///
/// # Errors
///
/// Only infallible per-file work happens inside the walk; an error is
/// returned solely when the root itself cannot be traversed.
pub async fn process_tree<I, S>(
    root: &Path,
    inspector: &I,
    strip: Option<&S>,
) -> Result<PostProcessReport>
where
    I: BinaryInspector,
    S: StripTool,
{
    let mut report = PostProcessReport::default();
    let mut seen = HashSet::new();

    let walker = ignore::WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(OsStr::cmp)
        .build();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                report.warnings += 1;
                continue;
            }
        };
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();

        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read file, skipping");
                report.warnings += 1;
                continue;
            }
        };

        let kind = inspector.classify(&data);

        if kind.is_elf() {
            match inspector.needed_libraries(&data) {
                Ok(libs) => {
                    for lib in libs {
                        if seen.insert(lib.clone()) {
                            report.needed.push(lib);
                        }
                    }
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "cannot read dynamic section");
                    report.warnings += 1;
                }
            }
        }

        if kind.is_strippable() {
            if let Some(tool) = strip {
                match tool.strip(path, kind).await {
                    Ok(()) => report.stripped += 1,
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "strip failed, skipping");
                        report.warnings += 1;
                    }
                }
            }
        }
    }

    Ok(report)
}
