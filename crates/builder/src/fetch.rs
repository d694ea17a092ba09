//! Source fetch stage

use evoke_errors::Result;
use evoke_net::{file_name_for_url, NetClient};
use std::path::{Path, PathBuf};

/// Download every source URL into `dest`, sequentially.
///
/// The local file name is the URL's final path segment. The first failure
/// aborts the stage; there is no retry and no partial continuation.
///
/// # Errors
///
/// Returns `NetworkError` naming the failing URL.
pub async fn fetch_sources(
    client: &NetClient,
    urls: &[String],
    dest: &Path,
) -> Result<Vec<PathBuf>> {
    let mut fetched = Vec::with_capacity(urls.len());
    for url in urls {
        let target = dest.join(file_name_for_url(url));
        tracing::info!(url = %url, "downloading source");
        client.download_file(url, &target).await?;
        fetched.push(target);
    }
    Ok(fetched)
}
