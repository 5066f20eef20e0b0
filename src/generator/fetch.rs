//! Download an API reference page to disk.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ToolwrightError;
use crate::provider::http::{shared_client, status_to_error};

const FALLBACK_FILE_NAME: &str = "downloaded_file";

/// File name to save `url` under when no output path is given: the last
/// segment of the URL path, or `downloaded_file`.
pub fn default_output_path(url: &str) -> PathBuf {
    let name = reqwest::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty())
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    PathBuf::from(name)
}

/// GET `url` and write the body to `output` (or [`default_output_path`]).
///
/// Returns the path written. Non-2xx responses are errors and nothing is
/// written.
pub async fn fetch_reference(url: &str, output: Option<&Path>) -> Result<PathBuf, ToolwrightError> {
    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_output_path(url));

    let response = shared_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(status_to_error(status.as_u16(), &body));
    }
    let bytes = response.bytes().await?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, &bytes).await?;

    info!(url, path = %path.display(), bytes = bytes.len(), "downloaded reference");
    Ok(path)
}
