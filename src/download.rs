//! Download planning and the sequential download driver.
//!
//! One request is issued per distinct normalized URL, in extraction order.
//! Requests run one at a time; a failed download is logged and counted and
//! the rest of the batch carries on.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::record::LinkRecord;
use crate::resolver::unique_by_normalized_url;

/// What the download target does when the file name already exists.
///
/// Existing files are never overwritten, so picking a fresh name is the
/// only action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConflictAction {
    #[default]
    Uniquify,
}

/// A single file to fetch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub url: String,
    pub filename: String,
    pub conflict_action: ConflictAction,
    pub save_as: bool,
}

impl DownloadRequest {
    #[must_use]
    pub fn for_record(record: &LinkRecord) -> Self {
        Self {
            url: record.url.clone(),
            filename: record.filename_with_ext.clone(),
            conflict_action: ConflictAction::Uniquify,
            save_as: false,
        }
    }
}

/// Something that can fetch a file.
#[allow(async_fn_in_trait)]
pub trait Downloader {
    /// Fetch one file.
    ///
    /// # Errors
    ///
    /// Implementations return [`crate::Error::Download`] (or any other
    /// error) when the file could not be fetched.
    async fn download(&mut self, request: &DownloadRequest) -> Result<()>;
}

/// Requests for a resolved batch, one per normalized URL.
#[must_use]
pub fn plan(resolved: &[LinkRecord]) -> Vec<DownloadRequest> {
    unique_by_normalized_url(resolved)
        .iter()
        .map(DownloadRequest::for_record)
        .collect()
}

/// Outcome of a download run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DownloadReport {
    /// Distinct files requested.
    pub requested: usize,
    pub downloaded: usize,
    pub failed: usize,
    /// Rows not downloaded because an earlier row had the same URL.
    pub duplicates_skipped: usize,
}

impl DownloadReport {
    /// Status line shown after a run.
    ///
    /// # Examples
    /// ```
    /// use quick_doc::download::DownloadReport;
    ///
    /// let report = DownloadReport { requested: 3, downloaded: 2, failed: 1, duplicates_skipped: 2 };
    /// assert_eq!(
    ///     report.status_message(),
    ///     "Download complete! 2/3 files downloaded. 2 duplicates skipped."
    /// );
    /// ```
    #[must_use]
    pub fn status_message(&self) -> String {
        let mut message = format!(
            "Download complete! {}/{} files downloaded.",
            self.downloaded, self.requested
        );
        if self.duplicates_skipped > 0 {
            message.push_str(&format!(" {} duplicates skipped.", self.duplicates_skipped));
        }
        message
    }
}

/// Download every distinct file of a resolved batch, one after another.
pub async fn download_all<D: Downloader>(
    downloader: &mut D,
    resolved: &[LinkRecord],
) -> DownloadReport {
    let requests = plan(resolved);
    let mut report = DownloadReport {
        requested: requests.len(),
        duplicates_skipped: resolved.len() - requests.len(),
        ..DownloadReport::default()
    };

    tracing::info!(
        "downloading {} files ({} duplicates skipped)",
        report.requested,
        report.duplicates_skipped
    );

    for request in &requests {
        match downloader.download(request).await {
            Ok(()) => {
                report.downloaded += 1;
                tracing::debug!("downloaded {} as {}", request.url, request.filename);
            }
            Err(e) => {
                report.failed += 1;
                tracing::warn!("failed to download {}: {e}", request.url);
            }
        }
    }

    tracing::info!("{}", report.status_message());
    report
}
