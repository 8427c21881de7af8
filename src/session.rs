//! Extraction session.
//!
//! A session asks a page source for links, resolves them and keeps the
//! result set for export, summary and downloads. It holds one result set
//! at a time: every extraction, successful or not, replaces the previous
//! one.

use std::time::Duration;

use crate::download::{self, DownloadReport, Downloader};
use crate::error::{Error, Result};
use crate::export;
use crate::record::{normalize_links, ExtractionRequest, ExtractionResponse, LinkRecord, Summary};
use crate::resolver::{resolve, ResolveStats};
use crate::settings::Settings;

/// Default time to wait for a page source.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// The page context links are requested from.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Run an extraction in the page.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Communication`] when the page cannot be reached.
    async fn request_links(&mut self, request: &ExtractionRequest) -> Result<ExtractionResponse>;
}

/// A page already held in memory, e.g. a saved HTML file.
#[derive(Debug, Clone)]
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    #[must_use]
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }

    /// Decode raw bytes first (see [`crate::encoding::decode_page`]).
    #[must_use]
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::new(crate::encoding::decode_page(bytes))
    }
}

impl PageSource for StaticPage {
    async fn request_links(&mut self, request: &ExtractionRequest) -> Result<ExtractionResponse> {
        Ok(crate::extract_links(
            &self.html,
            &request.page_url,
            &request.settings,
        ))
    }
}

/// Holds settings and the current result set.
#[derive(Debug, Clone)]
pub struct Session {
    settings: Settings,
    timeout: Duration,
    links: Vec<LinkRecord>,
}

impl Session {
    #[must_use]
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            timeout: DEFAULT_TIMEOUT,
            links: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Resolved records of the last successful extraction.
    #[must_use]
    pub fn links(&self) -> &[LinkRecord] {
        &self.links
    }

    /// Request links for `page_url` from `source` and resolve them.
    ///
    /// Returns the number of records found.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] when the source does not answer in time
    /// - [`Error::Communication`] when it fails or answers `success: false`
    ///
    /// The result set is cleared in both cases.
    pub async fn extract<S: PageSource>(&mut self, source: &mut S, page_url: &str) -> Result<usize> {
        self.links.clear();

        let request = ExtractionRequest {
            settings: self.settings.clone(),
            page_url: page_url.to_string(),
        };

        let response = match tokio::time::timeout(self.timeout, source.request_links(&request)).await
        {
            Ok(response) => response?,
            Err(_) => {
                tracing::warn!("page source did not answer within {:?}", self.timeout);
                return Err(Error::Timeout(self.timeout));
            }
        };

        let raw = response.into_links()?;
        tracing::debug!("received {} raw links", raw.len());

        self.links = resolve(normalize_links(raw, page_url));
        let stats = ResolveStats::of(&self.links);
        tracing::info!(
            "{} document links found ({} unique)",
            stats.total,
            stats.unique_urls
        );

        Ok(self.links.len())
    }

    /// Overview of the current result set.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.links)
    }

    /// Current result set as CSV.
    #[must_use]
    pub fn export_csv(&self) -> String {
        export::to_csv(&self.links, &self.settings)
    }

    /// Current result set as an HTML snippet.
    #[must_use]
    pub fn export_html(&self) -> String {
        export::to_html_snippet(&self.links, &self.settings)
    }

    /// Download each distinct file of the current result set.
    pub async fn download<D: Downloader>(&self, downloader: &mut D) -> DownloadReport {
        download::download_all(downloader, &self.links).await
    }
}
