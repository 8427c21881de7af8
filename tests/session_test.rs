#![allow(clippy::expect_used)]

use std::time::Duration;

use quick_doc::download::{DownloadRequest, Downloader};
use quick_doc::record::ExtractionRequest;
use quick_doc::session::{PageSource, Session, StaticPage};
use quick_doc::{Error, ExtractionResponse, Result, Settings};

const PAGE: &str = "https://example.com/investors/";

const HTML: &str = r#"<html><body>
    <header><a href="/brochure.pdf">Brochure</a></header>
    <main>
      <a href="2024/report.pdf" data-size="1048576">Report 2024</a>
      <a href="2023/report.pdf" data-size="1048576">Report 2023</a>
      <a href="2024/report.pdf">Report 2024 again</a>
      <a href="broken/file.pdf">Broken</a>
    </main>
</body></html>"#;

/// Fails any request whose file name starts with `file`.
#[derive(Default)]
struct FlakyDownloader {
    fetched: Vec<String>,
}

impl Downloader for FlakyDownloader {
    async fn download(&mut self, request: &DownloadRequest) -> Result<()> {
        if request.filename.starts_with("file") {
            return Err(Error::Download {
                url: request.url.clone(),
                reason: "404".to_string(),
            });
        }
        self.fetched.push(request.filename.clone());
        Ok(())
    }
}

struct Unreachable;

impl PageSource for Unreachable {
    async fn request_links(&mut self, _: &ExtractionRequest) -> Result<ExtractionResponse> {
        Err(Error::Communication(
            "Could not establish connection. Receiving end does not exist.".to_string(),
        ))
    }
}

struct Silent;

impl PageSource for Silent {
    async fn request_links(&mut self, _: &ExtractionRequest) -> Result<ExtractionResponse> {
        std::future::pending().await
    }
}

#[tokio::test]
async fn extract_summarize_and_download() {
    let mut session = Session::new(Settings::default());
    let found = session
        .extract(&mut StaticPage::new(HTML), PAGE)
        .await
        .expect("extraction");
    assert_eq!(found, 4);

    let summary = session.summary();
    assert_eq!(summary.total, 4);
    assert_eq!(summary.size_text(), "2.0 MB");
    assert_eq!(summary.page_url.as_deref(), Some(PAGE));

    let mut downloader = FlakyDownloader::default();
    let report = session.download(&mut downloader).await;

    assert_eq!(downloader.fetched, ["report.pdf", "report-1.pdf"]);
    assert_eq!(report.requested, 3);
    assert_eq!(report.downloaded, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(
        report.status_message(),
        "Download complete! 2/3 files downloaded. 1 duplicates skipped."
    );
}

#[tokio::test]
async fn communication_error_surfaces_and_clears() {
    let mut session = Session::new(Settings::default());
    session
        .extract(&mut StaticPage::new(HTML), PAGE)
        .await
        .expect("extraction");

    let err = session
        .extract(&mut Unreachable, PAGE)
        .await
        .expect_err("unreachable page");

    assert!(err.to_string().contains("Receiving end does not exist"));
    assert!(session.links().is_empty());
    assert_eq!(session.summary().size_text(), "Unknown");
}

#[tokio::test(start_paused = true)]
async fn silent_page_times_out() {
    let mut session = Session::new(Settings::default()).with_timeout(Duration::from_millis(250));

    let err = session
        .extract(&mut Silent, PAGE)
        .await
        .expect_err("timeout");
    assert!(matches!(err, Error::Timeout(_)));
}

#[tokio::test]
async fn static_page_from_bytes() {
    let bytes = b"<meta charset=\"iso-8859-1\"><main><a href=\"/caf\xE9.pdf\">Caf\xE9</a></main>";
    let mut session = Session::new(Settings::default());
    session
        .extract(&mut StaticPage::from_bytes(bytes), PAGE)
        .await
        .expect("extraction");

    let record = &session.links()[0];
    assert_eq!(record.title, "Caf\u{e9}");
    assert_eq!(record.filename_with_ext, "cafe.pdf");
}
