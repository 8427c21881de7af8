//! Extract document links from a saved HTML page.
//!
//! Reads a page from a file or stdin, resolves its document links and
//! writes the CSV/HTML exports, the resolved records as JSON, or the
//! download plan as JSON lines.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use quick_doc::download::{DownloadRequest, Downloader};
use quick_doc::session::{Session, StaticPage};
use quick_doc::{logging, settings, Settings};

#[derive(Parser, Debug)]
#[command(name = "quick-doc")]
#[command(about = "Find document links on a web page and plan their download")]
struct Args {
    /// HTML file to read, or `-` for stdin
    #[arg(short = 'i', long = "input", default_value = "-")]
    input: String,

    /// Address the page was loaded from
    #[arg(short = 'u', long = "page-url")]
    page_url: String,

    /// Stored settings JSON (defaults when the file does not exist)
    #[arg(short = 's', long = "settings")]
    settings: Option<PathBuf>,

    /// Write the CSV export here
    #[arg(long = "csv")]
    csv: Option<PathBuf>,

    /// Write the HTML snippet here
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Print the resolved records as JSON
    #[arg(long = "json")]
    json: bool,

    /// Print the download plan, one JSON request per line
    #[arg(long = "plan")]
    plan: bool,

    /// Seconds to wait for extraction
    #[arg(long = "timeout-secs", default_value_t = 10)]
    timeout_secs: u64,

    /// Override the accepted extensions (comma list)
    #[arg(long = "extensions")]
    extensions: Option<String>,

    /// Override the link selectors (comma list)
    #[arg(long = "selectors")]
    selectors: Option<String>,

    /// Do not capture link titles
    #[arg(long = "no-inner-content")]
    no_inner_content: bool,

    /// Keep hrefs as written instead of resolving them
    #[arg(long = "no-absolute")]
    no_absolute: bool,
}

impl Args {
    fn settings(&self) -> Result<Settings, Box<dyn std::error::Error>> {
        let mut stored = match &self.settings {
            Some(path) => settings::load(path)?,
            None => quick_doc::StoredSettings::default(),
        };

        if let Some(extensions) = &self.extensions {
            stored.file_extensions.clone_from(extensions);
        }
        if let Some(selectors) = &self.selectors {
            stored.link_selectors.clone_from(selectors);
        }
        if self.no_inner_content {
            stored.inner_content = false;
        }
        if self.no_absolute {
            stored.make_absolute = false;
        }

        Ok(stored.resolve())
    }

    fn read_input(&self) -> io::Result<Vec<u8>> {
        if self.input == "-" {
            let mut bytes = Vec::new();
            io::stdin().read_to_end(&mut bytes)?;
            Ok(bytes)
        } else {
            fs::read(&self.input)
        }
    }
}

/// Prints each request instead of fetching it.
struct PlanPrinter<W: Write> {
    out: W,
}

impl<W: Write> Downloader for PlanPrinter<W> {
    async fn download(&mut self, request: &DownloadRequest) -> quick_doc::Result<()> {
        let line = serde_json::to_string(request)?;
        writeln!(self.out, "{line}")?;
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();
    let args = Args::parse();

    let settings = args.settings()?;
    if let Err(e) = settings.validate() {
        tracing::warn!("{e}");
    }

    let mut page = StaticPage::from_bytes(&args.read_input()?);
    let mut session =
        Session::new(settings).with_timeout(Duration::from_secs(args.timeout_secs));
    session.extract(&mut page, &args.page_url).await?;

    let summary = session.summary();
    eprintln!(
        "{} document links found, estimated total size {}",
        summary.total,
        summary.size_text()
    );

    if let Some(path) = &args.csv {
        fs::write(path, session.export_csv())?;
        tracing::info!("wrote {}", path.display());
    }
    if let Some(path) = &args.html {
        fs::write(path, session.export_html())?;
        tracing::info!("wrote {}", path.display());
    }
    if args.json {
        println!("{}", serde_json::to_string_pretty(session.links())?);
    }
    if args.plan {
        let mut printer = PlanPrinter { out: io::stdout() };
        let report = session.download(&mut printer).await;
        eprintln!("{}", report.status_message());
    }

    Ok(())
}
