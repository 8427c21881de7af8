//! Extraction settings and their persisted form.
//!
//! `StoredSettings` mirrors the key/value pairs a user edits and that get
//! saved between sessions (comma-separated strings, camelCase keys).
//! `Settings` is the parsed, immutable value every pipeline call takes.
//! Loading and saving only ever touch `StoredSettings`.

use std::fs;
use std::path::Path;

use dom_query::Matcher;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::patterns::extension_pattern;

/// Default accepted file extensions.
pub const DEFAULT_FILE_EXTENSIONS: &str = "pdf,docx,doc,xlsx,xls,pptx,ppt,txt,csv,rtf,odt";

/// Default link selectors.
pub const DEFAULT_LINK_SELECTORS: &str = "a[href],link[href],a[data-href],a[data-download]";

/// Default spreadsheet media prefix.
pub const DEFAULT_MEDIA_PREFIX_XLSX: &str =
    "media | /Sitecore/media files/Y/SiteName/Universal/investors/result-reports-presentation/";

/// Default HTML media prefix.
pub const DEFAULT_MEDIA_PREFIX_HTML: &str =
    "/~/media/Files/Y/SiteName/Universal/investors/result-reports-presentation/";

/// Configuration for a single extraction run.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for the standard settings.
///
/// # Example
///
/// ```rust
/// use quick_doc::Settings;
///
/// let settings = Settings {
///     file_extensions: vec!["pdf".to_string()],
///     make_absolute: false,
///     ..Settings::default()
/// };
/// assert!(settings.inner_content);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Capture a display title for each link.
    ///
    /// Default: `true`
    pub inner_content: bool,

    /// Resolve hrefs against the page URL.
    ///
    /// Default: `true`
    pub make_absolute: bool,

    /// Accepted extensions, lowercase, without dots.
    pub file_extensions: Vec<String>,

    /// CSS selectors tried in order.
    pub link_selectors: Vec<String>,

    /// Prefix for the `media_constant` CSV columns.
    pub media_prefix_xlsx: String,

    /// Prefix for hrefs in the HTML snippet.
    pub media_prefix_html: String,
}

impl Default for Settings {
    fn default() -> Self {
        StoredSettings::default().resolve()
    }
}

impl Settings {
    /// Check that the settings can find anything at all.
    ///
    /// Extraction itself tolerates bad entries (invalid selectors are
    /// skipped); this is for reporting problems to whoever edited them.
    ///
    /// # Errors
    ///
    /// - [`Error::Settings`] when the selector or extension list is empty
    /// - [`Error::InvalidSelector`] for the first selector that does not parse
    pub fn validate(&self) -> Result<()> {
        if self.link_selectors.is_empty() {
            return Err(Error::Settings("no link selectors configured".to_string()));
        }
        if self.file_extensions.is_empty() {
            return Err(Error::Settings("no file extensions configured".to_string()));
        }
        if let Some(bad) = self
            .link_selectors
            .iter()
            .find(|s| Matcher::new(s.as_str()).is_err())
        {
            return Err(Error::InvalidSelector(bad.clone()));
        }
        extension_pattern(&self.file_extensions)?;
        Ok(())
    }
}

/// Settings exactly as persisted.
///
/// Missing keys fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSettings {
    pub inner_content: bool,
    pub make_absolute: bool,
    pub media_prefix_xlsx: String,
    pub media_prefix_html: String,
    /// Comma-separated extension list.
    pub file_extensions: String,
    /// Comma-separated selector list.
    pub link_selectors: String,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            inner_content: true,
            make_absolute: true,
            media_prefix_xlsx: DEFAULT_MEDIA_PREFIX_XLSX.to_string(),
            media_prefix_html: DEFAULT_MEDIA_PREFIX_HTML.to_string(),
            file_extensions: DEFAULT_FILE_EXTENSIONS.to_string(),
            link_selectors: DEFAULT_LINK_SELECTORS.to_string(),
        }
    }
}

impl StoredSettings {
    /// Parse the comma lists into an immutable [`Settings`] value.
    ///
    /// Extensions are trimmed and lowercased, selectors trimmed; empty
    /// entries are dropped from both.
    #[must_use]
    pub fn resolve(&self) -> Settings {
        Settings {
            inner_content: self.inner_content,
            make_absolute: self.make_absolute,
            file_extensions: split_list(&self.file_extensions)
                .map(str::to_lowercase)
                .collect(),
            link_selectors: split_list(&self.link_selectors)
                .map(str::to_string)
                .collect(),
            media_prefix_xlsx: self.media_prefix_xlsx.clone(),
            media_prefix_html: self.media_prefix_html.clone(),
        }
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Load stored settings from a JSON file.
///
/// A missing file yields the defaults; a file that exists but does not
/// parse is an error.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] when the file cannot be read and
/// [`crate::Error::Json`] when it is not valid settings JSON.
pub fn load(path: &Path) -> Result<StoredSettings> {
    if !path.exists() {
        tracing::debug!("no settings at {}, using defaults", path.display());
        return Ok(StoredSettings::default());
    }

    let data = fs::read_to_string(path)?;
    let stored: StoredSettings = serde_json::from_str(&data)?;
    Ok(stored)
}

/// Save stored settings as pretty-printed JSON, creating parent directories.
///
/// # Errors
///
/// Returns [`crate::Error::Io`] on write failure.
pub fn save(path: &Path, stored: &StoredSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(stored)?;
    fs::write(path, json)?;
    tracing::info!("saved settings to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert!(settings.inner_content);
        assert!(settings.make_absolute);
        assert_eq!(settings.file_extensions.len(), 11);
        assert_eq!(settings.file_extensions[0], "pdf");
        assert_eq!(settings.file_extensions[10], "odt");
        assert_eq!(
            settings.link_selectors,
            vec!["a[href]", "link[href]", "a[data-href]", "a[data-download]"]
        );
        assert!(settings.media_prefix_html.starts_with("/~/media/"));
    }

    #[test]
    fn test_resolve_trims_lowercases_and_drops_empties() {
        let stored = StoredSettings {
            file_extensions: " PDF , ,Docx,".to_string(),
            link_selectors: " a[href] ,, .download-link ".to_string(),
            ..StoredSettings::default()
        };

        let settings = stored.resolve();
        assert_eq!(settings.file_extensions, vec!["pdf", "docx"]);
        assert_eq!(settings.link_selectors, vec!["a[href]", ".download-link"]);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let stored: StoredSettings =
            serde_json::from_str(r#"{"innerContent": false, "fileExtensions": "pdf"}"#).unwrap();

        assert!(!stored.inner_content);
        assert!(stored.make_absolute);
        assert_eq!(stored.file_extensions, "pdf");
        assert_eq!(stored.link_selectors, DEFAULT_LINK_SELECTORS);
    }

    #[test]
    fn test_validate() {
        assert!(Settings::default().validate().is_ok());

        let settings = StoredSettings {
            link_selectors: "a[href], a[[".to_string(),
            ..StoredSettings::default()
        }
        .resolve();
        assert!(matches!(settings.validate(), Err(Error::InvalidSelector(s)) if s == "a[["));

        let settings = StoredSettings {
            file_extensions: " , ".to_string(),
            ..StoredSettings::default()
        }
        .resolve();
        assert!(matches!(settings.validate(), Err(Error::Settings(_))));
    }

    #[test]
    fn test_stored_keys_are_camel_case() {
        let json = serde_json::to_string(&StoredSettings::default()).unwrap();
        assert!(json.contains("\"innerContent\""));
        assert!(json.contains("\"mediaPrefixXlsx\""));
        assert!(json.contains("\"linkSelectors\""));
    }
}
