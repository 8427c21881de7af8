//! Decoding of raw page bytes.
//!
//! Saved pages come in whatever charset the site served. A byte order mark
//! wins, then a charset declared in a `<meta>` tag near the top of the
//! document, then UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::{META_CHARSET, META_CONTENT_TYPE_CHARSET};

/// How far into the document a charset declaration is looked for.
const SNIFF_LIMIT: usize = 1024;

/// Pick the encoding for a page.
#[must_use]
pub fn sniff_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LIMIT)]);
    [&*META_CHARSET, &*META_CONTENT_TYPE_CHARSET]
        .iter()
        .filter_map(|pattern| pattern.captures(&head))
        .filter_map(|caps| caps.get(1))
        .find_map(|label| Encoding::for_label(label.as_str().trim().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode page bytes to a UTF-8 string.
///
/// Malformed sequences become U+FFFD; decoding never fails.
///
/// # Examples
///
/// ```
/// use quick_doc::encoding::decode_page;
///
/// let page = b"<meta charset=\"iso-8859-1\"><a href=\"/caf\xE9.pdf\">Caf\xE9</a>";
/// assert!(decode_page(page).contains("Caf\u{e9}"));
/// ```
#[must_use]
pub fn decode_page(bytes: &[u8]) -> String {
    let encoding = sniff_encoding(bytes);
    // `decode` strips a matching BOM and substitutes bad sequences.
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("page had malformed {} sequences", used.name());
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_to_utf8() {
        assert_eq!(sniff_encoding(b"<a href='/a.pdf'>A</a>"), UTF_8);
    }

    #[test]
    fn test_meta_charset() {
        let html = br#"<HEAD><META CHARSET="windows-1252"></HEAD>"#;
        assert_eq!(sniff_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_content_type_charset() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(sniff_encoding(html).name(), "Shift_JIS");
    }

    #[test]
    fn test_unknown_label_falls_back() {
        assert_eq!(sniff_encoding(br#"<meta charset="klingon">"#), UTF_8);
    }

    #[test]
    fn test_bom_wins_over_meta() {
        let mut html = vec![0xFF, 0xFE];
        for unit in "<meta charset=\"iso-8859-1\">\u{e9}".encode_utf16() {
            html.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(sniff_encoding(&html).name(), "UTF-16LE");
        assert!(decode_page(&html).ends_with('\u{e9}'));
    }

    #[test]
    fn test_decode_windows1252_quotes() {
        let html = b"<meta charset=\"windows-1252\"><a>\x93Report\x94</a>";
        assert!(decode_page(html).contains("\u{201C}Report\u{201D}"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let decoded = decode_page(b"<a>Bad \xFF byte</a>");
        assert!(decoded.contains('\u{FFFD}'));
        assert!(decoded.contains("byte"));
    }
}
