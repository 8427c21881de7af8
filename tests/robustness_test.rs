use quick_doc::url_utils::normalize_url;
use quick_doc::{extract_links, resolve_links, Settings};

const PAGE: &str = "https://example.com/";

fn count(html: &str) -> usize {
    extract_links(html, PAGE, &Settings::default()).links.len()
}

#[test]
fn extract_does_not_panic_on_malformed_html_unclosed_tags() {
    // The parser reopens the unclosed anchor, so `/a.pdf` may appear twice.
    let response = extract_links(
        "<div><a href=\"/a.pdf\">A<div><a href=\"/b.pdf\">B",
        PAGE,
        &Settings::default(),
    );
    let mut urls: Vec<_> = response.links.iter().map(|l| l.url.as_str()).collect();
    urls.sort_unstable();
    urls.dedup();
    assert_eq!(urls, ["https://example.com/a.pdf", "https://example.com/b.pdf"]);
}

#[test]
fn unclosed_tags_without_nesting_yield_each_link_once() {
    assert_eq!(count("<p><a href=\"/a.pdf\">A</a><p><a href=\"/b.pdf\">B</a>"), 2);
}

#[test]
fn extract_does_not_panic_on_broken_attributes() {
    let html = "<a class=\"x href=/a.pdf>A</a><a href='/b.pdf'>B</a>";
    let response = extract_links(html, PAGE, &Settings::default());
    assert!(response.success);
}

#[test]
fn extract_handles_empty_input() {
    let response = extract_links("", PAGE, &Settings::default());
    assert!(response.success);
    assert_eq!(response.total_found, 0);
}

#[test]
fn extract_survives_bad_page_url() {
    let response = extract_links(
        "<main><a href=\"files/a.pdf\">A</a><a href=\"https://cdn.example.org/b.pdf\">B</a></main>",
        "not a url",
        &Settings::default(),
    );

    let urls: Vec<_> = response.links.iter().map(|l| l.url.as_str()).collect();
    assert_eq!(urls, ["files/a.pdf", "https://cdn.example.org/b.pdf"]);

    let records = resolve_links(response.links, "not a url");
    assert_eq!(records[0].url_normalized, "files/a.pdf");
    assert_eq!(records[0].filename_with_ext, "a.pdf");
}

#[test]
fn selectors_that_do_not_parse_are_skipped() {
    let settings = Settings {
        link_selectors: vec![
            ":::".to_string(),
            "a[[[".to_string(),
            "::nope(".to_string(),
            "a[href]".to_string(),
        ],
        ..Settings::default()
    };
    let response = extract_links("<main><a href=\"/a.pdf\">A</a></main>", PAGE, &settings);
    assert_eq!(response.links.len(), 1);
}

#[test]
fn odd_hrefs_degrade_gracefully() {
    let html = r##"<main>
        <a href="   ">blank</a>
        <a href="#section.pdf">anchor</a>
        <a href=" JAVASCRIPT:download('x.pdf')">script</a>
        <a href="mailto:ir@example.com?subject=a.pdf">mail</a>
        <a href="http://[::1/x.pdf">bad host</a>
        <a href="/%FF%FE.pdf">bad bytes</a>
    </main>"##;

    let response = extract_links(html, PAGE, &Settings::default());
    let records = resolve_links(response.links, PAGE);

    for record in &records {
        assert!(!record.filename.is_empty());
        assert!(!record.filename_with_ext.contains('/'));
    }
}

#[test]
fn normalize_url_is_stable_on_many_inputs() {
    let inputs = [
        "https://example.com/a b.pdf",
        "HTTP://EXAMPLE.COM:80/x/./y/../z.pdf",
        "https://user:pw@example.com:8443//a//b/?",
        "file:///C:/docs/report.pdf",
        "../../../up.pdf",
        "https://例え.jp/ファイル.pdf",
    ];

    for input in inputs {
        let once = normalize_url(input, PAGE);
        assert_eq!(normalize_url(&once, PAGE), once, "{input}");
    }
}

#[test]
fn large_page_is_handled() {
    let mut html = String::from("<main>");
    for i in 0..500 {
        html.push_str(&format!("<p><a href=\"/f/{}/doc.pdf\">Doc {i}</a></p>", i % 25));
    }
    html.push_str("</main>");

    let response = extract_links(&html, PAGE, &Settings::default());
    let records = resolve_links(response.links, PAGE);

    assert_eq!(records.len(), 500);
    let unique: std::collections::HashSet<_> =
        records.iter().map(|r| r.filename_with_ext.as_str()).collect();
    assert_eq!(unique.len(), 25);
}
