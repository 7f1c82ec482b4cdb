//! Pure builders for sitemaps.org documents.
//!
//! Nothing in here touches the network, the filesystem or the clock. Dates are
//! handed in by the caller, so the same input always renders the same bytes.

use std::fmt;

pub const XML_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const IMAGE_NAMESPACE: &str = "http://www.google.com/schemas/sitemap-image/1.1";

// region: Structs & Enums
/// The `<changefreq>` vocabulary of the sitemaps.org protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        };
        f.write_str(value)
    }
}

/// Image annotation attached to a `<url>` entry.
///
/// An empty `caption` means "no caption"; the `<image:caption>` element is
/// left out entirely in that case.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub loc: String,
    pub title: String,
    pub caption: String,
}

/// A pointer from the sitemap index to one leaf sitemap.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapReference {
    pub loc: String,
    pub lastmod: String,
}

/// One rendered `<url>` block. Only [`build_url_entry`] creates these, so
/// every `UrlEntry` is already escaped and can be embedded as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlEntry(String);

impl UrlEntry {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UrlEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}
// endregion

// region: Functions
/// Escapes the five XML special characters (`&`, `<`, `>`, `"`, `'`).
///
/// Accepts either a `&str` or an `Option<&str>`; `None` renders as the empty
/// string. Apply it once to raw text: escaping an already escaped string
/// escapes the `&` of each entity again.
///
/// # Examples
///
/// ```rust
/// use imgkey_sitemap::xml::escape;
///
/// assert_eq!(escape("Fish & Chips"), "Fish &amp; Chips");
/// assert_eq!(escape(None::<&str>), "");
/// ```
pub fn escape<'a>(text: impl Into<Option<&'a str>>) -> String {
    match text.into() {
        Some(text) if !text.is_empty() => quick_xml::escape::escape(text).into_owned(),
        _ => String::new(),
    }
}

/// Renders a single `<url>` block, optionally annotated with an image.
pub fn build_url_entry(
    loc: &str,
    lastmod: &str,
    changefreq: ChangeFrequency,
    priority: f64,
    image: Option<&ImageInfo>,
) -> UrlEntry {
    let mut entry = format!(
        "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>",
        escape(loc),
        escape(lastmod),
        changefreq,
        priority
    );

    if let Some(image) = image {
        entry.push_str(&format!(
            "\n    <image:image>\n      <image:loc>{}</image:loc>\n      <image:title>{}</image:title>",
            escape(image.loc.as_str()),
            escape(image.title.as_str())
        ));
        if !image.caption.is_empty() {
            entry.push_str(&format!(
                "\n      <image:caption>{}</image:caption>",
                escape(image.caption.as_str())
            ));
        }
        entry.push_str("\n    </image:image>");
    }

    entry.push_str("\n  </url>");
    UrlEntry(entry)
}

/// Wraps rendered entries in a complete `<urlset>` document.
///
/// The `image:` namespace is only declared when `include_image_namespace` is
/// set; entries carrying `<image:image>` blocks need it.
pub fn build_url_set(entries: &[UrlEntry], include_image_namespace: bool) -> String {
    let namespace = if include_image_namespace {
        format!(
            "xmlns=\"{}\"\n        xmlns:image=\"{}\"",
            SITEMAP_NAMESPACE, IMAGE_NAMESPACE
        )
    } else {
        format!("xmlns=\"{}\"", SITEMAP_NAMESPACE)
    };

    let body = entries
        .iter()
        .map(UrlEntry::as_str)
        .collect::<Vec<_>>()
        .join("\n");

    format!("{XML_HEADER}\n<urlset {namespace}>\n{body}\n</urlset>")
}

/// Renders a `<sitemapindex>` document pointing at the given sitemaps.
pub fn build_sitemap_index(references: &[SitemapReference]) -> String {
    let body = references
        .iter()
        .map(|reference| {
            format!(
                "  <sitemap>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n  </sitemap>",
                escape(reference.loc.as_str()),
                escape(reference.lastmod.as_str())
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{XML_HEADER}\n<sitemapindex xmlns=\"{SITEMAP_NAMESPACE}\">\n{body}\n</sitemapindex>")
}
// endregion
