use crate::catalog::CatalogItem;
use crate::xml::{self, ChangeFrequency, ImageInfo, SitemapReference, UrlEntry};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::fmt;
use url::Url;

pub const STATIC_SITEMAP: &str = "sitemap-static.xml";
pub const IMAGES_SITEMAP: &str = "sitemap-images.xml";
pub const SITEMAP_INDEX: &str = "sitemap.xml";
pub const ROBOTS_TXT: &str = "robots.txt";

const IMAGE_CHANGEFREQ: ChangeFrequency = ChangeFrequency::Weekly;
const IMAGE_PRIORITY: f64 = 0.7;

// region: Structs & Enums
/// A hand-maintained page of the site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaticPage {
    pub path: &'static str,
    pub priority: f64,
    pub changefreq: ChangeFrequency,
}

/// Home page plus the three tool pages, in sitemap order.
pub const STATIC_PAGES: [StaticPage; 4] = [
    StaticPage {
        path: "",
        priority: 1.0,
        changefreq: ChangeFrequency::Daily,
    },
    StaticPage {
        path: "/image-title-keyword",
        priority: 0.8,
        changefreq: ChangeFrequency::Weekly,
    },
    StaticPage {
        path: "/image-prompt",
        priority: 0.8,
        changefreq: ChangeFrequency::Weekly,
    },
    StaticPage {
        path: "/image-inspire",
        priority: 0.8,
        changefreq: ChangeFrequency::Weekly,
    },
];

/// SEO crawlers that are kept out of the whole site.
const BLOCKED_CRAWLERS: [&str; 8] = [
    "Rogerbot",
    "Exabot",
    "MJ12bot",
    "Dotbot",
    "Gigabot",
    "AhrefsBot",
    "SemrushBot",
    "SemrushBot-SA",
];

/// The public site the sitemaps describe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    base_url: String,
}

impl Site {
    pub fn new(base_url: &Url) -> Self {
        Site {
            base_url: base_url.as_str().trim_end_matches('/').to_string(),
        }
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL of `path`; `path` is expected to start with `/` or be empty.
    pub fn page(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Detail page of one stock image.
    pub fn stock_page(&self, content_id: u64) -> String {
        self.page(&format!("/stock/{content_id}"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SitemapType {
    SitemapIndex,
    UrlSet,
    Unknown,
}

impl fmt::Display for SitemapType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// What a rendered document contains, read back from its XML.
#[derive(Debug, Clone, PartialEq)]
pub struct Inspection {
    pub kind: SitemapType,
    pub locations: Vec<String>,
    pub images: usize,
}
// endregion

// region: Assembly
/// Today's date in UTC, formatted for `<lastmod>` (`YYYY-MM-DD`).
pub fn current_date() -> String {
    chrono::Utc::now().format("%Y-%m-%d").to_string()
}

pub fn build_static_sitemap(site: &Site, lastmod: &str) -> String {
    let entries: Vec<UrlEntry> = STATIC_PAGES
        .iter()
        .map(|page| {
            xml::build_url_entry(
                &site.page(page.path),
                lastmod,
                page.changefreq,
                page.priority,
                None,
            )
        })
        .collect();

    xml::build_url_set(&entries, false)
}

/// The `<url>` entry of one catalog item, annotated with its thumbnail.
pub fn image_entry(site: &Site, item: &CatalogItem, lastmod: &str) -> UrlEntry {
    let image = ImageInfo {
        loc: item.thumbnail().to_string(),
        title: item.display_title().to_string(),
        caption: item.caption(),
    };

    xml::build_url_entry(
        &site.stock_page(item.content_id),
        lastmod,
        IMAGE_CHANGEFREQ,
        IMAGE_PRIORITY,
        Some(&image),
    )
}

/// One entry per item, in the order given. Duplicates are not collapsed.
pub fn build_images_sitemap(site: &Site, items: &[CatalogItem], lastmod: &str) -> String {
    let entries: Vec<UrlEntry> = items
        .iter()
        .map(|item| image_entry(site, item, lastmod))
        .collect();

    xml::build_url_set(&entries, true)
}

/// References to the two leaf sitemaps, both stamped with `lastmod`.
pub fn sitemap_references(site: &Site, lastmod: &str) -> Vec<SitemapReference> {
    [STATIC_SITEMAP, IMAGES_SITEMAP]
        .iter()
        .map(|filename| SitemapReference {
            loc: site.page(&format!("/{filename}")),
            lastmod: lastmod.to_string(),
        })
        .collect()
}

pub fn build_master_sitemap(site: &Site, lastmod: &str) -> String {
    xml::build_sitemap_index(&sitemap_references(site, lastmod))
}

/// robots.txt that shuts out SEO crawlers, allows everyone else and points
/// at the sitemap index.
pub fn build_robots_txt(site: &Site) -> String {
    let mut robots = String::new();
    for crawler in BLOCKED_CRAWLERS {
        robots.push_str(&format!("User-agent: {crawler}\n"));
    }
    robots.push_str("Disallow: /\n\nUser-agent: *\nAllow: /\n\n");
    robots.push_str(&format!("Sitemap: {}\n", site.page(&format!("/{SITEMAP_INDEX}"))));
    robots
}
// endregion

// region: Inspection
/// Reads a rendered document back: its root element, every `<loc>` value
/// (unescaped) and the number of `<image:image>` annotations.
///
/// Anything that is not a sitemap, including malformed XML and empty input,
/// is reported as [`SitemapType::Unknown`]. Parsing stops at the first error;
/// what was read up to that point is kept.
pub fn inspect_sitemap(xml: &str) -> Inspection {
    let mut reader = Reader::from_str(xml);
    let mut buf = Vec::new();
    let mut kind = None;
    let mut locations = Vec::new();
    let mut images = 0;
    let mut in_loc = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                let name = e.name();
                if kind.is_none() {
                    kind = Some(match name.as_ref() {
                        b"sitemapindex" => SitemapType::SitemapIndex,
                        b"urlset" => SitemapType::UrlSet,
                        _ => SitemapType::Unknown,
                    });
                }
                match name.as_ref() {
                    b"loc" => in_loc = true,
                    b"image:image" => images += 1,
                    _ => {}
                }
            }
            Ok(Event::Text(e)) if in_loc => {
                if let Ok(loc) = e.unescape() {
                    locations.push(loc.into_owned());
                }
                in_loc = false;
            }
            Ok(Event::End(_)) => in_loc = false,
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    Inspection {
        kind: kind.unwrap_or(SitemapType::Unknown),
        locations,
        images,
    }
}
// endregion
