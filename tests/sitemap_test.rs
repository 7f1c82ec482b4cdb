use imgkey_sitemap::catalog::CatalogItem;
use imgkey_sitemap::sitemap::{
    STATIC_PAGES, Site, SitemapType, build_images_sitemap, build_master_sitemap,
    build_robots_txt, build_static_sitemap, current_date, image_entry, inspect_sitemap,
    sitemap_references,
};
use url::Url;

const DATE: &str = "2026-10-16";

fn site() -> Site {
    Site::new(&Url::parse("https://imgkey.lovable.app").unwrap())
}

fn item(content_id: u64, title: Option<&str>, author: Option<&str>) -> CatalogItem {
    CatalogItem {
        content_id,
        title: title.map(str::to_string),
        thumbnail_url: Some(format!("https://cdn.example.com/{content_id}.jpg")),
        author_name: author.map(str::to_string),
    }
}

// ===========================================================================================
// Site Tests
// ===========================================================================================

#[test]
fn test_site_trims_trailing_slash() {
    let site = Site::new(&Url::parse("https://example.com/app/").unwrap());
    assert_eq!(site.base_url(), "https://example.com/app");
    assert_eq!(site.page(""), "https://example.com/app");
    assert_eq!(site.stock_page(7), "https://example.com/app/stock/7");
}

#[test]
fn test_current_date_format() {
    let date = current_date();
    assert_eq!(date.len(), 10);
    assert_eq!(date.as_bytes()[4], b'-');
    assert_eq!(date.as_bytes()[7], b'-');
    assert!(date.chars().filter(|c| *c != '-').all(|c| c.is_ascii_digit()));
}

// ===========================================================================================
// Static sitemap Tests
// ===========================================================================================

#[test]
fn test_static_sitemap_has_four_urls_and_no_image_namespace() {
    let xml = build_static_sitemap(&site(), DATE);
    assert_eq!(xml.matches("<url>").count(), 4);
    assert!(!xml.contains("xmlns:image"));

    let inspection = inspect_sitemap(&xml);
    assert_eq!(inspection.kind, SitemapType::UrlSet);
    assert_eq!(inspection.images, 0);
    assert_eq!(
        inspection.locations,
        vec![
            "https://imgkey.lovable.app",
            "https://imgkey.lovable.app/image-title-keyword",
            "https://imgkey.lovable.app/image-prompt",
            "https://imgkey.lovable.app/image-inspire",
        ]
    );
}

#[test]
fn test_static_sitemap_priorities_and_frequencies() {
    let xml = build_static_sitemap(&site(), DATE);
    assert_eq!(xml.matches("<priority>1</priority>").count(), 1);
    assert_eq!(xml.matches("<priority>0.8</priority>").count(), 3);
    assert_eq!(xml.matches("<changefreq>daily</changefreq>").count(), 1);
    assert_eq!(xml.matches("<changefreq>weekly</changefreq>").count(), 3);
    assert_eq!(xml.matches(&format!("<lastmod>{DATE}</lastmod>")).count(), 4);
    assert_eq!(STATIC_PAGES.len(), 4);
}

// ===========================================================================================
// Images sitemap Tests
// ===========================================================================================

#[test]
fn test_image_entry_defaults_title_and_builds_caption() {
    let item = CatalogItem {
        content_id: 42,
        title: Some(String::new()),
        thumbnail_url: Some("x.jpg".to_string()),
        author_name: Some("Jane".to_string()),
    };
    let entry = image_entry(&site(), &item, DATE);
    let xml = entry.as_str();
    assert!(xml.contains("<loc>https://imgkey.lovable.app/stock/42</loc>"));
    assert!(xml.contains("<image:loc>x.jpg</image:loc>"));
    assert!(xml.contains("<image:title>Stock Image</image:title>"));
    assert!(xml.contains("<image:caption>by Jane</image:caption>"));
    assert!(xml.contains("<changefreq>weekly</changefreq>"));
    assert!(xml.contains("<priority>0.7</priority>"));
}

#[test]
fn test_image_entry_without_author_or_thumbnail() {
    let item = CatalogItem {
        content_id: 5,
        title: None,
        thumbnail_url: None,
        author_name: None,
    };
    let entry = image_entry(&site(), &item, DATE);
    let xml = entry.as_str();
    assert!(xml.contains("<image:loc></image:loc>"));
    assert!(xml.contains("<image:title>Stock Image</image:title>"));
    assert!(!xml.contains("<image:caption>"));
}

#[test]
fn test_images_sitemap_one_entry_per_item_including_duplicates() {
    let items = vec![
        item(1, Some("One"), Some("Ann")),
        item(2, Some("Two & Three"), None),
        item(1, Some("One again"), Some("Ann")),
    ];
    let xml = build_images_sitemap(&site(), &items, DATE);
    assert!(xml.contains("xmlns:image="));

    let inspection = inspect_sitemap(&xml);
    assert_eq!(inspection.kind, SitemapType::UrlSet);
    assert_eq!(inspection.images, 3);
    assert_eq!(
        inspection.locations,
        vec![
            "https://imgkey.lovable.app/stock/1",
            "https://imgkey.lovable.app/stock/2",
            "https://imgkey.lovable.app/stock/1",
        ]
    );
    assert!(xml.contains("<image:title>Two &amp; Three</image:title>"));
}

#[test]
fn test_images_sitemap_empty_item_list() {
    let xml = build_images_sitemap(&site(), &[], DATE);
    let inspection = inspect_sitemap(&xml);
    assert_eq!(inspection.kind, SitemapType::UrlSet);
    assert!(inspection.locations.is_empty());
}

// ===========================================================================================
// Sitemap index Tests
// ===========================================================================================

#[test]
fn test_master_sitemap_references_both_leaf_sitemaps() {
    let xml = build_master_sitemap(&site(), DATE);
    let inspection = inspect_sitemap(&xml);
    assert_eq!(inspection.kind, SitemapType::SitemapIndex);
    assert_eq!(
        inspection.locations,
        vec![
            "https://imgkey.lovable.app/sitemap-static.xml",
            "https://imgkey.lovable.app/sitemap-images.xml",
        ]
    );
    assert_eq!(xml.matches(&format!("<lastmod>{DATE}</lastmod>")).count(), 2);
}

#[test]
fn test_sitemap_references_share_the_date() {
    let references = sitemap_references(&site(), DATE);
    assert_eq!(references.len(), 2);
    assert!(references.iter().all(|r| r.lastmod == DATE));
}

// ===========================================================================================
// robots.txt Tests
// ===========================================================================================

#[test]
fn test_robots_txt() {
    let robots = build_robots_txt(&site());
    assert!(robots.starts_with("User-agent: Rogerbot\n"));
    assert!(robots.contains("User-agent: SemrushBot-SA\nDisallow: /\n"));
    assert!(robots.contains("User-agent: *\nAllow: /\n"));
    assert!(robots.ends_with("Sitemap: https://imgkey.lovable.app/sitemap.xml\n"));
}

// ===========================================================================================
// inspect_sitemap Tests
// ===========================================================================================

#[test]
fn test_inspect_unescapes_locations() {
    let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
   <url>
      <loc>http://www.example.com/page?id=1&amp;category=test</loc>
   </url>
</urlset>"#;
    let inspection = inspect_sitemap(xml);
    assert_eq!(
        inspection.locations,
        vec!["http://www.example.com/page?id=1&category=test"]
    );
}

#[test]
fn test_inspect_ignores_image_locations() {
    let xml = build_images_sitemap(&site(), &[item(9, Some("Nine"), None)], DATE);
    let inspection = inspect_sitemap(&xml);
    assert_eq!(inspection.locations, vec!["https://imgkey.lovable.app/stock/9"]);
    assert_eq!(inspection.images, 1);
}

#[test]
fn test_inspect_unknown_documents() {
    let rss = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"><channel><title>Not a sitemap</title></channel></rss>"#;
    for xml in [rss, "This is not XML at all", "", "   \n\t  ", r#"<?xml version="1.0"?>"#] {
        assert_eq!(inspect_sitemap(xml).kind, SitemapType::Unknown, "input: {xml:?}");
    }
}
