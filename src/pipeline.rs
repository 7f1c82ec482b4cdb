//! Runs one sitemap generation: fetch, then static, images and index
//! documents, each written before the next one is built.
//!
//! The run stops at the first fatal error. Files written before that point
//! stay on disk.

use crate::catalog::{CatalogSource, fetch_all_items};
use crate::error::GenerateError;
use crate::options::Cli;
use crate::report::{Document, Summary};
use crate::sitemap::{
    IMAGES_SITEMAP, ROBOTS_TXT, SITEMAP_INDEX, STATIC_PAGES, STATIC_SITEMAP, Site,
    build_images_sitemap, build_master_sitemap, build_robots_txt, build_static_sitemap,
    current_date, inspect_sitemap,
};
use crate::storage::write_document;
use crate::utils;
use console::style;
use reqwest::Client;
use tokio::time::Instant;

struct Steps {
    total: usize,
    quiet: bool,
}

impl Steps {
    fn start(&self, step: usize, message: &str) {
        if !self.quiet {
            println!(
                "\n{} {}",
                style(format!("[{}/{}]", step, self.total)).dim(),
                message
            );
        }
    }

    fn done(&self, message: String) {
        if !self.quiet {
            println!("  {} {}", style("✓").green(), message);
        }
    }
}

/// Writes (or, on a dry run, only measures) one document and describes it.
async fn persist(
    options: &Cli,
    steps: &Steps,
    filename: &str,
    content: &str,
    is_sitemap: bool,
) -> Result<Document, GenerateError> {
    let size = if options.dry_run {
        content.len() as u64
    } else {
        write_document(&options.output_dir, filename, content).await?
    };

    let (kind, urls, images) = if is_sitemap {
        let inspection = inspect_sitemap(content);
        (
            Some(inspection.kind),
            inspection.locations.len(),
            inspection.images,
        )
    } else {
        (None, 0, 0)
    };

    if options.dry_run {
        steps.done(format!("Built: {} ({}, not written)", filename, utils::kb(size)));
    } else {
        steps.done(format!("Written: {} ({})", filename, utils::kb(size)));
    }

    Ok(Document {
        filename: filename.to_string(),
        kind,
        urls,
        images,
        size,
    })
}

/// Runs the whole pipeline with the given options and HTTP client.
///
/// # Errors
///
/// * [`GenerateError::EmptyCatalog`] when no catalog page produced an item.
///   Nothing is written in that case.
/// * [`GenerateError::Io`] when a document cannot be written.
pub async fn generate(options: &Cli, client: &Client) -> Result<Summary, GenerateError> {
    let start_time = Instant::now();
    let site = Site::new(&options.base_url);
    let steps = Steps {
        total: if options.robots { 5 } else { 4 },
        quiet: options.json,
    };

    // Fetch
    steps.start(1, "🔄 Fetch images from the catalog...");
    let source = CatalogSource::from_options(options);
    let fetch = fetch_all_items(client, &source, options.json).await;
    if fetch.items.is_empty() {
        return Err(GenerateError::EmptyCatalog);
    }
    steps.done(format!("Total images fetched: {}", fetch.items.len()));

    let mut documents = Vec::new();

    // Build-Static
    steps.start(2, "📄 Generate static sitemap...");
    let content = build_static_sitemap(&site, &current_date());
    documents.push(persist(options, &steps, STATIC_SITEMAP, &content, true).await?);

    // Build-Images
    steps.start(3, "🖼️  Generate images sitemap...");
    let content = build_images_sitemap(&site, &fetch.items, &current_date());
    documents.push(persist(options, &steps, IMAGES_SITEMAP, &content, true).await?);

    // Build-Index
    steps.start(4, "📑 Generate sitemap index...");
    let content = build_master_sitemap(&site, &current_date());
    documents.push(persist(options, &steps, SITEMAP_INDEX, &content, true).await?);

    if options.robots {
        steps.start(5, "🤖 Generate robots.txt...");
        let content = build_robots_txt(&site);
        documents.push(persist(options, &steps, ROBOTS_TXT, &content, false).await?);
    }

    Ok(Summary {
        site_url: site.base_url().to_string(),
        output_dir: options.output_dir.clone(),
        images: fetch.items.len(),
        static_pages: STATIC_PAGES.len(),
        pages_fetched: fetch.pages_fetched,
        pages_skipped: fetch.pages_skipped,
        rejected_items: fetch.rejected_items,
        total_time: start_time.elapsed(),
        dry_run: options.dry_run,
        documents,
    })
}
