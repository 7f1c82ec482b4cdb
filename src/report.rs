use crate::error::GenerateError;
use crate::metrics::{Entry, Metrics, TABLE_FORMAT};
use crate::sitemap::{IMAGES_SITEMAP, SITEMAP_INDEX, STATIC_SITEMAP, SitemapType};
use crate::utils;
use console::style;
use prettytable::{Cell, Row, Table};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

/// One document produced by the run.
#[derive(Debug, Clone)]
pub struct Document {
    pub filename: String,
    /// `None` for documents that are not sitemaps (robots.txt).
    pub kind: Option<SitemapType>,
    pub urls: usize,
    pub images: usize,
    /// Size on disk, or the rendered size on a dry run.
    pub size: u64,
}

#[derive(Debug)]
pub struct Summary {
    pub site_url: String,
    pub output_dir: PathBuf,
    pub images: usize,
    pub static_pages: usize,
    pub pages_fetched: u32,
    pub pages_skipped: u32,
    pub rejected_items: usize,
    pub total_time: Duration,
    pub dry_run: bool,
    pub documents: Vec<Document>,
}

impl Summary {
    pub fn total_urls(&self) -> usize {
        self.images + self.static_pages
    }

    fn metrics(&self) -> Metrics {
        Metrics(vec![
            Entry {
                label: "Total images",
                value: self.images.to_string(),
                json_label: "totalImages",
                json_value: json!(self.images),
            },
            Entry {
                label: "Static pages",
                value: self.static_pages.to_string(),
                json_label: "staticPages",
                json_value: json!(self.static_pages),
            },
            Entry {
                label: "Total URLs",
                value: self.total_urls().to_string(),
                json_label: "totalUrls",
                json_value: json!(self.total_urls()),
            },
            Entry {
                label: "Catalog pages",
                value: self.pages_fetched.to_string(),
                json_label: "pagesFetched",
                json_value: json!(self.pages_fetched),
            },
            Entry {
                label: "Skipped pages",
                value: self.pages_skipped.to_string(),
                json_label: "pagesSkipped",
                json_value: json!(self.pages_skipped),
            },
            Entry {
                label: "Rejected items",
                value: self.rejected_items.to_string(),
                json_label: "rejectedItems",
                json_value: json!(self.rejected_items),
            },
            Entry {
                label: "Generation time",
                value: utils::seconds(self.total_time),
                json_label: "elapsedTimeMs",
                json_value: json!(self.total_time.as_millis() as u64),
            },
        ])
    }

    fn documents_table(&self) -> Table {
        let mut table = Table::new();
        table.set_format(*TABLE_FORMAT);
        table.set_titles(Row::new(vec![
            Cell::new("File"),
            Cell::new("Type"),
            Cell::new("URLs"),
            Cell::new("Images"),
            Cell::new("Size"),
        ]));
        for document in &self.documents {
            table.add_row(Row::new(vec![
                Cell::new(&self.output_dir.join(&document.filename).display().to_string()),
                Cell::new(&document.kind.map_or_else(|| "-".to_string(), |k| k.to_string())),
                Cell::new(&document.urls.to_string()),
                Cell::new(&document.images.to_string()),
                Cell::new(&utils::kb(document.size)),
            ]));
        }
        table
    }

    pub fn show_text_report(&self) {
        if self.dry_run {
            println!(
                "\n{}\n",
                style("✅ Sitemap dry run completed, no file was written.").bold()
            );
        } else {
            println!("\n{}\n", style("✅ Sitemap generation completed!").bold());
        }

        println!("{}", style("📊 Summary:").bold());
        println!("{}", self.metrics().build_table());

        if self.dry_run {
            println!("{}", style("📁 Files built:").bold());
        } else {
            println!("{}", style("📁 Files created:").bold());
        }
        println!("{}", self.documents_table());

        println!("{}", style("🌐 Sitemap URLs:").bold());
        for filename in [SITEMAP_INDEX, STATIC_SITEMAP, IMAGES_SITEMAP] {
            println!(
                "  • {}",
                style(format!("{}/{}", self.site_url, filename)).underlined().cyan()
            );
        }
    }

    fn build_json_data(&self) -> serde_json::Value {
        json!(
            {
                "config": {
                    "siteUrl": self.site_url,
                    "outputDir": self.output_dir.display().to_string(),
                    "dryRun": self.dry_run,
                },
                "statistics": self.metrics(),
                "documents": self.documents.iter().map(|d| {
                    json!({
                        "file": d.filename,
                        "path": self.output_dir.join(&d.filename).display().to_string(),
                        "type": d.kind.map(|k| k.to_string()),
                        "urls": d.urls,
                        "images": d.images,
                        "sizeBytes": d.size,
                    })
                }).collect::<Vec<serde_json::Value>>()
            }
        )
    }

    /// Returns the JSON summary as a pretty-printed string.
    pub fn to_json_string(&self) -> Result<String, GenerateError> {
        Ok(serde_json::to_string_pretty(&self.build_json_data())?)
    }
}
