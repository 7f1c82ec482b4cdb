use std::process::ExitCode;

use console::style;
use imgkey_sitemap::{network, options, pipeline};

fn fail(message: impl std::fmt::Display) -> ExitCode {
    eprintln!("{} ❌ {}", style("[ERROR]").red(), message);
    ExitCode::FAILURE
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse terminal arguments, keeping the matches to tell flags from defaults.
    let (mut options, matches) = options::Cli::parse_with_matches_from(std::env::args_os())
        .unwrap_or_else(|e| e.exit());

    // Load config file and apply values (CLI args take priority).
    let config = match options::ConfigFile::load(options.config.as_deref()) {
        Ok(config) => config,
        Err(e) => return fail(e),
    };
    if let Err(e) = options.apply_config(&config, &matches) {
        return fail(e);
    }

    // Build the HTTP client.
    let client = match network::build_client(&options) {
        Ok(client) => client,
        Err(e) => return fail(e),
    };

    if !options.json {
        println!("🚀 Starting sitemap generation...");
    }

    // Fetch the catalog, build and write the sitemaps.
    let summary = match pipeline::generate(&options, &client).await {
        Ok(summary) => summary,
        Err(e) => return fail(e),
    };

    if options.json {
        // Print clean JSON to stdout for piping.
        match summary.to_json_string() {
            Ok(json) => println!("{json}"),
            Err(e) => return fail(e),
        }
    } else {
        summary.show_text_report();
    }

    ExitCode::SUCCESS
}
