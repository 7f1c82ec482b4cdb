use clap::parser::ValueSource;
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueHint, value_parser};
use serde::Deserialize;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// Default values used throughout the project.
pub mod defaults {
    /// Public address of the site the sitemaps describe.
    pub const BASE_URL: &str = "https://imgkey.lovable.app";

    /// Paginated stock-image catalog endpoint.
    pub const API_URL: &str = "https://st-apis.marwanto606.qzz.io/creator";

    /// Number of catalog pages to walk (about 100 images each).
    pub const TOTAL_PAGES: u32 = 14;

    /// Directory the sitemap files are written to.
    pub const OUTPUT_DIR: &str = "public";

    /// The default user agent header value used for network requests.
    pub const USER_AGENT: &str = concat!(
        "Mozilla/5.0 (compatible; ImgKeySitemap/",
        env!("CARGO_PKG_VERSION"),
        ")"
    );

    /// Config file picked up from the working directory when `--config` is not given.
    pub const CONFIG_FILE: &str = ".imgkey-sitemap.toml";
}

fn expand_path(s: &str) -> Result<PathBuf, String> {
    if s.trim().is_empty() {
        return Err(String::from("Path cannot be empty"));
    }
    Ok(PathBuf::from(shellexpand::tilde(s).as_ref()))
}

fn parse_pages(value: u32) -> Result<u32, String> {
    if (1..=1000).contains(&value) {
        Ok(value)
    } else {
        Err(format!("pages must be between 1 and 1000, got {value}"))
    }
}

fn parse_request_timeout(value: u64) -> Result<u64, String> {
    if (1..=600).contains(&value) {
        Ok(value)
    } else {
        Err(format!(
            "request_timeout must be between 1 and 600 seconds, got {value}"
        ))
    }
}

/// Parses a rate limit like `30/1m` into requests per minute.
///
/// The time part is a positive integer followed by `s`, `m` or `h`. The
/// resulting rate is rounded down and must be at least one request per minute.
///
/// # Examples
///
/// ```rust
/// use imgkey_sitemap::options::parse_rate_limit;
///
/// assert_eq!(parse_rate_limit("60/1s"), Ok(3600));
/// assert_eq!(parse_rate_limit("30/2m"), Ok(15));
/// assert!(parse_rate_limit("1/1h").is_err());
/// ```
pub fn parse_rate_limit(value: &str) -> Result<u32, String> {
    let parts: Vec<&str> = value.split('/').collect();
    if parts.len() != 2 {
        return Err(String::from(
            "Rate limit must be in the format 'requests/time[unit]'",
        ));
    }

    let requests: u64 = parts[0]
        .trim()
        .parse()
        .map_err(|_| String::from("Invalid request count"))?;

    let time = parts[1].trim();
    let Some(unit) = time.chars().last() else {
        return Err(String::from("Time value cannot be empty"));
    };
    let seconds_per_unit: u64 = match unit {
        's' => 1,
        'm' => 60,
        'h' => 3600,
        _ => return Err(String::from("Time unit must be 's', 'm', or 'h'.")),
    };
    let amount: u64 = time[..time.len() - unit.len_utf8()]
        .parse()
        .map_err(|_| String::from("Invalid time value"))?;
    if amount == 0 {
        return Err(String::from("Time value must be greater than 0"));
    }

    let per_minute = requests
        .saturating_mul(60)
        .checked_div(amount.saturating_mul(seconds_per_unit))
        .unwrap_or(0);
    if per_minute < 1 {
        return Err(String::from(
            "Ensure the calculated rate is ≥ 1 per minute.",
        ));
    }
    Ok(u32::try_from(per_minute).unwrap_or(u32::MAX))
}

#[derive(Debug, Parser)]
#[command(version, about, term_width = 80)]
pub struct Cli {
    #[arg(
        long,
        help = "Public base URL of the site the sitemaps describe",
        value_hint = ValueHint::Url,
        default_value = defaults::BASE_URL,
        value_parser = value_parser!(Url)
    )]
    pub base_url: Url,

    #[arg(
        long,
        help = "Catalog endpoint queried with `?search_page=N`",
        value_hint = ValueHint::Url,
        default_value = defaults::API_URL,
        value_parser = value_parser!(Url)
    )]
    pub api_url: Url,

    #[arg(
        short = 'p',
        long,
        help = "Number of catalog pages to fetch",
        default_value_t = defaults::TOTAL_PAGES,
        value_parser = clap::value_parser!(u32).range(1..=1000)
    )]
    pub pages: u32,

    #[arg(
        short = 'o',
        long,
        help = "Directory where the sitemap files are written",
        value_hint = ValueHint::DirPath,
        default_value = defaults::OUTPUT_DIR,
        value_parser = expand_path
    )]
    pub output_dir: PathBuf,

    #[arg(
        short = 't',
        long,
        help = "Timeout (in seconds) for each catalog request. Requests never time out by default.",
        value_parser = clap::value_parser!(u64).range(1..=600)
    )]
    pub request_timeout: Option<u64>,

    #[arg(
        long,
        help = "Custom User-Agent header to be used in requests",
        default_value_t = defaults::USER_AGENT.to_string(),
    )]
    pub user_agent: String,

    #[arg(
        long,
        help = "Pace catalog requests, e.g. '30/1m' for 30 requests per minute. Units: s, m, h.",
        value_parser = parse_rate_limit,
    )]
    pub rate_limit: Option<u32>,

    #[arg(long, help = "Also write a robots.txt that advertises the sitemap index")]
    pub robots: bool,

    #[arg(long, help = "Fetch the catalog and build the sitemaps without writing any file")]
    pub dry_run: bool,

    #[arg(long, help = "Print the run summary as JSON on stdout")]
    pub json: bool,

    #[arg(
        long,
        help = "Path to a TOML config file. Defaults to `.imgkey-sitemap.toml` in the working directory.",
        value_hint = ValueHint::FilePath,
        value_parser = expand_path
    )]
    pub config: Option<PathBuf>,
}

/// Values read from a TOML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub base_url: Option<String>,
    pub api_url: Option<String>,
    pub pages: Option<u32>,
    pub output_dir: Option<String>,
    pub request_timeout: Option<u64>,
    pub user_agent: Option<String>,
    pub rate_limit: Option<String>,
    pub robots: Option<bool>,
}

impl ConfigFile {
    /// Loads the config file at `path`, or `.imgkey-sitemap.toml` from the
    /// working directory when no path is given.
    ///
    /// A missing explicit path is an error; a missing default file yields an
    /// empty config.
    pub fn load(path: Option<&Path>) -> Result<ConfigFile, String> {
        let path = match path {
            Some(path) if !path.exists() => {
                return Err(format!("Config file not found: {}", path.display()));
            }
            Some(path) => path.to_path_buf(),
            None => {
                let path = PathBuf::from(defaults::CONFIG_FILE);
                if !path.is_file() {
                    return Ok(ConfigFile::default());
                }
                path
            }
        };

        let content = fs::read_to_string(&path)
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;
        toml::from_str(&content)
            .map_err(|e| format!("Invalid config file {}: {}", path.display(), e))
    }
}

/// Returns true when the argument `id` was given on the command line rather
/// than filled in from its default.
fn given_on_command_line(matches: &ArgMatches, id: &str) -> bool {
    matches.value_source(id) == Some(ValueSource::CommandLine)
}

fn parse_config_url(key: &str, value: &str) -> Result<Url, String> {
    Url::parse(value).map_err(|e| format!("Invalid {key} '{value}' in config file: {e}"))
}

impl Cli {
    /// Parses `args` like [`Parser::try_parse_from`], and also returns the
    /// matches, which record where every value came from.
    pub fn parse_with_matches_from<I, T>(args: I) -> Result<(Cli, ArgMatches), clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = Cli::command().try_get_matches_from(args)?;
        let cli = Cli::from_arg_matches(&matches)?;
        Ok((cli, matches))
    }

    /// Applies config file values to every option that `matches` does not
    /// report as given on the command line.
    pub fn apply_config(&mut self, config: &ConfigFile, matches: &ArgMatches) -> Result<(), String> {
        if let Some(value) = &config.base_url {
            if !given_on_command_line(matches, "base_url") {
                self.base_url = parse_config_url("base_url", value)?;
            }
        }
        if let Some(value) = &config.api_url {
            if !given_on_command_line(matches, "api_url") {
                self.api_url = parse_config_url("api_url", value)?;
            }
        }
        if let Some(value) = config.pages {
            if !given_on_command_line(matches, "pages") {
                self.pages = parse_pages(value)?;
            }
        }
        if let Some(value) = &config.output_dir {
            if !given_on_command_line(matches, "output_dir") {
                self.output_dir = expand_path(value)?;
            }
        }
        if let Some(value) = config.request_timeout {
            if !given_on_command_line(matches, "request_timeout") {
                self.request_timeout = Some(parse_request_timeout(value)?);
            }
        }
        if let Some(value) = &config.user_agent {
            if !given_on_command_line(matches, "user_agent") {
                self.user_agent = value.clone();
            }
        }
        if let Some(value) = &config.rate_limit {
            if !given_on_command_line(matches, "rate_limit") {
                self.rate_limit = Some(parse_rate_limit(value)?);
            }
        }
        if let Some(value) = config.robots {
            if !given_on_command_line(matches, "robots") {
                self.robots = value;
            }
        }
        Ok(())
    }
}
