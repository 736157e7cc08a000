//! Command-line and environment configuration.
//!
//! Override order: built-in defaults → `.env` file → environment → CLI
//! flags.  `main` loads `.env` with [`dotenv`] before parsing, so the API key
//! can live there as `NEWS_API_KEY`.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use log::LevelFilter;
use reqwest::Url;

use crate::source::{DEFAULT_API_BASE, DEFAULT_RELAY};

/// Headline categories accepted by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Category {
    Business,
    Entertainment,
    General,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    /// Every category, in the order shown on the tab bar.
    pub const ALL: [Category; 7] = [
        Category::Business,
        Category::Entertainment,
        Category::General,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    /// The API's query value.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::General => "general",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }

    /// Capitalised label for headers and the terminal title.
    pub fn title(self) -> &'static str {
        match self {
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::General => "General",
            Category::Health => "Health",
            Category::Science => "Science",
            Category::Sports => "Sports",
            Category::Technology => "Technology",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// The next category, wrapping around.
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// The previous category, wrapping around.
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Category for a 1-based tab number.
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "livescroll-news",
    about = "Top news headlines in the terminal, with infinite scroll"
)]
pub struct Args {
    /// Two-letter country code
    #[arg(short, long, default_value = "us")]
    pub country: String,

    /// Headline category to open with
    #[arg(short = 'C', long, value_enum, default_value_t = Category::Business)]
    pub category: Category,

    /// Articles requested per page
    #[arg(
        short = 'n',
        long,
        default_value_t = 10,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub page_size: u32,

    /// NewsAPI key
    #[arg(long, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Upstream top-headlines endpoint
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Pass-through relay the request is wrapped in
    #[arg(long, default_value = DEFAULT_RELAY)]
    pub relay: String,

    /// Call the upstream endpoint directly, skipping the relay
    #[arg(long)]
    pub direct: bool,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    pub timeout_secs: u64,

    /// Where to write the log (stdout belongs to the UI)
    #[arg(long, default_value = "livescroll-news.log")]
    pub log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

/// Fully resolved settings.
#[derive(Debug, Clone)]
pub struct Config {
    pub country: String,
    pub category: Category,
    pub page_size: u32,
    pub api_key: String,
    pub api_base: String,
    /// `None` when `--direct` was given.
    pub relay: Option<String>,
    pub timeout: Duration,
    pub log_file: PathBuf,
    pub log_level: LevelFilter,
}

impl Config {
    /// Validate parsed arguments and resolve them into a [`Config`].
    ///
    /// # Errors
    ///
    /// Fails when the API key is missing, the country code is not two ASCII
    /// letters, a URL does not parse, or the timeout is zero.
    pub fn from_args(args: Args) -> Result<Self> {
        let api_key = match args.api_key.map(|k| k.trim().to_string()) {
            Some(k) if !k.is_empty() => k,
            _ => bail!("no API key: set NEWS_API_KEY (or add it to .env) or pass --api-key"),
        };

        let country = args.country.trim().to_ascii_lowercase();
        if country.len() != 2 || !country.chars().all(|c| c.is_ascii_alphabetic()) {
            bail!("country must be a two-letter code, got {:?}", args.country);
        }

        Url::parse(&args.api_base)
            .with_context(|| format!("invalid --api-base {:?}", args.api_base))?;

        let relay = if args.direct {
            None
        } else {
            Url::parse(&args.relay).with_context(|| format!("invalid --relay {:?}", args.relay))?;
            Some(args.relay)
        };

        if args.timeout_secs == 0 {
            bail!("--timeout-secs must be at least 1");
        }

        Ok(Self {
            country,
            category: args.category,
            page_size: args.page_size,
            api_key,
            api_base: args.api_base,
            relay,
            timeout: Duration::from_secs(args.timeout_secs),
            log_file: args.log_file,
            log_level: if args.verbose {
                LevelFilter::Debug
            } else {
                LevelFilter::Info
            },
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["livescroll-news", "--api-key", "secret"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_match_the_headlines_page() {
        let config = Config::from_args(parse(&[])).unwrap();

        assert_eq!(config.country, "us");
        assert_eq!(config.category, Category::Business);
        assert_eq!(config.page_size, 10);
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.relay.as_deref(), Some(DEFAULT_RELAY));
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.log_level, LevelFilter::Info);
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::from_args(parse(&[
            "--country", "GB", "-C", "technology", "-n", "25", "--direct", "--verbose",
        ]))
        .unwrap();

        assert_eq!(config.country, "gb");
        assert_eq!(config.category, Category::Technology);
        assert_eq!(config.page_size, 25);
        assert!(config.relay.is_none());
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn page_size_is_range_checked() {
        let argv = ["livescroll-news", "--api-key", "k", "--page-size", "0"];
        assert!(Args::try_parse_from(argv).is_err());

        let argv = ["livescroll-news", "--api-key", "k", "--page-size", "101"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn unknown_category_is_rejected() {
        let argv = ["livescroll-news", "--api-key", "k", "--category", "weather"];
        assert!(Args::try_parse_from(argv).is_err());
    }

    #[test]
    fn blank_api_key_is_rejected() {
        let mut args = parse(&[]);
        args.api_key = Some("   ".into());
        assert!(Config::from_args(args).is_err());

        let mut args = parse(&[]);
        args.api_key = None;
        assert!(Config::from_args(args).is_err());
    }

    #[test]
    fn bad_country_is_rejected() {
        assert!(Config::from_args(parse(&["--country", "usa"])).is_err());
        assert!(Config::from_args(parse(&["--country", "1x"])).is_err());
    }

    #[test]
    fn bad_urls_and_zero_timeout_are_rejected() {
        assert!(Config::from_args(parse(&["--api-base", "nope"])).is_err());
        assert!(Config::from_args(parse(&["--relay", "::"])).is_err());
        assert!(Config::from_args(parse(&["--timeout-secs", "0"])).is_err());
    }

    #[test]
    fn relay_is_not_validated_when_direct() {
        let config = Config::from_args(parse(&["--relay", "::", "--direct"])).unwrap();
        assert!(config.relay.is_none());
    }

    #[test]
    fn category_cycles_in_both_directions() {
        assert_eq!(Category::Business.next(), Category::Entertainment);
        assert_eq!(Category::Technology.next(), Category::Business);
        assert_eq!(Category::Business.prev(), Category::Technology);

        let mut c = Category::Health;
        for _ in 0..Category::ALL.len() {
            c = c.next();
        }
        assert_eq!(c, Category::Health);
    }

    #[test]
    fn category_from_number_is_one_based() {
        assert_eq!(Category::from_number(1), Some(Category::Business));
        assert_eq!(Category::from_number(7), Some(Category::Technology));
        assert_eq!(Category::from_number(0), None);
        assert_eq!(Category::from_number(8), None);
    }

    #[test]
    fn category_strings() {
        assert_eq!(Category::Sports.to_string(), "sports");
        assert_eq!(Category::Sports.title(), "Sports");
    }
}
