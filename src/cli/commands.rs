//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Page through offset/limit REST collections
#[derive(Parser, Debug)]
#[command(name = "pagewise")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch one page of a paginated endpoint
    Page {
        /// Endpoint URL (relative URLs need `origin` in the config)
        #[arg(long)]
        url: String,

        /// Page to fetch (1-based)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        /// Items per page (defaults to the config value)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Fetch consecutive pages starting from the first
    Walk {
        /// Endpoint URL (relative URLs need `origin` in the config)
        #[arg(long)]
        url: String,

        /// Maximum number of pages to fetch
        #[arg(long, default_value = "3")]
        pages: u32,

        /// Items per page (defaults to the config value)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Paginate a synthetic collection of integers
    Demo {
        /// Collection size
        #[arg(long, default_value = "1337")]
        total: u64,

        /// Items per page
        #[arg(long, default_value = "50")]
        page_size: u32,

        /// Page to show (1-based)
        #[arg(long, default_value = "1", allow_negative_numbers = true)]
        page: i64,

        /// Paginate in memory instead of through the synthetic server
        #[arg(long)]
        client: bool,
    },

    /// Print a human-readable age
    Age {
        /// Birth date (YYYY-MM-DD or YYYY-MM-DDTHH:MM[:SS])
        #[arg(long)]
        birth: String,

        /// Reference date (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one document per line)
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_command() {
        let cli = Cli::try_parse_from([
            "pagewise",
            "page",
            "--url",
            "https://h/p",
            "--page",
            "3",
            "--page-size",
            "20",
        ])
        .unwrap();

        match cli.command {
            Commands::Page {
                url,
                page,
                page_size,
            } => {
                assert_eq!(url, "https://h/p");
                assert_eq!(page, 3);
                assert_eq!(page_size, Some(20));
            }
            other => panic!("Expected Page, got {other:?}"),
        }
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_parse_demo_defaults() {
        let cli = Cli::try_parse_from(["pagewise", "--format", "pretty", "demo"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Pretty);
        match cli.command {
            Commands::Demo {
                total,
                page_size,
                page,
                client,
            } => {
                assert_eq!(total, 1337);
                assert_eq!(page_size, 50);
                assert_eq!(page, 1);
                assert!(!client);
            }
            other => panic!("Expected Demo, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_negative_page() {
        let cli = Cli::try_parse_from(["pagewise", "demo", "--client", "--page", "-5"]).unwrap();
        assert!(matches!(cli.command, Commands::Demo { page: -5, client: true, .. }));
    }
}
