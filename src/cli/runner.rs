//! CLI runner - executes commands

use crate::age;
use crate::cache::RequestCache;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::PagewiseConfig;
use crate::error::{Error, Result};
use crate::fetch::{HttpPageFetcher, PageFetcher, RangeSource};
use crate::http::HttpClient;
use crate::pagination::{ClientPaginator, PageNavigator, ServerPaginator};
use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

const DEMO_TARGET: &str = "https://demo.pagewise.invalid/items";

/// Summary of one page, as printed by the CLI
#[derive(Debug, Serialize)]
pub struct PageSummary {
    pub page: u32,
    pub total_pages: Option<u32>,
    pub total_count: Option<u64>,
    pub page_size: usize,
    pub request_key: Option<String>,
    pub items: Vec<JsonValue>,
}

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Page {
                url,
                page,
                page_size,
            } => self.page(&config, url, *page, *page_size).await,
            Commands::Walk {
                url,
                pages,
                page_size,
            } => self.walk(&config, url, *pages, *page_size).await,
            Commands::Demo {
                total,
                page_size,
                page,
                client,
            } => {
                if *client {
                    self.demo_client(*total, *page_size, *page)
                } else {
                    self.demo_server(*total, *page_size, *page).await
                }
            }
            Commands::Age { birth, at } => self.age(birth, at.as_deref()),
        }
    }

    fn load_config(&self) -> Result<PagewiseConfig> {
        match &self.cli.config {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                PagewiseConfig::from_file(path)
            }
            None => Ok(PagewiseConfig::default()),
        }
    }

    fn http_paginator(
        &self,
        config: &PagewiseConfig,
        url: &str,
        page_size: Option<u32>,
    ) -> Result<ServerPaginator<JsonValue, HttpPageFetcher>> {
        let client = HttpClient::with_config(config.http_client_config())?;
        let fetcher = HttpPageFetcher::new(client);
        let page_size = page_size.unwrap_or(config.page_size);

        let paginator = match config.origin_url()? {
            Some(origin) => ServerPaginator::with_origin(&origin, url, page_size, fetcher)?,
            None => ServerPaginator::new(url, page_size, fetcher)?,
        };
        Ok(paginator.with_cache(RequestCache::new(config.cache_config())))
    }

    async fn page(
        &self,
        config: &PagewiseConfig,
        url: &str,
        page: i64,
        page_size: Option<u32>,
    ) -> Result<()> {
        let mut paginator = self.http_paginator(config, url, page_size)?;
        let summary = fetch_page(&mut paginator, page).await?;
        self.emit(&summary)
    }

    async fn walk(
        &self,
        config: &PagewiseConfig,
        url: &str,
        pages: u32,
        page_size: Option<u32>,
    ) -> Result<()> {
        let mut paginator = self.http_paginator(config, url, page_size)?;

        for n in 0..pages {
            if n > 0 && !paginator.go_to_next() {
                info!("Reached the last page after {} pages", n);
                break;
            }
            paginator.load().await.map_err(shared_error)?;
            self.emit(&summarize(&paginator)?)?;
        }
        Ok(())
    }

    async fn demo_server(&self, total: u64, page_size: u32, page: i64) -> Result<()> {
        let mut paginator: ServerPaginator<u64, _> =
            ServerPaginator::new(DEMO_TARGET, page_size, RangeSource::new(total))?;
        let summary = fetch_page(&mut paginator, page).await?;
        debug!(
            "Demo source served {} requests",
            paginator.fetcher().requests()
        );
        self.emit(&summary)
    }

    fn demo_client(&self, total: u64, page_size: u32, page: i64) -> Result<()> {
        let mut paginator = ClientPaginator::with_page_size((0..total).collect(), page_size as usize);
        paginator.go_to(page);

        let summary = PageSummary {
            page: paginator.current_page(),
            total_pages: paginator.total_pages(),
            total_count: Some(total),
            page_size: paginator.current_items().len(),
            request_key: None,
            items: paginator.current_items().iter().map(|n| json!(n)).collect(),
        };
        self.emit(&summary)
    }

    fn age(&self, birth: &str, at: Option<&str>) -> Result<()> {
        let birth = age::parse_moment(birth)?;
        let at = match at {
            Some(at) => age::parse_moment(at)?,
            None => chrono::Local::now().naive_local(),
        };
        let rendered = age::age(birth, at)?;

        match self.cli.format {
            OutputFormat::Json => println!("{}", json!({ "age": rendered })),
            OutputFormat::Pretty => println!("{rendered}"),
        }
        Ok(())
    }

    fn emit(&self, summary: &PageSummary) -> Result<()> {
        match self.cli.format {
            OutputFormat::Json => println!("{}", serde_json::to_string(summary)?),
            OutputFormat::Pretty => {
                let total = summary
                    .total_pages
                    .map_or_else(|| "?".to_string(), |t| t.to_string());
                println!("Page {}/{}", summary.page, total);
                if let Some(count) = summary.total_count {
                    println!("  total items: {count}");
                }
                if let Some(key) = &summary.request_key {
                    println!("  request:     {key}");
                }
                println!("  items ({}):", summary.page_size);
                for item in &summary.items {
                    println!("    {item}");
                }
            }
        }
        Ok(())
    }
}

/// Load the first page, then navigate to `page` and load it
async fn fetch_page<T, F>(paginator: &mut ServerPaginator<T, F>, page: i64) -> Result<PageSummary>
where
    T: Serialize + Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    paginator.load().await.map_err(shared_error)?;

    if page != 1 {
        if !paginator.go_to(page) {
            return Err(Error::invalid_input(format!(
                "page {} is outside 1..={}",
                page,
                paginator.total_pages().unwrap_or(0)
            )));
        }
        paginator.load().await.map_err(shared_error)?;
    }

    summarize(paginator)
}

fn summarize<T: Serialize, F>(paginator: &ServerPaginator<T, F>) -> Result<PageSummary> {
    let items = match paginator.data() {
        Some(page) => page
            .results
            .iter()
            .map(serde_json::to_value)
            .collect::<std::result::Result<Vec<_>, _>>()?,
        None => Vec::new(),
    };

    Ok(PageSummary {
        page: paginator.current_page(),
        total_pages: paginator.total_pages(),
        total_count: paginator.total_count(),
        page_size: paginator.current_page_size().unwrap_or(0),
        request_key: Some(paginator.request_key()),
        items,
    })
}

/// Flatten a shared fetch error for CLI reporting
fn shared_error(e: std::sync::Arc<Error>) -> Error {
    Error::Other(e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_page_from_range_source() {
        let mut paginator: ServerPaginator<u64, _> =
            ServerPaginator::new(DEMO_TARGET, 50, RangeSource::new(1337)).unwrap();

        let summary = fetch_page(&mut paginator, 27).await.unwrap();
        assert_eq!(summary.page, 27);
        assert_eq!(summary.total_pages, Some(27));
        assert_eq!(summary.page_size, 37);
        assert_eq!(summary.items.first(), Some(&json!(1300)));
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> std::result::Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("not representable"))
        }
    }

    #[tokio::test]
    async fn test_summary_reports_serialization_errors() {
        let fetcher = crate::fetch::fetch_fn(|_key: String| async move {
            Ok::<_, Error>(crate::types::PaginatedResponse::new(vec![Unserializable], 1))
        });
        let mut paginator: ServerPaginator<Unserializable, _> =
            ServerPaginator::new(DEMO_TARGET, 10, fetcher).unwrap();

        let err = fetch_page(&mut paginator, 1).await.unwrap_err();
        assert!(matches!(err, Error::JsonParse(_)));
    }

    #[tokio::test]
    async fn test_fetch_page_out_of_range() {
        let mut paginator: ServerPaginator<u64, _> =
            ServerPaginator::new(DEMO_TARGET, 50, RangeSource::new(100)).unwrap();

        let err = fetch_page(&mut paginator, 9).await.unwrap_err();
        assert!(err.to_string().contains("outside 1..=2"));
    }
}
