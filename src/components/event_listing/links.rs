use super::fetch::DocumentFetcher;
use crate::config::Config;
use crate::error::{other_error, AppResult, Error};
use scraper::{Html, Selector};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// What one index page says
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexPage {
    /// Event links on the page, in document order
    pub links: Vec<String>,
    /// False once the page carries the termination phrase
    pub has_more: bool,
}

/// Index page numbers 1, 2, 3, … up to an optional limit
#[derive(Debug, Clone)]
pub struct PageNumbers {
    next: u32,
    last: Option<u32>,
}

impl PageNumbers {
    /// Page numbers starting at 1; `None` never runs out
    pub fn new(last: Option<u32>) -> Self {
        Self { next: 1, last }
    }
}

impl Iterator for PageNumbers {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.last.is_some_and(|last| self.next > last) {
            return None;
        }
        let page = self.next;
        self.next = self.next.checked_add(1)?;
        Some(page)
    }
}

/// URL of index page `page`
pub fn index_page_url(base: &str, page: u32) -> String {
    format!("{}/{}", base.trim_end_matches('/'), page)
}

/// Read one index page.
///
/// A page whose paragraphs mention `termination_phrase` ends the listing and
/// is not scanned for links. Otherwise every href that resolves to a URL
/// starting with `events_prefix` is returned, duplicates included.
pub fn scan_index_page(
    body: &str,
    page_url: &str,
    events_prefix: &str,
    termination_phrase: &str,
) -> AppResult<IndexPage> {
    let document = Html::parse_document(body);
    let paragraph = Selector::parse("p").map_err(|e| other_error(&format!("{:?}", e)))?;
    let anchor = Selector::parse("a[href]").map_err(|e| other_error(&format!("{:?}", e)))?;

    let finished = document
        .select(&paragraph)
        .any(|p| p.text().collect::<String>().contains(termination_phrase));
    if finished {
        return Ok(IndexPage {
            links: Vec::new(),
            has_more: false,
        });
    }

    // Relative hrefs are resolved against the page they appear on
    let base = Url::parse(page_url).ok();

    let links = document
        .select(&anchor)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| match base.as_ref().and_then(|base| base.join(href).ok()) {
            Some(resolved) => resolved.to_string(),
            None => href.to_string(),
        })
        .filter(|href| href.starts_with(events_prefix))
        .collect();

    Ok(IndexPage {
        links,
        has_more: true,
    })
}

/// Walk the index pages and collect every event link.
///
/// Stops at the first page carrying the termination phrase. Fetch failures
/// are returned as errors and never taken as the end of the listing.
pub async fn discover_links(
    fetcher: &dyn DocumentFetcher,
    config: &Config,
    cancel: &CancellationToken,
) -> AppResult<Vec<String>> {
    let mut links = Vec::new();

    for page in PageNumbers::new(config.max_index_pages) {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let url = index_page_url(&config.index_base_url, page);
        let body = fetcher.fetch(&url).await?;
        let index = scan_index_page(
            &body,
            &url,
            &config.events_prefix,
            &config.termination_phrase,
        )?;

        if !index.has_more {
            info!("Listing ends at page {}, found {} events", page, links.len());
            return Ok(links);
        }

        for link in &index.links {
            debug!("Event found! {}", link);
        }
        links.extend(index.links);
    }

    warn!(
        "Stopped after {} index pages without reaching the end of the listing",
        config.max_index_pages.unwrap_or(u32::MAX)
    );
    Ok(links)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::fetch_error;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    const BASE: &str = "http://chem.uic.edu/seminars";
    const PREFIX: &str = "http://chem.uic.edu/events/";
    const PHRASE: &str = "no future events";

    /// Serves fixed pages and records every request
    #[derive(Default)]
    struct MockFetcher {
        pages: HashMap<String, String>,
        requests: Mutex<Vec<String>>,
    }

    impl MockFetcher {
        fn with_page(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(url.to_string(), body.to_string());
            self
        }

        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DocumentFetcher for MockFetcher {
        async fn fetch(&self, url: &str) -> AppResult<String> {
            self.requests.lock().unwrap().push(url.to_string());
            self.pages
                .get(url)
                .cloned()
                .ok_or_else(|| fetch_error(url, "connection refused"))
        }
    }

    fn listing(hrefs: &[&str]) -> String {
        let anchors: String = hrefs
            .iter()
            .map(|href| format!(r#"<li><a href="{}">event</a></li>"#, href))
            .collect();
        format!("<html><body><ul>{}</ul></body></html>", anchors)
    }

    const LAST_PAGE: &str =
        "<html><body><p>Sorry, there are no future events.</p></body></html>";

    fn config() -> Config {
        Config::new("cal", "id", "secret")
    }

    #[test]
    fn test_page_numbers() {
        let pages: Vec<u32> = PageNumbers::new(Some(3)).collect();
        assert_eq!(pages, vec![1, 2, 3]);

        let pages: Vec<u32> = PageNumbers::new(None).take(5).collect();
        assert_eq!(pages, vec![1, 2, 3, 4, 5]);

        assert_eq!(PageNumbers::new(Some(0)).next(), None);
    }

    #[test]
    fn test_index_page_url() {
        assert_eq!(index_page_url(BASE, 2), "http://chem.uic.edu/seminars/2");
        assert_eq!(
            index_page_url("http://chem.uic.edu/seminars/", 2),
            "http://chem.uic.edu/seminars/2"
        );
    }

    #[test]
    fn test_scan_filters_and_keeps_order() {
        let body = listing(&[
            "http://chem.uic.edu/events/b/",
            "http://chem.uic.edu/people/",
            "/events/a/",
            "http://chem.uic.edu/events/b/",
            "https://example.com/events/c/",
        ]);

        let page =
            scan_index_page(&body, "http://chem.uic.edu/seminars/1", PREFIX, PHRASE).unwrap();

        assert!(page.has_more);
        assert_eq!(
            page.links,
            vec![
                "http://chem.uic.edu/events/b/",
                "http://chem.uic.edu/events/a/",
                "http://chem.uic.edu/events/b/",
            ]
        );
    }

    #[test]
    fn test_scan_termination_ignores_links() {
        let body = format!(
            "{}<p>Sorry, there are no future events.</p>",
            listing(&["http://chem.uic.edu/events/a/"])
        );

        let page =
            scan_index_page(&body, "http://chem.uic.edu/seminars/4", PREFIX, PHRASE).unwrap();

        assert!(!page.has_more);
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_phrase_outside_paragraph_does_not_terminate() {
        let body = "<html><body><div>no future events</div></body></html>";
        let page = scan_index_page(body, "http://chem.uic.edu/seminars/1", PREFIX, PHRASE).unwrap();
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn test_discovery_stops_at_termination_page() {
        let fetcher = MockFetcher::default()
            .with_page(
                "http://chem.uic.edu/seminars/1",
                &listing(&["http://chem.uic.edu/events/one/", "http://chem.uic.edu/events/two/"]),
            )
            .with_page(
                "http://chem.uic.edu/seminars/2",
                &listing(&["http://chem.uic.edu/events/three/"]),
            )
            .with_page("http://chem.uic.edu/seminars/3", LAST_PAGE)
            .with_page(
                "http://chem.uic.edu/seminars/4",
                &listing(&["http://chem.uic.edu/events/never/"]),
            );

        let links = discover_links(&fetcher, &config(), &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(
            links,
            vec![
                "http://chem.uic.edu/events/one/",
                "http://chem.uic.edu/events/two/",
                "http://chem.uic.edu/events/three/",
            ]
        );
        // Nothing is fetched past the termination page
        assert_eq!(
            fetcher.requests(),
            vec![
                "http://chem.uic.edu/seminars/1",
                "http://chem.uic.edu/seminars/2",
                "http://chem.uic.edu/seminars/3",
            ]
        );
    }

    #[tokio::test]
    async fn test_discovery_empty_listing() {
        let fetcher = MockFetcher::default().with_page("http://chem.uic.edu/seminars/1", LAST_PAGE);

        let links = discover_links(&fetcher, &config(), &CancellationToken::new())
            .await
            .unwrap();

        assert!(links.is_empty());
    }

    #[tokio::test]
    async fn test_discovery_fetch_failure_is_not_termination() {
        // Page 2 is missing, so the fetch fails
        let fetcher = MockFetcher::default().with_page(
            "http://chem.uic.edu/seminars/1",
            &listing(&["http://chem.uic.edu/events/one/"]),
        );

        let result = discover_links(&fetcher, &config(), &CancellationToken::new()).await;

        match result {
            Err(Error::Fetch { url, .. }) => assert_eq!(url, "http://chem.uic.edu/seminars/2"),
            other => panic!("expected fetch error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_discovery_page_limit() {
        let mut config = config();
        config.max_index_pages = Some(2);

        let fetcher = MockFetcher::default()
            .with_page(
                "http://chem.uic.edu/seminars/1",
                &listing(&["http://chem.uic.edu/events/one/"]),
            )
            .with_page(
                "http://chem.uic.edu/seminars/2",
                &listing(&["http://chem.uic.edu/events/two/"]),
            );

        let links = discover_links(&fetcher, &config, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(links.len(), 2);
        assert_eq!(fetcher.requests().len(), 2);
    }

    #[tokio::test]
    async fn test_discovery_cancelled() {
        let fetcher = MockFetcher::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let result = discover_links(&fetcher, &config(), &cancel).await;

        assert!(matches!(result, Err(Error::Cancelled)));
        assert!(fetcher.requests().is_empty());
    }
}
