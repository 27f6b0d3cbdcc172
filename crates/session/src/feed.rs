//! Paginated publication feed

use async_trait::async_trait;
use mural_http::types::{Publication, PublicationPage};
use mural_http::{ApiClient, ClientError};
use tracing::debug;

/// Page size used by the mobile feed
pub const DEFAULT_PAGE_SIZE: u32 = 5;

/// Anything that can serve pages of publications
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PublicationSource: Send + Sync {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PublicationPage, ClientError>;
}

#[async_trait]
impl PublicationSource for ApiClient {
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<PublicationPage, ClientError> {
        self.list_publications(page, limit).await
    }
}

/// Accumulates feed pages in order
///
/// Page numbers start at 1. The pager trusts the server's `currentPage` and
/// `totalPages` after each response.
pub struct FeedPager<S> {
    source: S,
    page_size: u32,
    publications: Vec<Publication>,
    current_page: u32,
    total_pages: u32,
}

impl<S: PublicationSource> FeedPager<S> {
    pub fn new(source: S, page_size: u32) -> Self {
        Self {
            source,
            page_size: page_size.max(1),
            publications: Vec::new(),
            current_page: 0,
            total_pages: 1,
        }
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    /// Whether another page is available
    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Reload from the first page, replacing what was loaded
    pub async fn refresh(&mut self) -> Result<&[Publication], ClientError> {
        let page = self.source.fetch_page(1, self.page_size).await?;
        self.publications = page.publications;
        self.track(page.current_page, page.total_pages);
        Ok(&self.publications)
    }

    /// Append the next page; returns how many publications were added
    ///
    /// Returns 0 without a request once the last page has been loaded.
    pub async fn load_more(&mut self) -> Result<usize, ClientError> {
        if !self.has_more() {
            debug!(
                current_page = self.current_page,
                total_pages = self.total_pages,
                "Feed exhausted"
            );
            return Ok(0);
        }

        let next = self.current_page + 1;
        let page = self.source.fetch_page(next, self.page_size).await?;
        let added = page.publications.len();
        self.publications.extend(page.publications);
        self.track(page.current_page, page.total_pages);
        Ok(added)
    }

    fn track(&mut self, current_page: u32, total_pages: u32) {
        self.current_page = current_page;
        self.total_pages = total_pages;
        debug!(
            current_page,
            total_pages,
            loaded = self.publications.len(),
            "Feed page loaded"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::Sequence;
    use mockall::predicate::eq;

    fn page(ids: &[&str], current_page: u32, total_pages: u32) -> PublicationPage {
        PublicationPage {
            publications: ids
                .iter()
                .map(|id| Publication {
                    id: (*id).to_string(),
                    title: format!("title {id}"),
                    description: String::new(),
                    location: "Quito".to_string(),
                    image: None,
                    user: None,
                })
                .collect(),
            current_page,
            total_pages,
        }
    }

    fn ids<S: PublicationSource>(pager: &FeedPager<S>) -> Vec<&str> {
        pager.publications().iter().map(|p| p.id.as_str()).collect()
    }

    #[tokio::test]
    async fn test_pages_append_in_order_until_exhausted() {
        let mut source = MockPublicationSource::new();
        let mut seq = Sequence::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a", "b"], 1, 2)));
        source
            .expect_fetch_page()
            .with(eq(2), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["c"], 2, 2)));

        let mut pager = FeedPager::new(source, DEFAULT_PAGE_SIZE);
        pager.refresh().await.unwrap();
        assert!(pager.has_more());

        assert_eq!(pager.load_more().await.unwrap(), 1);
        assert_eq!(ids(&pager), ["a", "b", "c"]);
        assert!(!pager.has_more());

        // no further request once the last page is in
        assert_eq!(pager.load_more().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_refresh_replaces_loaded_pages() {
        let mut source = MockPublicationSource::new();
        let mut seq = Sequence::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a"], 1, 3)));
        source
            .expect_fetch_page()
            .with(eq(2), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["b"], 2, 3)));
        source
            .expect_fetch_page()
            .with(eq(1), eq(5))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["z"], 1, 3)));

        let mut pager = FeedPager::new(source, DEFAULT_PAGE_SIZE);
        pager.refresh().await.unwrap();
        pager.load_more().await.unwrap();
        assert_eq!(ids(&pager), ["a", "b"]);

        pager.refresh().await.unwrap();
        assert_eq!(ids(&pager), ["z"]);
        assert_eq!(pager.current_page(), 1);
    }

    #[tokio::test]
    async fn test_failed_page_keeps_previous_state() {
        let mut source = MockPublicationSource::new();
        let mut seq = Sequence::new();
        source
            .expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(page(&["a"], 1, 2)));
        source
            .expect_fetch_page()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| {
                Err(ClientError::ServerError {
                    status: 500,
                    message: "boom".to_string(),
                })
            });

        let mut pager = FeedPager::new(source, DEFAULT_PAGE_SIZE);
        pager.refresh().await.unwrap();
        assert!(pager.load_more().await.is_err());

        assert_eq!(ids(&pager), ["a"]);
        assert_eq!(pager.current_page(), 1);
        assert!(pager.has_more());
    }

    #[tokio::test]
    async fn test_empty_feed_has_no_more() {
        let mut source = MockPublicationSource::new();
        source
            .expect_fetch_page()
            .times(1)
            .returning(|_, _| Ok(page(&[], 1, 0)));

        let mut pager = FeedPager::new(source, DEFAULT_PAGE_SIZE);
        assert!(pager.refresh().await.unwrap().is_empty());
        assert!(!pager.has_more());
    }

    #[tokio::test]
    async fn test_first_load_more_fetches_page_one() {
        let mut source = MockPublicationSource::new();
        source
            .expect_fetch_page()
            .with(eq(1), eq(10))
            .times(1)
            .returning(|_, _| Ok(page(&["a"], 1, 1)));

        let mut pager = FeedPager::new(source, 10);
        assert_eq!(pager.load_more().await.unwrap(), 1);
    }
}
