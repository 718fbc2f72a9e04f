// Catalog access seam; every remote failure is normalized into a single
// displayable error before it reaches a caller

use async_trait::async_trait;

use crate::domain::mapping;
use crate::domain::models::{BookDetail, BookSummary};
use crate::ol_client::OlClient;

/// Query used for the default feed when no search term is active.
pub const DEFAULT_QUERY: &str = "bestseller";

/// User-facing catalog error. Transport and server failures collapse into
/// one message; the distinction is not preserved past this boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct CatalogError(pub String);

pub type CatalogResult<T> = Result<T, CatalogError>;

#[async_trait]
pub trait Catalog: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<BookSummary>>;

    async fn work_detail(&self, work_id: &str) -> CatalogResult<BookDetail>;

    async fn default_books(&self, limit: i64, offset: i64) -> CatalogResult<Vec<BookSummary>> {
        self.search(DEFAULT_QUERY, limit, offset).await
    }
}

pub struct OlCatalog {
    client: OlClient,
}

impl OlCatalog {
    pub fn new(client: OlClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Catalog for OlCatalog {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn search(
        &self,
        query: &str,
        limit: i64,
        offset: i64,
    ) -> CatalogResult<Vec<BookSummary>> {
        match self.client.search(query, limit, offset).await {
            Ok(resp) => Ok(resp.docs.iter().map(mapping::summary_from_doc).collect()),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), %query, offset, "search failed");
                Err(CatalogError(format!("Failed to search books: {}", e)))
            }
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn work_detail(&self, work_id: &str) -> CatalogResult<BookDetail> {
        match self.client.get_work(work_id).await {
            Ok(work) => Ok(mapping::detail_from_work(work_id, &work)),
            Err(e) => {
                tracing::error!(error = %format!("{:?}", e), %work_id, "detail fetch failed");
                Err(CatalogError(format!("Failed to load book details: {}", e)))
            }
        }
    }
}
