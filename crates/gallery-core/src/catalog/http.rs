use std::future::Future;
use std::pin::Pin;

use serde::Deserialize;

use super::{CatalogError, CatalogSource};
use crate::{Page, Record};

/// Default public endpoint of the Art Institute of Chicago artworks API.
pub const DEFAULT_BASE_URL: &str = "https://api.artic.edu/api/v1/artworks";

const DEFAULT_USER_AGENT: &str = concat!("artic-gallery/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Deserialize)]
struct PageBody {
    data: Vec<Record>,
    #[serde(default)]
    pagination: Pagination,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    total: Option<usize>,
}

/// Catalog served over HTTP as `GET <base>?page=<n>`.
pub struct HttpCatalog {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(base_url: impl Into<String>, user_agent: Option<&str>) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }
}

impl CatalogSource for HttpCatalog {
    fn name(&self) -> &str {
        "artic"
    }

    fn fetch_page<'a>(
        &'a self,
        page: u32,
    ) -> Pin<Box<dyn Future<Output = Result<Page, CatalogError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = self
                .client
                .get(&self.base_url)
                .query(&[("page", page)])
                .send()
                .await?;
            decode_page(resp, page).await
        })
    }
}

/// Decode a catalog response body into a [`Page`].
///
/// Non-2xx statuses and bodies that do not match the `data` /
/// `pagination.total` shape are errors.
pub async fn decode_page(resp: reqwest::Response, number: u32) -> Result<Page, CatalogError> {
    let status = resp.status();
    if !status.is_success() {
        return Err(CatalogError::Status(status.as_u16()));
    }
    let bytes = resp.bytes().await?;
    let body: PageBody = serde_json::from_slice(&bytes)?;
    Ok(Page {
        number,
        total: body.pagination.total.unwrap_or(0),
        records: body.data,
        failed: false,
    })
}
