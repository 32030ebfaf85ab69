use crate::domain::model::{CompanionProduct, ProductId};
use crate::domain::ports::{CartService, RecommendationSource};
use crate::utils::error::{Result, WidgetError};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Builds the shared HTTP client for the shop API.
pub fn build_client(timeout_seconds: Option<u64>) -> Result<Client> {
    let mut builder = Client::builder();
    if let Some(seconds) = timeout_seconds {
        builder = builder.timeout(Duration::from_secs(seconds));
    }
    Ok(builder.build()?)
}

fn parse_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|e| WidgetError::InvalidConfigValueError {
        field: "api.base_url".to_string(),
        value: base_url.to_string(),
        reason: format!("Invalid URL format: {}", e),
    })?;
    if url.cannot_be_a_base() {
        return Err(WidgetError::InvalidConfigValueError {
            field: "api.base_url".to_string(),
            value: base_url.to_string(),
            reason: "URL cannot be used as a base".to_string(),
        });
    }
    Ok(url)
}

fn join_segments(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    // parse_base_url 已確認可作為 base
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// `GET {base}/products/{id}/freq-bought-together?limit={n}`
#[derive(Debug, Clone)]
pub struct HttpRecommendationSource {
    client: Client,
    base_url: Url,
}

impl HttpRecommendationSource {
    pub fn new(client: Client, base_url: &str) -> Result<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
        })
    }

    pub fn endpoint(&self, product_id: ProductId, limit: usize) -> Url {
        let id = product_id.to_string();
        let mut url = join_segments(&self.base_url, &["products", &id, "freq-bought-together"]);
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());
        url
    }
}

#[async_trait]
impl RecommendationSource for HttpRecommendationSource {
    async fn fetch_recommended(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<CompanionProduct>> {
        let url = self.endpoint(product_id, limit);
        tracing::debug!("Making API request to: {}", url);

        let response = self.client.get(url).send().await?;
        tracing::debug!("API response status: {}", response.status());

        let products: Vec<CompanionProduct> = response.error_for_status()?.json().await?;
        Ok(products)
    }
}

/// `POST {base}/users/cart/{id}/{size}/1`, authenticated by the
/// `auth_token` cookie.
#[derive(Debug, Clone)]
pub struct HttpCartService {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpCartService {
    pub fn new(client: Client, base_url: &str, auth_token: Option<String>) -> Result<Self> {
        Ok(Self {
            client,
            base_url: parse_base_url(base_url)?,
            auth_token,
        })
    }

    pub fn endpoint(&self, product_id: ProductId, size: &str) -> Url {
        let id = product_id.to_string();
        join_segments(&self.base_url, &["users", "cart", &id, size, "1"])
    }
}

#[async_trait]
impl CartService for HttpCartService {
    async fn add_to_cart(&self, product_id: ProductId, size: &str) -> Result<bool> {
        let url = self.endpoint(product_id, size);
        tracing::debug!("Making API request to: {}", url);

        let mut request = self.client.post(url);
        if let Some(token) = &self.auth_token {
            request = request.header(COOKIE, format!("auth_token={}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            "Cart service refused product {} (size {}): {} {}",
            product_id,
            size,
            status,
            body
        );
        Ok(false)
    }
}
