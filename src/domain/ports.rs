use crate::domain::model::{CompanionProduct, ProductId};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Source of "frequently bought together" products for a primary product.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn fetch_recommended(
        &self,
        product_id: ProductId,
        limit: usize,
    ) -> Result<Vec<CompanionProduct>>;
}

/// Adds one unit of a product in a given size to the shopper's cart.
/// `Ok(false)` and `Err(_)` are both failures.
#[async_trait]
pub trait CartService: Send + Sync {
    async fn add_to_cart(&self, product_id: ProductId, size: &str) -> Result<bool>;
}
