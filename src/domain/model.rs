use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type ProductId = i64;

/// A product as served by the shop API. Only `id` and `price` matter to the
/// selection logic; everything else is carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub price: Decimal,
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Product {
    pub fn new(id: ProductId, price: Decimal) -> Self {
        Self {
            id,
            price,
            metadata: serde_json::Map::new(),
        }
    }
}

/// A companion ("frequently bought together") product.
pub type CompanionProduct = Product;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckedItem {
    pub product_id: ProductId,
    /// Empty while the shopper has not picked a size yet.
    pub size: String,
    /// Locked entries (the primary product) cannot be toggled off.
    #[serde(default)]
    pub locked: bool,
}

impl CheckedItem {
    pub fn pending(product_id: ProductId) -> Self {
        Self {
            product_id,
            size: String::new(),
            locked: false,
        }
    }

    pub fn is_actionable(&self) -> bool {
        !self.size.is_empty()
    }
}

/// Outcome of the recommendation fetch as seen by the widget. A failed fetch
/// never leaves `Pending`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Recommendations {
    #[default]
    Pending,
    Loaded(Vec<CompanionProduct>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Pending,
    Empty,
    Available(usize),
}

impl Recommendations {
    pub fn status(&self) -> FetchStatus {
        match self {
            Recommendations::Pending => FetchStatus::Pending,
            Recommendations::Loaded(items) if items.is_empty() => FetchStatus::Empty,
            Recommendations::Loaded(items) => FetchStatus::Available(items.len()),
        }
    }

    pub fn products(&self) -> &[CompanionProduct] {
        match self {
            Recommendations::Pending => &[],
            Recommendations::Loaded(items) => items,
        }
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.products().iter().any(|p| p.id == product_id)
    }
}

/// Price lookup view over the primary product and its companions.
#[derive(Debug, Clone, Copy)]
pub struct Catalog<'a> {
    primary: &'a Product,
    companions: &'a [CompanionProduct],
}

impl<'a> Catalog<'a> {
    pub fn new(primary: &'a Product, companions: &'a [CompanionProduct]) -> Self {
        Self {
            primary,
            companions,
        }
    }

    pub fn price_of(&self, product_id: ProductId) -> Option<Decimal> {
        if self.primary.id == product_id {
            return Some(self.primary.price);
        }
        self.companions
            .iter()
            .find(|p| p.id == product_id)
            .map(|p| p.price)
    }
}
