pub mod affordance;
pub mod coordinator;
pub mod ledger;
pub mod lifecycle;
pub mod widget;

pub use crate::domain::model::{
    Catalog, CheckedItem, CompanionProduct, FetchStatus, Product, ProductId, Recommendations,
};
pub use crate::domain::ports::{CartService, RecommendationSource};
pub use crate::utils::error::Result;
