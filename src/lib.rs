pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::{CliConfig, Selection};
pub use crate::config::WidgetConfig;

pub use crate::adapters::{HttpCartService, HttpRecommendationSource};
pub use crate::core::{
    coordinator::{CommitCoordinator, CommitOutcome, CommitReport, CommitState},
    ledger::{LedgerEvent, SelectionLedger, Toggle},
    widget::{FreqBoughtTogether, WidgetOptions, WidgetView},
};
pub use crate::domain::model::{CheckedItem, CompanionProduct, FetchStatus, Product, ProductId};
pub use crate::domain::ports::{CartService, RecommendationSource};
pub use crate::utils::error::{Result, WidgetError};
