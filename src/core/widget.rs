use crate::core::affordance::{format_total, CommitAffordance};
use crate::core::coordinator::{CommitCoordinator, CommitReport, CommitState};
use crate::core::ledger::{LedgerEvent, SelectionLedger, Toggle};
use crate::core::lifecycle::{Liveness, TeardownHandle};
use crate::domain::model::{
    Catalog, CheckedItem, CompanionProduct, FetchStatus, Product, ProductId, Recommendations,
};
use crate::domain::ports::{CartService, RecommendationSource};
use crate::utils::error::{Result, WidgetError};
use rust_decimal::Decimal;
use tokio::sync::{broadcast, watch};

pub const DEFAULT_RECOMMENDATION_LIMIT: usize = 2;
pub const DEFAULT_CURRENCY_SYMBOL: &str = "£";

#[derive(Debug, Clone)]
pub struct WidgetOptions {
    pub recommendation_limit: usize,
    pub currency_symbol: String,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        Self {
            recommendation_limit: DEFAULT_RECOMMENDATION_LIMIT,
            currency_symbol: DEFAULT_CURRENCY_SYMBOL.to_string(),
        }
    }
}

/// What the presentation layer should draw.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetView {
    /// Recommendations not loaded (or the fetch failed): draw nothing.
    Hidden,
    /// Loaded, but there is nothing to recommend: draw the empty frame.
    EmptyFrame,
    Ready(SelectionView),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectionView {
    pub primary: Product,
    pub companions: Vec<CompanionProduct>,
    pub entries: Vec<CheckedItem>,
    pub total: Decimal,
    /// `None` hides the total and the commit button.
    pub total_display: Option<String>,
    pub affordance: CommitAffordance,
}

/// "Frequently bought together" selection widget for one primary product.
pub struct FreqBoughtTogether<R: RecommendationSource, C: CartService> {
    primary: Product,
    recommendations: Recommendations,
    ledger: SelectionLedger,
    source: R,
    coordinator: CommitCoordinator<C>,
    options: WidgetOptions,
    liveness: Liveness,
}

impl<R: RecommendationSource, C: CartService> FreqBoughtTogether<R, C> {
    pub fn new(
        primary: Product,
        current_size: &str,
        source: R,
        cart: C,
        options: WidgetOptions,
    ) -> Result<Self> {
        let liveness = Liveness::new();
        let ledger = SelectionLedger::new(primary.id, current_size)?;

        Ok(Self {
            primary,
            recommendations: Recommendations::Pending,
            ledger,
            source,
            coordinator: CommitCoordinator::with_liveness(cart, liveness.clone()),
            options,
            liveness,
        })
    }

    pub fn teardown_handle(&self) -> TeardownHandle {
        self.liveness.handle()
    }

    /// Fetches the companion list. A failed fetch keeps the widget in
    /// `Pending`; a result arriving after teardown is dropped.
    pub async fn load(&mut self) -> FetchStatus {
        let product_id = self.primary.id;
        tracing::debug!(
            "Fetching up to {} recommendations for product {}",
            self.options.recommendation_limit,
            product_id
        );

        let fetched = self
            .source
            .fetch_recommended(product_id, self.options.recommendation_limit)
            .await;

        // 卸載後不得再寫入狀態
        if !self.liveness.is_alive() {
            tracing::debug!(
                "Discarding recommendations for product {} after teardown",
                product_id
            );
            return self.recommendations.status();
        }

        match fetched {
            Ok(products) => self.set_recommendations(products),
            Err(e) => {
                tracing::warn!(
                    "Failed to fetch recommendations for product {}: {}",
                    product_id,
                    e
                );
            }
        }

        self.recommendations.status()
    }

    /// Replaces the companion list wholesale. The primary product is never
    /// offered as its own companion.
    pub fn set_recommendations(&mut self, products: Vec<CompanionProduct>) {
        let primary_id = self.primary.id;
        let companions: Vec<_> = products.into_iter().filter(|p| p.id != primary_id).collect();
        tracing::debug!("Loaded {} companion product(s)", companions.len());
        self.recommendations = Recommendations::Loaded(companions);
    }

    /// Switching to another product starts over; the same product only
    /// refreshes its data.
    pub fn set_primary(&mut self, primary: Product, current_size: &str) -> Result<()> {
        if primary.id == self.primary.id {
            self.primary = primary;
            return Ok(());
        }

        self.ledger.initialize(primary.id, current_size)?;
        tracing::debug!(
            "Primary product changed from {} to {}",
            self.primary.id,
            primary.id
        );
        self.primary = primary;
        self.recommendations = Recommendations::Pending;
        Ok(())
    }

    /// Only products in the current recommendations can be added; anything
    /// already checked can always be unchecked (unless locked).
    pub fn toggle(&mut self, product_id: ProductId) -> Result<Toggle> {
        if !self.ledger.contains(product_id) && !self.recommendations.contains(product_id) {
            return Err(WidgetError::UnknownProduct { product_id });
        }
        self.ledger.toggle(product_id)
    }

    pub fn set_size(&mut self, product_id: ProductId, size: &str) -> Result<()> {
        self.ledger.set_size(product_id, size)
    }

    pub fn total(&self) -> Decimal {
        self.ledger.compute_total(&self.catalog())
    }

    pub fn count(&self) -> usize {
        self.ledger.count()
    }

    pub fn ledger(&self) -> &SelectionLedger {
        &self.ledger
    }

    pub fn fetch_status(&self) -> FetchStatus {
        self.recommendations.status()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.ledger.subscribe()
    }

    pub fn watch_commit(&self) -> watch::Receiver<CommitState> {
        self.coordinator.watch_state()
    }

    pub fn view(&self) -> WidgetView {
        match self.recommendations.status() {
            FetchStatus::Pending => WidgetView::Hidden,
            FetchStatus::Empty => WidgetView::EmptyFrame,
            FetchStatus::Available(_) => {
                let total = self.total();
                WidgetView::Ready(SelectionView {
                    primary: self.primary.clone(),
                    companions: self.recommendations.products().to_vec(),
                    entries: self.ledger.entries().to_vec(),
                    total,
                    total_display: format_total(total, &self.options.currency_symbol),
                    affordance: CommitAffordance::for_count(self.ledger.count()),
                })
            }
        }
    }

    pub async fn commit(&self) -> bool {
        self.commit_detailed().await.succeeded()
    }

    /// Walks a snapshot of the ledger taken when the commit starts.
    pub async fn commit_detailed(&self) -> CommitReport {
        let snapshot = self.ledger.entries().to_vec();
        self.coordinator.commit_detailed(&snapshot).await
    }

    fn catalog(&self) -> Catalog<'_> {
        Catalog::new(&self.primary, self.recommendations.products())
    }
}
