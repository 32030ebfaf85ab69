use crate::core::lifecycle::Liveness;
use crate::domain::model::{CheckedItem, ProductId};
use crate::domain::ports::CartService;
use crate::utils::error::{CartMutationFailure, FailureReason, WidgetError};
use chrono::{DateTime, Utc};
use tokio::sync::watch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommitState {
    #[default]
    Idle,
    InProgress,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedItem {
    pub product_id: ProductId,
    pub size: String,
}

pub type ItemOutcome = std::result::Result<CommittedItem, CartMutationFailure>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    Completed,
    /// Items applied before the failure stay in the cart.
    Failed(CartMutationFailure),
    /// The owner was torn down mid-walk.
    Abandoned,
}

#[derive(Debug, Clone)]
pub struct CommitReport {
    /// One entry per cart call, in call order.
    pub items: Vec<ItemOutcome>,
    /// Entries passed over because no size was chosen.
    pub skipped: Vec<ProductId>,
    pub outcome: CommitOutcome,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CommitReport {
    pub fn succeeded(&self) -> bool {
        self.outcome == CommitOutcome::Completed
    }

    pub fn committed(&self) -> impl Iterator<Item = &CommittedItem> {
        self.items.iter().filter_map(|item| item.as_ref().ok())
    }

    pub fn failure(&self) -> Option<&CartMutationFailure> {
        match &self.outcome {
            CommitOutcome::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn into_result(self) -> crate::utils::error::Result<Self> {
        match &self.outcome {
            CommitOutcome::Failed(failure) => Err(WidgetError::CartMutation(failure.clone())),
            _ => Ok(self),
        }
    }
}

/// Applies checked items to the cart one at a time, in ledger order, and
/// stops at the first failure. Nothing already applied is rolled back.
pub struct CommitCoordinator<C: CartService> {
    cart: C,
    liveness: Liveness,
    state: watch::Sender<CommitState>,
}

impl<C: CartService> CommitCoordinator<C> {
    pub fn new(cart: C) -> Self {
        Self::with_liveness(cart, Liveness::new())
    }

    pub fn with_liveness(cart: C, liveness: Liveness) -> Self {
        let (state, _) = watch::channel(CommitState::Idle);
        Self {
            cart,
            liveness,
            state,
        }
    }

    pub fn state(&self) -> CommitState {
        *self.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<CommitState> {
        self.state.subscribe()
    }

    pub async fn commit(&self, entries: &[CheckedItem]) -> bool {
        self.commit_detailed(entries).await.succeeded()
    }

    pub async fn commit_detailed(&self, entries: &[CheckedItem]) -> CommitReport {
        let started_at = Utc::now();
        let mut items = Vec::new();
        let mut skipped = Vec::new();

        if !self.liveness.is_alive() {
            return Self::report(items, skipped, CommitOutcome::Abandoned, started_at);
        }

        if self.state() == CommitState::InProgress {
            tracing::warn!("Commit started while another commit is still in progress");
        }
        self.state.send_replace(CommitState::InProgress);
        tracing::info!("Adding {} checked item(s) to cart", entries.len());

        for entry in entries {
            if !entry.is_actionable() {
                tracing::debug!("Skipping product {}: no size chosen", entry.product_id);
                skipped.push(entry.product_id);
                continue;
            }

            if !self.liveness.is_alive() {
                tracing::debug!("Commit abandoned before product {}", entry.product_id);
                return Self::report(items, skipped, CommitOutcome::Abandoned, started_at);
            }

            let outcome = self.apply(entry).await;
            let failure = outcome.as_ref().err().cloned();
            items.push(outcome);

            if !self.liveness.is_alive() {
                return Self::report(items, skipped, CommitOutcome::Abandoned, started_at);
            }

            if let Some(failure) = failure {
                tracing::warn!("{}; aborting remaining items", failure);
                self.state.send_replace(CommitState::Failed);
                return Self::report(items, skipped, CommitOutcome::Failed(failure), started_at);
            }
        }

        tracing::info!("All {} actionable item(s) added to cart", items.len());
        self.state.send_replace(CommitState::Completed);
        Self::report(items, skipped, CommitOutcome::Completed, started_at)
    }

    async fn apply(&self, entry: &CheckedItem) -> ItemOutcome {
        tracing::debug!(
            "Adding product {} (size {}) to cart",
            entry.product_id,
            entry.size
        );

        let reason = match self.cart.add_to_cart(entry.product_id, &entry.size).await {
            Ok(true) => {
                return Ok(CommittedItem {
                    product_id: entry.product_id,
                    size: entry.size.clone(),
                })
            }
            Ok(false) => FailureReason::Rejected,
            Err(e) => FailureReason::Fault(e.to_string()),
        };

        Err(CartMutationFailure {
            product_id: entry.product_id,
            size: entry.size.clone(),
            reason,
        })
    }

    fn report(
        items: Vec<ItemOutcome>,
        skipped: Vec<ProductId>,
        outcome: CommitOutcome,
        started_at: DateTime<Utc>,
    ) -> CommitReport {
        CommitReport {
            items,
            skipped,
            outcome,
            started_at,
            finished_at: Utc::now(),
        }
    }
}
