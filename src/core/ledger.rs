use crate::domain::model::{Catalog, CheckedItem, ProductId};
use crate::utils::error::{Result, WidgetError};
use rust_decimal::Decimal;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 32;

/// Published on every ledger mutation so a view can redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Initialized { primary: ProductId },
    Added { product_id: ProductId },
    Removed { product_id: ProductId },
    SizeChanged { product_id: ProductId, size: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSummary {
    pub total: Decimal,
    /// Checked products that had no catalog price.
    pub missing: Vec<ProductId>,
}

/// Ordered set of checked items, keyed by product id.
///
/// The first entry is always the primary product and is locked. The total
/// price is never stored; it is derived from the entries and a catalog on
/// every call to [`SelectionLedger::compute_total`].
#[derive(Debug)]
pub struct SelectionLedger {
    entries: Vec<CheckedItem>,
    events: broadcast::Sender<LedgerEvent>,
}

impl SelectionLedger {
    pub fn new(primary_id: ProductId, primary_size: &str) -> Result<Self> {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut ledger = Self {
            entries: Vec::new(),
            events,
        };
        ledger.initialize(primary_id, primary_size)?;
        Ok(ledger)
    }

    /// Resets the ledger to the primary product alone. Existing subscribers
    /// keep their receivers.
    pub fn initialize(&mut self, primary_id: ProductId, primary_size: &str) -> Result<()> {
        if primary_size.is_empty() {
            return Err(WidgetError::InvalidSelection {
                product_id: primary_id,
                reason: "primary product needs a size".to_string(),
            });
        }

        self.entries = vec![CheckedItem {
            product_id: primary_id,
            size: primary_size.to_string(),
            locked: true,
        }];
        tracing::debug!("Ledger initialized with primary product {}", primary_id);
        self.publish(LedgerEvent::Initialized {
            primary: primary_id,
        });
        Ok(())
    }

    pub fn toggle(&mut self, product_id: ProductId) -> Result<Toggle> {
        match self.position(product_id) {
            Some(index) if self.entries[index].locked => {
                Err(WidgetError::LockedEntry { product_id })
            }
            Some(index) => {
                self.entries.remove(index);
                tracing::debug!("Product {} unchecked", product_id);
                self.publish(LedgerEvent::Removed { product_id });
                Ok(Toggle::Removed)
            }
            None => {
                self.entries.push(CheckedItem::pending(product_id));
                tracing::debug!("Product {} checked, waiting for a size", product_id);
                self.publish(LedgerEvent::Added { product_id });
                Ok(Toggle::Added)
            }
        }
    }

    pub fn set_size(&mut self, product_id: ProductId, size: &str) -> Result<()> {
        let index = self
            .position(product_id)
            .ok_or_else(|| WidgetError::InvalidSelection {
                product_id,
                reason: "product is not checked".to_string(),
            })?;

        let entry = &mut self.entries[index];
        if entry.locked && size.is_empty() {
            return Err(WidgetError::InvalidSelection {
                product_id,
                reason: "primary product size cannot be cleared".to_string(),
            });
        }

        entry.size = size.to_string();
        tracing::debug!("Product {} size set to '{}'", product_id, size);
        self.publish(LedgerEvent::SizeChanged {
            product_id,
            size: size.to_string(),
        });
        Ok(())
    }

    pub fn compute_total(&self, catalog: &Catalog<'_>) -> Decimal {
        self.price_summary(catalog).total
    }

    pub fn price_summary(&self, catalog: &Catalog<'_>) -> PriceSummary {
        let mut total = Decimal::ZERO;
        let mut missing = Vec::new();

        for entry in self.actionable() {
            match catalog.price_of(entry.product_id) {
                Some(price) => total += price,
                None => {
                    tracing::warn!(
                        "Price lookup miss for checked product {}; counting it as zero",
                        entry.product_id
                    );
                    missing.push(entry.product_id);
                }
            }
        }

        PriceSummary { total, missing }
    }

    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[CheckedItem] {
        &self.entries
    }

    pub fn actionable(&self) -> impl Iterator<Item = &CheckedItem> {
        self.entries.iter().filter(|e| e.is_actionable())
    }

    pub fn get(&self, product_id: ProductId) -> Option<&CheckedItem> {
        self.entries.iter().find(|e| e.product_id == product_id)
    }

    pub fn contains(&self, product_id: ProductId) -> bool {
        self.position(product_id).is_some()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.entries.iter().position(|e| e.product_id == product_id)
    }

    fn publish(&self, event: LedgerEvent) {
        // 沒有訂閱者時送出會失敗，可忽略
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Product;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn test_initialize_requires_primary_size() {
        assert!(matches!(
            SelectionLedger::new(1, ""),
            Err(WidgetError::InvalidSelection { product_id: 1, .. })
        ));
    }

    #[test]
    fn test_toggle_never_duplicates_entries() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();
        let sequence = [2, 3, 2, 2, 3, 4, 3, 2, 4, 4, 2];

        for id in sequence {
            ledger.toggle(id).unwrap();
            let mut ids: Vec<_> = ledger.entries().iter().map(|e| e.product_id).collect();
            let before = ids.len();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), before);
        }
    }

    #[test]
    fn test_toggle_locked_primary_is_rejected() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();

        assert!(matches!(
            ledger.toggle(1),
            Err(WidgetError::LockedEntry { product_id: 1 })
        ));
        assert_eq!(ledger.count(), 1);
    }

    #[test]
    fn test_set_size_preserves_order() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();
        ledger.toggle(2).unwrap();
        ledger.toggle(3).unwrap();

        ledger.set_size(2, "L").unwrap();
        ledger.set_size(1, "S").unwrap();

        let ids: Vec<_> = ledger.entries().iter().map(|e| e.product_id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(ledger.get(2).unwrap().size, "L");
        assert_eq!(ledger.get(1).unwrap().size, "S");
    }

    #[test]
    fn test_set_size_for_unchecked_product_fails_fast() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();

        let result = ledger.set_size(5, "L");

        assert!(matches!(
            result,
            Err(WidgetError::InvalidSelection { product_id: 5, .. })
        ));
        assert!(!ledger.contains(5));
    }

    #[test]
    fn test_primary_size_cannot_be_cleared() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();

        assert!(ledger.set_size(1, "").is_err());
        assert_eq!(ledger.get(1).unwrap().size, "M");
    }

    #[test]
    fn test_empty_size_contributes_nothing() {
        let primary = Product::new(1, dec(2000));
        let companions = vec![Product::new(2, dec(99_999))];
        let catalog = Catalog::new(&primary, &companions);
        let mut ledger = SelectionLedger::new(1, "M").unwrap();

        ledger.toggle(2).unwrap();

        assert_eq!(ledger.compute_total(&catalog), dec(2000));
    }

    #[test]
    fn test_total_is_pure_and_monotonic_for_additions() {
        let primary = Product::new(1, dec(2000));
        let companions = vec![Product::new(2, dec(1500)), Product::new(3, dec(800))];
        let catalog = Catalog::new(&primary, &companions);
        let mut ledger = SelectionLedger::new(1, "M").unwrap();
        ledger.toggle(2).unwrap();
        ledger.toggle(3).unwrap();

        let first = ledger.compute_total(&catalog);
        assert_eq!(first, ledger.compute_total(&catalog));

        ledger.set_size(3, "S").unwrap();
        assert_eq!(ledger.compute_total(&catalog), first + dec(800));
    }

    #[test]
    fn test_price_miss_is_reported_not_fatal() {
        let primary = Product::new(1, dec(2000));
        let catalog = Catalog::new(&primary, &[]);
        let mut ledger = SelectionLedger::new(1, "M").unwrap();
        ledger.toggle(9).unwrap();
        ledger.set_size(9, "L").unwrap();

        let summary = ledger.price_summary(&catalog);

        assert_eq!(summary.total, dec(2000));
        assert_eq!(summary.missing, vec![9]);
    }

    #[test]
    fn test_mutations_publish_events() {
        let mut ledger = SelectionLedger::new(1, "M").unwrap();
        let mut events = ledger.subscribe();

        ledger.toggle(2).unwrap();
        ledger.set_size(2, "XL").unwrap();
        ledger.toggle(2).unwrap();

        assert_eq!(events.try_recv().unwrap(), LedgerEvent::Added { product_id: 2 });
        assert_eq!(
            events.try_recv().unwrap(),
            LedgerEvent::SizeChanged {
                product_id: 2,
                size: "XL".to_string()
            }
        );
        assert_eq!(events.try_recv().unwrap(), LedgerEvent::Removed { product_id: 2 });
        assert!(events.try_recv().is_err());
    }
}
