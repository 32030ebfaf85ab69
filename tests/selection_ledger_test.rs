use companion_cart::core::affordance::{commit_label, CommitAffordance};
use companion_cart::domain::model::Catalog;
use companion_cart::{Product, SelectionLedger, Toggle, WidgetError};
use rust_decimal::Decimal;
use tokio_test::{assert_err, assert_ok};

fn price(units: i64, cents: i64) -> Decimal {
    Decimal::new(units * 100 + cents, 2)
}

fn catalog_fixture() -> (Product, Vec<Product>) {
    let primary = Product::new(1, price(20, 0));
    let companions = vec![Product::new(2, price(15, 0)), Product::new(3, price(9, 99))];
    (primary, companions)
}

#[test]
fn test_primary_pick_scenario() {
    let (primary, companions) = catalog_fixture();
    let catalog = Catalog::new(&primary, &companions);
    let mut ledger = SelectionLedger::new(1, "M").unwrap();

    assert_eq!(ledger.entries().len(), 1);
    assert_eq!(ledger.entries()[0].product_id, 1);
    assert_eq!(ledger.entries()[0].size, "M");
    assert_eq!(ledger.compute_total(&catalog), price(20, 0));

    assert_eq!(ledger.toggle(2).unwrap(), Toggle::Added);
    assert_eq!(ledger.entries()[1].product_id, 2);
    assert_eq!(ledger.entries()[1].size, "");
    assert_eq!(ledger.compute_total(&catalog), price(20, 0));

    assert_ok!(ledger.set_size(2, "L"));
    assert_eq!(ledger.compute_total(&catalog), price(35, 0));

    assert_err!(ledger.toggle(1));
    assert_eq!(ledger.toggle(2).unwrap(), Toggle::Removed);
    assert_eq!(ledger.entries().len(), 1);
    assert_eq!(ledger.compute_total(&catalog), price(20, 0));
}

#[test]
fn test_uniqueness_over_long_toggle_sequences() {
    let mut ledger = SelectionLedger::new(1, "M").unwrap();

    // 偽隨機序列，避免引入額外依賴
    let mut seed: u64 = 42;
    for _ in 0..500 {
        seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let id = 2 + (seed >> 33) as i64 % 4;
        ledger.toggle(id).unwrap();

        let ids: Vec<_> = ledger.entries().iter().map(|e| e.product_id).collect();
        for (i, a) in ids.iter().enumerate() {
            assert!(!ids[i + 1..].contains(a), "duplicate product {} in {:?}", a, ids);
        }
        assert_eq!(ids[0], 1);
    }
}

#[test]
fn test_total_depends_only_on_ledger_and_catalog() {
    let (primary, companions) = catalog_fixture();
    let catalog = Catalog::new(&primary, &companions);
    let mut ledger = SelectionLedger::new(1, "M").unwrap();
    ledger.toggle(2).unwrap();
    ledger.toggle(3).unwrap();
    ledger.set_size(2, "S").unwrap();

    let first = ledger.compute_total(&catalog);
    let second = ledger.compute_total(&catalog);
    assert_eq!(first, second);
    assert_eq!(first, price(35, 0));

    ledger.set_size(3, "XL").unwrap();
    assert_eq!(ledger.compute_total(&catalog), first + price(9, 99));

    // 改尺寸不應重複計價
    ledger.set_size(3, "L").unwrap();
    assert_eq!(ledger.compute_total(&catalog), first + price(9, 99));
}

#[test]
fn test_unsized_entry_never_counts() {
    let primary = Product::new(1, price(20, 0));
    let companions = vec![Product::new(2, price(1_000_000, 0))];
    let catalog = Catalog::new(&primary, &companions);
    let mut ledger = SelectionLedger::new(1, "M").unwrap();
    ledger.toggle(2).unwrap();

    assert_eq!(ledger.compute_total(&catalog), price(20, 0));

    ledger.set_size(2, "L").unwrap();
    ledger.set_size(2, "").unwrap();
    assert_eq!(ledger.compute_total(&catalog), price(20, 0));
}

#[test]
fn test_companion_removed_from_catalog_counts_as_zero() {
    let (primary, companions) = catalog_fixture();
    let mut ledger = SelectionLedger::new(1, "M").unwrap();
    ledger.toggle(2).unwrap();
    ledger.set_size(2, "L").unwrap();

    assert_eq!(
        ledger.compute_total(&Catalog::new(&primary, &companions)),
        price(35, 0)
    );

    let refreshed = vec![companions[1].clone()];
    let summary = ledger.price_summary(&Catalog::new(&primary, &refreshed));
    assert_eq!(summary.total, price(20, 0));
    assert_eq!(summary.missing, vec![2]);
}

#[test]
fn test_set_size_on_unchecked_product_is_invalid_selection() {
    let mut ledger = SelectionLedger::new(1, "M").unwrap();

    let err = ledger.set_size(2, "L").unwrap_err();

    assert!(matches!(err, WidgetError::InvalidSelection { product_id: 2, .. }));
    assert_eq!(ledger.count(), 1);
}

#[test]
fn test_commit_phrasing_follows_count() {
    let mut ledger = SelectionLedger::new(1, "M").unwrap();
    assert_eq!(commit_label(ledger.count()), "Add to bag");

    ledger.toggle(2).unwrap();
    assert_eq!(commit_label(ledger.count()), "Add both to bag");

    ledger.toggle(3).unwrap();
    assert_eq!(
        CommitAffordance::for_count(ledger.count()).default_text,
        "Add all three to bag"
    );
}
