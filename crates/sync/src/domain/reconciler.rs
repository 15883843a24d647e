//! Сверка остатков поставщика с каталогом маркетплейса.
//!
//! Список артикулов каталога не изменяется: совпадения отмечаются в рабочем
//! множестве, из которого затем берутся оставшиеся для обнуления.

use crate::shared::error::{SyncError, SyncResult};
use crate::shared::price::parse_price;
use chrono::{DateTime, Utc};
use contracts::domain::a001_stock_record::StockRecord;
use contracts::domain::a002_stock_update::StockUpdate;
use contracts::domain::a003_price_update::{Currency, PriceUpdate};
use std::collections::HashSet;

/// Количество для значения `">10"` в отчёте
pub const MANY_IN_STOCK: u32 = 100;

/// Количество из отчёта поставщика.
///
/// `">10"` означает много и передаётся как 100. `"1"` поставщик ставит на
/// последний экземпляр, такой товар считается отсутствующим.
pub fn normalize_quantity(text: &str) -> SyncResult<u32> {
    match text.trim() {
        ">10" => Ok(MANY_IN_STOCK),
        "1" => Ok(0),
        other => other
            .parse::<u32>()
            .map_err(|e| SyncError::format(format!("quantity {:?}: {}", text, e))),
    }
}

/// Остатки для всех артикулов каталога.
///
/// Сначала идут товары, найденные в отчёте (в порядке отчёта), затем
/// остальные артикулы каталога с нулевым остатком (в порядке каталога).
/// Каждый артикул попадает в результат ровно один раз; строки отчёта с кодами
/// вне каталога отбрасываются.
pub fn reconcile_stock(
    records: &[StockRecord],
    identifiers: &[String],
    warehouse: Option<&str>,
    timestamp: Option<DateTime<Utc>>,
) -> SyncResult<Vec<StockUpdate>> {
    let mut remaining: HashSet<&str> = identifiers.iter().map(String::as_str).collect();
    let mut updates = Vec::with_capacity(remaining.len());

    let update = |identifier: &str, quantity: u32| StockUpdate {
        identifier: identifier.to_string(),
        quantity,
        warehouse: warehouse.map(str::to_string),
        timestamp,
    };

    for record in records {
        if remaining.remove(record.code.as_str()) {
            let quantity = normalize_quantity(&record.quantity_text)?;
            updates.push(update(&record.code, quantity));
        }
    }

    // Добавим недостающее из каталога
    for identifier in identifiers {
        if remaining.remove(identifier.as_str()) {
            updates.push(update(identifier, 0));
        }
    }

    Ok(updates)
}

/// Цены для артикулов, которые есть и в каталоге, и в отчёте.
///
/// Артикулы без строки в отчёте цену не получают: их цена на маркетплейсе
/// остаётся прежней.
pub fn reconcile_price(records: &[StockRecord], identifiers: &[String]) -> SyncResult<Vec<PriceUpdate>> {
    let mut remaining: HashSet<&str> = identifiers.iter().map(String::as_str).collect();
    let mut prices = Vec::new();

    for record in records {
        if remaining.remove(record.code.as_str()) {
            prices.push(PriceUpdate {
                identifier: record.code.clone(),
                price: parse_price(&record.price_text)?,
                currency: Currency::Rub,
            });
        }
    }

    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn quantities(updates: &[StockUpdate]) -> Vec<(&str, u32)> {
        updates
            .iter()
            .map(|u| (u.identifier.as_str(), u.quantity))
            .collect()
    }

    #[test]
    fn test_normalize_quantity() {
        assert_eq!(normalize_quantity(">10").unwrap(), 100);
        assert_eq!(normalize_quantity("1").unwrap(), 0);
        assert_eq!(normalize_quantity("0").unwrap(), 0);
        assert_eq!(normalize_quantity("2").unwrap(), 2);
        assert_eq!(normalize_quantity("10").unwrap(), 10);
        assert_eq!(normalize_quantity(" 7 ").unwrap(), 7);
    }

    #[test]
    fn test_normalize_quantity_rejects_garbage() {
        for text in ["", "много", "-3", "2.5", ">5"] {
            assert!(
                matches!(normalize_quantity(text), Err(SyncError::Format(_))),
                "{:?} should be rejected",
                text
            );
        }
    }

    #[test]
    fn test_reconcile_stock_zero_fills_missing() {
        let records = vec![StockRecord::new("A123", ">10", "5'990.00 руб.")];
        let updates = reconcile_stock(&records, &ids(&["A123", "B456"]), None, None).unwrap();
        assert_eq!(quantities(&updates), vec![("A123", 100), ("B456", 0)]);
    }

    #[test]
    fn test_reconcile_stock_order_matched_then_catalog() {
        let records = vec![
            StockRecord::new("C3", "5", ""),
            StockRecord::new("X9", "8", ""),
            StockRecord::new("A1", "1", ""),
        ];
        let catalog = ids(&["A1", "B2", "C3", "D4"]);
        let updates = reconcile_stock(&records, &catalog, None, None).unwrap();
        assert_eq!(
            quantities(&updates),
            vec![("C3", 5), ("A1", 0), ("B2", 0), ("D4", 0)]
        );
    }

    #[test]
    fn test_reconcile_stock_covers_catalog_exactly_once() {
        let records = vec![
            StockRecord::new("A1", "3", ""),
            StockRecord::new("A1", "9", ""),
            StockRecord::new("Z0", "2", ""),
        ];
        let catalog = ids(&["B2", "A1", "B2"]);
        let updates = reconcile_stock(&records, &catalog, None, None).unwrap();
        assert_eq!(quantities(&updates), vec![("A1", 3), ("B2", 0)]);
    }

    #[test]
    fn test_reconcile_stock_leaves_input_untouched() {
        let records = vec![StockRecord::new("A1", "3", "")];
        let catalog = ids(&["A1", "B2"]);
        let before = catalog.clone();
        reconcile_stock(&records, &catalog, None, None).unwrap();
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_reconcile_stock_sets_warehouse_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2025, 10, 19, 12, 0, 0).unwrap();
        let records = vec![StockRecord::new("A1", "3", "")];
        let updates = reconcile_stock(&records, &ids(&["A1", "B2"]), Some("55"), Some(at)).unwrap();
        assert!(updates
            .iter()
            .all(|u| u.warehouse.as_deref() == Some("55") && u.timestamp == Some(at)));
    }

    #[test]
    fn test_reconcile_stock_bad_quantity_fails_only_when_matched() {
        let records = vec![
            StockRecord::new("A1", "уточняйте", ""),
            StockRecord::new("B2", "4", ""),
        ];
        assert!(reconcile_stock(&records, &ids(&["B2"]), None, None).is_ok());
        assert!(matches!(
            reconcile_stock(&records, &ids(&["A1"]), None, None),
            Err(SyncError::Format(_))
        ));
    }

    #[test]
    fn test_reconcile_stock_is_idempotent() {
        let records = vec![
            StockRecord::new("A1", ">10", ""),
            StockRecord::new("B2", "2", ""),
        ];
        let catalog = ids(&["B2", "C3", "A1"]);
        let first = reconcile_stock(&records, &catalog, None, None).unwrap();
        let second = reconcile_stock(&records, &catalog, None, None).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_reconcile_price_no_zero_fill() {
        let records = vec![
            StockRecord::new("A123", ">10", "5'990.00 руб."),
            StockRecord::new("B456", "3", "12 340.00 руб."),
            StockRecord::new("Z000", "3", "1.00 руб."),
        ];
        let prices = reconcile_price(&records, &ids(&["A123", "B456", "C789"])).unwrap();
        let pairs: Vec<_> = prices
            .iter()
            .map(|p| (p.identifier.as_str(), p.price, p.currency))
            .collect();
        assert_eq!(
            pairs,
            vec![("A123", 5990, Currency::Rub), ("B456", 12340, Currency::Rub)]
        );
    }

    #[test]
    fn test_reconcile_price_one_entry_per_identifier() {
        let records = vec![
            StockRecord::new("A1", "2", "100.00"),
            StockRecord::new("A1", "2", "200.00"),
        ];
        let prices = reconcile_price(&records, &ids(&["A1"])).unwrap();
        assert_eq!(prices.len(), 1);
        assert_eq!(prices[0].price, 100);
    }

    #[test]
    fn test_reconcile_price_missing_price_is_format_error() {
        let records = vec![StockRecord::new("A1", "2", "")];
        assert!(matches!(
            reconcile_price(&records, &ids(&["A1"])),
            Err(SyncError::Format(_))
        ));
        assert!(reconcile_price(&records, &ids(&["B2"])).unwrap().is_empty());
    }

    fn record() -> impl Strategy<Value = StockRecord> {
        (
            "[A-D][0-3]",
            prop::sample::select(vec!["0", "1", "3", "15", ">10"]),
            (1u32..100_000).prop_map(|p| format!("{}.00 руб.", p)),
        )
            .prop_map(|(code, quantity, price)| StockRecord::new(code, quantity, price))
    }

    fn catalog() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec("[A-D][0-3]", 0..24)
    }

    proptest! {
        /// Остатки покрывают каталог ровно один раз, без лишних артикулов
        #[test]
        fn reconcile_stock_matches_catalog_exactly(
            records in prop::collection::vec(record(), 0..24),
            catalog in catalog(),
        ) {
            let updates = reconcile_stock(&records, &catalog, None, None).unwrap();
            let sent: Vec<&str> = updates.iter().map(|u| u.identifier.as_str()).collect();
            let unique: HashSet<&str> = sent.iter().copied().collect();
            let expected: HashSet<&str> = catalog.iter().map(String::as_str).collect();
            prop_assert_eq!(sent.len(), unique.len());
            prop_assert_eq!(unique, expected);
        }

        /// Цены только для артикулов, которые есть и в каталоге, и в отчёте
        #[test]
        fn reconcile_price_within_catalog_and_report(
            records in prop::collection::vec(record(), 0..24),
            catalog in catalog(),
        ) {
            let prices = reconcile_price(&records, &catalog).unwrap();
            let in_catalog: HashSet<&str> = catalog.iter().map(String::as_str).collect();
            let in_report: HashSet<&str> = records.iter().map(|r| r.code.as_str()).collect();
            let sent: HashSet<&str> = prices.iter().map(|p| p.identifier.as_str()).collect();
            prop_assert_eq!(sent.len(), prices.len());
            prop_assert_eq!(sent, in_catalog.intersection(&in_report).copied().collect::<HashSet<_>>());
        }
    }
}
