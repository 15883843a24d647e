use async_trait::async_trait;
use chrono::Timelike;
use contracts::domain::a001_stock_record::StockRecord;
use contracts::domain::a002_stock_update::StockUpdate;
use contracts::domain::a003_price_update::PriceUpdate;
use contracts::enums::{MarketplaceType, SalesChannel};
use serde_json::json;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use stock_sync::shared::marketplaces::{BatchLimits, CatalogClient, StockTarget};
use stock_sync::usecases::u601_stock_report::StockSource;
use stock_sync::usecases::u604_sync_marketplace::SyncExecutor;
use stock_sync::{SyncError, SyncResult};

struct StaticSource {
    records: Vec<StockRecord>,
    fail: bool,
    fetches: AtomicUsize,
}

impl StaticSource {
    fn new(records: Vec<StockRecord>) -> Self {
        Self {
            records,
            fail: false,
            fetches: AtomicUsize::new(0),
        }
    }

    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(vec![])
        }
    }
}

#[async_trait]
impl StockSource for StaticSource {
    async fn fetch(&self) -> SyncResult<Vec<StockRecord>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(SyncError::Network("connection refused".into()));
        }
        Ok(self.records.clone())
    }
}

struct FakeCatalog {
    channel: SalesChannel,
    identifiers: Vec<String>,
    limits: BatchLimits,
    target: StockTarget,
    fail_prices: bool,
    listed: AtomicUsize,
    stock_batches: Mutex<Vec<Vec<StockUpdate>>>,
    price_batches: Mutex<Vec<Vec<PriceUpdate>>>,
}

impl FakeCatalog {
    fn new(channel: SalesChannel, identifiers: &[&str], stock: usize, price: usize) -> Self {
        Self {
            channel,
            identifiers: identifiers.iter().map(|s| s.to_string()).collect(),
            limits: BatchLimits {
                stock: NonZeroUsize::new(stock).unwrap(),
                price: NonZeroUsize::new(price).unwrap(),
            },
            target: StockTarget::default(),
            fail_prices: false,
            listed: AtomicUsize::new(0),
            stock_batches: Mutex::new(Vec::new()),
            price_batches: Mutex::new(Vec::new()),
        }
    }

    fn stock_batch_sizes(&self) -> Vec<usize> {
        self.stock_batches.lock().unwrap().iter().map(Vec::len).collect()
    }

    fn price_batch_sizes(&self) -> Vec<usize> {
        self.price_batches.lock().unwrap().iter().map(Vec::len).collect()
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::YandexMarket
    }

    fn channel(&self) -> SalesChannel {
        self.channel
    }

    fn limits(&self) -> BatchLimits {
        self.limits
    }

    fn stock_target(&self) -> StockTarget {
        self.target.clone()
    }

    async fn list_identifiers(&self) -> SyncResult<Vec<String>> {
        self.listed.fetch_add(1, Ordering::SeqCst);
        Ok(self.identifiers.clone())
    }

    async fn submit_stocks(&self, batch: &[StockUpdate]) -> SyncResult<serde_json::Value> {
        self.stock_batches.lock().unwrap().push(batch.to_vec());
        Ok(json!({"status": "OK"}))
    }

    async fn submit_prices(&self, batch: &[PriceUpdate]) -> SyncResult<serde_json::Value> {
        if self.fail_prices {
            return Err(SyncError::RateLimit {
                body: "slow down".into(),
            });
        }
        self.price_batches.lock().unwrap().push(batch.to_vec());
        Ok(json!({"status": "OK"}))
    }
}

fn watch(code: &str, quantity: &str, price: &str) -> StockRecord {
    StockRecord::new(code, quantity, price)
}

#[tokio::test]
async fn sync_channel_end_to_end_scenario() {
    let executor = SyncExecutor::new(StaticSource::new(vec![watch(
        "A123",
        ">10",
        "5'990.00 руб.",
    )]));
    let catalog = FakeCatalog::new(SalesChannel::Default, &["A123", "B456"], 100, 1000);

    let report = executor.sync_channel(&catalog).await.unwrap();

    let stocks: Vec<_> = report
        .stocks
        .iter()
        .map(|s| (s.identifier.as_str(), s.quantity))
        .collect();
    assert_eq!(stocks, vec![("A123", 100), ("B456", 0)]);

    let in_stock: Vec<_> = report.in_stock.iter().map(|s| s.identifier.as_str()).collect();
    assert_eq!(in_stock, vec!["A123"]);

    let prices: Vec<_> = report
        .prices
        .iter()
        .map(|p| (p.identifier.as_str(), p.price))
        .collect();
    assert_eq!(prices, vec![("A123", 5990)]);

    assert_eq!(catalog.stock_batches.lock().unwrap().concat(), report.stocks);
    assert_eq!(catalog.price_batches.lock().unwrap().concat(), report.prices);
    assert_eq!((report.stock_batches, report.price_batches), (1, 1));
}

#[tokio::test]
async fn sync_channel_splits_updates_by_marketplace_limits() {
    let records = vec![
        watch("A1", "2", "100.00 руб."),
        watch("A2", "3", "200.00 руб."),
        watch("A3", ">10", "300.00 руб."),
    ];
    let executor = SyncExecutor::new(StaticSource::new(records));
    let catalog = FakeCatalog::new(SalesChannel::Fbs, &["A1", "A2", "A3", "B1", "B2"], 2, 1);

    let report = executor.sync_channel(&catalog).await.unwrap();

    assert_eq!(catalog.stock_batch_sizes(), vec![2, 2, 1]);
    assert_eq!(catalog.price_batch_sizes(), vec![1, 1, 1]);
    assert_eq!(report.stock_batches, 3);
    assert_eq!(report.price_batches, 3);
}

#[tokio::test]
async fn stock_report_is_downloaded_once_per_run() {
    let executor = SyncExecutor::new(StaticSource::new(vec![watch("A1", "5", "10.00")]));
    let fbs = FakeCatalog::new(SalesChannel::Fbs, &["A1"], 10, 10);
    let dbs = FakeCatalog::new(SalesChannel::Dbs, &["A1", "B2"], 10, 10);
    let clients: [&dyn CatalogClient; 2] = [&fbs, &dbs];

    let reports = executor.sync_all(&clients).await.unwrap();

    assert_eq!(executor.source().fetches.load(Ordering::SeqCst), 1);
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].channel, SalesChannel::Fbs);
    assert_eq!(reports[1].channel, SalesChannel::Dbs);
    let dbs_stocks: Vec<_> = reports[1]
        .stocks
        .iter()
        .map(|s| (s.identifier.as_str(), s.quantity))
        .collect();
    assert_eq!(dbs_stocks, vec![("A1", 5), ("B2", 0)]);
}

#[tokio::test]
async fn failure_aborts_run_without_rollback() {
    let executor = SyncExecutor::new(StaticSource::new(vec![watch("A1", "5", "10.00")]));
    let mut fbs = FakeCatalog::new(SalesChannel::Fbs, &["A1", "B2"], 1, 10);
    fbs.fail_prices = true;
    let dbs = FakeCatalog::new(SalesChannel::Dbs, &["A1"], 10, 10);
    let clients: [&dyn CatalogClient; 2] = [&fbs, &dbs];

    let result = executor.sync_all(&clients).await;

    assert!(matches!(result, Err(SyncError::RateLimit { .. })));
    // остатки первого канала уже отправлены и остаются на маркетплейсе
    assert_eq!(fbs.stock_batch_sizes(), vec![1, 1]);
    assert_eq!(dbs.listed.load(Ordering::SeqCst), 0);
    assert!(dbs.stock_batch_sizes().is_empty());
}

#[tokio::test]
async fn stock_target_applies_warehouse_and_timestamp() {
    let executor = SyncExecutor::new(StaticSource::new(vec![watch("A1", "5", "10.00")]));
    let mut catalog = FakeCatalog::new(SalesChannel::Dbs, &["A1", "B2"], 10, 10);
    catalog.target = StockTarget {
        warehouse_id: Some("55".into()),
        timestamped: true,
    };

    let report = executor.sync_channel(&catalog).await.unwrap();

    let first = report.stocks[0].timestamp.expect("timestamp");
    assert_eq!(first.nanosecond(), 0);
    assert!(report
        .stocks
        .iter()
        .all(|s| s.warehouse.as_deref() == Some("55") && s.timestamp == Some(first)));
}

#[tokio::test]
async fn empty_catalog_sends_nothing() {
    let executor = SyncExecutor::new(StaticSource::new(vec![watch("A1", "5", "10.00")]));
    let catalog = FakeCatalog::new(SalesChannel::Default, &[], 10, 10);

    let report = executor.sync_channel(&catalog).await.unwrap();

    assert!(report.stocks.is_empty());
    assert!(report.prices.is_empty());
    assert!(catalog.stock_batch_sizes().is_empty());
    assert!(catalog.price_batch_sizes().is_empty());
}

#[tokio::test]
async fn source_failure_propagates_before_any_submission() {
    let executor = SyncExecutor::new(StaticSource::failing());
    let catalog = FakeCatalog::new(SalesChannel::Default, &["A1"], 10, 10);

    let result = executor.sync_channel(&catalog).await;

    assert!(matches!(result, Err(SyncError::Network(_))));
    assert_eq!(catalog.listed.load(Ordering::SeqCst), 1);
    assert!(catalog.stock_batch_sizes().is_empty());
}
