use crate::domain::reconciler::{reconcile_price, reconcile_stock};
use crate::shared::batch::divide;
use crate::shared::error::SyncResult;
use crate::shared::marketplaces::CatalogClient;
use crate::usecases::u601_stock_report::StockSource;
use chrono::{SubsecRound, Utc};
use contracts::domain::a001_stock_record::StockRecord;
use contracts::usecases::u601_sync_stock::SyncReport;
use tokio::sync::OnceCell;

/// Executor для синхронизации остатков и цен с маркетплейсами.
///
/// Отчёт поставщика скачивается один раз за запуск, при первой
/// синхронизации канала, и переиспользуется остальными каналами.
pub struct SyncExecutor<S: StockSource> {
    source: S,
    records: OnceCell<Vec<StockRecord>>,
}

impl<S: StockSource> SyncExecutor<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            records: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    async fn records(&self) -> SyncResult<&[StockRecord]> {
        let records = self
            .records
            .get_or_try_init(|| self.source.fetch())
            .await?;
        Ok(records.as_slice())
    }

    /// Синхронизировать один канал: каталог, отчёт, остатки, цены.
    ///
    /// Ошибка прерывает синхронизацию; уже отправленные пакеты не откатываются.
    pub async fn sync_channel(&self, client: &dyn CatalogClient) -> SyncResult<SyncReport> {
        let marketplace = client.marketplace();
        let channel = client.channel();
        tracing::info!("Starting {} {} sync", marketplace, channel);

        let identifiers = client.list_identifiers().await?;
        tracing::info!(
            "{} {}: {} identifiers in catalog",
            marketplace,
            channel,
            identifiers.len()
        );

        let records = self.records().await?;
        let limits = client.limits();

        // Обновить остатки
        let target = client.stock_target();
        let timestamp = target.timestamped.then(|| Utc::now().trunc_subsecs(0));
        let stocks = reconcile_stock(
            records,
            &identifiers,
            target.warehouse_id.as_deref(),
            timestamp,
        )?;
        let mut stock_batches = 0;
        for batch in divide(&stocks, limits.stock) {
            let ack = client.submit_stocks(batch).await?;
            stock_batches += 1;
            tracing::info!(
                "{} {}: stock batch {} with {} items sent",
                marketplace,
                channel,
                stock_batches,
                batch.len()
            );
            tracing::debug!("Stock batch acknowledgement: {}", ack);
        }

        // Поменять цены
        let prices = reconcile_price(records, &identifiers)?;
        let mut price_batches = 0;
        for batch in divide(&prices, limits.price) {
            let ack = client.submit_prices(batch).await?;
            price_batches += 1;
            tracing::info!(
                "{} {}: price batch {} with {} items sent",
                marketplace,
                channel,
                price_batches,
                batch.len()
            );
            tracing::debug!("Price batch acknowledgement: {}", ack);
        }

        let mut report = SyncReport::new(marketplace, channel, stocks, prices);
        report.stock_batches = stock_batches;
        report.price_batches = price_batches;

        tracing::info!(
            "{} {} sync completed: {} stock updates ({} in stock) in {} batches, {} prices in {} batches",
            marketplace,
            channel,
            report.stocks.len(),
            report.in_stock.len(),
            report.stock_batches,
            report.prices.len(),
            report.price_batches
        );
        Ok(report)
    }

    /// Синхронизировать каналы по очереди, остановившись на первой ошибке
    pub async fn sync_all(&self, clients: &[&dyn CatalogClient]) -> SyncResult<Vec<SyncReport>> {
        let mut reports = Vec::with_capacity(clients.len());
        for client in clients {
            reports.push(self.sync_channel(*client).await?);
        }
        Ok(reports)
    }
}
