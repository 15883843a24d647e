use crate::shared::api_log::ApiLog;
use crate::shared::config::{HttpConfig, MarketplaceApiConfig, OzonCredentials};
use crate::shared::error::SyncResult;
use crate::shared::http;
use crate::shared::marketplaces::{BatchLimits, CatalogClient, StockTarget};
use async_trait::async_trait;
use contracts::domain::a002_stock_update::StockUpdate;
use contracts::domain::a003_price_update::PriceUpdate;
use contracts::enums::{MarketplaceType, SalesChannel};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

const API_NAME: &str = "OZON API";

/// HTTP-клиент для работы с OZON Seller API
pub struct OzonApiClient {
    client: reqwest::Client,
    credentials: OzonCredentials,
    settings: MarketplaceApiConfig,
    log: ApiLog,
}

impl OzonApiClient {
    pub fn new(
        credentials: OzonCredentials,
        settings: MarketplaceApiConfig,
        http_config: &HttpConfig,
        log: ApiLog,
    ) -> SyncResult<Self> {
        Ok(Self {
            client: http::build_client(http_config.timeout_secs)?,
            credentials,
            settings,
            log,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    async fn post<B, T>(&self, path: &str, request_body: &B) -> SyncResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path);
        let body = serde_json::to_string(request_body)?;
        self.log.write(&format!(
            "=== REQUEST ===\nPOST {}\nClient-Id: {}\nApi-Key: ****\nBody: {}",
            url, self.credentials.client_id, body
        ));

        let response = self
            .client
            .post(&url)
            .header("Client-Id", &self.credentials.client_id)
            .header("Api-Key", &self.credentials.seller_token)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;

        http::read_json(response, API_NAME, &self.log).await
    }

    /// Получить страницу списка товаров через POST /v3/product/list
    pub async fn fetch_product_list(
        &self,
        limit: usize,
        last_id: &str,
    ) -> SyncResult<OzonProductListResponse> {
        let request_body = OzonProductListRequest {
            filter: OzonProductListFilter {
                visibility: "ALL".to_string(),
            },
            last_id: last_id.to_string(),
            limit,
        };
        self.post("/v3/product/list", &request_body).await
    }

    /// Обновить остатки через POST /v1/product/import/stocks
    pub async fn import_stocks(&self, stocks: Vec<OzonStock>) -> SyncResult<serde_json::Value> {
        self.post("/v1/product/import/stocks", &OzonStocksRequest { stocks })
            .await
    }

    /// Обновить цены через POST /v1/product/import/prices
    pub async fn import_prices(&self, prices: Vec<OzonPrice>) -> SyncResult<serde_json::Value> {
        self.post("/v1/product/import/prices", &OzonPricesRequest { prices })
            .await
    }
}

#[async_trait]
impl CatalogClient for OzonApiClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::Ozon
    }

    fn channel(&self) -> SalesChannel {
        SalesChannel::Default
    }

    fn limits(&self) -> BatchLimits {
        BatchLimits {
            stock: self.settings.stock_batch,
            price: self.settings.price_batch,
        }
    }

    fn stock_target(&self) -> StockTarget {
        StockTarget::default()
    }

    /// Артикулы всех товаров магазина.
    ///
    /// Пагинация курсорная через last_id; выгрузка заканчивается, когда
    /// накоплено `total` товаров.
    async fn list_identifiers(&self) -> SyncResult<Vec<String>> {
        let limit = self.settings.page_limit.get();
        let mut last_id = String::new();
        let mut offer_ids: Vec<String> = Vec::new();

        for page in 1..=self.settings.max_pages.get() {
            let result = self.fetch_product_list(limit, &last_id).await?.result;
            let batch_size = result.items.len();
            offer_ids.extend(result.items.into_iter().map(|item| item.offer_id));

            tracing::info!(
                "OZON product list page {}: {} items, {} of {} collected",
                page,
                batch_size,
                offer_ids.len(),
                result.total
            );

            if offer_ids.len() as u64 >= result.total {
                return Ok(offer_ids);
            }
            if batch_size == 0 {
                tracing::warn!(
                    "OZON returned an empty page before reaching total {}, stopping",
                    result.total
                );
                return Ok(offer_ids);
            }
            // Защита от зацикливания: если last_id не изменился, прекращаем
            if result.last_id == last_id {
                tracing::warn!(
                    "last_id did not change, stopping to prevent infinite loop. last_id: {:?}",
                    last_id
                );
                return Ok(offer_ids);
            }
            last_id = result.last_id;
        }

        tracing::warn!(
            "OZON product list exceeded {} pages, stopping with {} items",
            self.settings.max_pages,
            offer_ids.len()
        );
        Ok(offer_ids)
    }

    async fn submit_stocks(&self, batch: &[StockUpdate]) -> SyncResult<serde_json::Value> {
        let stocks = batch.iter().map(OzonStock::from).collect();
        self.import_stocks(stocks).await
    }

    async fn submit_prices(&self, batch: &[PriceUpdate]) -> SyncResult<serde_json::Value> {
        let prices = batch.iter().map(OzonPrice::from).collect();
        self.import_prices(prices).await
    }
}

// ============================================================================
// Request/Response structures для OZON API
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListRequest {
    pub filter: OzonProductListFilter,
    pub last_id: String,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonProductListFilter {
    pub visibility: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListResponse {
    pub result: OzonProductListResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductListResult {
    pub items: Vec<OzonProductItem>,
    pub total: u64,
    #[serde(default)]
    pub last_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OzonProductItem {
    #[serde(default)]
    pub product_id: i64,
    pub offer_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonStocksRequest {
    pub stocks: Vec<OzonStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OzonStock {
    pub offer_id: String,
    pub stock: u32,
}

impl From<&StockUpdate> for OzonStock {
    fn from(update: &StockUpdate) -> Self {
        Self {
            offer_id: update.identifier.clone(),
            stock: update.quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OzonPricesRequest {
    pub prices: Vec<OzonPrice>,
}

/// Цена для /v1/product/import/prices. Цены передаются строками.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OzonPrice {
    pub auto_action_enabled: String,
    pub currency_code: String,
    pub offer_id: String,
    pub old_price: String,
    pub price: String,
}

impl From<&PriceUpdate> for OzonPrice {
    fn from(update: &PriceUpdate) -> Self {
        Self {
            auto_action_enabled: "UNKNOWN".to_string(),
            currency_code: update.currency.code().to_string(),
            offer_id: update.identifier.clone(),
            old_price: "0".to_string(),
            price: update.price.to_string(),
        }
    }
}
