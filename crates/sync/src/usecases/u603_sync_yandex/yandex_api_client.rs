use crate::shared::api_log::ApiLog;
use crate::shared::config::{HttpConfig, MarketplaceApiConfig};
use crate::shared::error::{SyncError, SyncResult};
use crate::shared::http;
use crate::shared::marketplaces::{BatchLimits, CatalogClient, StockTarget};
use async_trait::async_trait;
use chrono::Utc;
use contracts::domain::a002_stock_update::StockUpdate;
use contracts::domain::a003_price_update::{Currency, PriceUpdate};
use contracts::enums::{MarketplaceType, SalesChannel};
use serde::{Deserialize, Serialize};

const API_NAME: &str = "Yandex Market API";

/// Кампания Яндекс Маркета: канал продаж, её идентификатор и склад
#[derive(Debug, Clone)]
pub struct YandexCampaign {
    pub channel: SalesChannel,
    pub campaign_id: String,
    pub warehouse_id: String,
}

/// HTTP-клиент для работы с Yandex Market Partner API в рамках одной кампании
pub struct YandexApiClient {
    client: reqwest::Client,
    token: String,
    host: String,
    campaign: YandexCampaign,
    warehouse_id: i64,
    settings: MarketplaceApiConfig,
    log: ApiLog,
}

impl YandexApiClient {
    pub fn new(
        token: String,
        campaign: YandexCampaign,
        settings: MarketplaceApiConfig,
        http_config: &HttpConfig,
        log: ApiLog,
    ) -> SyncResult<Self> {
        let base = reqwest::Url::parse(&settings.base_url).map_err(|e| {
            SyncError::config(format!("invalid Yandex Market base_url {:?}: {}", settings.base_url, e))
        })?;
        let host = match (base.host_str(), base.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(SyncError::config(format!(
                    "Yandex Market base_url {:?} has no host",
                    settings.base_url
                )))
            }
        };
        let warehouse_id = campaign.warehouse_id.trim().parse::<i64>().map_err(|_| {
            SyncError::config(format!(
                "warehouse id {:?} of {} campaign is not a number",
                campaign.warehouse_id, campaign.channel
            ))
        })?;

        Ok(Self {
            client: http::build_client(http_config.timeout_secs)?,
            token,
            host,
            campaign,
            warehouse_id,
            settings,
            log,
        })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/campaigns/{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            self.campaign.campaign_id,
            path
        )
    }

    fn request(&self, method: reqwest::Method, url: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("Host", &self.host)
    }

    /// Получить страницу товаров кампании
    /// Endpoint: GET /campaigns/{campaignId}/offer-mapping-entries
    pub async fn fetch_product_list(
        &self,
        limit: usize,
        page_token: &str,
    ) -> SyncResult<YandexOfferMappingResponse> {
        let url = self.url("offer-mapping-entries");
        let query = YandexListQueryParams {
            page_token: page_token.to_string(),
            limit,
        };
        self.log.write(&format!(
            "=== REQUEST ===\nGET {}\nAuthorization: Bearer ****\nQuery: limit={}, page_token={:?}",
            url, query.limit, query.page_token
        ));

        let response = self
            .request(reqwest::Method::GET, &url)
            .query(&query)
            .send()
            .await?;

        http::read_json(response, API_NAME, &self.log).await
    }

    /// Передать остатки
    /// Endpoint: PUT /campaigns/{campaignId}/offers/stocks
    pub async fn update_stocks(&self, skus: Vec<YandexSkuStock>) -> SyncResult<serde_json::Value> {
        let url = self.url("offers/stocks");
        self.send_json(reqwest::Method::PUT, &url, &YandexStocksRequest { skus })
            .await
    }

    /// Передать цены
    /// Endpoint: POST /campaigns/{campaignId}/offer-prices/updates
    pub async fn update_prices(&self, offers: Vec<YandexOfferPrice>) -> SyncResult<serde_json::Value> {
        let url = self.url("offer-prices/updates");
        self.send_json(reqwest::Method::POST, &url, &YandexPricesRequest { offers })
            .await
    }

    async fn send_json<B: Serialize>(
        &self,
        method: reqwest::Method,
        url: &str,
        request_body: &B,
    ) -> SyncResult<serde_json::Value> {
        let body = serde_json::to_string(request_body)?;
        self.log.write(&format!(
            "=== REQUEST ===\n{} {}\nAuthorization: Bearer ****\nBody: {}",
            method, url, body
        ));

        let response = self.request(method, url).body(body).send().await?;
        http::read_json(response, API_NAME, &self.log).await
    }

    fn to_sku_stock(&self, update: &StockUpdate) -> YandexSkuStock {
        let updated_at = update.timestamp.unwrap_or_else(Utc::now);
        YandexSkuStock {
            sku: update.identifier.clone(),
            warehouse_id: self.warehouse_id,
            items: vec![YandexStockItem {
                count: update.quantity,
                kind: "FIT".to_string(),
                updated_at: updated_at.format("%Y-%m-%dT%H:%M:%SZ").to_string(),
            }],
        }
    }
}

/// Код валюты в API Маркета (рубль передаётся как RUR)
fn currency_id(currency: Currency) -> &'static str {
    match currency {
        Currency::Rub => "RUR",
    }
}

#[async_trait]
impl CatalogClient for YandexApiClient {
    fn marketplace(&self) -> MarketplaceType {
        MarketplaceType::YandexMarket
    }

    fn channel(&self) -> SalesChannel {
        self.campaign.channel
    }

    fn limits(&self) -> BatchLimits {
        BatchLimits {
            stock: self.settings.stock_batch,
            price: self.settings.price_batch,
        }
    }

    fn stock_target(&self) -> StockTarget {
        StockTarget {
            warehouse_id: Some(self.campaign.warehouse_id.clone()),
            timestamped: true,
        }
    }

    /// Артикулы (shopSku) всех товаров кампании.
    ///
    /// Пагинация по nextPageToken; пустой или отсутствующий токен означает
    /// последнюю страницу.
    async fn list_identifiers(&self) -> SyncResult<Vec<String>> {
        let limit = self.settings.page_limit.get();
        let mut page_token = String::new();
        let mut shop_skus: Vec<String> = Vec::new();

        for page in 1..=self.settings.max_pages.get() {
            let result = self.fetch_product_list(limit, &page_token).await?.result;
            let batch_size = result.offer_mapping_entries.len();
            shop_skus.extend(
                result
                    .offer_mapping_entries
                    .into_iter()
                    .map(|entry| entry.offer.shop_sku),
            );

            tracing::info!(
                "Yandex {} campaign {} page {}: {} items, {} collected",
                self.campaign.channel,
                self.campaign.campaign_id,
                page,
                batch_size,
                shop_skus.len()
            );

            let next = result
                .paging
                .and_then(|p| p.next_page_token)
                .unwrap_or_default();
            if next.is_empty() {
                return Ok(shop_skus);
            }
            if next == page_token {
                tracing::warn!(
                    "nextPageToken did not change, stopping to prevent infinite loop. token: {:?}",
                    next
                );
                return Ok(shop_skus);
            }
            page_token = next;
        }

        tracing::warn!(
            "Yandex offer mapping list exceeded {} pages, stopping with {} items",
            self.settings.max_pages,
            shop_skus.len()
        );
        Ok(shop_skus)
    }

    async fn submit_stocks(&self, batch: &[StockUpdate]) -> SyncResult<serde_json::Value> {
        let skus = batch.iter().map(|u| self.to_sku_stock(u)).collect();
        self.update_stocks(skus).await
    }

    async fn submit_prices(&self, batch: &[PriceUpdate]) -> SyncResult<serde_json::Value> {
        let offers = batch.iter().map(YandexOfferPrice::from).collect();
        self.update_prices(offers).await
    }
}

// ============================================================================
// Request/Response structures для Yandex Market API
// ============================================================================

#[derive(Debug, Serialize)]
struct YandexListQueryParams {
    page_token: String,
    limit: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingResponse {
    pub result: YandexOfferMappingResult,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingResult {
    #[serde(default)]
    pub paging: Option<YandexPaging>,
    #[serde(rename = "offerMappingEntries", default)]
    pub offer_mapping_entries: Vec<YandexOfferMappingEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexPaging {
    #[serde(rename = "nextPageToken", default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOfferMappingEntry {
    pub offer: YandexOffer,
}

#[derive(Debug, Clone, Deserialize)]
pub struct YandexOffer {
    #[serde(rename = "shopSku")]
    pub shop_sku: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexStocksRequest {
    pub skus: Vec<YandexSkuStock>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YandexSkuStock {
    pub sku: String,
    #[serde(rename = "warehouseId")]
    pub warehouse_id: i64,
    pub items: Vec<YandexStockItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YandexStockItem {
    pub count: u32,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct YandexPricesRequest {
    pub offers: Vec<YandexOfferPrice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YandexOfferPrice {
    pub id: String,
    pub price: YandexPriceValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YandexPriceValue {
    pub value: u64,
    #[serde(rename = "currencyId")]
    pub currency_id: String,
}

impl From<&PriceUpdate> for YandexOfferPrice {
    fn from(update: &PriceUpdate) -> Self {
        Self {
            id: update.identifier.clone(),
            price: YandexPriceValue {
                value: update.price,
                currency_id: currency_id(update.currency).to_string(),
            },
        }
    }
}
