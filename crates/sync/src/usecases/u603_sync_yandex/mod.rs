pub mod yandex_api_client;

pub use yandex_api_client::{YandexApiClient, YandexCampaign};
