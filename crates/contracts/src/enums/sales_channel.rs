use serde::{Deserialize, Serialize};

/// Канал продаж внутри одного кабинета маркетплейса.
///
/// У Ozon канал один, у Яндекс Маркета две кампании: FBS (склад продавца,
/// доставка маркетплейсом) и DBS (склад и доставка продавца). У каждой кампании
/// свой каталог и свой склад.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SalesChannel {
    Default,
    Fbs,
    Dbs,
}

impl SalesChannel {
    pub fn code(&self) -> &'static str {
        match self {
            SalesChannel::Default => "default",
            SalesChannel::Fbs => "fbs",
            SalesChannel::Dbs => "dbs",
        }
    }
}

impl std::fmt::Display for SalesChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code().to_uppercase())
    }
}
