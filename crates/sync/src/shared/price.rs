use super::error::{SyncError, SyncResult};

/// Преобразует текстовую цену в целое число рублей.
///
/// Берётся часть до первой точки, из неё удаляются все символы кроме цифр
/// (пробелы, апострофы-разделители разрядов, обозначение валюты).
///
/// # Примеры
/// ```
/// use stock_sync::shared::price::parse_price;
/// assert_eq!(parse_price("5'990.00 руб.").unwrap(), 5990);
/// assert_eq!(parse_price("12 340.00 руб.").unwrap(), 12340);
/// ```
pub fn parse_price(text: &str) -> SyncResult<u64> {
    let integer_part = text.split('.').next().unwrap_or_default();
    let digits: String = integer_part.chars().filter(|c| c.is_ascii_digit()).collect();

    if digits.is_empty() {
        return Err(SyncError::format(format!("price without digits: {:?}", text)));
    }

    digits
        .parse::<u64>()
        .map_err(|e| SyncError::format(format!("price {:?}: {}", text, e)))
}
