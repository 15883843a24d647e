//! Разбор таблицы остатков поставщика.
//!
//! Над заголовком в отчёте идут строки с реквизитами склада, поэтому заголовок
//! ищется по фиксированному номеру строки, а колонки по их названиям.

use crate::shared::config::StockReportConfig;
use crate::shared::error::{SyncError, SyncResult};
use calamine::{Data, Range, Reader};
use contracts::domain::a001_stock_record::StockRecord;
use std::io::Cursor;

/// Разобрать первый лист книги (xls, xlsx или ods) в список строк остатков
pub fn parse_workbook(contents: Vec<u8>, layout: &StockReportConfig) -> SyncResult<Vec<StockRecord>> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(contents))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SyncError::format("workbook has no sheets"))??;
    parse_range(&range, layout)
}

pub fn parse_range(range: &Range<Data>, layout: &StockReportConfig) -> SyncResult<Vec<StockRecord>> {
    let (start_row, _) = range
        .start()
        .ok_or_else(|| SyncError::format("stock sheet is empty"))?;

    // rows() считает от начала занятой области, а не от первой строки листа
    if layout.header_row < start_row {
        return Err(SyncError::format(format!(
            "header row {} is above the used range starting at row {}",
            layout.header_row, start_row
        )));
    }
    let mut rows = range.rows().skip((layout.header_row - start_row) as usize);

    let header = rows.next().ok_or_else(|| {
        SyncError::format(format!("header row {} is missing", layout.header_row))
    })?;
    let code_col = find_column(header, &layout.code_column)?;
    let quantity_col = find_column(header, &layout.quantity_column)?;
    let price_col = find_column(header, &layout.price_column)?;

    let mut records = Vec::new();
    for (offset, row) in rows.enumerate() {
        let code = cell_text(row.get(code_col));
        if code.is_empty() {
            tracing::debug!(
                "Skipping row {} without code",
                layout.header_row as usize + 1 + offset
            );
            continue;
        }
        records.push(StockRecord {
            code,
            quantity_text: cell_text(row.get(quantity_col)),
            price_text: cell_text(row.get(price_col)),
        });
    }

    Ok(records)
}

fn find_column(header: &[Data], caption: &str) -> SyncResult<usize> {
    header
        .iter()
        .position(|cell| cell_text(Some(cell)) == caption.trim())
        .ok_or_else(|| SyncError::format(format!("column {:?} not found in header", caption)))
}

/// Значение ячейки как текст; целые числа без дробной части
fn cell_text(cell: Option<&Data>) -> String {
    match cell {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Some(other) => other.to_string().trim().to_string(),
    }
}
