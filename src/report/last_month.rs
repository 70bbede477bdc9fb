use indexmap::IndexMap;

use crate::excel::{CellValue, Sheet};
use crate::report::columns::{HEADER_ROW, find_columns};
use crate::report::months::MONTH_ROW;

/// Header text of a monthly registration column.
pub const REGISTRATION_HEADER: &str = "Regist.";

/// How the totals row of a sheet is identified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TotalRow<'a> {
    /// 1-based row number
    Index(usize),
    /// Text searched for in column 1, top to bottom
    Label(&'a str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct LastMonth {
    /// Month label from the month row of the located column
    pub label: CellValue,
    pub column: usize,
}

/// Equality key for registration values. Numbers compare by value, text by
/// content, and a number never equals a text cell.
#[derive(Debug, Hash, PartialEq, Eq)]
enum ValueKey {
    Number(u64),
    Date(u64),
    Text(String),
}

impl ValueKey {
    fn of(value: &CellValue) -> Option<Self> {
        let number_bits = |f: f64| if f == 0.0 { 0.0f64.to_bits() } else { f.to_bits() };
        match value {
            CellValue::Empty => None,
            CellValue::Text(s) if s.is_empty() => None,
            CellValue::Text(s) | CellValue::Error(s) => Some(ValueKey::Text(s.clone())),
            CellValue::Number(f) => Some(ValueKey::Number(number_bits(*f))),
            CellValue::Bool(b) => Some(ValueKey::Number(number_bits(f64::from(u8::from(*b))))),
            CellValue::DateTime(f) => Some(ValueKey::Date(number_bits(*f))),
        }
    }
}

fn resolve_total_row(sheet: &Sheet, total_row: TotalRow<'_>) -> Option<usize> {
    match total_row {
        TotalRow::Index(0) => None,
        TotalRow::Index(row) => Some(row),
        TotalRow::Label(label) => {
            (1..=sheet.max_rows).find(|&row| sheet.value(row, 1).as_text() == Some(label))
        }
    }
}

/// Picks the column of the most recent month from the registration values of
/// the totals row, given as `(value, column)` in column order.
///
/// The first value seen in two or more columns marks the month, reported at
/// its first column. Groups are visited in the order their value first
/// appears, not by column. Without a repeat the second-to-last column is
/// taken.
fn pick_last_month_column(values: &[(ValueKey, usize)]) -> Option<usize> {
    match values {
        [] => None,
        [(_, column)] => Some(*column),
        _ => {
            let mut groups: IndexMap<&ValueKey, Vec<usize>> = IndexMap::new();
            for (key, column) in values {
                groups.entry(key).or_default().push(*column);
            }

            groups
                .values()
                .find(|columns| columns.len() > 1)
                .map(|columns| columns[0])
                .or_else(|| values.get(values.len() - 2).map(|(_, column)| *column))
        }
    }
}

/// Locates the column holding the most recent reporting month of `sheet`.
#[must_use]
pub fn find_last_month(sheet: &Sheet, total_row: TotalRow<'_>) -> Option<LastMonth> {
    let row = resolve_total_row(sheet, total_row)?;

    let values: Vec<(ValueKey, usize)> = find_columns(sheet, REGISTRATION_HEADER, HEADER_ROW)
        .into_iter()
        .filter_map(|col| ValueKey::of(sheet.value(row, col)).map(|key| (key, col)))
        .collect();

    let column = pick_last_month_column(&values)?;

    Some(LastMonth {
        label: sheet.value(MONTH_ROW, column).clone(),
        column,
    })
}
