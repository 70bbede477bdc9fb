use crate::excel::{CellValue, Sheet};

/// Row holding the month label of each block of columns.
pub const MONTH_ROW: usize = 3;

const ENGLISH_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// English name for a month label written as `"1"`..`"12"`.
fn english_month(label: &str) -> Option<&'static str> {
    // "01" or "3.0" are not month labels
    if label.starts_with('0') || !label.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let month: usize = label.parse().ok()?;
    ENGLISH_MONTHS.get(month.checked_sub(1)?).copied()
}

/// Rewrites numeric month labels in `label_row` to English month names when
/// `language` is English. Returns the number of cells rewritten.
pub fn translate_months(sheet: &mut Sheet, language: &str, label_row: usize) -> usize {
    if language.to_lowercase() != "english" {
        return 0;
    }

    let targets: Vec<(usize, &'static str)> = sheet
        .row_cells(label_row)
        .filter(|(_, cell)| cell.formula.is_none() && !cell.value.is_empty())
        .filter_map(|(col, cell)| english_month(&cell.value.to_text()).map(|name| (col, name)))
        .collect();

    for (col, name) in &targets {
        sheet.overwrite_value(label_row, *col, CellValue::text(*name));
    }

    targets.len()
}
