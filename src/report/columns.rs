use crate::excel::Sheet;

/// Row holding the column headers of every report sheet.
pub const HEADER_ROW: usize = 4;

/// Returns the 1-based column of the first cell in `header_row` whose text is
/// exactly `target`.
#[must_use]
pub fn find_column(sheet: &Sheet, target: &str, header_row: usize) -> Option<usize> {
    sheet
        .row_cells(header_row)
        .find(|(_, cell)| cell.value.as_text() == Some(target))
        .map(|(col, _)| col)
}

/// Every column in `header_row` whose text is exactly `target`, left to right.
#[must_use]
pub fn find_columns(sheet: &Sheet, target: &str, header_row: usize) -> Vec<usize> {
    sheet
        .row_cells(header_row)
        .filter(|(_, cell)| cell.value.as_text() == Some(target))
        .map(|(col, _)| col)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::CellValue;

    fn header_sheet() -> Sheet {
        let mut sheet = Sheet::new("Spain");
        for (col, header) in ["Brand", "Regist.", "Share", "Regist."].iter().enumerate() {
            sheet.set_value(HEADER_ROW, col + 1, CellValue::text(*header));
        }
        sheet.set_value(3, 5, CellValue::text("Share"));
        sheet
    }

    #[test]
    fn first_match_wins() {
        let sheet = header_sheet();
        assert_eq!(find_column(&sheet, "Regist.", HEADER_ROW), Some(2));
        assert_eq!(find_columns(&sheet, "Regist.", HEADER_ROW), vec![2, 4]);
    }

    #[test]
    fn match_is_exact_and_case_sensitive() {
        let sheet = header_sheet();
        assert_eq!(find_column(&sheet, "regist.", HEADER_ROW), None);
        assert_eq!(find_column(&sheet, "Regist", HEADER_ROW), None);
        assert_eq!(find_column(&sheet, "Brand", HEADER_ROW), Some(1));
    }

    #[test]
    fn only_the_header_row_is_scanned() {
        let sheet = header_sheet();
        assert_eq!(find_column(&sheet, "Share", HEADER_ROW), Some(3));
        assert_eq!(find_column(&sheet, "Share", 3), Some(5));
        assert_eq!(find_column(&sheet, "Brand", 40), None);
    }

    #[test]
    fn numeric_headers_never_match_text() {
        let mut sheet = Sheet::new("S");
        sheet.set_value(HEADER_ROW, 1, CellValue::Number(2024.0));
        assert_eq!(find_column(&sheet, "2024", HEADER_ROW), None);
    }
}
