use anyhow::{Context, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use rust_xlsxwriter::{Format, Formula, Workbook as XlsxWorkbook};
use std::io::{Read, Seek};
use std::path::Path;

use crate::excel::{Cell, CellValue, MergedRange, Sheet};

#[derive(Clone, Debug)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

pub fn open_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path_ref = path.as_ref();

    let mut workbook = open_workbook_auto(path_ref)
        .with_context(|| format!("Unable to parse Excel file: {}", path_ref.display()))?;

    let sheet_names = workbook.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .with_context(|| format!("Unable to read worksheet: {}", name))?;

        // Formulas are carried over when the format exposes them
        let formulas = match workbook.worksheet_formula(name) {
            Ok(formulas) => Some(formulas),
            Err(e) => {
                log::debug!("No formulas read from worksheet {}: {}", name, e);
                None
            }
        };

        let mut sheet = create_sheet_from_range(name, &range, formulas.as_ref());
        sheet.merged = merged_ranges(&mut workbook, name);
        sheets.push(sheet);
    }

    if sheets.is_empty() {
        anyhow::bail!("No worksheets found in file: {}", path_ref.display());
    }

    Ok(Workbook { sheets })
}

/// Merged blocks of a worksheet. Only xlsx sources report them.
fn merged_ranges<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: &str) -> Vec<MergedRange> {
    let Sheets::Xlsx(xlsx) = workbook else {
        return Vec::new();
    };

    match xlsx.worksheet_merge_cells(name) {
        Some(Ok(dimensions)) => dimensions
            .iter()
            .map(|d| MergedRange {
                first_row: d.start.0 as usize + 1,
                first_col: d.start.1 as usize + 1,
                last_row: d.end.0 as usize + 1,
                last_col: d.end.1 as usize + 1,
            })
            .collect(),
        Some(Err(e)) => {
            log::debug!("No merged cells read from worksheet {}: {}", name, e);
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn convert_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

fn create_sheet_from_range(
    name: &str,
    range: &Range<Data>,
    formulas: Option<&Range<String>>,
) -> Sheet {
    let mut sheet = Sheet::new(name);

    // used_cells() yields positions relative to the range start, which is not
    // necessarily A1
    if let Some((start_row, start_col)) = range.start() {
        for (row_idx, col_idx, cell) in range.used_cells() {
            let row = start_row as usize + row_idx + 1;
            let col = start_col as usize + col_idx + 1;
            sheet.set_value(row, col, convert_value(cell));
        }
    }

    if let Some(formulas) = formulas {
        if let Some((start_row, start_col)) = formulas.start() {
            for (row_idx, col_idx, formula) in formulas.used_cells() {
                if formula.is_empty() {
                    continue;
                }
                let row = start_row as usize + row_idx + 1;
                let col = start_col as usize + col_idx + 1;
                let value = sheet.value(row, col).clone();
                sheet.set_cell(row, col, Cell::with_formula(value, formula.clone()));
            }
        }
    }

    sheet
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    pub fn sheet_mut(&mut self, name: &str) -> Option<&mut Sheet> {
        self.sheets.iter_mut().find(|s| s.name == name)
    }

    /// The sheet a spreadsheet application shows on opening. calamine does not
    /// report the saved active tab, so this is the first sheet.
    pub fn active_sheet_mut(&mut self) -> Option<&mut Sheet> {
        self.sheets.first_mut()
    }

    pub fn remove_sheet(&mut self, name: &str) -> Option<Sheet> {
        let index = self.sheets.iter().position(|s| s.name == name)?;
        Some(self.sheets.remove(index))
    }

    /// Removes every sheet matching `predicate`, returning the removed names.
    pub fn remove_sheets_where<F>(&mut self, mut predicate: F) -> Vec<String>
    where
        F: FnMut(&Sheet) -> bool,
    {
        let mut removed = Vec::new();
        self.sheets.retain(|sheet| {
            if predicate(sheet) {
                removed.push(sheet.name.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn save_as(&self, path: &Path) -> Result<()> {
        if self.sheets.is_empty() {
            anyhow::bail!("Workbook has no sheets left to write");
        }

        let mut workbook = XlsxWorkbook::new();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let merge_format = Format::new();

        for sheet in &self.sheets {
            let worksheet = workbook
                .add_worksheet()
                .set_name(&sheet.name)
                .with_context(|| format!("Invalid sheet name: {}", sheet.name))?;

            // Merging first; the values written below replace the blank
            // top-left cell of each block
            for merged in sheet.merged.iter().filter(|m| !m.is_single_cell()) {
                worksheet
                    .merge_range(
                        (merged.first_row - 1) as u32,
                        (merged.first_col - 1) as u16,
                        (merged.last_row - 1) as u32,
                        (merged.last_col - 1) as u16,
                        "",
                        &merge_format,
                    )
                    .with_context(|| {
                        format!("Unable to merge cells in worksheet: {}", sheet.name)
                    })?;
            }

            for row in 1..=sheet.max_rows {
                for col in 1..=sheet.max_cols {
                    let Some(cell) = sheet.cell(row, col) else {
                        continue;
                    };

                    let row_idx = (row - 1) as u32;
                    let col_idx = (col - 1) as u16;

                    if let Some(formula) = &cell.formula {
                        let formula = Formula::new(formula).set_result(cell.value.to_text());
                        worksheet.write_formula(row_idx, col_idx, formula)?;
                        continue;
                    }

                    match &cell.value {
                        CellValue::Empty => {}
                        CellValue::Text(s) => {
                            worksheet.write_string(row_idx, col_idx, s)?;
                        }
                        CellValue::Number(n) => {
                            worksheet.write_number(row_idx, col_idx, *n)?;
                        }
                        CellValue::Bool(b) => {
                            worksheet.write_boolean(row_idx, col_idx, *b)?;
                        }
                        CellValue::Error(code) => {
                            // An error constant is a formula whose result is the error
                            let formula = Formula::new(code).set_result(code);
                            worksheet.write_formula(row_idx, col_idx, formula)?;
                        }
                        CellValue::DateTime(serial) => {
                            worksheet.write_number_with_format(
                                row_idx,
                                col_idx,
                                *serial,
                                &date_format,
                            )?;
                        }
                    }
                }
            }
        }

        workbook
            .save(path)
            .with_context(|| format!("Failed to write workbook: {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Workbook {
        Workbook::new(vec![
            Sheet::from_rows("General", vec![vec!["x"]]),
            Sheet::from_rows("Spain", vec![vec!["y"]]),
            Sheet::from_rows("Portugal", vec![vec!["z"]]),
        ])
    }

    #[test]
    fn removes_matching_sheets_and_keeps_order() {
        let mut workbook = sample();
        let removed = workbook.remove_sheets_where(|s| s.name == "General");
        assert_eq!(removed, vec!["General".to_string()]);
        assert_eq!(workbook.sheet_names(), vec!["Spain", "Portugal"]);
    }

    #[test]
    fn remove_sheet_by_exact_name() {
        let mut workbook = sample();
        assert!(workbook.remove_sheet("general").is_none());
        assert!(workbook.remove_sheet("Spain").is_some());
        assert_eq!(workbook.sheet_names(), vec!["General", "Portugal"]);
    }

    #[test]
    fn saved_workbook_reopens_with_values_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.xlsx");

        let mut sheet = Sheet::new("Data");
        sheet.set_value(3, 2, CellValue::Number(7.0));
        sheet.set_value(4, 3, CellValue::text("Regist."));
        sheet.set_value(6, 1, CellValue::Bool(true));
        Workbook::new(vec![sheet]).save_as(&path).unwrap();

        let reopened = open_workbook(&path).unwrap();
        let data = reopened.sheet("Data").unwrap();
        assert_eq!(data.value(3, 2), &CellValue::Number(7.0));
        assert_eq!(data.value(4, 3), &CellValue::text("Regist."));
        assert_eq!(data.value(6, 1), &CellValue::Bool(true));
        assert_eq!(data.max_rows, 6);
    }

    #[test]
    fn error_cells_and_merged_blocks_survive_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("errors.xlsx");

        let mut sheet = Sheet::new("Spain");
        sheet.set_value(1, 1, CellValue::text("Matriculaciones"));
        sheet.merged.push(MergedRange {
            first_row: 1,
            first_col: 1,
            last_row: 1,
            last_col: 4,
        });
        sheet.set_value(5, 2, CellValue::Error("#DIV/0!".to_string()));
        sheet.set_value(5, 3, CellValue::Number(4.0));
        Workbook::new(vec![sheet]).save_as(&path).unwrap();

        let reopened = open_workbook(&path).unwrap();
        let spain = reopened.sheet("Spain").unwrap();
        assert_eq!(
            spain.merged,
            vec![MergedRange {
                first_row: 1,
                first_col: 1,
                last_row: 1,
                last_col: 4,
            }]
        );
        assert_eq!(spain.value(1, 1), &CellValue::text("Matriculaciones"));

        // Written as an error constant, not as a string cell
        let error = spain.cell(5, 2).unwrap();
        assert_eq!(error.value.to_text(), "#DIV/0!");
        assert_eq!(error.formula.as_deref(), Some("#DIV/0!"));
        assert_eq!(spain.value(5, 3), &CellValue::Number(4.0));
    }

    #[test]
    fn single_cell_merges_are_skipped_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("single.xlsx");

        let mut sheet = Sheet::from_rows("Data", vec![vec!["a", "b"]]);
        sheet.merged.push(MergedRange {
            first_row: 1,
            first_col: 2,
            last_row: 1,
            last_col: 2,
        });
        Workbook::new(vec![sheet]).save_as(&path).unwrap();

        let reopened = open_workbook(&path).unwrap();
        let data = reopened.sheet("Data").unwrap();
        assert!(data.merged.is_empty());
        assert_eq!(data.value(1, 2), &CellValue::text("b"));
    }

    #[test]
    fn saving_without_sheets_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = Workbook::new(Vec::new()).save_as(&dir.path().join("empty.xlsx"));
        assert!(result.is_err());
    }
}
