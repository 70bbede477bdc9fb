use crate::excel::{Cell, CellValue};

/// Merged block of cells, 1-based and inclusive on both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MergedRange {
    pub first_row: usize,
    pub first_col: usize,
    pub last_row: usize,
    pub last_col: usize,
}

impl MergedRange {
    pub fn is_single_cell(&self) -> bool {
        self.first_row == self.last_row && self.first_col == self.last_col
    }
}

/// A worksheet grid. `data` is padded by one row and one column so that
/// `data[row][col]` uses the same 1-based coordinates as the spreadsheet.
#[derive(Clone, Debug)]
pub struct Sheet {
    pub name: String,
    pub data: Vec<Vec<Cell>>,
    pub max_rows: usize,
    pub max_cols: usize,
    pub merged: Vec<MergedRange>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: vec![vec![Cell::empty(); 1]; 1],
            max_rows: 0,
            max_cols: 0,
            merged: Vec::new(),
        }
    }

    /// Builds a sheet from rows of values starting at A1.
    pub fn from_rows<V>(name: impl Into<String>, rows: Vec<Vec<V>>) -> Self
    where
        V: Into<CellValue>,
    {
        let mut sheet = Sheet::new(name);
        for (row_idx, row) in rows.into_iter().enumerate() {
            for (col_idx, value) in row.into_iter().enumerate() {
                let value = value.into();
                if !value.is_empty() {
                    sheet.set_value(row_idx + 1, col_idx + 1, value);
                }
            }
        }
        sheet
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.data.get(row).and_then(|r| r.get(col))
    }

    /// Value at (row, col); addresses outside the grid read as empty.
    pub fn value(&self, row: usize, col: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        match self.cell(row, col) {
            Some(cell) => &cell.value,
            None => &EMPTY,
        }
    }

    pub fn set_value(&mut self, row: usize, col: usize, value: CellValue) {
        self.set_cell(row, col, Cell::new(value));
    }

    pub fn set_cell(&mut self, row: usize, col: usize, cell: Cell) {
        if row == 0 || col == 0 {
            return;
        }
        self.ensure_cell_exists(row, col);

        if !cell.is_empty() {
            self.max_rows = self.max_rows.max(row);
            self.max_cols = self.max_cols.max(col);
        }
        self.data[row][col] = cell;
    }

    /// Replaces a cell's value in place and drops any formula it carried.
    pub fn overwrite_value(&mut self, row: usize, col: usize, value: CellValue) {
        if let Some(cell) = self.data.get_mut(row).and_then(|r| r.get_mut(col)) {
            cell.value = value;
            cell.formula = None;
        } else {
            self.set_value(row, col, value);
        }
    }

    /// Iterates `(column, cell)` over a row, left to right.
    pub fn row_cells(&self, row: usize) -> impl Iterator<Item = (usize, &Cell)> {
        self.data
            .get(row)
            .into_iter()
            .flat_map(|r| r.iter().enumerate().skip(1))
    }

    fn ensure_cell_exists(&mut self, row: usize, col: usize) {
        // Expand rows if needed
        if row >= self.data.len() {
            let row_len = self.data[0].len().max(col + 1);
            self.data.resize_with(row + 1, || vec![Cell::empty(); row_len]);
        }

        // Expand columns if needed
        if col >= self.data[row].len() {
            for row_data in &mut self.data {
                if row_data.len() <= col {
                    row_data.resize_with(col + 1, Cell::empty);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_grid_reads_are_empty() {
        let sheet = Sheet::from_rows("S", vec![vec!["a", "b"]]);
        assert_eq!(sheet.value(1, 2), &CellValue::text("b"));
        assert_eq!(sheet.value(9, 9), &CellValue::Empty);
        assert_eq!(sheet.value(0, 1), &CellValue::Empty);
    }

    #[test]
    fn bounds_track_last_populated_cell() {
        let mut sheet = Sheet::new("S");
        sheet.set_value(5, 3, CellValue::Number(1.0));
        sheet.set_value(2, 7, CellValue::text("x"));
        assert_eq!(sheet.max_rows, 5);
        assert_eq!(sheet.max_cols, 7);
        assert_eq!(sheet.value(5, 3), &CellValue::Number(1.0));
    }
}
