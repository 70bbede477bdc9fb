mod cell;
mod sheet;
mod workbook;

pub use cell::{Cell, CellValue};
pub use sheet::{MergedRange, Sheet};
pub use workbook::{Workbook, open_workbook};
