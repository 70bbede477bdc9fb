#![allow(dead_code)]

use benef_report::excel::{CellValue, Sheet, Workbook};
use benef_report::report::ReportParameters;
use std::path::{Path, PathBuf};

/// A models sheet with three monthly registration blocks (months 1-3 in
/// row 3), two model rows and a "Total General" row.
pub fn models_sheet(name: &str) -> Sheet {
    let mut sheet = Sheet::new(name);
    sheet.set_value(1, 1, CellValue::text(format!("Registrations {}", name)));
    sheet.set_value(4, 1, CellValue::text("Model"));
    for month in 1..=3 {
        let col = 1 + month;
        sheet.set_value(3, col, CellValue::Number(month as f64));
        sheet.set_value(4, col, CellValue::text("Regist."));
    }
    sheet.set_value(5, 1, CellValue::text("Golf"));
    sheet.set_value(6, 1, CellValue::text("Polo"));
    sheet.set_value(7, 1, CellValue::text("Total General"));
    for (col, (golf, polo)) in [(6.0, 4.0), (7.0, 3.0), (8.0, 4.0)].into_iter().enumerate() {
        sheet.set_value(5, col + 2, CellValue::Number(golf));
        sheet.set_value(6, col + 2, CellValue::Number(polo));
        sheet.set_value(7, col + 2, CellValue::Number(golf + polo));
    }
    sheet
}

pub fn brands_sheet() -> Sheet {
    let mut sheet = Sheet::new("Brands");
    sheet.set_value(4, 1, CellValue::text("Brand"));
    for month in 1..=3 {
        sheet.set_value(3, 1 + month, CellValue::Number(month as f64));
        sheet.set_value(4, 1 + month, CellValue::text("Regist."));
    }
    sheet.set_value(5, 1, CellValue::text("Volkswagen"));
    sheet.set_value(6, 1, CellValue::text("Total"));
    for (col, total) in [100.0, 120.0, 120.0].into_iter().enumerate() {
        sheet.set_value(5, col + 2, CellValue::Number(total));
        sheet.set_value(6, col + 2, CellValue::Number(total));
    }
    sheet
}

pub fn write_models(dir: &Path, sheet_names: &[&str]) -> PathBuf {
    let sheets = sheet_names.iter().map(|name| models_sheet(name)).collect();
    let path = dir.join("models.xlsx");
    Workbook::new(sheets).save_as(&path).unwrap();
    path
}

pub fn write_brands(dir: &Path) -> PathBuf {
    let path = dir.join("brands.xlsx");
    Workbook::new(vec![brands_sheet()]).save_as(&path).unwrap();
    path
}

pub fn params(segments: &str, segmentation: &str) -> ReportParameters {
    ReportParameters {
        country: "ES".to_string(),
        year: "2024".to_string(),
        month: "3".to_string(),
        day: "31".to_string(),
        language: "english".to_string(),
        segments: segments.to_string(),
        segmentation: segmentation.to_string(),
    }
}
