use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::excel::{Sheet, open_workbook};
use crate::report::last_month::{LastMonth, TotalRow, find_last_month};
use crate::report::months::{MONTH_ROW, translate_months};

/// Column-1 label of the totals row in the brands workbook.
pub const BRANDS_TOTAL_LABEL: &str = "Total";
/// Column-1 label of the totals row in each models sheet.
pub const MODELS_TOTAL_LABEL: &str = "Total General";
/// Segmentation mode producing the branded report variant.
pub const VOLKSWAGEN_SEGMENTATION: &str = "VOLKSWAGEN";

const AUXILIARY_SHEET: &str = "general";

#[derive(Debug, Clone, Default)]
pub struct ReportParameters {
    pub country: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub language: String,
    /// Free-text segment descriptor, e.g. "Passenger Cars"
    pub segments: String,
    pub segmentation: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub output_path: PathBuf,
    pub file_name: String,
    pub sheets: Vec<String>,
}

#[must_use]
pub fn is_auxiliary_sheet(name: &str) -> bool {
    name.to_lowercase() == AUXILIARY_SHEET
}

#[must_use]
pub fn segment_code(segments: &str) -> &'static str {
    if segments.contains("Passenger Cars") {
        "PC"
    } else {
        "LCV"
    }
}

/// Parses the report month as an integer, accepting surrounding whitespace
/// and an optional sign.
pub fn parse_month(month: &str) -> Result<i64> {
    month
        .trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid month: {:?}", month))
}

/// `BENEF_{country}_{year}-{MM}_{PC|LCV}_[VW_]E_{YYYYMMDD_HHMMSS}.xlsx`
pub fn build_file_name(params: &ReportParameters, now: NaiveDateTime) -> Result<String> {
    let month = parse_month(&params.month)?;
    let code = segment_code(&params.segments);
    let suffix = if params.segmentation == VOLKSWAGEN_SEGMENTATION {
        "VW_E"
    } else {
        "E"
    };
    let timestamp = now.format("%Y%m%d_%H%M%S");

    let file_name = format!(
        "BENEF_{}_{}-{:02}_{}_{}_{}.xlsx",
        params.country, params.year, month, code, suffix, timestamp
    );
    if file_name.contains(['/', '\\']) {
        anyhow::bail!("Report file name contains a path separator: {}", file_name);
    }

    Ok(file_name)
}

/// Totals row of the brands sheet: the first row labelled "Total" in column
/// 1, else the third row from the bottom.
fn brands_total_row(sheet: &Sheet) -> usize {
    (1..=sheet.max_rows)
        .find(|&row| sheet.value(row, 1).to_text().trim() == BRANDS_TOTAL_LABEL)
        .unwrap_or(if sheet.max_rows > 2 {
            sheet.max_rows - 2
        } else {
            1
        })
}

fn log_last_month(book: &str, sheet: &str, found: Option<&LastMonth>) {
    match found {
        Some(last) => log::debug!(
            "{} sheet {}: last month {:?} at column {}",
            book,
            sheet,
            last.label.to_text(),
            crate::utils::index_to_col_name(last.column)
        ),
        None => log::debug!("{} sheet {}: no last month found", book, sheet),
    }
}

/// Builds the consolidated report from the models and brands workbooks and
/// writes it into `output_dir`.
pub fn generate_report(
    params: &ReportParameters,
    models_path: &Path,
    brands_path: &Path,
    output_dir: &Path,
) -> Result<ReportOutcome> {
    // Reject a bad month before doing any work
    parse_month(&params.month)?;
    log::debug!(
        "Report period {}-{}-{}, language {}",
        params.year,
        params.month,
        params.day,
        params.language
    );

    let mut models = open_workbook(models_path)
        .with_context(|| format!("Failed to load models workbook: {}", models_path.display()))?;
    let mut brands = open_workbook(brands_path)
        .with_context(|| format!("Failed to load brands workbook: {}", brands_path.display()))?;

    if let Some(sheet) = brands.active_sheet_mut() {
        let translated = translate_months(sheet, &params.language, MONTH_ROW);
        log::debug!("brands sheet {}: {} month labels translated", sheet.name, translated);

        let total_row = brands_total_row(sheet);
        let last_month = find_last_month(sheet, TotalRow::Index(total_row));
        log_last_month("brands", &sheet.name, last_month.as_ref());
    }

    for name in models.sheet_names() {
        if is_auxiliary_sheet(&name) {
            continue;
        }
        let Some(sheet) = models.sheet_mut(&name) else {
            continue;
        };
        let translated = translate_months(sheet, &params.language, MONTH_ROW);
        log::debug!("models sheet {}: {} month labels translated", name, translated);

        let last_month = find_last_month(sheet, TotalRow::Label(MODELS_TOTAL_LABEL));
        log_last_month("models", &name, last_month.as_ref());
    }

    let removed = models.remove_sheets_where(|sheet| is_auxiliary_sheet(&sheet.name));
    if !removed.is_empty() {
        log::debug!("Removed auxiliary sheets: {}", removed.join(", "));
    }

    let file_name = build_file_name(params, Local::now().naive_local())?;

    fs::create_dir_all(output_dir).with_context(|| {
        format!("Failed to create output directory: {}", output_dir.display())
    })?;
    let output_path = output_dir.join(&file_name);
    models.save_as(&output_path)?;

    log::info!("Report written to {}", output_path.display());

    Ok(ReportOutcome {
        output_path,
        file_name,
        sheets: models.sheet_names(),
    })
}
