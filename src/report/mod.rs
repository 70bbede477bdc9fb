mod builder;
mod columns;
mod last_month;
mod months;

pub use builder::{
    BRANDS_TOTAL_LABEL, MODELS_TOTAL_LABEL, ReportOutcome, ReportParameters,
    VOLKSWAGEN_SEGMENTATION, build_file_name, generate_report, is_auxiliary_sheet, parse_month,
    segment_code,
};
pub use columns::{HEADER_ROW, find_column, find_columns};
pub use last_month::{LastMonth, REGISTRATION_HEADER, TotalRow, find_last_month};
pub use months::{MONTH_ROW, translate_months};
