use std::fmt;

#[derive(Clone, Debug, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date
    DateTime(f64),
    /// Error value such as `#DIV/0!` or `#N/A`
    Error(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value the way it reads in a cell: integral numbers carry no
    /// fractional part, so a month stored as `3.0` becomes `"3"`.
    pub fn to_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) | CellValue::Error(s) => s.clone(),
            CellValue::Number(f) | CellValue::DateTime(f) => format_number(*f),
            CellValue::Bool(b) => {
                if *b {
                    "TRUE".to_string()
                } else {
                    "FALSE".to_string()
                }
            }
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

fn format_number(f: f64) -> String {
    if f == (f as i64) as f64 && f.abs() < 1e15 {
        (f as i64).to_string()
    } else {
        f.to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Cell {
    pub value: CellValue,
    /// Formula text without the leading `=`, as read from the source file
    pub formula: Option<String>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            formula: None,
        }
    }

    pub fn with_formula(value: CellValue, formula: String) -> Self {
        Self {
            value,
            formula: Some(formula),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty() && self.formula.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_numbers_render_without_fraction() {
        assert_eq!(CellValue::Number(3.0).to_text(), "3");
        assert_eq!(CellValue::Number(12.0).to_text(), "12");
        assert_eq!(CellValue::Number(2.5).to_text(), "2.5");
        assert_eq!(CellValue::Number(-4.0).to_text(), "-4");
    }

    #[test]
    fn empty_text_counts_as_empty() {
        assert!(CellValue::text("").is_empty());
        assert!(CellValue::Empty.is_empty());
        assert!(!CellValue::Number(0.0).is_empty());
        assert!(!CellValue::Error("#N/A".to_string()).is_empty());
    }

    #[test]
    fn error_values_are_not_header_text() {
        let value = CellValue::Error("#DIV/0!".to_string());
        assert_eq!(value.to_text(), "#DIV/0!");
        assert_eq!(value.as_text(), None);
    }
}
