use chrono::NaiveDate;

use crate::error::AppError;

/// Parses a user-typed number. Accepts a comma as decimal separator since
/// the forms historically ran under a comma locale.
pub fn parse_decimal(label: &str, raw: &str) -> Result<f64, AppError> {
  raw
    .trim()
    .replace(',', ".")
    .parse::<f64>()
    .map_err(|_| AppError::validation(format!("{label} must be a number, got '{}'", raw.trim())))
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
  NaiveDate::parse_from_str(raw.trim(), "%d.%m.%Y")
    .map_err(|_| AppError::validation(format!("date must be dd.mm.yyyy, got '{}'", raw.trim())))
}

pub fn ensure_month(month: u32) -> Result<u32, AppError> {
  if (1..=12).contains(&month) {
    Ok(month)
  } else {
    Err(AppError::validation(format!("month must be 1-12, got {month}")))
  }
}

/// Current local date in the stored `dd.mm.yyyy` form.
pub fn current_date_string() -> String {
  chrono::Local::now().format("%d.%m.%Y").to_string()
}
