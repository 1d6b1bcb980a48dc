use std::path::{Path, PathBuf};

use tracing::info;

use crate::db::Db;
use crate::error::AppError;
use crate::export::opener::DocumentOpener;
use crate::export::pdf;
use crate::models::{
  ComboSources, NewTurnover, NewWriteOff, TurnoverEntry, TurnoverForm, TurnoverTotals,
  WriteOffEntry, WriteOffForm, WriteOffTotals,
};
use crate::store;
use crate::totals;
use crate::validation;

const MONTH_NAMES: [&str; 12] = [
  "January", "February", "March", "April", "May", "June", "July", "August", "September",
  "October", "November", "December",
];

pub fn month_name(month: u32) -> &'static str {
  MONTH_NAMES[(month as usize).saturating_sub(1).min(11)]
}

/// Loads the turnover view and its running totals as one unit, so callers
/// never display rows and totals from different queries.
pub fn load_turnover(db: &Db, filter: &str) -> Result<(Vec<TurnoverEntry>, TurnoverTotals), AppError> {
  let rows = db.with_conn(|conn| store::list_turnover(conn, filter))?;
  let sums = totals::turnover_totals(&rows);
  info!(rows = rows.len(), filter, "turnover view loaded");
  Ok((rows, sums))
}

/// Write-off history. `exact_date` scopes the view to a single day, which
/// is what the desktop form always did; None is the reset path.
pub fn load_write_offs(
  db: &Db,
  filter: &str,
  exact_date: Option<&str>,
) -> Result<(Vec<WriteOffEntry>, WriteOffTotals), AppError> {
  if let Some(date) = exact_date {
    validation::parse_date(date)?;
  }
  let rows = db.with_conn(|conn| store::list_write_offs(conn, filter, exact_date))?;
  let sums = totals::write_off_totals(&rows);
  info!(rows = rows.len(), filter, "write-off history loaded");
  Ok((rows, sums))
}

/// "Add turnover" button: parse the text fields, stamp today's date, insert,
/// return the stored row.
pub fn add_turnover(db: &Db, form: &TurnoverForm) -> Result<TurnoverEntry, AppError> {
  let price = validation::parse_decimal("price", &form.price)?;
  let quantity_end = validation::parse_decimal("quantity", &form.quantity)?;
  let input = NewTurnover {
    material_name: form.material_name.clone(),
    unit: form.unit.clone(),
    price,
    quantity_end,
  };
  let date = validation::current_date_string();

  let entry = db.with_conn(|conn| {
    let id = store::insert_turnover(conn, &input, &date)?;
    store::fetch_turnover(conn, id)
  })?;
  info!(id = entry.id, material = %entry.material_name, "turnover entry added");
  Ok(entry)
}

/// "Save write-off" button: validates quantity and date before any SQL runs.
pub fn save_write_off(db: &Db, form: &WriteOffForm) -> Result<WriteOffEntry, AppError> {
  let quantity = validation::parse_decimal("quantity", &form.quantity)?;
  validation::parse_date(&form.date)?;
  let input = NewWriteOff {
    material_name: form.material_name.clone(),
    unit: form.unit.clone(),
    quantity,
    department: form.department.clone(),
    device_name: form.device_name.clone(),
    inventory_number: form.inventory_number.clone(),
    reason: form.reason.clone(),
    date: form.date.trim().to_string(),
    note: form.note.clone(),
  };

  let entry = db.with_conn(|conn| {
    let id = store::insert_write_off(conn, &input)?;
    store::fetch_write_off(conn, id)
  })?;
  info!(id = entry.id, material = %entry.material_name, "write-off saved");
  Ok(entry)
}

/// Selection-list contents, refreshed after every insert.
pub fn selection_lists(db: &Db) -> Result<ComboSources, AppError> {
  db.with_conn(store::combo_sources)
}

/// Exports the turnover view. A None destination is the cancelled save
/// dialog: a silent no-op, not an error.
pub fn export_turnover_report(
  db: &Db,
  filter: &str,
  destination: Option<&Path>,
  opener: &dyn DocumentOpener,
) -> Result<Option<PathBuf>, AppError> {
  let Some(path) = destination else {
    return Ok(None);
  };
  let rows = db.with_conn(|conn| store::list_turnover(conn, filter))?;
  pdf::export_turnover(&rows, path)?;
  opener.open(path)?;
  info!(rows = rows.len(), path = %path.display(), "turnover report exported");
  Ok(Some(path.to_path_buf()))
}

pub fn export_write_off_report(
  db: &Db,
  filter: &str,
  exact_date: Option<&str>,
  destination: Option<&Path>,
  opener: &dyn DocumentOpener,
) -> Result<Option<PathBuf>, AppError> {
  if let Some(date) = exact_date {
    validation::parse_date(date)?;
  }
  let Some(path) = destination else {
    return Ok(None);
  };
  let rows = db.with_conn(|conn| store::list_write_offs(conn, filter, exact_date))?;
  pdf::export_write_off_history(&rows, path)?;
  opener.open(path)?;
  info!(rows = rows.len(), path = %path.display(), "write-off report exported");
  Ok(Some(path.to_path_buf()))
}

/// Month-scoped turnover report: re-queries the store by the month component
/// of the stored date, independent of any loaded view. Month validation
/// runs before the cancellation check.
pub fn export_month_report(
  db: &Db,
  month: u32,
  destination: Option<&Path>,
  opener: &dyn DocumentOpener,
) -> Result<Option<PathBuf>, AppError> {
  let month = validation::ensure_month(month)?;
  let Some(path) = destination else {
    return Ok(None);
  };
  let rows = db.with_conn(|conn| store::turnover_for_month(conn, month))?;
  pdf::export_turnover_month(&rows, month_name(month), path)?;
  opener.open(path)?;
  info!(rows = rows.len(), month, path = %path.display(), "monthly report exported");
  Ok(Some(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
  use std::cell::RefCell;

  use super::*;
  use crate::db;

  #[derive(Default)]
  struct RecordingOpener {
    opened: RefCell<Vec<PathBuf>>,
  }

  impl DocumentOpener for RecordingOpener {
    fn open(&self, path: &Path) -> Result<(), AppError> {
      self.opened.borrow_mut().push(path.to_path_buf());
      Ok(())
    }
  }

  fn turnover_form(price: &str, quantity: &str) -> TurnoverForm {
    TurnoverForm {
      material_name: "Paper".to_string(),
      unit: "pack".to_string(),
      price: price.to_string(),
      quantity: quantity.to_string(),
    }
  }

  #[test]
  fn add_turnover_computes_total_and_refreshes_lists() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();

    let entry = add_turnover(&db, &turnover_form("5.00", "10")).unwrap();
    assert_eq!(entry.total_end, 50.0);

    let lists = selection_lists(&db).unwrap();
    assert_eq!(lists.materials, vec!["Paper".to_string()]);
  }

  #[test]
  fn non_numeric_price_is_a_validation_error_with_no_write() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();

    let err = add_turnover(&db, &turnover_form("abc", "10")).unwrap_err();
    assert_eq!(err.code, "VALIDATION");
    let (rows, _) = load_turnover(&db, "").unwrap();
    assert!(rows.is_empty());
  }

  #[test]
  fn write_off_rejects_bad_date() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    let form = WriteOffForm {
      material_name: "Cartridge".to_string(),
      unit: "pcs".to_string(),
      quantity: "2".to_string(),
      department: "IT".to_string(),
      device_name: String::new(),
      inventory_number: String::new(),
      reason: String::new(),
      date: "2024-03-15".to_string(),
      note: String::new(),
    };
    let err = save_write_off(&db, &form).unwrap_err();
    assert_eq!(err.code, "VALIDATION");
  }

  #[test]
  fn cancelled_export_is_a_silent_no_op() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    let opener = RecordingOpener::default();

    let result = export_turnover_report(&db, "", None, &opener).unwrap();
    assert_eq!(result, None);
    assert!(opener.opened.borrow().is_empty());
  }

  #[test]
  fn export_opens_the_written_file() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    add_turnover(&db, &turnover_form("5.00", "10")).unwrap();

    let out = dir.path().join("turnover.pdf");
    let opener = RecordingOpener::default();
    let written = export_turnover_report(&db, "", Some(&out), &opener).unwrap();
    assert_eq!(written.as_deref(), Some(out.as_path()));
    assert_eq!(opener.opened.borrow().as_slice(), &[out]);
  }

  #[test]
  fn month_export_out_of_range_month_fails_before_path_check() {
    let dir = tempfile::tempdir().unwrap();
    let db = db::init_db(dir.path()).unwrap();
    let opener = RecordingOpener::default();

    let err = export_month_report(&db, 13, None, &opener).unwrap_err();
    assert_eq!(err.code, "VALIDATION");
  }
}
