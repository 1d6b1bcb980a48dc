use std::cell::RefCell;
use std::path::{Path, PathBuf};

use material_ledger::db;
use material_ledger::error::AppError;
use material_ledger::export::opener::DocumentOpener;
use material_ledger::models::{NewTurnover, TurnoverForm, TurnoverTotals};
use material_ledger::{actions, store};

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

#[test]
fn add_search_total_export_flow() {
  let dir = tempfile::tempdir().unwrap();
  let db = db::init_db(dir.path()).unwrap();

  let entry = actions::add_turnover(
    &db,
    &TurnoverForm {
      material_name: "Paper".to_string(),
      unit: "pack".to_string(),
      price: "5.00".to_string(),
      quantity: "10".to_string(),
    },
  )
  .unwrap();
  assert_eq!(entry.total_end, 50.0);

  let (rows, totals) = actions::load_turnover(&db, "Paper").unwrap();
  assert_eq!(rows.len(), 1);
  assert_eq!(
    totals,
    TurnoverTotals {
      quantity: 10.0,
      amount: 50.0
    }
  );

  let out = dir.path().join("turnover.pdf");
  let opener = RecordingOpener::default();
  let written = actions::export_turnover_report(&db, "Paper", Some(&out), &opener).unwrap();
  assert_eq!(written.as_deref(), Some(out.as_path()));

  let bytes = std::fs::read(&out).unwrap();
  assert!(bytes.starts_with(b"%PDF"));

  // Content streams are written uncompressed, so the table text is
  // directly visible: exactly one data row plus the totals line.
  let content = String::from_utf8_lossy(&bytes);
  assert_eq!(content.matches("Paper").count(), 1);
  assert!(content.contains("Total quantity: 10.00   Total amount: 50.00"));

  assert_eq!(opener.opened.borrow().as_slice(), &[out]);
}

#[test]
fn month_report_scopes_by_stored_month() {
  let dir = tempfile::tempdir().unwrap();
  let db = db::init_db(dir.path()).unwrap();

  db.with_conn(|conn| {
    store::insert_turnover(
      conn,
      &NewTurnover {
        material_name: "Paper".to_string(),
        unit: "pack".to_string(),
        price: 5.0,
        quantity_end: 10.0,
      },
      "15.03.2024",
    )?;
    store::insert_turnover(
      conn,
      &NewTurnover {
        material_name: "Toner".to_string(),
        unit: "pcs".to_string(),
        price: 80.0,
        quantity_end: 2.0,
      },
      "01.04.2024",
    )?;
    Ok(())
  })
  .unwrap();

  let march = db.with_conn(|conn| store::turnover_for_month(conn, 3)).unwrap();
  assert_eq!(march.len(), 1);
  assert_eq!(march[0].material_name, "Paper");

  // A month with no rows still yields a document, the placeholder one.
  let out = dir.path().join("july.pdf");
  let opener = RecordingOpener::default();
  let written = actions::export_month_report(&db, 7, Some(&out), &opener).unwrap();
  assert!(written.is_some());
  assert!(std::fs::read(&out).unwrap().starts_with(b"%PDF"));
}

#[test]
fn history_defaults_to_single_day_scope() {
  let dir = tempfile::tempdir().unwrap();
  let db = db::init_db(dir.path()).unwrap();

  db.with_conn(|conn| {
    conn.execute(
      "INSERT INTO WriteOffs (MaterialName, Unit, Quantity, Department, DeviceName, InventoryNumber, Reason, Date, Note)
       VALUES ('Cartridge', 'pcs', 2.0, 'IT', 'Printer', 'INV-1', 'worn out', '15.03.2024', '')",
      [],
    )?;
    conn.execute(
      "INSERT INTO WriteOffs (MaterialName, Unit, Quantity, Department, DeviceName, InventoryNumber, Reason, Date, Note)
       VALUES ('Cartridge', 'pcs', 1.0, 'IT', 'Printer', 'INV-1', 'worn out', '16.03.2024', '')",
      [],
    )?;
    Ok(())
  })
  .unwrap();

  let (one_day, totals) = actions::load_write_offs(&db, "", Some("15.03.2024")).unwrap();
  assert_eq!(one_day.len(), 1);
  assert_eq!(totals.quantity, 2.0);

  let (all, totals) = actions::load_write_offs(&db, "", None).unwrap();
  assert_eq!(all.len(), 2);
  assert_eq!(totals.quantity, 3.0);
}
