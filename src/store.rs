use rusqlite::types::ValueRef;
use rusqlite::{params, params_from_iter, Connection, Row};

use crate::error::AppError;
use crate::models::{ComboSources, NewTurnover, NewWriteOff, TurnoverEntry, WriteOffEntry};
use crate::query::{month_query, turnover_query, write_off_query, Query};

pub fn list_turnover(conn: &Connection, filter: &str) -> Result<Vec<TurnoverEntry>, AppError> {
  select_turnover(conn, &turnover_query(filter))
}

pub fn list_write_offs(
  conn: &Connection,
  filter: &str,
  exact_date: Option<&str>,
) -> Result<Vec<WriteOffEntry>, AppError> {
  let query = write_off_query(filter, exact_date);
  let sql = format!(
    "SELECT Id, MaterialName, Unit, Quantity, Department, DeviceName, InventoryNumber, Reason, Date, Note
     FROM WriteOffs{} ORDER BY Id",
    query.where_sql()
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt.query_map(params_from_iter(query.params()), write_off_from_row)?;
  rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

/// Rows whose stored date falls in the given month, regardless of year.
/// Feeds the month-scoped report only.
pub fn turnover_for_month(conn: &Connection, month: u32) -> Result<Vec<TurnoverEntry>, AppError> {
  select_turnover(conn, &month_query(month))
}

/// `total_end` is computed here, once, and stored; reads take it at face
/// value.
pub fn insert_turnover(conn: &Connection, input: &NewTurnover, date: &str) -> Result<i64, AppError> {
  let total_end = input.price * input.quantity_end;
  conn.execute(
    "INSERT INTO Turnover (MaterialName, Unit, Price, QuantityEnd, TotalEnd, Date)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
    params![
      input.material_name,
      input.unit,
      input.price,
      input.quantity_end,
      total_end,
      date
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn insert_write_off(conn: &Connection, input: &NewWriteOff) -> Result<i64, AppError> {
  conn.execute(
    "INSERT INTO WriteOffs (MaterialName, Unit, Quantity, Department, DeviceName, InventoryNumber, Reason, Date, Note)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    params![
      input.material_name,
      input.unit,
      input.quantity,
      input.department,
      input.device_name,
      input.inventory_number,
      input.reason,
      input.date,
      input.note
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn fetch_turnover(conn: &Connection, id: i64) -> Result<TurnoverEntry, AppError> {
  conn
    .query_row(
      "SELECT Id, MaterialName, Unit, Price, QuantityEnd, TotalEnd, Date FROM Turnover WHERE Id = ?1",
      params![id],
      turnover_from_row,
    )
    .map_err(AppError::from)
}

pub fn fetch_write_off(conn: &Connection, id: i64) -> Result<WriteOffEntry, AppError> {
  conn
    .query_row(
      "SELECT Id, MaterialName, Unit, Quantity, Department, DeviceName, InventoryNumber, Reason, Date, Note
       FROM WriteOffs WHERE Id = ?1",
      params![id],
      write_off_from_row,
    )
    .map_err(AppError::from)
}

/// Selection-list sources: materials and units from both tables, departments
/// from write-offs only.
pub fn combo_sources(conn: &Connection) -> Result<ComboSources, AppError> {
  Ok(ComboSources {
    materials: distinct_strings(
      conn,
      "SELECT DISTINCT MaterialName FROM WriteOffs UNION SELECT DISTINCT MaterialName FROM Turnover",
    )?,
    units: distinct_strings(
      conn,
      "SELECT DISTINCT Unit FROM WriteOffs UNION SELECT DISTINCT Unit FROM Turnover",
    )?,
    departments: distinct_strings(conn, "SELECT DISTINCT Department FROM WriteOffs")?,
  })
}

fn select_turnover(conn: &Connection, query: &Query) -> Result<Vec<TurnoverEntry>, AppError> {
  let sql = format!(
    "SELECT Id, MaterialName, Unit, Price, QuantityEnd, TotalEnd, Date FROM Turnover{} ORDER BY Id",
    query.where_sql()
  );
  let mut stmt = conn.prepare(&sql)?;
  let rows = stmt.query_map(params_from_iter(query.params()), turnover_from_row)?;
  rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

fn distinct_strings(conn: &Connection, sql: &str) -> Result<Vec<String>, AppError> {
  let mut stmt = conn.prepare(sql)?;
  let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
  rows.collect::<Result<Vec<_>, _>>().map_err(AppError::from)
}

fn turnover_from_row(row: &Row<'_>) -> Result<TurnoverEntry, rusqlite::Error> {
  Ok(TurnoverEntry {
    id: row.get(0)?,
    material_name: row.get(1)?,
    unit: row.get(2)?,
    price: row.get(3)?,
    quantity_end: row.get(4)?,
    total_end: row.get(5)?,
    date: row.get(6)?,
  })
}

fn write_off_from_row(row: &Row<'_>) -> Result<WriteOffEntry, rusqlite::Error> {
  Ok(WriteOffEntry {
    id: row.get(0)?,
    material_name: row.get(1)?,
    unit: row.get(2)?,
    quantity: lenient_f64(row.get_ref(3)?),
    department: row.get(4)?,
    device_name: row.get(5)?,
    inventory_number: row.get(6)?,
    reason: row.get(7)?,
    date: row.get(8)?,
    note: row.get(9)?,
  })
}

/// Legacy imports left textual and NULL quantities behind; anything that is
/// not a number comes back as None and totals treat it as zero.
fn lenient_f64(value: ValueRef<'_>) -> Option<f64> {
  match value {
    ValueRef::Real(v) => Some(v),
    ValueRef::Integer(v) => Some(v as f64),
    ValueRef::Text(bytes) => std::str::from_utf8(bytes)
      .ok()
      .and_then(|text| text.trim().replace(',', ".").parse().ok()),
    _ => None,
  }
}
