use serde::{Deserialize, Serialize};

/// Period-end balance row from the Turnover table. Append-only; `total_end`
/// is fixed at insert time and never recomputed on read.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TurnoverEntry {
  pub id: i64,
  pub material_name: String,
  pub unit: String,
  pub price: f64,
  pub quantity_end: f64,
  pub total_end: f64,
  pub date: String,
}

/// Consumption/disposal row from the WriteOffs table. `quantity` is None
/// when the stored value is missing or not numeric (legacy imports).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WriteOffEntry {
  pub id: i64,
  pub material_name: String,
  pub unit: String,
  pub quantity: Option<f64>,
  pub department: String,
  pub device_name: String,
  pub inventory_number: String,
  pub reason: String,
  pub date: String,
  pub note: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewTurnover {
  pub material_name: String,
  pub unit: String,
  pub price: f64,
  pub quantity_end: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct NewWriteOff {
  pub material_name: String,
  pub unit: String,
  pub quantity: f64,
  pub department: String,
  pub device_name: String,
  pub inventory_number: String,
  pub reason: String,
  pub date: String,
  pub note: String,
}

/// Raw text-field values as the user typed them. Numeric parsing happens
/// at the action boundary so bad input never reaches the store.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TurnoverForm {
  pub material_name: String,
  pub unit: String,
  pub price: String,
  pub quantity: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WriteOffForm {
  pub material_name: String,
  pub unit: String,
  pub quantity: String,
  pub department: String,
  pub device_name: String,
  pub inventory_number: String,
  pub reason: String,
  pub date: String,
  pub note: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnoverTotals {
  pub quantity: f64,
  pub amount: f64,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct WriteOffTotals {
  pub quantity: f64,
}

/// Distinct values feeding the selection lists, recomputed after every
/// insert.
#[derive(Debug, Serialize, Deserialize)]
pub struct ComboSources {
  pub materials: Vec<String>,
  pub units: Vec<String>,
  pub departments: Vec<String>,
}
