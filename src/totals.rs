use crate::models::{TurnoverEntry, TurnoverTotals, WriteOffEntry, WriteOffTotals};

/// Running totals over the full loaded row set (views are not paginated).
pub fn turnover_totals(rows: &[TurnoverEntry]) -> TurnoverTotals {
  let mut totals = TurnoverTotals {
    quantity: 0.0,
    amount: 0.0,
  };
  for row in rows {
    totals.quantity += row.quantity_end;
    totals.amount += row.total_end;
  }
  totals
}

/// Rows with a missing or unparseable quantity contribute zero.
pub fn write_off_totals(rows: &[WriteOffEntry]) -> WriteOffTotals {
  WriteOffTotals {
    quantity: rows.iter().filter_map(|row| row.quantity).sum(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn turnover(quantity_end: f64, total_end: f64) -> TurnoverEntry {
    TurnoverEntry {
      id: 0,
      material_name: "Paper".to_string(),
      unit: "pack".to_string(),
      price: 0.0,
      quantity_end,
      total_end,
      date: "15.03.2024".to_string(),
    }
  }

  fn write_off(quantity: Option<f64>) -> WriteOffEntry {
    WriteOffEntry {
      id: 0,
      material_name: "Cartridge".to_string(),
      unit: "pcs".to_string(),
      quantity,
      department: "IT".to_string(),
      device_name: String::new(),
      inventory_number: String::new(),
      reason: String::new(),
      date: "15.03.2024".to_string(),
      note: String::new(),
    }
  }

  #[test]
  fn sums_quantity_and_amount() {
    let rows = vec![turnover(10.0, 50.0), turnover(2.5, 200.0)];
    assert_eq!(
      turnover_totals(&rows),
      TurnoverTotals {
        quantity: 12.5,
        amount: 250.0
      }
    );
  }

  #[test]
  fn empty_set_totals_to_zero() {
    assert_eq!(
      turnover_totals(&[]),
      TurnoverTotals {
        quantity: 0.0,
        amount: 0.0
      }
    );
    assert_eq!(write_off_totals(&[]), WriteOffTotals { quantity: 0.0 });
  }

  #[test]
  fn missing_quantities_contribute_zero() {
    let rows = vec![write_off(Some(2.0)), write_off(None), write_off(Some(1.5))];
    assert_eq!(write_off_totals(&rows), WriteOffTotals { quantity: 3.5 });
  }
}
