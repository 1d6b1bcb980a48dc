use std::path::PathBuf;

use rusqlite::Connection;

use material_ledger::db;
use material_ledger::error::AppError;
use material_ledger::models::{NewTurnover, NewWriteOff};
use material_ledger::store;

fn main() -> Result<(), Box<dyn std::error::Error>> {
  let count = std::env::args()
    .nth(1)
    .and_then(|value| value.parse::<usize>().ok())
    .unwrap_or(40);

  let app_dir = if let Ok(path) = std::env::var("MATERIAL_LEDGER_SEED_DIR") {
    PathBuf::from(path)
  } else {
    db::resolve_app_dir()?
  };

  let db = db::init_db(&app_dir)?;
  let created = db.with_conn(|conn| seed_demo_data(conn, count))?;

  println!("Seeded {} rows in {}", created, app_dir.display());
  Ok(())
}

const MATERIALS: [(&str, &str, f64); 6] = [
  ("Paper A4", "pack", 5.40),
  ("Toner cartridge", "pcs", 78.00),
  ("Whiteboard marker", "box", 9.90),
  ("Envelope C5", "box", 4.20),
  ("Cleaning wipes", "pack", 3.10),
  ("Patch cable 2m", "pcs", 2.50),
];

const DEPARTMENTS: [&str; 4] = ["IT", "Accounting", "Warehouse", "Front office"];
const DEVICES: [&str; 4] = ["Printer HP-400", "Plotter X1", "Copier C-220", "Workstation 12"];
const REASONS: [&str; 4] = ["worn out", "monthly usage", "damaged", "maintenance"];

fn seed_demo_data(conn: &Connection, count: usize) -> Result<usize, AppError> {
  let mut rng = MockRng::new(chrono::Utc::now().timestamp_millis() as u64);

  for _ in 0..count {
    let month = rng.next_u32() % 12 + 1;
    let day = rng.next_u32() % 28 + 1;
    let date = format!("{day:02}.{month:02}.2024");

    let (name, unit, base_price) = MATERIALS[(rng.next_u32() as usize) % MATERIALS.len()];
    let quantity = (rng.next_u32() % 20 + 1) as f64;

    let is_turnover = (rng.next_u32() % 100) < 60;
    if is_turnover {
      let price = ((base_price + (rng.next_u32() % 200) as f64 / 100.0) * 100.0).round() / 100.0;
      store::insert_turnover(
        conn,
        &NewTurnover {
          material_name: name.to_string(),
          unit: unit.to_string(),
          price,
          quantity_end: quantity,
        },
        &date,
      )?;
    } else {
      store::insert_write_off(
        conn,
        &NewWriteOff {
          material_name: name.to_string(),
          unit: unit.to_string(),
          quantity,
          department: DEPARTMENTS[(rng.next_u32() as usize) % DEPARTMENTS.len()].to_string(),
          device_name: DEVICES[(rng.next_u32() as usize) % DEVICES.len()].to_string(),
          inventory_number: format!("INV-{:04}", rng.next_u32() % 10000),
          reason: REASONS[(rng.next_u32() as usize) % REASONS.len()].to_string(),
          date,
          note: String::new(),
        },
      )?;
    }
  }

  Ok(count)
}

struct MockRng {
  state: u64,
}

impl MockRng {
  fn new(seed: u64) -> Self {
    Self { state: seed }
  }

  fn next_u32(&mut self) -> u32 {
    self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
    (self.state >> 32) as u32
  }
}
