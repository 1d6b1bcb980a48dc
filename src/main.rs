use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use material_ledger::db;
use material_ledger::error::AppError;
use material_ledger::export::opener::{DocumentOpener, NoopOpener, ShellOpener};
use material_ledger::models::{
  TurnoverEntry, TurnoverForm, TurnoverTotals, WriteOffEntry, WriteOffForm, WriteOffTotals,
};
use material_ledger::{actions, validation};

#[derive(Parser)]
#[command(
  name = "material-ledger",
  about = "Material inventory turnover and write-off ledger",
  version
)]
struct Cli {
  /// Data directory holding inventory.db (defaults to the platform data dir).
  #[arg(long, global = true)]
  data_dir: Option<PathBuf>,
  /// Emit rows and totals as JSON instead of a table.
  #[arg(long, global = true)]
  json: bool,
  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Show the turnover ledger, filtered by material name or unit substring.
  Turnover {
    #[arg(long, default_value = "")]
    filter: String,
  },
  /// Show write-off history. With --date (or --today) the view covers that
  /// single day, as the desktop date picker always did; with neither, the
  /// whole table.
  History {
    #[arg(long, default_value = "")]
    filter: String,
    /// Exact day, dd.mm.yyyy.
    #[arg(long, conflicts_with = "today")]
    date: Option<String>,
    #[arg(long)]
    today: bool,
  },
  /// Add a period-end turnover entry; the date is stamped with today.
  AddTurnover {
    #[arg(long)]
    material: String,
    #[arg(long)]
    unit: String,
    #[arg(long)]
    price: String,
    #[arg(long)]
    quantity: String,
  },
  /// Record a material write-off.
  AddWriteOff {
    #[arg(long)]
    material: String,
    #[arg(long)]
    unit: String,
    #[arg(long)]
    quantity: String,
    #[arg(long)]
    department: String,
    #[arg(long, default_value = "")]
    device: String,
    #[arg(long, default_value = "")]
    inventory_number: String,
    #[arg(long, default_value = "")]
    reason: String,
    /// dd.mm.yyyy
    #[arg(long)]
    date: String,
    #[arg(long, default_value = "")]
    note: String,
  },
  /// Show the selection lists (materials, units, departments).
  Lists,
  /// Export the turnover ledger as a PDF.
  ExportTurnover {
    #[arg(long, default_value = "")]
    filter: String,
    #[arg(long)]
    out: Option<PathBuf>,
    /// Skip handing the file to the OS viewer.
    #[arg(long)]
    no_open: bool,
  },
  /// Export write-off history as a PDF.
  ExportHistory {
    #[arg(long, default_value = "")]
    filter: String,
    #[arg(long)]
    date: Option<String>,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    no_open: bool,
  },
  /// Export the turnover entries of one month (1-12) as a PDF.
  ExportMonth {
    #[arg(long)]
    month: u32,
    #[arg(long)]
    out: Option<PathBuf>,
    #[arg(long)]
    no_open: bool,
  },
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
    .init();

  let cli = Cli::parse();
  if let Err(err) = run(cli) {
    eprintln!("{err}");
    std::process::exit(1);
  }
}

fn run(cli: Cli) -> Result<(), AppError> {
  let app_dir = match &cli.data_dir {
    Some(dir) => dir.clone(),
    None => db::resolve_app_dir()?,
  };
  let db = db::init_db(&app_dir)?;
  let json = cli.json;

  match cli.command {
    Command::Turnover { filter } => {
      let (rows, sums) = actions::load_turnover(&db, &filter)?;
      print_turnover(&rows, &sums, json)
    }
    Command::History { filter, date, today } => {
      let date = if today {
        Some(validation::current_date_string())
      } else {
        date
      };
      let (rows, sums) = actions::load_write_offs(&db, &filter, date.as_deref())?;
      print_write_offs(&rows, &sums, json)
    }
    Command::AddTurnover {
      material,
      unit,
      price,
      quantity,
    } => {
      let entry = actions::add_turnover(
        &db,
        &TurnoverForm {
          material_name: material,
          unit,
          price,
          quantity,
        },
      )?;
      println!(
        "Added #{}: {} {} x {:.2} @ {:.2} = {:.2} ({})",
        entry.id, entry.material_name, entry.unit, entry.quantity_end, entry.price,
        entry.total_end, entry.date
      );
      Ok(())
    }
    Command::AddWriteOff {
      material,
      unit,
      quantity,
      department,
      device,
      inventory_number,
      reason,
      date,
      note,
    } => {
      let entry = actions::save_write_off(
        &db,
        &WriteOffForm {
          material_name: material,
          unit,
          quantity,
          department,
          device_name: device,
          inventory_number,
          reason,
          date,
          note,
        },
      )?;
      println!(
        "Saved write-off #{}: {} ({}) on {}",
        entry.id, entry.material_name, entry.department, entry.date
      );
      Ok(())
    }
    Command::Lists => {
      let lists = actions::selection_lists(&db)?;
      if json {
        print_json(&lists)
      } else {
        println!("Materials:   {}", lists.materials.join(", "));
        println!("Units:       {}", lists.units.join(", "));
        println!("Departments: {}", lists.departments.join(", "));
        Ok(())
      }
    }
    Command::ExportTurnover { filter, out, no_open } => report_outcome(
      actions::export_turnover_report(&db, &filter, out.as_deref(), opener(no_open))?,
    ),
    Command::ExportHistory {
      filter,
      date,
      out,
      no_open,
    } => report_outcome(actions::export_write_off_report(
      &db,
      &filter,
      date.as_deref(),
      out.as_deref(),
      opener(no_open),
    )?),
    Command::ExportMonth { month, out, no_open } => report_outcome(
      actions::export_month_report(&db, month, out.as_deref(), opener(no_open))?,
    ),
  }
}

fn opener(no_open: bool) -> &'static dyn DocumentOpener {
  if no_open {
    &NoopOpener
  } else {
    &ShellOpener
  }
}

fn report_outcome(written: Option<PathBuf>) -> Result<(), AppError> {
  // None is a cancelled destination: stay quiet.
  if let Some(path) = written {
    println!("Report written to {}", path.display());
  }
  Ok(())
}

fn print_turnover(rows: &[TurnoverEntry], sums: &TurnoverTotals, json: bool) -> Result<(), AppError> {
  if json {
    return print_json(&serde_json::json!({ "rows": rows, "totals": sums }));
  }
  println!(
    "{:<30} {:<8} {:>10} {:>10} {:>12}  {}",
    "Name", "Unit", "Price", "Quantity", "Total", "Date"
  );
  for row in rows {
    println!(
      "{:<30} {:<8} {:>10.2} {:>10.2} {:>12.2}  {}",
      row.material_name, row.unit, row.price, row.quantity_end, row.total_end, row.date
    );
  }
  println!(
    "Total quantity: {:.2}   Total amount: {:.2}",
    sums.quantity, sums.amount
  );
  Ok(())
}

fn print_write_offs(rows: &[WriteOffEntry], sums: &WriteOffTotals, json: bool) -> Result<(), AppError> {
  if json {
    return print_json(&serde_json::json!({ "rows": rows, "totals": sums }));
  }
  println!(
    "{:<24} {:<8} {:>8} {:<14} {:<20} {:<10} {:<16} {:<10} {}",
    "Name", "Unit", "Qty", "Department", "Device", "Inv. no.", "Reason", "Date", "Note"
  );
  for row in rows {
    let quantity = row.quantity.map(|v| format!("{v:.2}")).unwrap_or_default();
    println!(
      "{:<24} {:<8} {:>8} {:<14} {:<20} {:<10} {:<16} {:<10} {}",
      row.material_name,
      row.unit,
      quantity,
      row.department,
      row.device_name,
      row.inventory_number,
      row.reason,
      row.date,
      row.note
    );
  }
  println!("Total written off: {:.2}", sums.quantity);
  Ok(())
}

fn print_json(value: &impl serde::Serialize) -> Result<(), AppError> {
  let text = serde_json::to_string_pretty(value)
    .map_err(|err| AppError::new("IO_ERROR", err.to_string()))?;
  println!("{text}");
  Ok(())
}
