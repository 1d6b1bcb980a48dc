use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::{
  BuiltinFont, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
  Point,
};

use crate::error::AppError;
use crate::models::{TurnoverEntry, WriteOffEntry};
use crate::totals;
use crate::validation;

const MARGIN: f32 = 15.0;
const ROW_STEP: f32 = 6.0;
const BODY_SIZE: f32 = 10.0;
const TITLE_SIZE: f32 = 14.0;

#[derive(Clone, Copy)]
struct PageSize {
  width: f32,
  height: f32,
}

const A4_PORTRAIT: PageSize = PageSize {
  width: 210.0,
  height: 297.0,
};
const A4_LANDSCAPE: PageSize = PageSize {
  width: 297.0,
  height: 210.0,
};

struct Column {
  header: &'static str,
  x: f32,
}

const TURNOVER_COLUMNS: &[Column] = &[
  Column { header: "Name", x: 15.0 },
  Column { header: "Unit", x: 80.0 },
  Column { header: "Price", x: 110.0 },
  Column { header: "Quantity", x: 140.0 },
  Column { header: "Total", x: 170.0 },
];

const WRITE_OFF_COLUMNS: &[Column] = &[
  Column { header: "Name", x: 15.0 },
  Column { header: "Unit", x: 52.0 },
  Column { header: "Qty", x: 70.0 },
  Column { header: "Department", x: 88.0 },
  Column { header: "Device", x: 118.0 },
  Column { header: "Inv. no.", x: 155.0 },
  Column { header: "Reason", x: 180.0 },
  Column { header: "Date", x: 215.0 },
  Column { header: "Note", x: 240.0 },
];

/// Fixed-layout turnover report: portrait A4, five columns, totals line
/// right-aligned under the table.
pub fn export_turnover(rows: &[TurnoverEntry], path: &Path) -> Result<(), AppError> {
  let (doc, page_index, layer_index) = new_document("Turnover report", A4_PORTRAIT);
  let fonts = load_fonts(&doc)?;
  let mut table = TableWriter::new(&doc, page_index, layer_index, A4_PORTRAIT, TURNOVER_COLUMNS);
  table.title(&fonts, "Material turnover");
  table.subtitle(&fonts, &format!("Generated on {}", validation::current_date_string()));
  table.header_row(&fonts);

  for row in rows {
    table.row(&fonts, &turnover_cells(row));
  }

  let sums = totals::turnover_totals(rows);
  table.totals_line(
    &fonts,
    &format!("Total quantity: {:.2}   Total amount: {:.2}", sums.quantity, sums.amount),
  );

  save_document(doc, path)
}

/// Fixed-layout write-off history: landscape A4, nine columns.
pub fn export_write_off_history(rows: &[WriteOffEntry], path: &Path) -> Result<(), AppError> {
  let (doc, page_index, layer_index) = new_document("Write-off history", A4_LANDSCAPE);
  let fonts = load_fonts(&doc)?;
  let mut table = TableWriter::new(&doc, page_index, layer_index, A4_LANDSCAPE, WRITE_OFF_COLUMNS);
  table.title(&fonts, "Write-off history");
  table.subtitle(&fonts, &format!("Generated on {}", validation::current_date_string()));
  table.header_row(&fonts);

  for row in rows {
    table.row(&fonts, &write_off_cells(row));
  }

  let sums = totals::write_off_totals(rows);
  table.totals_line(&fonts, &format!("Total written off: {:.2}", sums.quantity));

  save_document(doc, path)
}

/// Month-scoped turnover report. An empty row set renders a placeholder
/// paragraph instead of a table.
pub fn export_turnover_month(
  rows: &[TurnoverEntry],
  month_name: &str,
  path: &Path,
) -> Result<(), AppError> {
  let (doc, page_index, layer_index) = new_document(&format!("Turnover for {month_name}"), A4_PORTRAIT);
  let fonts = load_fonts(&doc)?;
  let mut table = TableWriter::new(&doc, page_index, layer_index, A4_PORTRAIT, TURNOVER_COLUMNS);
  table.title(&fonts, &format!("Material turnover for {month_name}"));
  table.subtitle(&fonts, &format!("Generated on {}", validation::current_date_string()));

  if rows.is_empty() {
    table.paragraph(&fonts, &format!("No data for {month_name}."));
    return save_document(doc, path);
  }

  table.header_row(&fonts);
  for row in rows {
    table.row(&fonts, &turnover_cells(row));
  }
  let sums = totals::turnover_totals(rows);
  table.totals_line(
    &fonts,
    &format!("Total quantity: {:.2}   Total amount: {:.2}", sums.quantity, sums.amount),
  );

  save_document(doc, path)
}

fn turnover_cells(row: &TurnoverEntry) -> Vec<String> {
  vec![
    row.material_name.clone(),
    row.unit.clone(),
    format!("{:.2}", row.price),
    format!("{:.2}", row.quantity_end),
    format!("{:.2}", row.total_end),
  ]
}

fn write_off_cells(row: &WriteOffEntry) -> Vec<String> {
  vec![
    row.material_name.clone(),
    row.unit.clone(),
    row.quantity.map(|v| format!("{v:.2}")).unwrap_or_default(),
    row.department.clone(),
    row.device_name.clone(),
    row.inventory_number.clone(),
    row.reason.clone(),
    row.date.clone(),
    row.note.clone(),
  ]
}

struct Fonts {
  regular: IndirectFontRef,
  bold: IndirectFontRef,
}

fn new_document(
  title: &str,
  page: PageSize,
) -> (PdfDocumentReference, printpdf::PdfPageIndex, printpdf::PdfLayerIndex) {
  PdfDocument::new(title, Mm(page.width), Mm(page.height), "Layer 1")
}

fn load_fonts(doc: &PdfDocumentReference) -> Result<Fonts, AppError> {
  let regular = doc
    .add_builtin_font(BuiltinFont::Helvetica)
    .map_err(|err| AppError::new("EXPORT", err.to_string()))?;
  let bold = doc
    .add_builtin_font(BuiltinFont::HelveticaBold)
    .map_err(|err| AppError::new("EXPORT", err.to_string()))?;
  Ok(Fonts { regular, bold })
}

fn save_document(doc: PdfDocumentReference, path: &Path) -> Result<(), AppError> {
  let file = File::create(path)?;
  let mut writer = BufWriter::new(file);
  doc
    .save(&mut writer)
    .map_err(|err| AppError::new("EXPORT", err.to_string()))
}

struct TableWriter<'a> {
  doc: &'a PdfDocumentReference,
  layer: PdfLayerReference,
  page: PageSize,
  columns: &'static [Column],
  y: f32,
}

impl<'a> TableWriter<'a> {
  fn new(
    doc: &'a PdfDocumentReference,
    page_index: printpdf::PdfPageIndex,
    layer_index: printpdf::PdfLayerIndex,
    page: PageSize,
    columns: &'static [Column],
  ) -> Self {
    let layer = doc.get_page(page_index).get_layer(layer_index);
    Self {
      doc,
      layer,
      page,
      columns,
      y: page.height - MARGIN,
    }
  }

  fn title(&mut self, fonts: &Fonts, text: &str) {
    self
      .layer
      .use_text(text, TITLE_SIZE, Mm(MARGIN), Mm(self.y), &fonts.bold);
    self.y -= ROW_STEP + 2.0;
  }

  fn subtitle(&mut self, fonts: &Fonts, text: &str) {
    self
      .layer
      .use_text(text, BODY_SIZE, Mm(MARGIN), Mm(self.y), &fonts.regular);
    self.y -= ROW_STEP + 4.0;
  }

  fn paragraph(&mut self, fonts: &Fonts, text: &str) {
    self
      .layer
      .use_text(text, BODY_SIZE, Mm(MARGIN), Mm(self.y), &fonts.regular);
    self.y -= ROW_STEP;
  }

  fn header_row(&mut self, fonts: &Fonts) {
    for column in self.columns {
      self
        .layer
        .use_text(column.header, BODY_SIZE, Mm(column.x), Mm(self.y), &fonts.bold);
    }
    self.y -= 2.5;
    self.rule();
    self.y -= ROW_STEP - 1.0;
  }

  fn row(&mut self, fonts: &Fonts, cells: &[String]) {
    if self.y < MARGIN + ROW_STEP {
      self.new_page(fonts);
    }
    for (column, cell) in self.columns.iter().zip(cells) {
      self
        .layer
        .use_text(cell.as_str(), BODY_SIZE, Mm(column.x), Mm(self.y), &fonts.regular);
    }
    self.y -= ROW_STEP;
  }

  fn totals_line(&mut self, fonts: &Fonts, text: &str) {
    if self.y < MARGIN + ROW_STEP * 2.0 {
      self.new_page(fonts);
    }
    self.y -= 2.0;
    self.rule();
    self.y -= ROW_STEP;
    // Anchored under the last column; builtin fonts expose no metrics for
    // true right alignment.
    let x = self.columns.last().map(|column| column.x).unwrap_or(MARGIN);
    self
      .layer
      .use_text(text, BODY_SIZE, Mm((x - 55.0).max(MARGIN)), Mm(self.y), &fonts.bold);
  }

  fn new_page(&mut self, fonts: &Fonts) {
    let (page_index, layer_index) =
      self
        .doc
        .add_page(Mm(self.page.width), Mm(self.page.height), "Layer 1");
    self.layer = self.doc.get_page(page_index).get_layer(layer_index);
    self.y = self.page.height - MARGIN;
    self.header_row(fonts);
  }

  fn rule(&mut self) {
    self.layer.add_line(Line {
      points: vec![
        (Point::new(Mm(MARGIN), Mm(self.y)), false),
        (Point::new(Mm(self.page.width - MARGIN), Mm(self.y)), false),
      ],
      is_closed: false,
    });
  }
}
