use rusqlite::types::Value;

/// One WHERE condition. Values are always bound as parameters; nothing here
/// is ever spliced into the SQL text.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
  /// Substring match on MaterialName or Unit (turnover search box).
  NameOrUnitContains(String),
  /// Substring match on MaterialName only (write-off search box).
  NameContains(String),
  /// Exact match on the stored `dd.mm.yyyy` date string.
  DateEquals(String),
  /// Match on the month component of the stored date, i.e. characters 4-5
  /// of `dd.mm.yyyy`, as a zero-padded two-digit string.
  MonthEquals(String),
}

impl Clause {
  fn sql(&self) -> &'static str {
    match self {
      Clause::NameOrUnitContains(_) => "(MaterialName LIKE ? OR Unit LIKE ?)",
      Clause::NameContains(_) => "MaterialName LIKE ?",
      Clause::DateEquals(_) => "Date = ?",
      Clause::MonthEquals(_) => "substr(Date, 4, 2) = ?",
    }
  }

  fn push_params(&self, out: &mut Vec<Value>) {
    match self {
      Clause::NameOrUnitContains(text) => {
        let pattern = format!("%{text}%");
        out.push(Value::Text(pattern.clone()));
        out.push(Value::Text(pattern));
      }
      Clause::NameContains(text) => out.push(Value::Text(format!("%{text}%"))),
      Clause::DateEquals(date) => out.push(Value::Text(date.clone())),
      Clause::MonthEquals(month) => out.push(Value::Text(month.clone())),
    }
  }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Query {
  clauses: Vec<Clause>,
}

impl Query {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn and(mut self, clause: Clause) -> Self {
    self.clauses.push(clause);
    self
  }

  /// Empty string when no clause is present, otherwise " WHERE a AND b".
  pub fn where_sql(&self) -> String {
    if self.clauses.is_empty() {
      return String::new();
    }
    let conditions: Vec<&str> = self.clauses.iter().map(Clause::sql).collect();
    format!(" WHERE {}", conditions.join(" AND "))
  }

  pub fn params(&self) -> Vec<Value> {
    let mut out = Vec::new();
    for clause in &self.clauses {
      clause.push_params(&mut out);
    }
    out
  }
}

/// Turnover view: empty filter loads everything.
pub fn turnover_query(filter: &str) -> Query {
  let mut query = Query::new();
  if !filter.is_empty() {
    query = query.and(Clause::NameOrUnitContains(filter.to_string()));
  }
  query
}

/// Write-off history view. The desktop form always supplies a date (its
/// picker cannot be empty), so callers passing Some scope history to a
/// single day; None is the reset path that shows the whole table.
pub fn write_off_query(filter: &str, exact_date: Option<&str>) -> Query {
  let mut query = Query::new();
  if !filter.is_empty() {
    query = query.and(Clause::NameContains(filter.to_string()));
  }
  if let Some(date) = exact_date {
    query = query.and(Clause::DateEquals(date.to_string()));
  }
  query
}

pub fn month_query(month: u32) -> Query {
  Query::new().and(Clause::MonthEquals(format!("{month:02}")))
}
