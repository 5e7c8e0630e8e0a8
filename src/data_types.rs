use std::fmt;

use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Bruttoinlandsprodukt,
    Erwerbstaetige,
}

impl TableKind {
    pub const ALL: [TableKind; 2] = [TableKind::Bruttoinlandsprodukt, TableKind::Erwerbstaetige];

    // Path segment exactly as the API registers it, misspelling included.
    pub fn slug(&self) -> &'static str {
        match self {
            TableKind::Bruttoinlandsprodukt => "bruftoinlandsprodukt_in_jeweiligen_preisen",
            TableKind::Erwerbstaetige => "erwerbstaefige",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TableKind::Bruttoinlandsprodukt => "Bruftoinlandsprodukt in jeweiligen Preisen",
            TableKind::Erwerbstaetige => "Erwerbstäfige (Inlandskonzept)",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Bundesland,
    Regierungsbezirk,
    Kreis,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Bundesland, Level::Regierungsbezirk, Level::Kreis];

    pub fn path_segment(&self) -> &'static str {
        match self {
            Level::Bundesland => "1",
            Level::Regierungsbezirk => "2",
            Level::Kreis => "3",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Bundesland => "Auf Bundeslandebene",
            Level::Regierungsbezirk => "Auf Regierungsbezirk",
            Level::Kreis => "Auf Kreisebene",
        })
    }
}

/// The pair of choices driving both fetches. Setters return a new snapshot
/// so a response can be compared against the selection it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub table: TableKind,
    pub level: Level,
}

impl Selection {
    pub fn with_table(self, table: TableKind) -> Self {
        Selection { table, ..self }
    }

    pub fn with_level(self, level: Level) -> Self {
        Selection { level, ..self }
    }
}

impl Default for Selection {
    fn default() -> Self {
        Selection {
            table: TableKind::Bruttoinlandsprodukt,
            level: Level::Bundesland,
        }
    }
}

/// One record of a fetched table. Column names vary per table, so rows stay
/// as JSON objects; key order is the server-provided column order.
pub type Row = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn empty() -> Self {
        Dataset { rows: Vec::new() }
    }
}

/// Cell text for one column of a row. Missing keys and nulls render empty.
pub fn cell_text(row: &Row, column: &str) -> String {
    match row.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub const METADATA_LINES: usize = 3;

/// Up to three descriptive lines shown above the table, addressed by
/// position. Missing entries read as empty lines.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    lines: Vec<String>,
}

impl Metadata {
    pub fn new(mut lines: Vec<String>) -> Self {
        lines.truncate(METADATA_LINES);
        Metadata { lines }
    }

    pub fn line(&self, index: usize) -> &str {
        self.lines.get(index).map(String::as_str).unwrap_or("")
    }
}
