use flat2sql_common::{Flat2SqlError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::profile::{ColumnProfile, SqlType};

/// Target SQL engine. Closed set: generation dispatches on this enum, and
/// `FromStr` is the single entry point for dialect strings, so the
/// generators themselves only ever see valid dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    MySql,
    Sqlite,
}

impl FromStr for Dialect {
    type Err = Flat2SqlError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mysql" => Ok(Dialect::MySql),
            "sqlite" => Ok(Dialect::Sqlite),
            other => Err(Flat2SqlError::UnsupportedDialect(other.to_owned())),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::MySql => write!(f, "mysql"),
            Dialect::Sqlite => write!(f, "sqlite"),
        }
    }
}

impl Dialect {
    /// The literal text standing in for SQL NULL in the cleaned data file.
    /// The same value must be passed to the scan that writes the cleaned
    /// file and to `generate_import`; `\N` is MySQL's LOAD DATA convention,
    /// sqlite3's .import reads empty fields as empty strings.
    pub fn null_sentinel(self) -> &'static str {
        match self {
            Dialect::MySql => "\\N",
            Dialect::Sqlite => "",
        }
    }

    pub fn quote_ident(self, name: &str) -> String {
        match self {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            Dialect::Sqlite => format!("\"{}\"", name.replace('"', "\"\"")),
        }
    }

    fn column_type(self, col: &ColumnProfile) -> String {
        match (self, col.sql_type) {
            (Dialect::MySql, SqlType::Integer) => {
                let wide = col
                    .int_bounds()
                    .map(|(lo, hi)| lo < i64::from(i32::MIN) || hi > i64::from(i32::MAX))
                    .unwrap_or(false);
                if wide { "BIGINT" } else { "INT" }.to_owned()
            }
            (Dialect::MySql, SqlType::Float) => "DOUBLE".to_owned(),
            (Dialect::MySql, SqlType::Date) => "DATE".to_owned(),
            (Dialect::MySql, SqlType::Text) => {
                if col.max_length <= 255 {
                    format!("VARCHAR({})", col.max_length.max(1))
                } else {
                    "TEXT".to_owned()
                }
            }
            (Dialect::Sqlite, SqlType::Integer) => "INTEGER".to_owned(),
            (Dialect::Sqlite, SqlType::Float) => "REAL".to_owned(),
            (Dialect::Sqlite, SqlType::Date) | (Dialect::Sqlite, SqlType::Text) => {
                "TEXT".to_owned()
            }
        }
    }
}

/// DDL and import text for one file, produced together or not at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlScript {
    pub ddl: String,
    pub import: String,
}

pub fn generate_ddl(dialect: Dialect, table: &str, columns: &[ColumnProfile]) -> Result<String> {
    if columns.is_empty() {
        return Err(Flat2SqlError::Other(
            "cannot generate DDL without columns".to_owned(),
        ));
    }
    let mut out = format!("CREATE TABLE {} (\n", dialect.quote_ident(table));
    for (i, col) in columns.iter().enumerate() {
        let not_null = if col.empty > 0 { "" } else { " NOT NULL" };
        let comma = if i + 1 < columns.len() { "," } else { "" };
        out.push_str(&format!(
            "  {} {}{}{}\n",
            dialect.quote_ident(&col.name),
            dialect.column_type(col),
            not_null,
            comma
        ));
    }
    out.push_str(");");
    Ok(out)
}

pub fn generate_import(
    dialect: Dialect,
    table: &str,
    columns: &[ColumnProfile],
    data_path: &Path,
    delimiter: u8,
) -> Result<String> {
    if columns.is_empty() {
        return Err(Flat2SqlError::Other(
            "cannot generate an import statement without columns".to_owned(),
        ));
    }
    let path_lit = data_path
        .display()
        .to_string()
        .replace('\\', "\\\\")
        .replace('\'', "\\'");
    let delim_lit = match delimiter {
        b'\t' => "\\t".to_owned(),
        d => (d as char).to_string(),
    };
    match dialect {
        Dialect::MySql => {
            let cols: Vec<String> = columns
                .iter()
                .map(|c| dialect.quote_ident(&c.name))
                .collect();
            Ok(format!(
                "LOAD DATA LOCAL INFILE '{}' INTO TABLE {}\n\
                 FIELDS TERMINATED BY '{}'\n\
                 LINES TERMINATED BY '\\n'\n\
                 IGNORE 1 LINES\n\
                 ({});",
                path_lit,
                dialect.quote_ident(table),
                delim_lit,
                cols.join(", ")
            ))
        }
        Dialect::Sqlite => {
            // sqlite3 shell directives; --skip 1 drops the echoed header row
            Ok(format!(
                ".separator \"{}\"\n.import --skip 1 '{}' {}",
                delim_lit, path_lit, table
            ))
        }
    }
}

/// Produce DDL and import text atomically from one call.
pub fn generate_script(
    dialect: Dialect,
    table: &str,
    columns: &[ColumnProfile],
    data_path: &Path,
    delimiter: u8,
) -> Result<SqlScript> {
    let ddl = generate_ddl(dialect, table, columns)?;
    let import = generate_import(dialect, table, columns, data_path, delimiter)?;
    Ok(SqlScript { ddl, import })
}
