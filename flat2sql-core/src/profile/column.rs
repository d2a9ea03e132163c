use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Inferred column type. A column's hypothesis only ever moves down the
/// lattice INTEGER -> FLOAT -> TEXT (DATE sits beside the numerics and
/// collapses to TEXT when mixed with anything else).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SqlType {
    Integer,
    Float,
    Date,
    Text,
}

impl SqlType {
    /// Lattice meet: never promotes.
    pub fn meet(self, other: SqlType) -> SqlType {
        use SqlType::*;
        match (self, other) {
            (Integer, Integer) => Integer,
            (Integer, Float) | (Float, Integer) | (Float, Float) => Float,
            (Date, Date) => Date,
            _ => Text,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SqlType::Integer => "INTEGER",
            SqlType::Float => "FLOAT",
            SqlType::Date => "DATE",
            SqlType::Text => "TEXT",
        }
    }
}

static RE_DATE: OnceLock<Regex> = OnceLock::new();

fn re_date() -> &'static Regex {
    RE_DATE.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap())
}

/// Classify one raw field. No implicit trimming: whitespace makes a field
/// non-numeric. Integers are base-10 `i64`; anything `f64` accepts but `i64`
/// rejects (fraction, exponent, out-of-range) counts as FLOAT.
pub fn classify(field: &str) -> SqlType {
    if field.parse::<i64>().is_ok() {
        SqlType::Integer
    } else if field.parse::<f64>().is_ok() {
        SqlType::Float
    } else if re_date().is_match(field) {
        SqlType::Date
    } else {
        SqlType::Text
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnProfile {
    pub index: usize,
    pub name: String,
    pub sql_type: SqlType,
    pub min_value: Option<String>,
    pub max_value: Option<String>,
    pub min_length: usize,
    pub max_length: usize,
    pub populated: u64,
    pub empty: u64,
}

impl ColumnProfile {
    /// Integer extremes, available when `sql_type` is INTEGER and the column
    /// had at least one populated value.
    pub fn int_bounds(&self) -> Option<(i64, i64)> {
        if self.sql_type != SqlType::Integer {
            return None;
        }
        let lo = self.min_value.as_deref()?.parse().ok()?;
        let hi = self.max_value.as_deref()?.parse().ok()?;
        Some((lo, hi))
    }
}

/// Per-column streaming accumulator. Numeric and lexical extremes are
/// tracked simultaneously so a late demotion to TEXT never needs a second
/// pass over the data; `finish` picks the tracker matching the terminal
/// hypothesis.
pub struct ColumnAccumulator {
    index: usize,
    name: String,
    hypothesis: Option<SqlType>,
    populated: u64,
    empty: u64,
    min_len: usize,
    max_len: usize,
    int_min: Option<i64>,
    int_max: Option<i64>,
    float_min: Option<(f64, String)>,
    float_max: Option<(f64, String)>,
    lex_min: Option<String>,
    lex_max: Option<String>,
}

impl ColumnAccumulator {
    pub fn new(index: usize, name: &str) -> Self {
        Self {
            index,
            name: name.to_owned(),
            hypothesis: None,
            populated: 0,
            empty: 0,
            min_len: usize::MAX,
            max_len: 0,
            int_min: None,
            int_max: None,
            float_min: None,
            float_max: None,
            lex_min: None,
            lex_max: None,
        }
    }

    pub fn add_empty(&mut self) {
        self.empty += 1;
    }

    pub fn add_value(&mut self, raw: &str) {
        self.populated += 1;
        let len = raw.len();
        if len < self.min_len {
            self.min_len = len;
        }
        if len > self.max_len {
            self.max_len = len;
        }

        let class = classify(raw);
        self.hypothesis = Some(match self.hypothesis {
            None => class,
            Some(h) => h.meet(class),
        });

        if let Ok(v) = raw.parse::<i64>() {
            if self.int_min.map_or(true, |m| v < m) {
                self.int_min = Some(v);
            }
            if self.int_max.map_or(true, |m| v > m) {
                self.int_max = Some(v);
            }
        }
        if let Ok(v) = raw.parse::<f64>() {
            if self.float_min.as_ref().map_or(true, |(m, _)| v < *m) {
                self.float_min = Some((v, raw.to_owned()));
            }
            if self.float_max.as_ref().map_or(true, |(m, _)| v > *m) {
                self.float_max = Some((v, raw.to_owned()));
            }
        }
        if self.lex_min.as_deref().map_or(true, |m| raw < m) {
            self.lex_min = Some(raw.to_owned());
        }
        if self.lex_max.as_deref().map_or(true, |m| raw > m) {
            self.lex_max = Some(raw.to_owned());
        }
    }

    pub fn finish(self) -> ColumnProfile {
        // entirely-empty column has no evidence; defaults to TEXT
        let sql_type = self.hypothesis.unwrap_or(SqlType::Text);
        let (min_value, max_value) = match sql_type {
            SqlType::Integer => (
                self.int_min.map(|v| v.to_string()),
                self.int_max.map(|v| v.to_string()),
            ),
            SqlType::Float => (
                self.float_min.map(|(_, s)| s),
                self.float_max.map(|(_, s)| s),
            ),
            SqlType::Date | SqlType::Text => (self.lex_min, self.lex_max),
        };
        ColumnProfile {
            index: self.index,
            name: self.name,
            sql_type,
            min_value,
            max_value,
            min_length: if self.min_len == usize::MAX { 0 } else { self.min_len },
            max_length: self.max_len,
            populated: self.populated,
            empty: self.empty,
        }
    }
}
