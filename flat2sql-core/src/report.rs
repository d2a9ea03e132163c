use crate::profile::ColumnProfile;

pub const SUMMARY_HEADER: [&str; 9] = [
    "INDEX", "COLUMN", "MAXVALUE", "MINVALUE", "MAXLEN", "MINLEN", "TYPE", "#VALS", "#EMPTY",
];

/// One summary row per column, in index order. Rendering belongs to the
/// caller; this module only shapes the data.
pub fn summary_rows(columns: &[ColumnProfile]) -> Vec<Vec<String>> {
    columns
        .iter()
        .map(|c| {
            vec![
                c.index.to_string(),
                c.name.clone(),
                c.max_value.clone().unwrap_or_else(|| "-".into()),
                c.min_value.clone().unwrap_or_else(|| "-".into()),
                c.max_length.to_string(),
                c.min_length.to_string(),
                c.sql_type.name().to_owned(),
                c.populated.to_string(),
                c.empty.to_string(),
            ]
        })
        .collect()
}
