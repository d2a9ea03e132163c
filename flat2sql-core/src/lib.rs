pub mod profile;
pub mod report;
pub mod sql;

pub use flat2sql_common::{Flat2SqlError, Result};
pub use profile::{scan_file, scan_with_cleaned, ColumnProfile, FileProfile, SqlType};
pub use report::{summary_rows, SUMMARY_HEADER};
pub use sql::{generate_ddl, generate_import, generate_script, Dialect, SqlScript};
