pub mod column;
pub mod scan;

pub use column::{classify, ColumnProfile, SqlType};
pub use scan::{scan_file, scan_with_cleaned, FileProfile};
