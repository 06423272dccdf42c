//! CSV parsing and file loading.

mod parser;
mod reader;

pub use parser::{CsvTable, parse_csv, parse_records};
pub use reader::{MAX_CSV_FILE_SIZE, read_csv_file, read_csv_file_with_limit};
