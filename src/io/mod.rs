//! # Tabular Input and Output
//!
//! CSV with one header row. Data rows carry seven positional columns:
//!
//! | # | column                                   | notes              |
//! |---|------------------------------------------|--------------------|
//! | 0 | brand code                               |                    |
//! | 1 | part number                              |                    |
//! | 2 | current classification code              |                    |
//! | 3 | current classification description       | optional           |
//! | 4 | long description                         | optional           |
//! | 5 | short description                        |                    |
//! | 6 | manually assigned taxonomy code          | trimmed            |
//!
//! A six-column header selects the variant without column 3; the remaining
//! columns shift left by one. Columns past the seventh are not interpreted.
//!
//! The output replays every input row cell for cell, padded to the header
//! width, and appends the auto taxonomy code and the `Yes`/`No` match flag.

pub mod input;
pub mod output;

pub use input::{read_records, read_records_from, InputLayout, InputTable};
pub use output::{write_output, write_output_to};
