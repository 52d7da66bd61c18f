//! Dataset loading and the in-memory record table.

pub mod loader;
pub mod table;

pub use loader::load;
pub use table::{CellValue, ColumnType, Table};
