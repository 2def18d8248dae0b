pub mod id_index;
pub mod io;
pub mod table;

pub use id_index::IdIndex;
pub use table::{Column, ColumnKind, Id, IdKind, Table, Value};
