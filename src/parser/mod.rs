pub mod reader;
pub mod record;

pub use reader::read_records;
pub use record::*;
