mod duckdb_store;
mod in_memory_store;
mod system_clock;

pub use duckdb_store::*;
pub use in_memory_store::*;
pub use system_clock::*;
