pub mod datetime;
pub mod loader;
pub mod log;
pub mod name_table;
pub mod parser;
