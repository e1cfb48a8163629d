pub mod date;
pub mod path;
pub mod table;
