pub mod chart;
pub mod histogram;
pub mod parser;
pub mod schema;
pub mod viewer;
