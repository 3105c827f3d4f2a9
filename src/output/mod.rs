pub mod json;

pub use json::write_records;
