pub mod extractor;
pub mod models;
