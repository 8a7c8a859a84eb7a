//! Conform server: HTTP front end for schema-guided generation.

pub mod api;
pub mod tokenizer;
pub mod upstream;
