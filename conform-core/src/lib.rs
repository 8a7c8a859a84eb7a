//! Conform core types, traits, and error definitions.

pub mod error;
pub mod gateway;
pub mod options;
pub mod schema;
pub mod value;

pub use error::{ConformError, Result};
pub use gateway::{Completion, ModelGateway, SamplingOptions, Tokenizer};
pub use options::GenerationOptions;
pub use schema::SchemaNode;
pub use value::{PartialValue, Step};
