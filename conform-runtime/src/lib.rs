//! Conform runtime: the schema-guided generation engine.

pub mod prompt;
pub mod session;
pub mod termination;

pub use session::{GenerationSession, NUMBER_FAILURE_SENTINEL};
pub use termination::{ArrayTermination, TokenScanTermination};
