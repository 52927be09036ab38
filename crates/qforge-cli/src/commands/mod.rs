//! CLI command implementations.

pub mod common;
pub mod estimate;
pub mod optimize;
pub mod parse;
pub mod providers;
pub mod sample;
pub mod templates;

pub use common::Session;
