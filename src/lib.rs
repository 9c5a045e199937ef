pub mod api;
pub mod config;
pub mod constants;
pub mod crawler;
pub mod engine;
pub mod error;
pub mod model;
pub mod tracing;
pub mod upstream;
pub mod utils;

pub use engine::*;
pub use error::*;

pub use error::Result;

// Test utilities - only compiled during testing
#[cfg(test)]
pub mod test_utils;
