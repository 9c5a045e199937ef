pub mod filter;
pub mod format;
pub mod setup;

pub use setup::TracingGuard;
pub use setup::setup_tracing;
