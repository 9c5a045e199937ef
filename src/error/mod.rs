pub mod api;
pub mod config;
pub mod graph;
pub mod upstream;

pub use anyhow::Context;
pub use anyhow::Error;
pub use anyhow::Result;
pub use anyhow::anyhow;
pub use api::ApiError;
pub use config::ConfigError;
pub use graph::GraphError;
pub use upstream::UpstreamError;

// For consistent error handling with location info
#[macro_export]
macro_rules! err_with_loc {
    ($err:expr) => {
        anyhow::anyhow!($err).context(format!("at {}:{}", file!(), line!()))
    };
}
