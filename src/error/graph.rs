use thiserror::Error;

use super::UpstreamError;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Seed address is empty")]
    EmptyAddress,
    #[error("Traversal bound must be at least 1")]
    ZeroBound,
    #[error("Graph build aborted: {0}")]
    Upstream(#[from] UpstreamError),
}
