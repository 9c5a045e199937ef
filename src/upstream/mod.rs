pub mod blockscout;
pub mod rate_limit;

use async_trait::async_trait;

pub use blockscout::BlockscoutClient;
pub use rate_limit::RateLimiter;

use crate::error::UpstreamError;
use crate::model::Address;
use crate::model::Transaction;

/// Source of an address's transaction history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransactionSource: Send + Sync {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, UpstreamError>;
}
