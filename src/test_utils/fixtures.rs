use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::UpstreamError;
use crate::model::Address;
use crate::model::Counterparty;
use crate::model::Transaction;
use crate::upstream::TransactionSource;

pub fn addr(raw: &str) -> Address { Address::parse(raw).expect("fixture address") }

/// Plain value transfer, hash lowercased like the explorer ingest does.
pub fn transfer(
    from: &str,
    to: &str,
    hash: &str,
) -> Transaction {
    Transaction {
        hash: Some(hash.to_lowercase()),
        from: Some(Counterparty::new(addr(from))),
        to: Some(Counterparty::new(addr(to))),
        value: 1_000,
        ..Default::default()
    }
}

/// In-memory history keyed by address. Unknown addresses have no transactions.
#[derive(Default)]
pub struct StaticTransactionSource {
    histories: HashMap<Address, Vec<Transaction>>,
    failures: HashMap<Address, u16>,
    delays: HashMap<Address, Duration>,
    fetched: Mutex<Vec<String>>,
}

impl StaticTransactionSource {
    pub fn new() -> Self { Self::default() }

    pub fn insert(
        &mut self,
        address: &str,
        transactions: Vec<Transaction>,
    ) {
        self.histories.insert(addr(address), transactions);
    }

    pub fn fail_with_status(
        &mut self,
        address: &str,
        status: u16,
    ) {
        self.failures.insert(addr(address), status);
    }

    pub fn delay(
        &mut self,
        address: &str,
        delay: Duration,
    ) {
        self.delays.insert(addr(address), delay);
    }

    /// Addresses fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> { self.fetched.lock().expect("fetched lock").clone() }
}

#[async_trait]
impl TransactionSource for StaticTransactionSource {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, UpstreamError> {
        self.fetched.lock().expect("fetched lock").push(address.to_string());

        if let Some(delay) = self.delays.get(address) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(&status) = self.failures.get(address) {
            return Err(UpstreamError::Status {
                status,
                address: address.to_string(),
            });
        }
        Ok(self.histories.get(address).cloned().unwrap_or_default())
    }
}
