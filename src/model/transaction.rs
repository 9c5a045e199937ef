use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use super::address::Address;

/// One side of a transaction, with whatever labels the explorer attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Counterparty {
    pub address: Address,
    pub name: Option<String>,
    pub ens_domain_name: Option<String>,
    pub is_contract: Option<bool>,
}

impl Counterparty {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            name: None,
            ens_domain_name: None,
            is_contract: None,
        }
    }
}

/// Contract call decoded by the explorer. `parameters` is passed through
/// untouched for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodedInput {
    pub method_call: Option<String>,
    pub method_id: Option<String>,
    pub parameters: Value,
}

/// A transaction record after ingest validation.
///
/// Every field the explorer may omit is an explicit `Option` (or zero for
/// `value`), so nothing downstream has to guess about absent data.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Transaction {
    pub hash: Option<String>,
    pub from: Option<Counterparty>,
    pub to: Option<Counterparty>,
    pub value: u128,
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: Option<u64>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub block_number: Option<u64>,
    pub nonce: Option<u64>,
    pub gas_used: Option<u64>,
    pub gas_limit: Option<u64>,
    pub fee: Option<u128>,
    pub decoded_input: Option<DecodedInput>,
}

impl Transaction {
    /// Both endpoints and the hash, or `None` when the transaction cannot
    /// become a link.
    pub fn endpoints(&self) -> Option<(&Counterparty, &Counterparty, &str)> {
        match (&self.from, &self.to, self.hash.as_deref()) {
            (Some(from), Some(to), Some(hash)) => Some((from, to, hash)),
            _ => None,
        }
    }
}
