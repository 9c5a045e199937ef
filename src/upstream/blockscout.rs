use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;
use tracing::warn;
use url::Url;

use super::RateLimiter;
use super::TransactionSource;
use crate::config::GraphConfig;
use crate::config::UpstreamConfig;
use crate::error::UpstreamError;
use crate::model::Address;
use crate::model::Counterparty;
use crate::model::DecodedInput;
use crate::model::Transaction;
use crate::utils::calculate_backoff_with_jitter;
use crate::utils::short_address;

// ======================= Wire format =======================
// Owned by the explorer, decoded leniently and converted into `Transaction`.

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Number(serde_json::Number),
    Text(String),
}

impl Numeric {
    fn to_u128(&self) -> Option<u128> {
        match self {
            Numeric::Number(n) => n.as_u64().map(u128::from).or_else(|| n.to_string().parse().ok()),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }

    fn to_u64(&self) -> Option<u64> { self.to_u128().and_then(|v| u64::try_from(v).ok()) }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawAddressInfo {
    hash: Option<String>,
    name: Option<String>,
    ens_domain_name: Option<String>,
    is_contract: Option<bool>,
}

impl RawAddressInfo {
    fn into_counterparty(self) -> Option<Counterparty> {
        let address = Address::parse(self.hash.as_deref()?).ok()?;
        Some(Counterparty {
            address,
            name: self.name.filter(|n| !n.is_empty()),
            ens_domain_name: self.ens_domain_name.filter(|n| !n.is_empty()),
            is_contract: self.is_contract,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFee {
    value: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTransaction {
    hash: Option<String>,
    from: Option<RawAddressInfo>,
    to: Option<RawAddressInfo>,
    value: Option<Numeric>,
    timestamp: Option<String>,
    #[serde(rename = "type")]
    kind: Option<Numeric>,
    status: Option<String>,
    method: Option<String>,
    block_number: Option<Numeric>,
    block: Option<Numeric>,
    nonce: Option<Numeric>,
    gas_used: Option<Numeric>,
    gas_limit: Option<Numeric>,
    fee: Option<RawFee>,
    decoded_input: Option<Value>,
}

impl From<RawTransaction> for Transaction {
    fn from(raw: RawTransaction) -> Self {
        let timestamp = raw
            .timestamp
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc));

        Transaction {
            hash: raw.hash.map(|h| h.trim().to_lowercase()).filter(|h| !h.is_empty()),
            from: raw.from.and_then(RawAddressInfo::into_counterparty),
            to: raw.to.and_then(RawAddressInfo::into_counterparty),
            value: raw.value.as_ref().and_then(Numeric::to_u128).unwrap_or(0),
            timestamp,
            kind: raw.kind.as_ref().and_then(Numeric::to_u64),
            status: raw.status,
            method: raw.method,
            block_number: raw.block_number.or(raw.block).as_ref().and_then(Numeric::to_u64),
            nonce: raw.nonce.as_ref().and_then(Numeric::to_u64),
            gas_used: raw.gas_used.as_ref().and_then(Numeric::to_u64),
            gas_limit: raw.gas_limit.as_ref().and_then(Numeric::to_u64),
            fee: raw.fee.and_then(|f| f.value).as_ref().and_then(Numeric::to_u128),
            // An undecodable call is shown as no call rather than dropping the transaction
            decoded_input: raw.decoded_input.and_then(|v| serde_json::from_value::<DecodedInput>(v).ok()),
        }
    }
}

/// Validates one `addresses/{address}/transactions` page.
///
/// The page itself must be an object with an `items` array. Items are decoded
/// one by one so a single odd record does not discard the rest of the page.
pub fn decode_transactions_page(
    address: &Address,
    page: Value,
) -> Result<Vec<Transaction>, UpstreamError> {
    let items = match page {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => {
                return Err(UpstreamError::MalformedPayload {
                    address: address.to_string(),
                    reason: "missing items".to_string(),
                });
            },
            Some(_) => {
                return Err(UpstreamError::MalformedPayload {
                    address: address.to_string(),
                    reason: "items is not an array".to_string(),
                });
            },
        },
        _ => {
            return Err(UpstreamError::MalformedPayload {
                address: address.to_string(),
                reason: "page is not an object".to_string(),
            });
        },
    };

    let mut transactions = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawTransaction>(item) {
            Ok(raw) => transactions.push(Transaction::from(raw)),
            Err(e) => {
                warn!("malformed_transaction_item::address::{}::index::{}::error::{}", address, index, e);
            },
        }
    }

    Ok(transactions)
}

// ======================= Client =======================

/// reqwest-backed client for the Blockscout v2 REST API.
#[derive(Debug, Clone)]
pub struct BlockscoutClient {
    http: reqwest::Client,
    base_url: Url,
    rate_limiter: Arc<RateLimiter>,
    max_retries: usize,
    base_retry_delay_ms: u64,
    max_retry_delay_ms: u64,
}

impl BlockscoutClient {
    pub fn new(
        upstream: &UpstreamConfig,
        graph: &GraphConfig,
    ) -> Result<Self, UpstreamError> {
        let base_url = Url::parse(&upstream.base_url).map_err(|e| UpstreamError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(UpstreamError::InvalidBaseUrl(upstream.base_url.clone()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(upstream.request_timeout_ms))
            .user_agent(upstream.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            base_url,
            rate_limiter: Arc::new(RateLimiter::new(upstream.rate_limit)),
            max_retries: graph.max_retries,
            base_retry_delay_ms: graph.base_retry_delay_ms,
            max_retry_delay_ms: graph.max_retry_delay_ms,
        })
    }

    /// `{base_url}/addresses/{address}/transactions`, with the address escaped
    /// as a single path segment.
    pub fn transactions_url(
        &self,
        address: &Address,
    ) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstreamError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["addresses", address.as_str(), "transactions"]);
        Ok(url)
    }

    async fn fetch_once(
        &self,
        address: &Address,
        url: &Url,
    ) -> Result<Vec<Transaction>, UpstreamError> {
        self.rate_limiter.acquire().await;

        let response = self.http.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                address: address.to_string(),
            });
        }

        let page: Value = response.json().await.map_err(|e| body_error(address, e))?;

        decode_transactions_page(address, page)
    }
}

// A body that stalls past the timeout is transient, not malformed
fn body_error(
    address: &Address,
    e: reqwest::Error,
) -> UpstreamError {
    if e.is_timeout() {
        UpstreamError::Request(e)
    } else {
        UpstreamError::MalformedPayload {
            address: address.to_string(),
            reason: e.to_string(),
        }
    }
}

#[async_trait]
impl TransactionSource for BlockscoutClient {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, UpstreamError> {
        let url = self.transactions_url(address)?;
        let mut attempt = 0;

        loop {
            debug!("fetching_transactions::address::{}::attempt::{}", short_address(address.as_str()), attempt);

            match self.fetch_once(address, &url).await {
                Ok(transactions) => {
                    debug!(
                        "fetched_transactions::address::{}::count::{}",
                        short_address(address.as_str()),
                        transactions.len()
                    );
                    return Ok(transactions);
                },
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let backoff_delay =
                        calculate_backoff_with_jitter(attempt, self.base_retry_delay_ms, self.max_retry_delay_ms);

                    warn!(
                        "retrying_fetch_after_backoff::address::{}::attempt::{}::delay_ms::{}::error::{}",
                        address,
                        attempt + 1,
                        backoff_delay.as_millis(),
                        e
                    );

                    tokio::time::sleep(backoff_delay).await;
                    attempt += 1;
                },
                Err(e) if attempt > 0 => {
                    return Err(UpstreamError::RetriesExhausted {
                        address: address.to_string(),
                        attempts: attempt + 1,
                        last_error: e.to_string(),
                    });
                },
                Err(e) => return Err(e),
            }
        }
    }
}
