#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;

use address_graph::config::GraphConfig;
use address_graph::config::UpstreamConfig;
use address_graph::crawler::AddressGraphCrawler;
use address_graph::error::UpstreamError;
use address_graph::model::Address;
use address_graph::model::Counterparty;
use address_graph::model::Transaction;
use address_graph::upstream::BlockscoutClient;
use address_graph::upstream::TransactionSource;
use async_trait::async_trait;
use serde_json::Value;
use serde_json::json;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

pub fn addr(raw: &str) -> Address { Address::parse(raw).unwrap() }

/// Fast retries, no outbound throttling.
pub fn graph_config(max_addresses: usize) -> GraphConfig {
    GraphConfig {
        max_addresses,
        max_retries: 2,
        base_retry_delay_ms: 1,
        max_retry_delay_ms: 5,
        ..Default::default()
    }
}

pub fn blockscout_client(
    server: &MockServer,
    graph: &GraphConfig,
) -> BlockscoutClient {
    let upstream = UpstreamConfig {
        base_url: format!("{}/api/v2", server.uri()),
        request_timeout_ms: 2_000,
        rate_limit: 0,
        ..Default::default()
    };
    BlockscoutClient::new(&upstream, graph).unwrap()
}

pub fn blockscout_crawler(
    server: &MockServer,
    max_addresses: usize,
) -> AddressGraphCrawler {
    let graph = graph_config(max_addresses);
    let client = blockscout_client(server, &graph);
    AddressGraphCrawler::new(Arc::new(client), Arc::new(graph))
}

pub fn transactions_path(address: &str) -> String { format!("/api/v2/addresses/{}/transactions", address) }

/// Explorer-shaped item, as returned inside `items`.
pub fn item(
    from: &str,
    to: &str,
    hash: &str,
    value: &str,
) -> Value {
    json!({
        "hash": hash,
        "from": { "hash": from, "is_contract": false, "name": null, "ens_domain_name": null },
        "to": { "hash": to, "is_contract": false, "name": null, "ens_domain_name": null },
        "value": value,
        "timestamp": "2024-01-01T00:00:00.000000Z",
        "type": 2,
        "status": "ok",
        "method": null,
        "block_number": 100,
        "nonce": 1,
        "gas_used": "21000",
        "gas_limit": "21000",
        "fee": { "type": "actual", "value": "21000000000000" }
    })
}

pub fn page(items: Vec<Value>) -> Value { json!({ "items": items, "next_page_params": null }) }

pub async fn mount_page(
    server: &MockServer,
    address: &str,
    items: Vec<Value>,
) {
    Mock::given(method("GET"))
        .and(path(transactions_path(address)))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(items)))
        .mount(server)
        .await;
}

/// Addresses requested from the mock explorer, in order.
pub async fn requested_addresses(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|req| {
            let segments: Vec<&str> = req.url.path_segments()?.collect();
            match segments.as_slice() {
                [.., "addresses", address, "transactions"] => Some(address.to_string()),
                _ => None,
            }
        })
        .collect()
}

/// In-memory source for property tests.
#[derive(Default)]
pub struct MemorySource {
    histories: HashMap<Address, Vec<Transaction>>,
    fetched: Mutex<Vec<Address>>,
}

impl MemorySource {
    pub fn record(
        &mut self,
        from: &str,
        to: &str,
        hash: &str,
    ) {
        let transaction = Transaction {
            hash: Some(hash.to_string()),
            from: Some(Counterparty::new(addr(from))),
            to: Some(Counterparty::new(addr(to))),
            value: 1,
            ..Default::default()
        };
        // Both parties see the transaction in their history
        self.histories.entry(addr(from)).or_default().push(transaction.clone());
        if from != to {
            self.histories.entry(addr(to)).or_default().push(transaction);
        }
    }

    pub fn fetched(&self) -> Vec<Address> { self.fetched.lock().unwrap().clone() }
}

#[async_trait]
impl TransactionSource for MemorySource {
    async fn fetch_transactions(
        &self,
        address: &Address,
    ) -> Result<Vec<Transaction>, UpstreamError> {
        self.fetched.lock().unwrap().push(address.clone());
        Ok(self.histories.get(address).cloned().unwrap_or_default())
    }
}
