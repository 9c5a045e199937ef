use std::collections::BTreeSet;
use std::collections::HashMap;
use std::collections::HashSet;

use chrono::DateTime;
use chrono::Utc;
use petgraph::Graph;
use petgraph::prelude::*;
use serde::Deserialize;
use serde::Serialize;

use super::address::Address;
use super::decimal;
use super::transaction::Counterparty;
use super::transaction::DecodedInput;
use super::transaction::Transaction;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressNode {
    pub id: Address,
    pub name: Option<String>,
    pub ens_domain_name: Option<String>,
    pub is_contract: Option<bool>,
}

impl AddressNode {
    pub fn new(id: Address) -> Self {
        Self {
            id,
            name: None,
            ens_domain_name: None,
            is_contract: None,
        }
    }

    // Only fills what is still unknown, earlier observations win
    fn merge(
        &mut self,
        counterparty: &Counterparty,
    ) {
        if self.name.is_none() {
            self.name = counterparty.name.clone();
        }
        if self.ens_domain_name.is_none() {
            self.ens_domain_name = counterparty.ens_domain_name.clone();
        }
        if self.is_contract.is_none() {
            self.is_contract = counterparty.is_contract;
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLink {
    pub id: String,
    pub source: Address,
    pub target: Address,
    #[serde(with = "decimal::u128_string")]
    pub value: u128,
    pub hash: String,
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<u64>,
    pub status: Option<String>,
    pub method: Option<String>,
    pub block_number: Option<u64>,
    pub nonce: Option<u64>,
    pub gas_used: Option<u64>,
    pub gas_limit: Option<u64>,
    #[serde(with = "decimal::option_u128_string", default)]
    pub fee: Option<u128>,
    #[serde(default)]
    pub decoded_input: Option<DecodedInput>,
}

impl TransactionLink {
    pub fn link_id(
        source: &Address,
        target: &Address,
        hash: &str,
    ) -> String {
        format!("{}-{}-{}", source, target, hash)
    }

    /// Builds a link from a transaction that has both endpoints and a hash.
    pub fn from_transaction(transaction: &Transaction) -> Option<Self> {
        let (from, to, hash) = transaction.endpoints()?;

        Some(Self {
            id: Self::link_id(&from.address, &to.address, hash),
            source: from.address.clone(),
            target: to.address.clone(),
            value: transaction.value,
            hash: hash.to_string(),
            timestamp: transaction.timestamp,
            kind: transaction.kind,
            status: transaction.status.clone(),
            method: transaction.method.clone(),
            block_number: transaction.block_number,
            nonce: transaction.nonce,
            gas_used: transaction.gas_used,
            gas_limit: transaction.gas_limit,
            fee: transaction.fee,
            decoded_input: transaction.decoded_input.clone(),
        })
    }
}

/// Serialized result handed to the renderer. Array order follows insertion
/// order but consumers must not depend on it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<AddressNode>,
    pub links: Vec<TransactionLink>,
}

impl GraphData {
    pub fn node_ids(&self) -> BTreeSet<&str> { self.nodes.iter().map(|n| n.id.as_str()).collect() }

    pub fn link_ids(&self) -> BTreeSet<&str> { self.links.iter().map(|l| l.id.as_str()).collect() }
}

/// Per-build graph keyed by address for nodes and by link id for edges.
#[derive(Debug, Default)]
pub struct AddressGraph {
    graph: Graph<AddressNode, TransactionLink>,
    node_indices: HashMap<Address, NodeIndex>,
    link_ids: HashSet<String>,
}

impl AddressGraph {
    pub fn new() -> Self { Self::default() }

    pub fn ensure_node(
        &mut self,
        address: &Address,
    ) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(address) {
            return idx;
        }

        let idx = self.graph.add_node(AddressNode::new(address.clone()));
        self.node_indices.insert(address.clone(), idx);
        idx
    }

    pub fn observe_counterparty(
        &mut self,
        counterparty: &Counterparty,
    ) -> NodeIndex {
        let idx = self.ensure_node(&counterparty.address);
        if let Some(node) = self.graph.node_weight_mut(idx) {
            node.merge(counterparty);
        }
        idx
    }

    /// Inserts the link unless one with the same id already exists.
    /// Returns whether it was inserted.
    pub fn insert_link(
        &mut self,
        link: TransactionLink,
    ) -> bool {
        if self.link_ids.contains(&link.id) {
            return false;
        }

        let from_idx = self.ensure_node(&link.source);
        let to_idx = self.ensure_node(&link.target);
        self.link_ids.insert(link.id.clone());
        self.graph.add_edge(from_idx, to_idx, link);
        true
    }

    pub fn node(
        &self,
        address: &Address,
    ) -> Option<&AddressNode> {
        self.node_indices.get(address).and_then(|&idx| self.graph.node_weight(idx))
    }

    pub fn node_count(&self) -> usize { self.graph.node_count() }

    pub fn link_count(&self) -> usize { self.graph.edge_count() }

    pub fn into_data(self) -> GraphData {
        let (nodes, edges) = self.graph.into_nodes_edges();
        GraphData {
            nodes: nodes.into_iter().map(|n| n.weight).collect(),
            links: edges.into_iter().map(|e| e.weight).collect(),
        }
    }
}
