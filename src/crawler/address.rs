use std::collections::HashSet;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::GraphConfig;
use crate::error::GraphError;
use crate::model::Address;
use crate::model::AddressGraph;
use crate::model::GraphData;
use crate::model::Transaction;
use crate::model::TransactionLink;
use crate::upstream::TransactionSource;

enum FetchOutcome {
    Transactions(Vec<Transaction>),
    Failed,
    DeadlineExceeded,
}

#[derive(Debug, Default)]
struct CrawlStats {
    visited: usize,
    failed: usize,
    skipped_transactions: usize,
    deadline_exceeded: bool,
}

/// Breadth-first builder of the address/transaction graph around a seed.
///
/// Each call to [`AddressGraphCrawler::build`] owns its own queue, visited set
/// and graph, so one crawler can serve concurrent requests without locking.
#[derive(Clone)]
pub struct AddressGraphCrawler {
    source: Arc<dyn TransactionSource>,
    config: Arc<GraphConfig>,
}

impl AddressGraphCrawler {
    pub fn new(
        source: Arc<dyn TransactionSource>,
        config: Arc<GraphConfig>,
    ) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &GraphConfig { &self.config }

    /// Builds with the configured `max_addresses` bound.
    pub async fn build(
        &self,
        seed: &Address,
    ) -> Result<GraphData, GraphError> {
        self.build_with_bound(seed, self.config.max_addresses).await
    }

    /// Builds visiting at most `max_addresses` distinct addresses.
    pub async fn build_with_bound(
        &self,
        seed: &Address,
        max_addresses: usize,
    ) -> Result<GraphData, GraphError> {
        if max_addresses == 0 {
            return Err(GraphError::ZeroBound);
        }

        let deadline = Instant::now() + Duration::from_millis(self.config.build_deadline_ms);
        let mut graph = AddressGraph::new();
        let mut visited: HashSet<Address> = HashSet::new();
        let mut queue: VecDeque<Address> = VecDeque::from([seed.clone()]);
        let mut stats = CrawlStats::default();

        while visited.len() < max_addresses {
            let Some(current) = queue.pop_front() else {
                break;
            };
            if visited.contains(&current) {
                continue;
            }

            visited.insert(current.clone());
            graph.ensure_node(&current);
            stats.visited += 1;

            let transactions = match self.fetch_or_empty(&current, deadline).await? {
                FetchOutcome::Transactions(transactions) => transactions,
                FetchOutcome::Failed => {
                    stats.failed += 1;
                    continue;
                },
                FetchOutcome::DeadlineExceeded => {
                    stats.deadline_exceeded = true;
                    break;
                },
            };

            for transaction in &transactions {
                let (Some((from, to, _)), Some(link)) =
                    (transaction.endpoints(), TransactionLink::from_transaction(transaction))
                else {
                    stats.skipped_transactions += 1;
                    continue;
                };

                graph.observe_counterparty(from);
                graph.observe_counterparty(to);
                graph.insert_link(link);

                for counterparty in [&from.address, &to.address] {
                    if !visited.contains(counterparty) {
                        queue.push_back(counterparty.clone());
                    }
                }
            }
        }

        if stats.deadline_exceeded {
            warn!(
                "graph_build_deadline_exceeded::seed::{}::deadline_ms::{}::returning_partial",
                seed, self.config.build_deadline_ms
            );
        }

        info!(
            "graph_built::seed::{}::visited::{}::failed::{}::skipped_transactions::{}::nodes::{}::links::{}",
            seed,
            stats.visited,
            stats.failed,
            stats.skipped_transactions,
            graph.node_count(),
            graph.link_count()
        );

        Ok(graph.into_data())
    }

    // Per-address failures become an empty history; only fatal errors escape.
    async fn fetch_or_empty(
        &self,
        address: &Address,
        deadline: Instant,
    ) -> Result<FetchOutcome, GraphError> {
        match tokio::time::timeout_at(deadline, self.source.fetch_transactions(address)).await {
            Ok(Ok(transactions)) => {
                debug!("address_expanded::address::{}::transactions::{}", address, transactions.len());
                Ok(FetchOutcome::Transactions(transactions))
            },
            Ok(Err(e)) if e.is_fatal() => Err(GraphError::Upstream(e)),
            Ok(Err(e)) => {
                warn!("fetch_transactions_failed::address::{}::error::{}::treating_as_empty", address, e);
                Ok(FetchOutcome::Failed)
            },
            Err(_) => Ok(FetchOutcome::DeadlineExceeded),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::UpstreamError;
    use crate::test_utils::fixtures::StaticTransactionSource;
    use crate::test_utils::fixtures::addr;
    use crate::test_utils::fixtures::transfer;
    use crate::upstream::MockTransactionSource;

    fn crawler(source: impl TransactionSource + 'static) -> AddressGraphCrawler {
        AddressGraphCrawler::new(Arc::new(source), Arc::new(GraphConfig::default()))
    }

    #[tokio::test]
    async fn bound_stops_before_third_address() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xAAA1", vec![transfer("0xAAA1", "0xBBB2", "h1"), transfer("0xCCC3", "0xAAA1", "h2")]);
        let source = Arc::new(source);

        let crawler = AddressGraphCrawler::new(source.clone(), Arc::new(GraphConfig::default()));
        let data = crawler.build_with_bound(&addr("0xAAA1"), 2).await.unwrap();

        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xaaa1", "0xbbb2", "0xccc3"]);
        assert_eq!(
            data.link_ids().into_iter().collect::<Vec<_>>(),
            vec!["0xaaa1-0xbbb2-h1", "0xccc3-0xaaa1-h2"]
        );
        assert_eq!(source.fetched(), vec!["0xaaa1", "0xbbb2"]);
    }

    #[tokio::test]
    async fn fetches_in_breadth_first_order() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![transfer("0xa", "0xb", "h1"), transfer("0xa", "0xc", "h2")]);
        source.insert("0xb", vec![transfer("0xb", "0xd", "h3")]);
        source.insert("0xc", vec![transfer("0xc", "0xe", "h4")]);
        let source = Arc::new(source);

        let crawler = AddressGraphCrawler::new(source.clone(), Arc::new(GraphConfig::default()));
        crawler.build_with_bound(&addr("0xa"), 5).await.unwrap();

        assert_eq!(source.fetched(), vec!["0xa", "0xb", "0xc", "0xd", "0xe"]);
    }

    #[tokio::test]
    async fn transaction_seen_from_both_sides_yields_one_link() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![transfer("0xa", "0xb", "h1")]);
        source.insert("0xb", vec![transfer("0xA", "0xB", "H1")]);

        let data = crawler(source).build_with_bound(&addr("0xa"), 2).await.unwrap();
        assert_eq!(data.links.len(), 1);
        assert_eq!(data.nodes.len(), 2);
    }

    #[tokio::test]
    async fn missing_counterparty_is_skipped_without_nodes() {
        let mut half = transfer("0xa", "0xb", "h1");
        half.to = None;

        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![half, transfer("0xa", "0xc", "h2")]);

        let data = crawler(source).build_with_bound(&addr("0xa"), 1).await.unwrap();
        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xa", "0xc"]);
        assert_eq!(data.links.len(), 1);
    }

    #[tokio::test]
    async fn seed_failure_returns_seed_only() {
        let mut source = MockTransactionSource::new();
        source.expect_fetch_transactions().times(1).returning(|address| {
            Err(UpstreamError::Status {
                status: 500,
                address: address.to_string(),
            })
        });

        let data = crawler(source).build(&addr("0xSeed")).await.unwrap();
        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xseed"]);
        assert!(data.links.is_empty());
    }

    #[tokio::test]
    async fn failed_neighbour_does_not_abort_build() {
        let mut source = MockTransactionSource::new();
        source
            .expect_fetch_transactions()
            .with(eq(addr("0xa")))
            .times(1)
            .returning(|_| Ok(vec![transfer("0xa", "0xb", "h1"), transfer("0xa", "0xc", "h2")]));
        source
            .expect_fetch_transactions()
            .with(eq(addr("0xb")))
            .times(1)
            .returning(|address| {
                Err(UpstreamError::MalformedPayload {
                    address: address.to_string(),
                    reason: "garbage".to_string(),
                })
            });
        source
            .expect_fetch_transactions()
            .with(eq(addr("0xc")))
            .times(1)
            .returning(|_| Ok(vec![transfer("0xc", "0xd", "h3")]));

        let data = crawler(source).build_with_bound(&addr("0xa"), 3).await.unwrap();
        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xa", "0xb", "0xc", "0xd"]);
        assert_eq!(data.links.len(), 3);
    }

    #[tokio::test]
    async fn fatal_upstream_error_fails_the_build() {
        let mut source = MockTransactionSource::new();
        source
            .expect_fetch_transactions()
            .returning(|_| Err(UpstreamError::InvalidBaseUrl("mailto:x".to_string())));

        let err = crawler(source).build(&addr("0xa")).await.unwrap_err();
        assert!(matches!(err, GraphError::Upstream(UpstreamError::InvalidBaseUrl(_))));
    }

    #[tokio::test]
    async fn zero_bound_is_rejected() {
        let source = MockTransactionSource::new();
        let err = crawler(source).build_with_bound(&addr("0xa"), 0).await.unwrap_err();
        assert!(matches!(err, GraphError::ZeroBound));
    }

    #[tokio::test]
    async fn cycles_terminate_when_queue_drains() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![transfer("0xa", "0xb", "h1")]);
        source.insert("0xb", vec![transfer("0xb", "0xa", "h2")]);
        let source = Arc::new(source);

        let crawler = AddressGraphCrawler::new(source.clone(), Arc::new(GraphConfig::default()));
        let data = crawler.build_with_bound(&addr("0xa"), 10).await.unwrap();

        assert_eq!(source.fetched(), vec!["0xa", "0xb"]);
        assert_eq!(data.links.len(), 2);
    }

    #[tokio::test]
    async fn failed_fetch_still_counts_toward_bound() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![transfer("0xa", "0xb", "h1"), transfer("0xa", "0xc", "h2")]);
        source.insert("0xc", vec![transfer("0xc", "0xd", "h3")]);
        source.fail_with_status("0xb", 503);
        let source = Arc::new(source);

        let crawler = AddressGraphCrawler::new(source.clone(), Arc::new(GraphConfig::default()));
        let data = crawler.build_with_bound(&addr("0xa"), 2).await.unwrap();

        assert_eq!(source.fetched(), vec!["0xa", "0xb"]);
        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xa", "0xb", "0xc"]);
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_returns_partial_graph() {
        let mut source = StaticTransactionSource::new();
        source.insert("0xa", vec![transfer("0xa", "0xb", "h1")]);
        source.insert("0xb", vec![transfer("0xb", "0xc", "h2")]);
        source.delay("0xb", Duration::from_secs(60));

        let config = GraphConfig {
            build_deadline_ms: 1_000,
            ..GraphConfig::default()
        };
        let crawler = AddressGraphCrawler::new(Arc::new(source), Arc::new(config));
        let data = crawler.build_with_bound(&addr("0xa"), 5).await.unwrap();

        assert_eq!(data.node_ids().into_iter().collect::<Vec<_>>(), vec!["0xa", "0xb"]);
        assert_eq!(data.links.len(), 1);
    }
}
