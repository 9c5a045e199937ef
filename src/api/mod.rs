pub mod handlers;
pub mod routes;

pub use routes::graph_routes;
pub use routes::health_routes;

use crate::crawler::AddressGraphCrawler;

// Shared by every worker; the crawler holds the upstream client and config
#[derive(Clone)]
pub struct AppState {
    pub crawler: AddressGraphCrawler,
}
