/// ======================= Upstream =======================
pub const DEFAULT_BLOCKSCOUT_URL: &str = "https://eth.blockscout.com/api/v2";

/// ======================= Traversal =======================
pub const DEFAULT_MAX_ADDRESSES: usize = 2;
pub const DEFAULT_MAX_ADDRESSES_CEILING: usize = 20;

/// ======================= API =======================
pub const MISSING_ADDRESS_MESSAGE: &str = "Missing 'address' parameter";
pub const GRAPH_FAILURE_MESSAGE: &str = "Failed to fetch graph data";

/// ======================= Engine =======================
pub const ENGINE_NAME: &str = "address_graph";
