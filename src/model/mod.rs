pub mod address;
pub mod decimal;
pub mod graph;
pub mod transaction;

pub use address::Address;
pub use graph::AddressGraph;
pub use graph::AddressNode;
pub use graph::GraphData;
pub use graph::TransactionLink;
pub use transaction::Counterparty;
pub use transaction::DecodedInput;
pub use transaction::Transaction;
