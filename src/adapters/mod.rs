// Adapters layer: concrete implementations of the ports (remote reviews API)
// and the durable reply ledger.

pub mod http;
pub mod ledger;

pub use http::BusinessProfileClient;
pub use ledger::ReviewLedger;
