// Domain layer: review/ledger models and the ports to the remote listing platform.

pub mod model;
pub mod ports;
