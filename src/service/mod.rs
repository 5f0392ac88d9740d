//! Business logic over the store: login identity, durable sessions,
//! snapshot assembly, and derived-value calculations.

pub mod identity;
pub mod metrics;
pub mod session;
pub mod snapshot;
