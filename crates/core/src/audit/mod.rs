//! Audit trail: activity, error and change logs

pub mod diff;
pub mod ports;
pub mod trail;

pub use ports::AuditSink;
pub use trail::AuditTrail;
