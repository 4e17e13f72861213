//! Authentication boundary

pub mod ports;

pub use ports::AuthGateway;
