//! Users, clients and tasks as served by the remote data service

pub mod ports;

pub use ports::{ClientGateway, TaskGateway, UserGateway};
