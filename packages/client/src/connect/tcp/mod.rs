//! TCP connection establishment
//!
//! Single-path and Happy Eyeballs connection strategies over the
//! [`Connect`](crate::connect::Connect) seam, plus the tokio TCP connector
//! and its socket configuration.

pub mod basic_connection;
pub mod connection;
pub mod happy_eyeballs;
pub mod socket_config;

pub use basic_connection::{connect_to_address_list, connect_with_timeout};
pub use connection::TcpConnector;
pub use happy_eyeballs::{RaceConfig, happy_eyeballs_connect};
pub use socket_config::configure_tcp_socket;
