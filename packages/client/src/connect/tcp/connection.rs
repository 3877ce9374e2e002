//! Tokio TCP connector
//!
//! Opens one non-blocking TCP connection per attempt. The socket is owned by
//! the attempt future, so dropping the future closes the descriptor.

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::{TcpSocket, TcpStream};

use super::socket_config::configure_tcp_socket;
use crate::connect::types::{Connect, Connecting};

/// Connector producing plain [`TcpStream`]s.
#[derive(Debug, Clone)]
pub struct TcpConnector {
    nodelay: bool,
    keepalive: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self {
            nodelay: true,
            keepalive: None,
        }
    }

    #[must_use]
    pub fn nodelay(mut self, nodelay: bool) -> Self {
        self.nodelay = nodelay;
        self
    }

    #[must_use]
    pub fn keepalive(mut self, keepalive: Option<Duration>) -> Self {
        self.keepalive = keepalive;
        self
    }
}

impl Default for TcpConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl Connect for TcpConnector {
    type Conn = TcpStream;

    fn connect(&self, addr: SocketAddr) -> Connecting<TcpStream> {
        let nodelay = self.nodelay;
        let keepalive = self.keepalive;
        Box::pin(async move {
            let socket = match addr {
                SocketAddr::V4(_) => TcpSocket::new_v4()?,
                SocketAddr::V6(_) => TcpSocket::new_v6()?,
            };
            let stream = socket.connect(addr).await?;
            configure_tcp_socket(&stream, nodelay, keepalive)?;
            Ok(stream)
        })
    }
}
