//! UPF PFCP Path Management
//!
//! Owns the N4 datagram socket and the receive loop. One datagram is fully
//! handled, and its response sent, before the next one is read.

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;

use crate::n4_handler::N4Handler;

/// Largest datagram the receive loop accepts
pub const MAX_DATAGRAM_LEN: usize = 65536;

/// How often the receive loop wakes up to check the shutdown flag
pub const SHUTDOWN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Datagram transport underneath the PFCP path
pub trait DatagramChannel {
    fn recv_from(
        &self,
        buf: &mut [u8],
    ) -> impl Future<Output = io::Result<(usize, SocketAddr)>> + Send;

    fn send_to(&self, buf: &[u8], target: SocketAddr)
        -> impl Future<Output = io::Result<usize>> + Send;

    fn local_addr(&self) -> io::Result<SocketAddr>;
}

impl DatagramChannel for UdpSocket {
    async fn recv_from(&self, buf: &mut [u8]) -> io::Result<(usize, SocketAddr)> {
        UdpSocket::recv_from(self, buf).await
    }

    async fn send_to(&self, buf: &[u8], target: SocketAddr) -> io::Result<usize> {
        UdpSocket::send_to(self, buf, target).await
    }

    fn local_addr(&self) -> io::Result<SocketAddr> {
        UdpSocket::local_addr(self)
    }
}

/// PFCP server: one channel, one handler, one receive loop
pub struct PfcpServer<C = UdpSocket> {
    channel: C,
    handler: N4Handler,
    shutdown: Arc<AtomicBool>,
}

impl PfcpServer<UdpSocket> {
    /// Bind the N4 UDP socket
    pub async fn bind(
        addr: SocketAddr,
        handler: N4Handler,
        shutdown: Arc<AtomicBool>,
    ) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr).await?;
        log::info!("PFCP server bound to {}", socket.local_addr()?);
        Ok(Self::with_channel(socket, handler, shutdown))
    }
}

impl<C: DatagramChannel> PfcpServer<C> {
    pub fn with_channel(channel: C, handler: N4Handler, shutdown: Arc<AtomicBool>) -> Self {
        Self {
            channel,
            handler,
            shutdown,
        }
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.channel.local_addr()
    }

    pub fn handler(&self) -> &N4Handler {
        &self.handler
    }

    /// Run the receive loop until the shutdown flag is set
    ///
    /// Per-datagram failures are logged and the loop carries on. Only a
    /// receive error on the socket itself ends the loop with `Err`.
    pub async fn run(&mut self) -> io::Result<()> {
        let mut buf = vec![0u8; MAX_DATAGRAM_LEN];
        log::info!("PFCP server starting main loop");

        loop {
            if self.shutdown.load(Ordering::SeqCst) {
                log::info!("PFCP server shutting down");
                break;
            }

            let recv_result =
                tokio::time::timeout(SHUTDOWN_POLL_INTERVAL, self.channel.recv_from(&mut buf))
                    .await;

            let (len, src_addr) = match recv_result {
                Ok(Ok(received)) => received,
                Ok(Err(e)) if is_transient(&e) => {
                    log::warn!("PFCP socket error: {e}");
                    continue;
                }
                Ok(Err(e)) => {
                    log::error!("PFCP socket receive failed: {e}");
                    return Err(e);
                }
                Err(_) => continue,
            };

            log::debug!("PFCP received {len} bytes from {src_addr}");
            let Some(response) = self.handler.handle_datagram(&buf[..len], src_addr) else {
                continue;
            };

            if let Err(e) = self.channel.send_to(&response.data, src_addr).await {
                log::error!(
                    "Failed to send {} to {src_addr}: {e}",
                    response.message_type.name()
                );
            }
        }

        Ok(())
    }
}

/// Errors a UDP socket reports for an earlier exchange rather than itself
fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
            | io::ErrorKind::WouldBlock
    )
}
