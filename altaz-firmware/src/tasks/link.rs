//! Command link task
//!
//! TCP server for pointing commands. Serves one client at a time: the next
//! connection is only accepted after the current one closes. Received bytes
//! are forwarded unparsed to the control task.

use defmt::*;
use embassy_net::tcp::TcpSocket;
use embassy_net::Stack;

use crate::channels::{CLIENT_CONNECTED, LINK_RX};

/// Socket buffer sizes
const RX_BUFFER_SIZE: usize = 1024;
const TX_BUFFER_SIZE: usize = 64;

/// Link task - accepts clients and feeds the control task
#[embassy_executor::task]
pub async fn link_task(stack: Stack<'static>, port: u16) -> ! {
    info!("Link task started");

    let mut rx_buffer = [0u8; RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TX_BUFFER_SIZE];
    let mut chunk = [0u8; 128];

    loop {
        let mut socket = TcpSocket::new(stack, &mut rx_buffer, &mut tx_buffer);
        socket.set_timeout(None);

        info!("Listening on port {}", port);
        if let Err(e) = socket.accept(port).await {
            warn!("Accept failed: {:?}", e);
            continue;
        }
        info!("Client connected: {:?}", socket.remote_endpoint());

        LINK_RX.clear();
        CLIENT_CONNECTED.signal(());

        loop {
            match socket.read(&mut chunk).await {
                Ok(0) => {
                    info!("Client disconnected");
                    break;
                }
                Ok(n) => {
                    trace!("Link rx {} bytes", n);
                    LINK_RX.write_all(&chunk[..n]).await;
                }
                Err(e) => {
                    warn!("Link read error: {:?}", e);
                    break;
                }
            }
        }

        socket.close();
        socket.abort();
    }
}
