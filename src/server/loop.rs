// Server loop module
// Accepts connections until the shutdown signal fires

use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::handle_connection;
use super::signal::ShutdownSignal;
use crate::config::ServerSettings;
use crate::logger;

/// Accept loop
///
/// Returns `Ok(())` once `shutdown` is triggered. Connections already being served
/// keep running in their own tasks until the runtime is dropped.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<ServerSettings>,
    shutdown: Arc<ShutdownSignal>,
) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => handle_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.wait() => return,
        }
    }
}
