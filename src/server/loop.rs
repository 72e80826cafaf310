//! The accept loop.

use crate::config::ServerState;
use crate::logger;
use crate::server::conn;
use crate::server::shutdown::ShutdownSignal;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Accept and serve connections until shutdown is requested.
///
/// Connections are served strictly one at a time, each to completion, so
/// the shutdown check happens between iterations: a response in flight is
/// always finished before the loop stops. A failed accept is logged and
/// the loop keeps going. Returning drops the listener, which releases the
/// port.
pub async fn run(listener: TcpListener, state: Arc<ServerState>, shutdown: Arc<ShutdownSignal>) {
    loop {
        if shutdown.is_requested() {
            break;
        }

        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer)) => conn::serve(stream, peer, &state).await,
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = shutdown.wait() => {
                break;
            }
        }
    }
}
