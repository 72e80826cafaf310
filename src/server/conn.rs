//! Serving one accepted connection.

use crate::config::ServerState;
use crate::handler;
use crate::logger;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;

/// Serve a single connection to completion.
///
/// The connection is awaited inline rather than spawned: one client is
/// served at a time, and the accept loop resumes only once this one is
/// finished. Keep-alive is disabled for the same reason, so a client
/// holding its connection open cannot stall everyone behind it.
pub async fn serve(stream: tokio::net::TcpStream, peer: SocketAddr, state: &Arc<ServerState>) {
    let io = TokioIo::new(stream);
    let state = Arc::clone(state);

    let mut builder = http1::Builder::new();
    builder.keep_alive(false);

    let conn = builder.serve_connection(
        io,
        service_fn(move |req| handler::handle_request(req, Arc::clone(&state), peer)),
    );

    // Malformed requests are answered with hyper's own 400 before the
    // error surfaces here; either way this connection is done and the
    // next accept proceeds.
    if let Err(err) = conn.await {
        logger::log_connection_error(&err);
    }
}
