// Connection handling module
// Accepts TCP connections, enforces the connection cap and serves HTTP/1.1

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;

/// Decrements the active connection counter when the connection task ends
struct ConnectionGuard(Arc<AtomicUsize>);

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Accept a connection, checking the configured limit.
///
/// Returns `false` when the connection was rejected.
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
) -> bool {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);
    let guard = ConnectionGuard(Arc::clone(conn_counter));

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            tracing::warn!(
                %peer_addr,
                active = prev_count,
                max = max_conn,
                "Max connections reached, connection rejected"
            );
            drop(stream);
            return false;
        }
    }

    tracing::trace!(%peer_addr, active = prev_count + 1, "Connection accepted");
    handle_connection(stream, peer_addr, Arc::clone(state), guard);
    true
}

/// Serve a single connection in a spawned task.
///
/// Keep-alive is on unless `keep_alive_timeout` is 0. The whole connection,
/// idle keep-alive time included, is bounded by `max(read_timeout, write_timeout)`.
fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
    guard: ConnectionGuard,
) {
    tokio::spawn(async move {
        let _guard = guard;
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let timeout_duration = performance.connection_timeout();

        let mut builder = http1::Builder::new();
        builder.keep_alive(performance.keep_alive_enabled());

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| handler::handle_request(req, Arc::clone(&service_state), peer_addr)),
        );

        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::debug!(%peer_addr, error = %err, "Connection error"),
            Err(_) => tracing::debug!(
                %peer_addr,
                timeout_secs = timeout_duration.as_secs(),
                "Connection timed out"
            ),
        }
    });
}
