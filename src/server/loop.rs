// Server loop module
// Accepts connections until the shutdown future resolves

use std::future::Future;
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;

/// Run the accept loop on `listener` until `shutdown` resolves.
///
/// Accept errors (e.g. `EMFILE`) are logged and the loop keeps going.
/// Connections still open at shutdown finish in their own tasks.
pub async fn serve<F>(listener: TcpListener, state: Arc<AppState>, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()>,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    let local_addr = listener.local_addr()?;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to accept connection");
                    }
                }
            }

            () = &mut shutdown => {
                tracing::info!(
                    %local_addr,
                    active = active_connections.load(std::sync::atomic::Ordering::SeqCst),
                    "Listener closed"
                );
                return Ok(());
            }
        }
    }
}
