//! Termination signal listener.
//!
//! SIGINT and SIGTERM cancel the run's [`CancellationToken`]; running ffmpeg
//! processes are then killed by the invoker and no new jobs start.

use encodehls_core::CancellationToken;

use tokio::signal;

use std::io;
use std::thread;

/// Starts a background thread that cancels `token` on SIGINT or SIGTERM.
pub fn spawn_signal_listener(token: CancellationToken) -> io::Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    thread::Builder::new()
        .name("encodehls-signals".to_string())
        .spawn(move || {
            runtime.block_on(wait_for_termination());
            token.cancel();
        })?;
    Ok(())
}

async fn wait_for_termination() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                log::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    log::warn!("Termination signal received");
}
