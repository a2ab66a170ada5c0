pub mod routes;
pub mod worker;

pub use routes::{router, AnalyzeRequest, ApiState, ErrorBody, HealthStatus};
pub use worker::{run_worker, AnalysisJob, AnalysisReply, KeywordAnalysis, JOB_QUEUE_DEPTH};

use pulse_core::{CoreError, ServerConfig};
use std::future::IntoFuture;
use tokio::net::TcpListener;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Serves the HTTP API on `config`'s address until Ctrl-C.
///
/// Requests are queued to `analysis`, which runs on the calling task, so the
/// analyzer itself never has to be `Send`.
pub async fn serve<A: KeywordAnalysis>(analysis: A, config: &ServerConfig) -> Result<(), CoreError> {
    let listener = TcpListener::bind(config.address()).await?;
    let port = listener.local_addr()?.port();

    let (jobs, queue) = mpsc::channel(JOB_QUEUE_DEPTH);
    let app = router(ApiState::new(jobs, port));

    info!("Server running on port {}", port);
    info!("Reddit analysis API: http://localhost:{}/api/analyze", port);
    info!("Health check: http://localhost:{}/api/health", port);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();
    let (served, ()) = tokio::join!(server, run_worker(analysis, queue));
    served?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => {
            warn!("Could not listen for Ctrl-C, serving until killed: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
