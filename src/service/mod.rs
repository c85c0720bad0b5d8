pub mod polling_loop;
pub mod stats;

pub use polling_loop::PollingLoop;
pub use stats::LoopStats;

use tokio::sync::watch;

/// Resolve once the shutdown flag is raised
///
/// A dropped sender means no shutdown can ever be requested, so this never
/// resolves in that case.
pub async fn wait_for_shutdown(shutdown: &mut watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        std::future::pending::<()>().await;
    }
}
