pub mod app;
pub mod setup;
pub mod source;
pub mod status;
pub mod update;

use tokio_util::sync::CancellationToken;

/// A token cancelled on the first Ctrl-C.
///
/// Must be called inside the runtime.
pub fn shutdown_token() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, stopping after the current step");
            trigger.cancel();
        }
    });
    token
}
