//! Ctrl-C handling.
//!
//! The first interrupt cancels the run so partial results still print. A
//! second one means the user does not want to wait for in-flight probes.

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Exit status for a run killed by a second interrupt (128 + SIGINT).
pub const FORCED_EXIT_CODE: i32 = 130;

/// Stream of Ctrl-C presses. Installing it replaces the default SIGINT
/// behaviour for the rest of the process.
pub fn ctrl_c_signals() -> BoxStream<'static, ()> {
    stream::unfold((), |()| async {
        tokio::signal::ctrl_c().await.ok().map(|()| ((), ()))
    })
    .boxed()
}

/// Cancel `cancel` on the first signal. Returns true once a second signal
/// arrives, false if the signal source ends first.
pub async fn watch_interrupts<S>(signals: S, cancel: CancellationToken) -> bool
where
    S: Stream<Item = ()> + Unpin,
{
    let mut signals = signals;
    if signals.next().await.is_none() {
        return false;
    }
    eprintln!("\nStopping, waiting for in-flight probes... (Ctrl-C again to quit)");
    debug!("interrupt received, cancelling");
    cancel.cancel();

    signals.next().await.is_some()
}

/// Spawn the watcher for the process. A second Ctrl-C exits at once.
pub fn install(cancel: CancellationToken) {
    tokio::spawn(async move {
        if watch_interrupts(ctrl_c_signals(), cancel).await {
            std::process::exit(FORCED_EXIT_CODE);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::mpsc;

    #[tokio::test]
    async fn test_first_signal_cancels_second_forces_exit() {
        let (tx, rx) = mpsc::unbounded::<()>();
        let cancel = CancellationToken::new();
        let watcher = tokio::spawn(watch_interrupts(rx, cancel.clone()));

        tx.unbounded_send(()).unwrap();
        cancel.cancelled().await;
        assert!(!watcher.is_finished());

        tx.unbounded_send(()).unwrap();
        assert!(watcher.await.unwrap());
    }

    #[tokio::test]
    async fn test_no_signal_leaves_run_alone() {
        let cancel = CancellationToken::new();
        assert!(!watch_interrupts(stream::empty(), cancel.clone()).await);
        assert!(!cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_single_signal_then_source_ends() {
        let cancel = CancellationToken::new();
        assert!(!watch_interrupts(stream::iter([()]), cancel.clone()).await);
        assert!(cancel.is_cancelled());
    }
}
