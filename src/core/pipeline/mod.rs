//! Streaming pipeline plumbing.
//!
//! Stages are tokio tasks joined by bounded channels. Each item travels as a
//! `Result`; an `Err` is always the last item a stage emits. A stage stops
//! when its consumer drops the receiving end or when the enclosing [`Scope`]
//! is cancelled, so abandoning a stream never leaves a worker behind.

mod pager;
mod stage;

pub use pager::{paginate, pump, Flow, Page};
pub use stage::{run, FetchValues, ListSecrets, ListVersions, Step};

use std::future::Future;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::trace;

use crate::error::{Error, Result};

/// Lazily populated, single-pass sequence of items from a producer task.
pub struct ItemStream<T> {
    rx: mpsc::Receiver<Result<T>>,
}

impl<T> ItemStream<T> {
    /// Next item, or `None` once the producer is done.
    pub async fn next(&mut self) -> Option<Result<T>> {
        self.rx.recv().await
    }

    /// Drain the stream, stopping at the first error.
    pub async fn collect(mut self) -> Result<Vec<T>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }
}

/// Sending half of an [`ItemStream`].
pub struct Emitter<T> {
    tx: mpsc::Sender<Result<T>>,
    cancel: CancellationToken,
}

impl<T> Emitter<T> {
    /// Emit one item. Returns `false` once nobody is reading any more.
    pub async fn emit(&self, item: T) -> bool {
        self.send(Ok(item)).await
    }

    /// Emit a terminal error.
    pub async fn fail(&self, err: Error) {
        self.send(Err(err)).await;
    }

    async fn send(&self, item: Result<T>) -> bool {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => false,
            sent = self.tx.send(item) => sent.is_ok(),
        }
    }
}

/// Lifetime of every task spawned for one session.
///
/// Cancelling the scope stops all of its tasks at their next await point.
#[derive(Clone)]
pub struct Scope {
    cancel: CancellationToken,
    tracker: TaskTracker,
    buffer: usize,
}

impl Scope {
    /// New scope whose channels hold at most `buffer` items.
    pub fn new(buffer: usize) -> Self {
        Self {
            cancel: CancellationToken::new(),
            tracker: TaskTracker::new(),
            buffer: buffer.max(1),
        }
    }

    pub fn buffer(&self) -> usize {
        self.buffer
    }

    /// Token cancelled when the scope shuts down.
    pub fn token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Bounded channel bound to this scope.
    pub fn channel<T>(&self) -> (Emitter<T>, ItemStream<T>) {
        let (tx, rx) = mpsc::channel(self.buffer);
        let emitter = Emitter {
            tx,
            cancel: self.cancel.clone(),
        };
        (emitter, ItemStream { rx })
    }

    /// Spawn a producer that is dropped when the scope is cancelled.
    pub fn spawn<F>(&self, name: &'static str, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.cancel.clone();
        self.tracker.spawn(async move {
            trace!(task = name, "started");
            tokio::select! {
                _ = cancel.cancelled() => trace!(task = name, "cancelled"),
                _ = task => trace!(task = name, "finished"),
            }
        });
    }

    /// Stream that replays `items` in order.
    pub fn replay<T>(&self, items: Vec<T>) -> ItemStream<T>
    where
        T: Send + 'static,
    {
        let (out, stream) = self.channel();
        self.spawn("replay", async move {
            for item in items {
                if !out.emit(item).await {
                    return;
                }
            }
        });
        stream
    }

    /// Number of tasks still running.
    pub fn active(&self) -> usize {
        self.tracker.len()
    }

    /// Cancel every task and wait until all of them have exited.
    pub async fn shutdown(&self) {
        self.cancel.cancel();
        self.tracker.close();
        self.tracker.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_replay_preserves_order() {
        let scope = Scope::new(1);
        let items = scope.replay(vec![1, 2, 3]).collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_dropped_stream_stops_producer() {
        let scope = Scope::new(1);
        let stream = scope.replay((0..10_000).collect::<Vec<_>>());
        drop(stream);

        tokio::time::timeout(Duration::from_secs(5), async {
            while scope.active() > 0 {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("producer outlived its reader");
    }

    #[tokio::test]
    async fn test_shutdown_stops_blocked_producer() {
        let scope = Scope::new(1);
        // held but never read: the producer blocks on its second send
        let _stream = scope.replay((0..100).collect::<Vec<_>>());

        tokio::time::timeout(Duration::from_secs(5), scope.shutdown())
            .await
            .expect("shutdown hung");
        assert_eq!(scope.active(), 0);
    }

    #[tokio::test]
    async fn test_collect_stops_at_error() {
        let scope = Scope::new(4);
        let (out, stream) = scope.channel::<u32>();
        scope.spawn("failing", async move {
            out.emit(1).await;
            out.fail(Error::Other("boom".into())).await;
            out.emit(2).await;
        });

        let err = stream.collect().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
