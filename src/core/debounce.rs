use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Trailing-edge debouncer.
///
/// Values pushed with [`Debouncer::call`] restart the quiet window; once no new value has
/// arrived for `delay`, the action runs once with the most recent value. Values arriving
/// while the action is running start a new window after it completes.
pub struct Debouncer<T> {
    tx: mpsc::UnboundedSender<T>,
    worker: JoinHandle<()>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: Fn(T) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<T>();
        let worker = tokio::spawn(async move {
            while let Some(mut pending) = rx.recv().await {
                loop {
                    tokio::select! {
                        next = rx.recv() => match next {
                            Some(value) => {
                                debug!("Debounce window restarted");
                                pending = value;
                            }
                            None => break,
                        },
                        _ = tokio::time::sleep(delay) => break,
                    }
                }
                action(pending).await;
            }
        });
        Self { tx, worker }
    }

    pub fn call(&self, value: T) {
        // The worker only exits once every sender is gone, so this cannot fail while
        // `self` is alive.
        let _ = self.tx.send(value);
    }

    /// Stops accepting values, runs the action for any pending value and waits for the
    /// worker to finish.
    pub async fn finish(self) {
        drop(self.tx);
        if let Err(e) = self.worker.await {
            debug!("Debounce worker ended abnormally: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tokio::time::sleep;

    fn recording_debouncer(delay_ms: u64) -> (Arc<Mutex<Vec<String>>>, Debouncer<String>) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = calls.clone();
        let debouncer = Debouncer::new(Duration::from_millis(delay_ms), move |query: String| {
            let sink = sink.clone();
            async move {
                sink.lock().await.push(query);
            }
        });
        (calls, debouncer)
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_updates_run_once_with_last_value() {
        let (calls, debouncer) = recording_debouncer(400);

        for query in ["a", "ap", "app", "appl", "apple"] {
            debouncer.call(query.to_string());
            sleep(Duration::from_millis(50)).await;
        }
        sleep(Duration::from_secs(2)).await;

        assert_eq!(*calls.lock().await, vec!["apple".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pauses_split_executions() {
        let (calls, debouncer) = recording_debouncer(400);

        debouncer.call("ib".to_string());
        sleep(Duration::from_millis(500)).await;
        debouncer.call("ibm".to_string());
        sleep(Duration::from_millis(500)).await;

        assert_eq!(
            *calls.lock().await,
            vec!["ib".to_string(), "ibm".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_finish_flushes_pending_value() {
        let (calls, debouncer) = recording_debouncer(400);

        debouncer.call("tsla".to_string());
        debouncer.finish().await;

        assert_eq!(*calls.lock().await, vec!["tsla".to_string()]);
    }
}
