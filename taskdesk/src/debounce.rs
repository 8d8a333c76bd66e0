//! Debounced value: a `watch` channel in, a delayed `watch` channel out.
//!
//! ```text
//!   set("a") set("ab") set("abc") ........ 300ms ........> emits "abc"
//!      |        |         |
//!      +--------+---------+-- each change restarts the quiet-period timer
//! ```
//!
//! A background task owns the timer. Dropping [`Debounced`] aborts the task,
//! so no value is emitted after teardown.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;

pub struct Debounced<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> Debounced<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    /// Start debouncing with `initial` as both the input and output value.
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);
        let task = tokio::spawn(run(input_rx, output_tx, delay));
        Self {
            input,
            output,
            task,
        }
    }

    /// Feed a new input value. Setting the current value again is not a
    /// change and does not restart the timer.
    pub fn set(&self, value: T) {
        self.input.send_if_modified(|cur| {
            if *cur == value {
                false
            } else {
                *cur = value;
                true
            }
        });
    }

    /// Latest raw input.
    pub fn input(&self) -> T {
        self.input.borrow().clone()
    }

    /// Latest debounced output.
    pub fn current(&self) -> T {
        self.output.borrow().clone()
    }

    /// Receiver that is notified each time the debounced value changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }
}

impl<T> Drop for Debounced<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<T>(mut input: watch::Receiver<T>, output: watch::Sender<T>, delay: Duration)
where
    T: Clone + PartialEq,
{
    loop {
        if input.changed().await.is_err() {
            return;
        }
        // Quiet period: restart the timer on every further change.
        loop {
            tokio::select! {
                _ = time::sleep(delay) => break,
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
            }
        }
        let latest = input.borrow_and_update().clone();
        output.send_if_modified(|cur| {
            if *cur == latest {
                false
            } else {
                *cur = latest;
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tokio::time::Instant;

    const DELAY: Duration = Duration::from_millis(300);

    /// Record every emitted value with the instant it was seen.
    fn record(d: &Debounced<String>) -> Arc<Mutex<Vec<(String, Instant)>>> {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut rx = d.subscribe();
        let sink = Arc::clone(&log);
        tokio::spawn(async move {
            while rx.changed().await.is_ok() {
                let v = rx.borrow_and_update().clone();
                sink.lock().unwrap().push((v, Instant::now()));
            }
        });
        log
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_final_value_is_emitted() {
        let d = Debounced::new(String::new(), DELAY);
        let log = record(&d);

        for text in ["a", "ab", "abc"] {
            d.set(text.to_string());
            time::sleep(Duration::from_millis(100)).await;
        }
        let last_set = Instant::now() - Duration::from_millis(100);
        time::sleep(Duration::from_secs(1)).await;

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log[0].0, "abc");
        assert!(log[0].1 - last_set >= DELAY);
        assert_eq!(d.current(), "abc");
    }

    #[tokio::test(start_paused = true)]
    async fn test_not_emitted_before_quiet_period() {
        let d = Debounced::new(String::new(), DELAY);
        d.set("x".to_string());
        time::sleep(Duration::from_millis(299)).await;
        assert_eq!(d.current(), "");
        assert_eq!(d.input(), "x");
        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(d.current(), "x");
    }

    #[tokio::test(start_paused = true)]
    async fn test_returning_to_old_value_emits_nothing() {
        let d = Debounced::new("q".to_string(), DELAY);
        let log = record(&d);
        d.set("qa".to_string());
        time::sleep(Duration::from_millis(50)).await;
        d.set("q".to_string());
        time::sleep(Duration::from_secs(1)).await;
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_emit() {
        let d = Debounced::new(String::new(), DELAY);
        let mut rx = d.subscribe();
        d.set("late".to_string());
        drop(d);
        time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*rx.borrow_and_update(), "");
        // The sender went away with the task.
        assert!(rx.changed().await.is_err());
    }
}
