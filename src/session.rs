//! Thread-per-load execution and debounced filter scheduling.
//!
//! A load runs to completion on its own worker thread and hands its result
//! back through a single channel send; there is no mid-parse cancellation.
//! A newer load supersedes an older one only by overwriting the active
//! record set once its result is applied, so the last load to complete wins.

use std::{
    path::PathBuf,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
        mpsc::{self, Receiver, TryRecvError},
    },
    thread,
    time::Duration,
};

use log::debug;

use crate::{
    error::PipelineError,
    load::{self, ProgressObserver},
    record::CallRecord,
};

pub type LoadResult = Result<Vec<CallRecord>, PipelineError>;

/// Delay between the last keystroke and filter evaluation.
pub const FILTER_DEBOUNCE: Duration = Duration::from_millis(500);

/// Receiving side of the one-shot load handoff.
pub struct LoadHandle {
    receiver: Receiver<LoadResult>,
}

impl LoadHandle {
    /// Blocks until the worker posts its result.
    pub fn wait(self) -> LoadResult {
        self.receiver.recv().unwrap_or_else(|_| {
            Err(PipelineError::Parse("Ladevorgang abgebrochen".to_string()))
        })
    }

    /// Non-blocking poll; `None` while the load is still running.
    pub fn poll(&self) -> Option<LoadResult> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(PipelineError::Parse(
                "Ladevorgang abgebrochen".to_string(),
            ))),
        }
    }
}

/// Spawns a load on a dedicated worker thread. The worker owns the in-flight
/// record set exclusively; the returned handle delivers it exactly once.
pub fn spawn_load<P>(path: PathBuf, progress: P) -> LoadHandle
where
    P: ProgressObserver + 'static,
{
    let (sender, receiver) = mpsc::channel();
    thread::spawn(move || {
        let result = load::load(&path, &progress);
        // the caller may have dropped the handle; nothing left to do then
        let _ = sender.send(result);
    });
    LoadHandle { receiver }
}

/// Debounces filter requests. Each call supersedes the pending one; an
/// evaluation fires only if it still holds the latest token and the search
/// text is unchanged at fire time.
pub struct FilterDebouncer {
    state: Arc<DebounceState>,
    delay: Duration,
}

struct DebounceState {
    token: AtomicU64,
    text: Mutex<String>,
}

impl FilterDebouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            state: Arc::new(DebounceState {
                token: AtomicU64::new(0),
                text: Mutex::new(String::new()),
            }),
            delay,
        }
    }

    pub fn schedule<F>(&self, search: &str, action: F)
    where
        F: FnOnce(&str) + Send + 'static,
    {
        let ticket = self.state.token.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut latest) = self.state.text.lock() {
            search.clone_into(&mut latest);
        }
        let state = Arc::clone(&self.state);
        let delay = self.delay;
        let search = search.to_string();
        thread::spawn(move || {
            thread::sleep(delay);
            if state.token.load(Ordering::SeqCst) != ticket {
                debug!("Dropping superseded filter request {ticket}");
                return;
            }
            let unchanged = state
                .text
                .lock()
                .map(|latest| *latest == search)
                .unwrap_or(false);
            if unchanged {
                action(&search);
            }
        });
    }
}

impl Default for FilterDebouncer {
    fn default() -> Self {
        Self::new(FILTER_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::NullProgress;

    #[test]
    fn spawn_load_posts_exactly_one_result() {
        let handle = spawn_load(PathBuf::from("no-such-file.csv"), NullProgress);
        let result = handle.wait();
        assert!(result.is_err());
    }

    #[test]
    fn poll_reports_pending_then_result() {
        let handle = spawn_load(PathBuf::from("no-such-file.txt"), NullProgress);
        // the worker finishes quickly on the extension gate; poll until then
        let mut outcome = None;
        for _ in 0..100 {
            if let Some(result) = handle.poll() {
                outcome = Some(result);
                break;
            }
            thread::sleep(Duration::from_millis(10));
        }
        assert!(matches!(outcome, Some(Err(PipelineError::NotCsv))));
    }

    #[test]
    fn debouncer_drops_superseded_requests() {
        let (sender, receiver) = mpsc::channel();
        let debouncer = FilterDebouncer::new(Duration::from_millis(200));

        let first = sender.clone();
        debouncer.schedule("alt", move |text| {
            let _ = first.send(text.to_string());
        });
        debouncer.schedule("neu", move |text| {
            let _ = sender.send(text.to_string());
        });

        let fired = receiver
            .recv_timeout(Duration::from_secs(2))
            .expect("latest request fires");
        assert_eq!(fired, "neu");
        assert!(receiver.recv_timeout(Duration::from_millis(300)).is_err());
    }
}
