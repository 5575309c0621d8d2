//! Status viewer: fetches a health snapshot and tracks its view state.
//!
//! Opening a viewer enters `Loading` and spawns a single fetch task. The task
//! reports back over a oneshot channel; dropping the viewer drops the receiver,
//! so a response that arrives after teardown is discarded instead of applied.
//! Only the initial open and an explicit `retry` from `Error` start a fetch.

mod render;
mod source;
mod state;

use std::sync::Arc;

use tokio::sync::oneshot;
use tracing::Instrument;

pub use render::{
    format_local_timestamp, format_local_zoned_timestamp, format_timestamp_in, format_uptime,
    format_zoned_timestamp_in, render_text, render_text_in, StatusTone, LOADING_TEXT,
};
pub use source::{health_url, FetchError, HealthSource, HttpHealthSource, LocalHealthSource};
pub use state::ViewState;

use crate::health::HealthSnapshot;

type FetchResult = Result<HealthSnapshot, FetchError>;

pub struct StatusViewer {
    source: Arc<dyn HealthSource>,
    state: ViewState,
    pending: Option<oneshot::Receiver<FetchResult>>,
}

impl StatusViewer {
    /// Opens a viewer and starts the initial fetch. Must run inside a tokio runtime.
    pub fn open(source: Arc<dyn HealthSource>) -> Self {
        let mut viewer = Self {
            source,
            state: ViewState::Loading,
            pending: None,
        };
        viewer.start_fetch();
        viewer
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Whether a fetch is in flight
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Waits for the in-flight fetch (if any) and applies its result.
    ///
    /// Cancel-safe: dropping the returned future leaves the fetch pending.
    pub async fn settle(&mut self) -> &ViewState {
        if let Some(pending) = self.pending.as_mut() {
            let outcome = pending.await;
            self.pending = None;
            self.state = match outcome {
                Ok(result) => ViewState::from_fetch(result),
                Err(_) => {
                    tracing::error!("Health fetch task ended without reporting a result");
                    ViewState::failed()
                }
            };
        }
        &self.state
    }

    /// Re-enters `Loading` and issues one new fetch.
    ///
    /// Only allowed from `Error`; returns false (and does nothing) otherwise.
    pub fn retry(&mut self) -> bool {
        if !self.state.is_error() {
            tracing::debug!(state = ?self.state, "Ignoring retry outside of error state");
            return false;
        }
        tracing::info!(source = %self.source.describe(), "Retrying health fetch");
        self.start_fetch();
        true
    }

    fn start_fetch(&mut self) {
        self.state = ViewState::Loading;

        let (tx, rx) = oneshot::channel();
        let source = Arc::clone(&self.source);
        let span = tracing::debug_span!("health_fetch", source = %source.describe());

        tokio::spawn(
            async move {
                let result = source.fetch().await;
                if tx.send(result).is_err() {
                    tracing::debug!("Viewer closed before the health response arrived; discarding");
                }
            }
            .instrument(span),
        );

        self.pending = Some(rx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VIEWER_ERROR_MESSAGE;
    use crate::health::HealthStatus;
    use async_trait::async_trait;
    use chrono::Utc;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn snapshot() -> HealthSnapshot {
        HealthSnapshot {
            status: HealthStatus::Healthy,
            timestamp: Utc::now(),
            uptime: 42.0,
            environment: "test".to_string(),
            version: "9.9.9".to_string(),
            service: "deploy-status".to_string(),
        }
    }

    /// Replays scripted outcomes and counts calls.
    struct ScriptedSource {
        outcomes: Mutex<VecDeque<bool>>,
        calls: AtomicUsize,
    }

    impl ScriptedSource {
        fn new(outcomes: &[bool]) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.iter().copied().collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl HealthSource for ScriptedSource {
        async fn fetch(&self) -> Result<HealthSnapshot, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let ok = self.outcomes.lock().unwrap().pop_front().unwrap_or(true);
            if ok {
                Ok(snapshot())
            } else {
                Err(FetchError::Status(StatusCode::BAD_GATEWAY))
            }
        }

        fn describe(&self) -> String {
            "scripted".to_string()
        }
    }

    /// Blocks every fetch until released.
    struct GatedSource {
        gate: Arc<Notify>,
        finished: Arc<Notify>,
    }

    #[async_trait]
    impl HealthSource for GatedSource {
        async fn fetch(&self) -> Result<HealthSnapshot, FetchError> {
            self.gate.notified().await;
            self.finished.notify_one();
            Ok(snapshot())
        }

        fn describe(&self) -> String {
            "gated".to_string()
        }
    }

    #[tokio::test]
    async fn test_open_starts_loading_then_loads() {
        let source = ScriptedSource::new(&[true]);
        let mut viewer = StatusViewer::open(source.clone());
        assert!(viewer.state().is_loading());
        assert!(viewer.is_pending());

        let state = viewer.settle().await;
        assert!(matches!(state, ViewState::Loaded(s) if s.version == "9.9.9"));
        assert!(!viewer.is_pending());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_failure_then_retry_issues_one_request() {
        let source = ScriptedSource::new(&[false, true]);
        let mut viewer = StatusViewer::open(source.clone());

        let state = viewer.settle().await;
        assert_eq!(state, &ViewState::Error(VIEWER_ERROR_MESSAGE.to_string()));
        assert_eq!(source.calls(), 1);

        assert!(viewer.retry());
        assert!(viewer.state().is_loading());

        viewer.settle().await;
        assert!(viewer.state().snapshot().is_some());
        assert_eq!(source.calls(), 2);
    }

    #[tokio::test]
    async fn test_retry_refused_unless_error() {
        let source = ScriptedSource::new(&[true]);
        let mut viewer = StatusViewer::open(source.clone());

        // Still loading
        assert!(!viewer.retry());
        viewer.settle().await;

        // Loaded
        assert!(!viewer.retry());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_settle_without_pending_is_noop() {
        let source = ScriptedSource::new(&[true]);
        let mut viewer = StatusViewer::open(source.clone());
        viewer.settle().await;
        let again = viewer.settle().await.clone();
        assert!(again.snapshot().is_some());
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test]
    async fn test_repeated_success_never_errors() {
        for _ in 0..10 {
            let mut viewer = StatusViewer::open(ScriptedSource::new(&[]));
            assert!(!viewer.settle().await.is_error());
        }
    }

    #[tokio::test]
    async fn test_settle_is_cancel_safe() {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            finished: finished.clone(),
        });
        let mut viewer = StatusViewer::open(source);

        let timed_out = tokio::time::timeout(Duration::from_millis(20), viewer.settle()).await;
        assert!(timed_out.is_err());
        assert!(viewer.state().is_loading());
        assert!(viewer.is_pending());

        gate.notify_one();
        assert!(viewer.settle().await.snapshot().is_some());
    }

    #[tokio::test]
    async fn test_drop_while_pending_discards_response() {
        let gate = Arc::new(Notify::new());
        let finished = Arc::new(Notify::new());
        let source = Arc::new(GatedSource {
            gate: gate.clone(),
            finished: finished.clone(),
        });
        let viewer = StatusViewer::open(source);
        drop(viewer);

        // The fetch still completes; its result has nowhere to go
        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(1), finished.notified())
            .await
            .expect("fetch task should finish after the viewer is gone");
    }

    #[tokio::test]
    async fn test_unreachable_http_source_settles_to_error() {
        // Nothing listens on the discard port
        let base: reqwest::Url = "http://127.0.0.1:9".parse().unwrap();
        let source = HttpHealthSource::new(&base, Duration::from_secs(2)).unwrap();
        let mut viewer = StatusViewer::open(Arc::new(source));
        assert!(viewer.state().is_loading());

        let state = viewer.settle().await;
        assert!(state.is_error());
        assert_eq!(state, &ViewState::failed());
        assert!(!viewer.is_pending());
    }
}
