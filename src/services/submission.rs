//! Submission controller.
//!
//! Validates that both card images are present, posts them through an
//! `OcrBackend`, and publishes a simulated upload progress on a watch
//! channel while the request is in flight.

use crate::error::SubmitError;
use crate::models::capture::CardSide;
use crate::models::config::{AppConfig, UploadConfig};
use crate::models::ocr_result::OcrResult;
use crate::models::upload::UploadState;
use crate::services::images::CardImageSource;
use crate::services::ocr::{HttpOcrClient, OcrBackend};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub struct SubmissionController {
    backend: Arc<dyn OcrBackend>,
    upload: UploadConfig,
    state: Arc<watch::Sender<UploadState>>,
}

impl SubmissionController {
    pub fn new(backend: Arc<dyn OcrBackend>, upload: UploadConfig) -> Self {
        let (state, _) = watch::channel(UploadState::default());
        Self {
            backend,
            upload,
            state: Arc::new(state),
        }
    }

    /// Controller talking to the configured OCR server over HTTP
    pub fn from_config(config: &AppConfig) -> Result<Self, String> {
        let client = HttpOcrClient::new(&config.api)?;
        tracing::info!(base_url = client.base_url(), "OCR client configured");
        Ok(Self::new(Arc::new(client), config.upload.clone()))
    }

    /// Current upload state
    pub fn state(&self) -> UploadState {
        self.state.borrow().clone()
    }

    /// Receive every upload state change
    pub fn subscribe(&self) -> watch::Receiver<UploadState> {
        self.state.subscribe()
    }

    /// Submit both images and wait for the normalized result.
    ///
    /// A missing side fails before any request is made. Whatever the
    /// outcome, progress stops and `loading` is false on return.
    pub async fn submit(&self, source: &dyn CardImageSource) -> Result<OcrResult, SubmitError> {
        let missing = (!source.is_complete()).then(|| source.missing_message().to_string());

        // Check-and-start under the channel lock so two callers cannot both start
        let mut rejected = None;
        let start = self.upload.start;
        self.state.send_if_modified(|s| {
            if s.loading {
                rejected = Some(SubmitError::Busy);
                return false;
            }
            match &missing {
                Some(message) => {
                    s.error = Some(message.clone());
                    rejected = Some(SubmitError::Validation(message.clone()));
                }
                None => *s = UploadState::started(start),
            }
            true
        });

        if let Some(err) = rejected {
            tracing::warn!(
                error = %err,
                front = source.has(CardSide::Front),
                back = source.has(CardSide::Back),
                "Submission rejected"
            );
            return Err(err);
        }

        let in_flight = InFlight::start(Arc::clone(&self.state), &self.upload);

        let outcome = self.send(source).await;

        in_flight.stop_ticker();
        let error = outcome.as_ref().err().map(ToString::to_string);
        if let Some(error) = &error {
            tracing::warn!(error = %error, "OCR submission failed");
        }
        self.state.send_modify(|s| {
            s.progress = 100;
            s.error = error;
        });

        tokio::time::sleep(Duration::from_millis(self.upload.settle_ms)).await;
        self.state.send_modify(|s| s.loading = false);
        drop(in_flight);

        outcome
    }

    async fn send(&self, source: &dyn CardImageSource) -> Result<OcrResult, SubmitError> {
        let front = source.payload(CardSide::Front).await?;
        let back = source.payload(CardSide::Back).await?;
        self.backend.recognize(front, back).await
    }
}

/// Progress ticker for one submission.
///
/// Dropping it stops the ticker and clears `loading`, so a cancelled
/// submission never leaves the window spinning.
struct InFlight {
    state: Arc<watch::Sender<UploadState>>,
    ticker: JoinHandle<()>,
}

impl InFlight {
    fn start(state: Arc<watch::Sender<UploadState>>, config: &UploadConfig) -> Self {
        let period = Duration::from_millis(config.tick_ms.max(1));
        let (step, cap) = (config.step, config.cap);
        let ticking = Arc::clone(&state);

        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // First tick completes immediately
            interval.tick().await;
            loop {
                interval.tick().await;
                let mut capped = false;
                ticking.send_if_modified(|s| {
                    let advanced = s.tick(step, cap);
                    capped = !advanced;
                    advanced
                });
                if capped {
                    break;
                }
            }
        });

        Self { state, ticker }
    }

    fn stop_ticker(&self) {
        self.ticker.abort();
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.ticker.abort();
        self.state.send_if_modified(|s| std::mem::replace(&mut s.loading, false));
    }
}
