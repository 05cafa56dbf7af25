//! Camera backed by the webview's `getUserMedia`.
//!
//! The webview owns the hardware. Rust asks for a stream through
//! `CameraSignals`, the window answers with a `StreamGrant`, then pushes
//! frames as data URLs. Releasing a stream signals the window to stop
//! every track it holds.

use super::{CameraDevice, Facing, VideoStream};
use crate::error::CameraError;
use crate::utils::data_url;
use async_trait::async_trait;
use image::{DynamicImage, GenericImageView};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// How long to wait for the permission prompt
const DEFAULT_GRANT_TIMEOUT: Duration = Duration::from_secs(60);

/// Window's answer to a stream request
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum StreamGrant {
    Granted { tracks: usize },
    Denied { reason: String },
    Unavailable,
}

/// Outbound notifications to the window
pub trait CameraSignals: Send + Sync {
    /// Ask the window to open a stream
    fn request_stream(&self, facing: Facing);

    /// Ask the window to stop `count` tracks
    fn release_tracks(&self, count: usize);
}

/// Shared state between the camera commands and the open stream
pub struct CameraBridge {
    pending: Mutex<Option<oneshot::Sender<StreamGrant>>>,
    frame: Mutex<Option<DynamicImage>>,
    signals: Box<dyn CameraSignals>,
    grant_timeout: Duration,
}

impl CameraBridge {
    pub fn new(signals: impl CameraSignals + 'static) -> Self {
        Self {
            pending: Mutex::new(None),
            frame: Mutex::new(None),
            signals: Box::new(signals),
            grant_timeout: DEFAULT_GRANT_TIMEOUT,
        }
    }

    pub fn with_grant_timeout(mut self, timeout: Duration) -> Self {
        self.grant_timeout = timeout;
        self
    }

    /// Deliver the window's answer. Returns false if nobody was waiting.
    pub fn resolve(&self, grant: StreamGrant) -> bool {
        match self.pending.lock().take() {
            Some(tx) => tx.send(grant).is_ok(),
            None => {
                tracing::debug!(?grant, "Stream grant with no pending request");
                false
            }
        }
    }

    /// Store the latest video frame and return its size
    pub fn push_frame(&self, url: &str) -> Result<(u32, u32), CameraError> {
        let decoded = data_url::decode(url).map_err(CameraError::Frame)?;
        let image = image::load_from_memory(&decoded.bytes)
            .map_err(|e| CameraError::Frame(format!("Failed to decode frame: {}", e)))?;

        let size = image.dimensions();
        *self.frame.lock() = Some(image);
        Ok(size)
    }

    /// Forget the current frame (video not playing)
    pub fn clear_frame(&self) {
        *self.frame.lock() = None;
    }

    fn frame_size(&self) -> (u32, u32) {
        self.frame
            .lock()
            .as_ref()
            .map(|f| f.dimensions())
            .unwrap_or((0, 0))
    }

    async fn request(&self, facing: Facing) -> Result<StreamGrant, CameraError> {
        let (tx, rx) = oneshot::channel();
        // A newer request supersedes an unanswered one
        if self.pending.lock().replace(tx).is_some() {
            tracing::debug!("Replacing unanswered stream request");
        }

        self.signals.request_stream(facing);

        match tokio::time::timeout(self.grant_timeout, rx).await {
            Ok(Ok(grant)) => Ok(grant),
            Ok(Err(_)) => Err(CameraError::NotFound),
            Err(_) => {
                self.pending.lock().take();
                tracing::warn!(timeout = ?self.grant_timeout, "No answer to camera request");
                Err(CameraError::NotFound)
            }
        }
    }
}

/// `CameraDevice` backed by the bridge
#[derive(Clone)]
pub struct WebviewCamera {
    bridge: Arc<CameraBridge>,
}

impl WebviewCamera {
    pub fn new(bridge: Arc<CameraBridge>) -> Self {
        Self { bridge }
    }
}

#[async_trait]
impl CameraDevice for WebviewCamera {
    async fn open_stream(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
        match self.bridge.request(facing).await? {
            StreamGrant::Granted { tracks } if tracks > 0 => {
                self.bridge.clear_frame();
                Ok(Box::new(WebviewStream {
                    bridge: Arc::clone(&self.bridge),
                    tracks,
                }))
            }
            StreamGrant::Granted { .. } | StreamGrant::Unavailable => Err(CameraError::NotFound),
            StreamGrant::Denied { reason } => Err(CameraError::PermissionDenied(reason)),
        }
    }
}

struct WebviewStream {
    bridge: Arc<CameraBridge>,
    tracks: usize,
}

impl VideoStream for WebviewStream {
    fn frame_size(&self) -> (u32, u32) {
        self.bridge.frame_size()
    }

    fn grab_frame(&self) -> Result<DynamicImage, CameraError> {
        self.bridge.frame.lock().clone().ok_or(CameraError::NotReady)
    }

    fn track_count(&self) -> usize {
        self.tracks
    }

    fn stop_tracks(&mut self) -> usize {
        let stopped = std::mem::take(&mut self.tracks);
        if stopped > 0 {
            self.bridge.clear_frame();
            self.bridge.signals.release_tracks(stopped);
        }
        stopped
    }
}

impl Drop for WebviewStream {
    fn drop(&mut self) {
        self.stop_tracks();
    }
}
