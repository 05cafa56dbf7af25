//! Camera capture.
//!
//! `CaptureSession` is the two-step front/back state machine. It talks to
//! hardware only through `CameraDevice` / `VideoStream`, so the desktop
//! shell plugs in the webview-backed camera and tests plug in fakes.

pub mod session;
pub mod webview;

pub use session::CaptureSession;
pub use webview::{CameraBridge, CameraSignals, StreamGrant, WebviewCamera};

use crate::error::CameraError;
use async_trait::async_trait;
use image::DynamicImage;
use serde::{Deserialize, Serialize};

/// Which camera to ask for
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    /// Selfie camera
    User,
    /// Rear camera, the one pointed at the card
    Environment,
}

/// Source of live video streams
#[async_trait]
pub trait CameraDevice: Send + Sync {
    /// Ask for a stream. Suspends until the user grants or denies access.
    async fn open_stream(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// An open video stream
pub trait VideoStream: Send {
    /// Current frame dimensions, `(0, 0)` until the first frame arrives
    fn frame_size(&self) -> (u32, u32);

    /// Copy of the current frame
    fn grab_frame(&self) -> Result<DynamicImage, CameraError>;

    /// Number of live media tracks
    fn track_count(&self) -> usize;

    /// Stop every track and return how many were stopped
    fn stop_tracks(&mut self) -> usize;
}
